use clap::Parser;

/// Per-job supervisor: coordinates with the job-description service to
/// mount the data environment and run one unit of user work.
#[derive(Debug, Parser)]
pub struct ArgParser {
    /// Identifier of the job to run
    pub job_id: String,

    /// Address of the job-description service, host:port
    #[clap(long = "addr", env = "JOB_API_ADDR")]
    pub addr: String,

    /// Mount point for the job's data view
    #[clap(long = "mount-path", default_value = "/pfs")]
    pub mount_path: String,

    /// External mount helper program
    #[clap(long = "mount-helper", default_value = "pfs-mount")]
    pub mount_helper: String,
}
