tonic::include_proto!("jobapi");
