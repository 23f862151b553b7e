fn main() {
    println!("cargo:rerun-if-changed=./jobapi.proto");
    tonic_build::compile_protos("./jobapi.proto")
        .unwrap_or_else(|err| panic!("Failed to compile protos {:?}", err));
}
