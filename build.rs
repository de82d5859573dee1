use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);
    let proto_dir = PathBuf::from("proto");

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=proto/");

    // Point prost/tonic at a protoc binary. Prefer an explicit PROTOC from the
    // environment; otherwise fall back to the vendored binary so the build does
    // not require a system-installed protobuf compiler.
    if std::env::var_os("PROTOC").is_none() {
        if let Ok(path) = protoc_bin_vendored::protoc_bin_path() {
            std::env::set_var("PROTOC", path);
        }
    }

    // Compile the proto files from the local proto/ directory
    tonic_build::configure()
        .build_server(true)
        .build_client(false)
        .file_descriptor_set_path(out_dir.join("doorman_descriptor.bin"))
        .compile_protos(&[proto_dir.join("doorman/v1/doorman.proto")], &[&proto_dir])?;

    Ok(())
}
