//! Generates the `Bucket` client and server from `proto/burrow.proto`.
//!
//! The encoded file descriptor set is written next to the generated code so
//! the server can register it with `tonic-reflection`.

use std::env;
use std::path::PathBuf;

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let descriptor_path = out_dir.join("burrow_descriptor.bin");

    let mut config = tonic_prost_build::Config::new();
    config.file_descriptor_set_path(&descriptor_path);

    tonic_prost_build::configure()
        .compile_with_config(config, &["proto/burrow.proto"], &["proto"])
        .expect("failed to compile proto/burrow.proto");
}
