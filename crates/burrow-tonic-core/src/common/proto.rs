//! Generated bindings for the `burrow.Bucket` service.

tonic::include_proto!("burrow");

/// Encoded descriptor set, registered with the reflection service.
pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("burrow_descriptor");
