//! Generated protobuf/gRPC bindings for the three internal services. Kept
//! in its own crate so the ingester, searcher, and gateway can depend on the
//! wire types without depending on each other's implementations.

pub mod common {
    tonic::include_proto!("xkcd.common");
}

pub mod update {
    tonic::include_proto!("xkcd.update");
}

pub mod search {
    tonic::include_proto!("xkcd.search");
}

pub mod words {
    tonic::include_proto!("xkcd.words");
}

/// Encoded `FileDescriptorSet` used to register `tonic_reflection` servers,
/// for parity with the original's `reflection.Register(s)`.
pub const FILE_DESCRIPTOR_SET: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/xkcd_descriptor.bin"));
