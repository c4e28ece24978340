//! The ingestion engine: fetches new comics from the remote corpus,
//! normalizes their text via the `xkcd-normalizer` service, and persists
//! them, notifying the searcher of every successful pass.

pub mod config;
pub mod engine;
pub mod error;
pub mod eventbus;
pub mod grpc;
pub mod normalizer_client;
pub mod store;
pub mod worker;
pub mod xkcd_client;
