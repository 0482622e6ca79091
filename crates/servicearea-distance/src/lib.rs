pub mod client;
pub mod error;
mod retry;
pub mod types;

pub use client::DistanceMatrixClient;
pub use error::ClientBuildError;
