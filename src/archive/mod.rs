pub mod client;
pub mod error;

pub use client::{ArchiveClient, DEFAULT_BASE_URL};
pub use error::ArchiveError;
