//! Client for the FaceGlow cloud functions.
//!
//! Every data operation in the system is a POST to a cloud function that
//! answers with a `{ code, message, data }` envelope. This crate wraps that
//! endpoint set behind seam traits so the pipeline and the HTTP API can be
//! exercised against in-memory fakes.

pub mod client;
pub mod envelope;
pub mod error;
pub mod traits;
pub mod types;

pub use client::CloudClient;
pub use envelope::Envelope;
pub use error::{CloudError, CloudResult};
pub use traits::{AlbumStore, AnalyticsSource, CategoryStore, FileStore};
