//! Durable blob storage for generated assets.
//!
//! This crate provides:
//! - An S3-compatible blob client (upload, list, delete, public URLs)
//! - The asset transfer service: copy a remotely hosted asset into durable
//!   storage so the publishing step can reference a stable URL
//! - Operator housekeeping over stored assets (list, delete by URL)

pub mod client;
pub mod error;
pub mod transfer;

pub use client::{BlobClient, BlobConfig, ObjectInfo};
pub use error::{StorageError, StorageResult};
pub use transfer::{AssetTransfer, StoredAsset};
