//! Blob store HTTP client
//!
//! A native Rust client for the Vercel Blob object storage REST API.
//!
//! # Quick Start
//!
//! ```no_run
//! use blobstore_client::{BlobClient, CommonCreateOptions, ListOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), blobstore_client::Error> {
//!     // Token from the argument, or `BLOB_READ_WRITE_TOKEN`
//!     let client = BlobClient::new(None)?;
//!
//!     // Upload
//!     let options = CommonCreateOptions::new().add_random_suffix(true);
//!     let blob = client.put("hello.txt", "hello world", Some(&options)).await?;
//!     println!("uploaded: {}", blob.url);
//!
//!     // Inspect
//!     let head = client.head(&blob.url).await?;
//!     println!("{} bytes", head.size);
//!
//!     // List
//!     let page = client.list(Some(&ListOptions::new().limit(10))).await?;
//!     println!("{} blobs, more: {}", page.blobs().len(), page.has_more());
//!
//!     // Delete
//!     client.del(&[blob.url]).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Errors
//!
//! API failures are reported as typed [`Error`] variants, so callers can
//! branch on the failure kind:
//!
//! ```no_run
//! # async fn example(client: blobstore_client::BlobClient) -> Result<(), blobstore_client::Error> {
//! use blobstore_client::Error;
//!
//! match client.head("https://store.public.blob.vercel-storage.com/a.txt").await {
//!     Ok(head) => println!("{}", head.pathname),
//!     Err(Error::BlobNotFound) => println!("gone"),
//!     Err(Error::RateLimited { retry_after }) => println!("retry in {retry_after:?}s"),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! Settings are resolved once when the client is built: explicit values,
//! then `BLOB_READ_WRITE_TOKEN`, `VERCEL_BLOB_API_URL` and
//! `VERCEL_BLOB_API_VERSION_OVERRIDE`, then built-in defaults.
//!
//! ```no_run
//! use blobstore_client::BlobClient;
//! use std::time::Duration;
//!
//! let client = BlobClient::builder()
//!     .token("vercel_blob_rw_...")
//!     .timeout(Duration::from_secs(10))
//!     .build()
//!     .unwrap();
//! ```

mod client;
pub mod config;
mod error;
pub mod options;
pub mod types;

pub use client::{API_VERSION_HEADER, BlobClient, BlobClientBuilder};
pub use config::ClientConfig;
pub use error::{Error, ErrorDetail, ErrorResponse, UNKNOWN_ERROR_CODE};
pub use options::{CommonCreateOptions, ListMode, ListOptions};
pub use types::{
    CopyResult, HeadResult, ListFoldedResult, ListItem, ListResponse, ListResult, PutResult,
    parse_timestamp,
};
