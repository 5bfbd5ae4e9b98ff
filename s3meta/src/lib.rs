//! S3 object access with a focus on user-defined metadata.
//!
//! This crate is a small client for S3-compatible object storage. It signs
//! every request with the AWS signature v2 algorithm (HMAC-SHA1 over a
//! canonical string) and dispatches it through a bounded retry loop, then
//! exposes plain Head/Get/Put/List operations plus the `x-amz-meta-*`
//! user-defined metadata attached to objects.
//!
//! ## Quick Start
//!
//! ```no_run
//! use s3meta::{Bucket, StaticCredentialProvider};
//! use s3meta_core::Context;
//! use s3meta_http_send_reqwest::ReqwestHttpSend;
//!
//! #[tokio::main]
//! async fn main() -> s3meta_core::Result<()> {
//!     let ctx = Context::new().with_http_send(ReqwestHttpSend::default());
//!
//!     let provider = StaticCredentialProvider::new("access-key-id", "secret-access-key");
//!     let bucket = Bucket::new(ctx, "my-bucket", ".s3.amazonaws.com", provider);
//!
//!     let mut meta = std::collections::HashMap::new();
//!     meta.insert("owner".to_string(), "alice".to_string());
//!     bucket
//!         .put_object_with_metadata("greeting", "hello", &meta)
//!         .await?;
//!
//!     if let Some((body, meta)) = bucket.get_object_with_metadata("greeting").await? {
//!         println!("{:?} owned by {:?}", body, meta.get("owner"));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Credential Sources
//!
//! Credentials can be passed in directly with [`StaticCredentialProvider`],
//! read from `AWS_ACCESS_KEY_ID`/`AWS_SECRET_ACCESS_KEY` with
//! [`EnvCredentialProvider`], or resolved through the
//! [`DefaultCredentialProvider`] chain.
//!
//! ## Retry Behavior
//!
//! Transport failures are retried with a fixed delay until a configurable
//! attempt count or elapsed-time budget runs out; see
//! [`s3meta_core::RetryPolicy`]. HTTP error statuses are never retried at
//! that layer: 404 on Get/Head becomes an absent result, any other
//! non-success status becomes an error carrying the status and body text.

mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::*;

mod sign_request;
pub use sign_request::RequestSigner;

mod list;
pub use list::{BucketItem, ListBucketResult};

mod bucket;
pub use bucket::{extract_metadata, Bucket};
