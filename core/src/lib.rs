//! Core components for signed, retried object-storage requests.
//!
//! This crate provides the foundational types for the s3meta ecosystem:
//!
//! - **Context**: a container holding the HTTP sender and environment access
//! - **Traits**: abstract interfaces for credential loading
//!   (`ProvideCredential`) and request signing (`SignRequest`)
//! - **Signer**: the orchestrator that coordinates credential loading and
//!   request signing
//! - **RetryPolicy**: the bounded retry executor that wraps every network
//!   dispatch with an attempt budget
//!
//! ## Example
//!
//! ```no_run
//! use s3meta_core::{Context, RetryPolicy, Signer};
//! # use s3meta_core::Result;
//! # async fn example(
//! #     ctx: Context,
//! #     signer: Signer<impl s3meta_core::SigningCredential>,
//! # ) -> Result<()> {
//! let mut parts = http::Request::get("http://bucket.s3.amazonaws.com/key")
//!     .body(())
//!     .unwrap()
//!     .into_parts()
//!     .0;
//! signer.sign(&mut parts).await?;
//!
//! let req = http::Request::from_parts(parts, bytes::Bytes::new());
//! let resp = RetryPolicy::default().dispatch(&ctx, req).await?;
//! # let _ = resp;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::{Context, Env, HttpSend, OsEnv, StaticEnv};

mod error;
pub use error::{Error, ErrorKind, Result};

mod api;
pub use api::{ProvideCredential, ProvideCredentialChain, SignRequest, SigningCredential};

mod retry;
pub use retry::RetryPolicy;

mod signer;
pub use signer::Signer;
