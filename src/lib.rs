//! Google Cloud Storage provisioning demo
//!
//! Exercises the storage JSON API end to end: ensure a bucket, list
//! buckets, upload a local file as an object, list objects, grant and
//! read back an object ACL, fetch the media link, then restore the
//! original state by deleting the object and the bucket.
//!
//! Any provisioning failure triggers the same best-effort cleanup
//! before the run is reported as failed, so a partial run never leaves
//! a created bucket or object behind.
//!
//! # Quick Start
//! ```no_run
//! use gcs_provision::{
//!     provision::{self, ProvisionConfig},
//!     storage::{credentials::authorizeduser, StorageService},
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ProvisionConfig {
//!         project: "my-project".to_owned(),
//!         bucket: "my-demo-bucket".to_owned(),
//!         object: "english-dictionary".to_owned(),
//!         source: "/usr/share/dict/words".into(),
//!         reader_entity: Some("allUsers".to_owned()),
//!     };
//!
//!     let token_generator = authorizeduser::default().await.unwrap();
//!     let storage = StorageService::new(token_generator).await.unwrap();
//!
//!     let report = provision::run(&storage, &config).await;
//!     assert!(report.is_success());
//! }
//! ```
mod gcp;

pub use gcp::auth;
pub use gcp::provision;
pub use gcp::{storage, Client};
