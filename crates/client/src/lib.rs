//! `qms-client`: typed async client for the QMS (ISO 22000 / HACCP) API.
//!
//! ```ignore
//! let client = ApiClient::from_env()?;
//! client.auth().login("quality.manager", "secret").await?;
//! let open = client
//!     .nonconformance()
//!     .list(&NcFilter { status: Some(NcStatus::Open), ..Default::default() })
//!     .await?;
//! ```
//!
//! Layers, bottom-up:
//! - [`config`]: environment-driven configuration and base URL resolution;
//! - [`request`]: replayable request descriptions, uploads and downloads;
//! - [`client`]: the bearer-token transport with transparent refresh;
//! - [`api`]: one facade per backend area.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod request;

pub use client::{ApiClient, ApiClientBuilder};
pub use config::{ApiBase, ClientConfig};
pub use error::{ClientError, ClientResult};
pub use request::{ApiRequest, Blob, MultipartForm, Upload};

pub use api::Extra;
pub use api::dashboard::Placeholder;

pub use qms_auth::{
    AuthStore, FileAuthStore, MemoryAuthStore, NavigateFn, Navigator, SessionState, TokenPair,
};
pub use qms_core::{Page, PageRequest, RecordId, Shape};
