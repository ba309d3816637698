//! `qms-core`: wire primitives shared by the QMS client crates.
//!
//! This crate is HTTP-agnostic: it only knows how payloads look on the wire
//! (ids, pages, the `{success, message, data}` envelope, query parameters).

pub mod envelope;
pub mod error;
pub mod id;
pub mod page;
pub mod query;
pub mod timestamp;

pub use envelope::{Envelope, Shape};
pub use error::{PayloadError, PayloadResult};
pub use id::RecordId;
pub use page::{Page, PageRequest};
pub use query::query_pairs;
