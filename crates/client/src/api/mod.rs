//! Domain facades: one borrowed namespace per backend area.
//!
//! ```ignore
//! let page = client.documents().list(&DocumentFilter::default()).await?;
//! ```
//!
//! Each function builds one request and decodes the payload with the shape the
//! corresponding endpoint uses. Nothing here retries, caches or swallows
//! errors.

use serde_json::{Map, Value};

/// Server fields the typed models do not name.
pub type Extra = Map<String, Value>;

macro_rules! facade {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name<'a> {
            client: &'a crate::ApiClient,
        }

        impl<'a> $name<'a> {
            pub(crate) fn new(client: &'a crate::ApiClient) -> Self {
                Self { client }
            }
        }
    };
}

pub mod actions_log;
pub mod allergen_label;
pub mod audits;
pub mod auth;
pub mod complaints;
pub mod dashboard;
pub mod departments;
pub mod documents;
pub mod haccp;
pub mod interested_parties;
pub mod management_review;
pub mod nonconformance;
pub mod notifications;
pub mod prp;
pub mod risk;
pub mod settings;
pub mod suppliers;
pub mod traceability;
pub mod training;
pub mod users;

use crate::ApiClient;

impl ApiClient {
    pub fn auth(&self) -> auth::Auth<'_> {
        auth::Auth::new(self)
    }

    pub fn users(&self) -> users::Users<'_> {
        users::Users::new(self)
    }

    pub fn documents(&self) -> documents::Documents<'_> {
        documents::Documents::new(self)
    }

    pub fn haccp(&self) -> haccp::Haccp<'_> {
        haccp::Haccp::new(self)
    }

    pub fn prp(&self) -> prp::Prp<'_> {
        prp::Prp::new(self)
    }

    pub fn suppliers(&self) -> suppliers::Suppliers<'_> {
        suppliers::Suppliers::new(self)
    }

    pub fn nonconformance(&self) -> nonconformance::NonConformance<'_> {
        nonconformance::NonConformance::new(self)
    }

    pub fn traceability(&self) -> traceability::Traceability<'_> {
        traceability::Traceability::new(self)
    }

    pub fn audits(&self) -> audits::Audits<'_> {
        audits::Audits::new(self)
    }

    pub fn training(&self) -> training::Training<'_> {
        training::Training::new(self)
    }

    pub fn complaints(&self) -> complaints::Complaints<'_> {
        complaints::Complaints::new(self)
    }

    pub fn notifications(&self) -> notifications::Notifications<'_> {
        notifications::Notifications::new(self)
    }

    pub fn settings(&self) -> settings::Settings<'_> {
        settings::Settings::new(self)
    }

    pub fn dashboard(&self) -> dashboard::Dashboard<'_> {
        dashboard::Dashboard::new(self)
    }

    pub fn management_reviews(&self) -> management_review::ManagementReviews<'_> {
        management_review::ManagementReviews::new(self)
    }

    pub fn allergen_label(&self) -> allergen_label::AllergenLabel<'_> {
        allergen_label::AllergenLabel::new(self)
    }

    pub fn departments(&self) -> departments::Departments<'_> {
        departments::Departments::new(self)
    }

    pub fn interested_parties(&self) -> interested_parties::InterestedParties<'_> {
        interested_parties::InterestedParties::new(self)
    }

    pub fn risks(&self) -> risk::Risks<'_> {
        risk::Risks::new(self)
    }

    pub fn actions_log(&self) -> actions_log::ActionsLog<'_> {
        actions_log::ActionsLog::new(self)
    }
}
