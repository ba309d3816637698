//! `qms-auth`: client-side authentication state.
//!
//! This crate is intentionally decoupled from HTTP: it owns the token pair,
//! where it is persisted, the session state machine and the hook used to send
//! the user back to the login screen. The transport layer drives it.

pub mod navigator;
pub mod session;
pub mod store;
pub mod tokens;

pub use navigator::{LOGIN_ROUTE, LogNavigator, NavigateFn, Navigator};
pub use session::{SessionEvent, SessionState};
pub use store::{
    ACCESS_TOKEN_KEY, AuthStore, FileAuthStore, MemoryAuthStore, REFRESH_TOKEN_KEY, StoreError,
};
pub use tokens::TokenPair;
