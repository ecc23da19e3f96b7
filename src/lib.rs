//! # safe-session
//!
//! Client-side authentication session for the SAFE application: persisted
//! bearer token, the remote authority behind sign-in/sign-up, a reducer-driven
//! session state machine, and the guard that gates navigation on it.
//!
//! The `SessionManager` is built once at startup and handed to whatever needs
//! it; nothing is looked up through globals.

pub mod api;
pub mod config;
pub mod guard;
pub mod routes;
pub mod session;
pub mod store;

pub use api::{AuthError, AuthSuccess, HttpSessionApi, SessionApi, SignInCredentials, SignUpCredentials, User};
pub use config::SessionConfig;
pub use guard::{GuardDecision, Location, Navigator, Resolution, SessionGuard};
pub use session::{Session, SessionAction, SessionManager, SessionPhase};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
