//! Client-side authentication session.
//!
//! DESIGN
//! ======
//! `state` is the pure data model (snapshot, actions, reducer); `machine`
//! drives it from the token store and the remote authority.

pub mod machine;
pub mod state;

pub use machine::SessionManager;
pub use state::{Session, SessionAction, SessionPhase, reduce};
