//! Per-session conversation isolation
//!
//! Conversation state is never shared: each session id maps to its own
//! executor, so a pending disambiguation in one conversation cannot capture
//! input from another. Idle sessions are purged after a configurable timeout.

pub mod registry;
pub mod types;

pub use registry::SessionRegistry;
pub use types::{SessionId, SessionInfo};
