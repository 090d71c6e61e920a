//! Path guard and resource limits for untrusted archive content.

pub mod guard;
pub mod quota;

pub use guard::resolve;
pub use guard::resolve_entry;
pub use quota::QuotaTracker;
