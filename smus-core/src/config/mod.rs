//! Run configuration types.
//!
//! - `pagination`: listing page ceiling
//! - `polling`: changeset polling and glossary settling budgets
//! - `session`: AWS region, profile and role assumption

mod pagination;
mod polling;
mod session;

pub use pagination::PaginationConfig;
pub use polling::{PollConfig, SettleConfig};
pub use session::{DEFAULT_SESSION_NAME, SessionConfig};
