//! `lendfin-session` — the role-change broadcaster.
//!
//! Holds the single piece of mutable state in the authorization engine: the
//! *current role* selection. The slot is an explicit, injectable container
//! ([`session::RoleSession`]) rather than ambient global state, so tests and
//! hosts can run independent instances without cross-talk. The slot is
//! mirrored to a durable key-value store ([`store::RoleStore`]) for reload
//! persistence and reconciled with changes made by sibling contexts.

pub mod session;
pub mod store;

pub use session::{DEFAULT_ROLE, ROLE_CHANGE_TOPIC, RoleChanged, RoleSession, SessionError};
pub use store::{CURRENT_ROLE_KEY, InMemoryRoleStore, JsonFileRoleStore, RoleStore, StoreError};
