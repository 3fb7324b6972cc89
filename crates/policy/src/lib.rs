//! `lendfin-policy` — pure role/permission decision engine.
//!
//! This crate is intentionally decoupled from rendering, storage and
//! transport: every function here is synchronous, deterministic and free of
//! side effects, so callers may evaluate on every request or render pass.
//!
//! Denial is an ordinary `false`, never an error. The only error conditions
//! in this crate are malformed role identifiers ([`InvalidRole`]) and
//! registry invariant violations surfaced by [`registry::Registry::validate`].

pub mod evaluate;
pub mod registry;
pub mod role;
pub mod rules;
pub mod scope;

pub use evaluate::{CheckContext, check};
pub use registry::{PolicyError, Registry};
pub use role::{InvalidRole, OrgCategory, Role, classify_name};
pub use rules::{
    AccessModel, Action, Conditions, DataScope, MonetaryLimits, PermissionRule, Resource,
    RolePolicy,
};
pub use scope::{Actor, RecordRef, can_see};
