//! `lendfin-events` — change-notification plumbing (mechanics only).
//!
//! A small, transport-agnostic publish/subscribe abstraction used to fan
//! role-change notifications out to interested observers. This crate carries
//! no domain knowledge; the session crate decides what flows through it.

pub mod bus;
pub mod in_memory_bus;

pub use bus::{ChangeBus, Subscription};
pub use in_memory_bus::{InMemoryBusError, InMemoryChangeBus};
