//! The current-role state container and change broadcaster.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lendfin_events::{ChangeBus, InMemoryChangeBus, Subscription};
use lendfin_policy::{InvalidRole, Role};

use crate::store::{RoleStore, StoreError};

/// Topic name for the cross-context channel. Hosts that bridge sibling
/// contexts (other tabs, other processes) should publish slot changes under
/// this name and feed them into [`RoleSession::apply_external`].
pub const ROLE_CHANGE_TOPIC: &str = "lendfin.role.changed";

/// Fallback when the durable slot is empty or malformed on first read: the
/// least-privileged business role.
pub const DEFAULT_ROLE: Role = Role::BorrowerAdminAssistant;

/// Notification delivered to observers on every applied role change.
///
/// Delivery order across observers is unspecified, and a notification may
/// describe a change that a concurrent call has already superseded.
/// Consumers should re-read [`RoleSession::current`] rather than trusting
/// the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleChanged {
    pub previous: Role,
    pub current: Role,
    pub changed_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum SessionError {
    /// The identifier is outside the closed role set. The write was
    /// rejected; prior state is retained.
    #[error(transparent)]
    InvalidRole(#[from] InvalidRole),

    /// The durable slot could not be written. Memory was left unchanged, so
    /// slot and memory still agree.
    #[error("durable role slot unavailable: {0}")]
    Store(#[from] StoreError),
}

/// The single mutable slot of the authorization engine.
///
/// All policy evaluation is pure; this container owns the only shared state.
/// `set_current` updates the durable slot and the in-memory value under one
/// lock (both or neither) and then fans a [`RoleChanged`] out to in-process
/// subscribers. Construct one per host and inject it; nothing here is
/// process-global.
pub struct RoleSession {
    store: Arc<dyn RoleStore>,
    current: Mutex<Role>,
    bus: InMemoryChangeBus<RoleChanged>,
}

impl RoleSession {
    /// Read the durable slot and take the recovered role, or `fallback` if
    /// the slot is empty, unreadable or names an unknown role.
    pub fn new(store: Arc<dyn RoleStore>, fallback: Role) -> Self {
        let initial = match store.load() {
            Ok(Some(raw)) => match raw.parse::<Role>() {
                Ok(role) => role,
                Err(err) => {
                    tracing::warn!(%err, fallback = %fallback, "durable role slot malformed");
                    fallback
                }
            },
            Ok(None) => fallback,
            Err(err) => {
                tracing::warn!(%err, fallback = %fallback, "durable role slot unreadable");
                fallback
            }
        };

        Self {
            store,
            current: Mutex::new(initial),
            bus: InMemoryChangeBus::new(),
        }
    }

    /// [`RoleSession::new`] with [`DEFAULT_ROLE`] as the fallback.
    pub fn with_default(store: Arc<dyn RoleStore>) -> Self {
        Self::new(store, DEFAULT_ROLE)
    }

    /// The currently selected role. This is the authoritative value;
    /// notification payloads may lag behind it.
    pub fn current(&self) -> Role {
        *self.lock_current()
    }

    /// Switch the current role.
    ///
    /// Persists to the durable slot first; if that fails the in-memory value
    /// is untouched and slot and memory still agree. A no-op switch (same
    /// role) writes nothing and notifies nobody.
    pub fn set_current(&self, role: Role) -> Result<(), SessionError> {
        let mut current = self.lock_current();
        if *current == role {
            return Ok(());
        }

        self.store.save(role.as_str())?;

        let previous = *current;
        *current = role;
        drop(current);

        self.notify(previous, role);
        Ok(())
    }

    /// [`RoleSession::set_current`] from a raw identifier. Identifiers
    /// outside the closed set are rejected and prior state is retained.
    pub fn set_current_named(&self, name: &str) -> Result<(), SessionError> {
        let role: Role = name.parse()?;
        self.set_current(role)
    }

    /// Reconcile a change made to the durable slot by another context.
    ///
    /// The slot was already written by the other side, so nothing is
    /// persisted here. If the carried role equals the value we already
    /// applied locally (the local `set_current` echoing back through the
    /// cross-context channel), the notification is swallowed — this is the
    /// comparison that guarantees observers see at most one notification
    /// per change.
    pub fn apply_external(&self, name: &str) -> Result<(), SessionError> {
        let role: Role = name.parse()?;

        let mut current = self.lock_current();
        if *current == role {
            return Ok(());
        }

        let previous = *current;
        *current = role;
        drop(current);

        tracing::debug!(previous = %previous, current = %role, "adopted external role change");
        self.notify(previous, role);
        Ok(())
    }

    /// Subscribe to role-change notifications from this session.
    pub fn subscribe(&self) -> Subscription<RoleChanged> {
        self.bus.subscribe()
    }

    fn notify(&self, previous: Role, current: Role) {
        let change = RoleChanged {
            previous,
            current,
            changed_at: Utc::now(),
        };
        if self.bus.publish(change).is_err() {
            tracing::warn!("role-change bus unavailable; observers not notified");
        }
    }

    // The guarded value is a Copy enum, so a panic while holding the lock
    // cannot leave it half-written; recovering from poisoning is safe.
    fn lock_current(&self) -> std::sync::MutexGuard<'_, Role> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryRoleStore;

    fn session() -> (Arc<InMemoryRoleStore>, RoleSession) {
        let store = Arc::new(InMemoryRoleStore::new());
        let session = RoleSession::with_default(store.clone());
        (store, session)
    }

    #[test]
    fn empty_slot_falls_back_to_the_default_role() {
        let (_, session) = session();
        assert_eq!(session.current(), DEFAULT_ROLE);
    }

    #[test]
    fn malformed_slot_falls_back_to_the_default_role() {
        let store = Arc::new(InMemoryRoleStore::seeded("chief-vibes-officer"));
        let session = RoleSession::with_default(store);
        assert_eq!(session.current(), DEFAULT_ROLE);
    }

    #[test]
    fn set_current_updates_memory_and_slot() {
        let (store, session) = session();

        session.set_current(Role::BorrowerCfo).unwrap();
        session.set_current(Role::LenderOwner).unwrap();

        assert_eq!(session.current(), Role::LenderOwner);
        assert_eq!(store.load().unwrap(), Some("lender-owner".to_string()));
    }

    #[test]
    fn slot_survives_a_simulated_restart() {
        let (store, session) = session();
        session.set_current(Role::BrokerPrincipal).unwrap();
        drop(session);

        let revived = RoleSession::with_default(store);
        assert_eq!(revived.current(), Role::BrokerPrincipal);
    }

    #[test]
    fn rejected_identifier_retains_state() {
        let (store, session) = session();
        session.set_current(Role::VendorOwner).unwrap();

        let err = session.set_current_named("not-a-real-role").unwrap_err();
        assert!(matches!(err, SessionError::InvalidRole(_)));
        assert_eq!(session.current(), Role::VendorOwner);
        assert_eq!(store.load().unwrap(), Some("vendor-owner".to_string()));
    }

    #[test]
    fn each_subscriber_sees_exactly_one_notification_per_change() {
        let (_, session) = session();
        let first = session.subscribe();
        let second = session.subscribe();

        session.set_current(Role::BorrowerCfo).unwrap();

        for sub in [&first, &second] {
            let change = sub.try_recv().unwrap();
            assert_eq!(change.previous, DEFAULT_ROLE);
            assert_eq!(change.current, Role::BorrowerCfo);
            assert!(sub.try_recv().is_err(), "duplicate delivery");
        }
    }

    #[test]
    fn setting_the_same_role_again_is_silent() {
        let (_, session) = session();
        session.set_current(Role::BorrowerCfo).unwrap();

        let sub = session.subscribe();
        session.set_current(Role::BorrowerCfo).unwrap();
        assert!(sub.try_recv().is_err());
    }

    #[test]
    fn external_echo_of_an_applied_change_is_swallowed() {
        let (_, session) = session();
        session.set_current(Role::BorrowerCfo).unwrap();

        // The cross-context channel replays the change we just made.
        let sub = session.subscribe();
        session.apply_external("borrower-cfo").unwrap();
        assert!(sub.try_recv().is_err());
    }

    #[test]
    fn external_change_from_another_context_is_adopted() {
        let (store, session) = session();
        let sub = session.subscribe();

        // Another context wrote the slot and signalled us.
        store.save("lender-underwriter").unwrap();
        session.apply_external("lender-underwriter").unwrap();

        assert_eq!(session.current(), Role::LenderUnderwriter);
        let change = sub.try_recv().unwrap();
        assert_eq!(change.current, Role::LenderUnderwriter);
        assert!(sub.try_recv().is_err());
    }

    #[test]
    fn external_garbage_is_rejected_and_state_kept() {
        let (_, session) = session();
        session.set_current(Role::VendorClerk).unwrap();

        assert!(session.apply_external("banana").is_err());
        assert_eq!(session.current(), Role::VendorClerk);
    }

    #[test]
    fn store_failure_leaves_memory_unchanged() {
        struct BrokenStore;

        impl RoleStore for BrokenStore {
            fn load(&self) -> Result<Option<String>, StoreError> {
                Ok(None)
            }

            fn save(&self, _role: &str) -> Result<(), StoreError> {
                Err(StoreError::Write("disk on fire".to_string()))
            }
        }

        let session = RoleSession::with_default(Arc::new(BrokenStore));
        let sub = session.subscribe();

        let err = session.set_current(Role::LenderOwner).unwrap_err();
        assert!(matches!(err, SessionError::Store(_)));
        assert_eq!(session.current(), DEFAULT_ROLE);
        assert!(sub.try_recv().is_err(), "no notification for a failed switch");
    }
}
