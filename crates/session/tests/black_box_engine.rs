//! Black-box flow across the whole engine: pick a role through the session,
//! resolve its policy from the registry, and make permission and visibility
//! decisions, including a second "browser context" sharing the durable slot.

use std::sync::Arc;

use uuid::Uuid;

use lendfin_policy::{
    Action, Actor, CheckContext, DataScope, OrgCategory, RecordRef, Registry, Role, can_see, check,
};
use lendfin_session::{DEFAULT_ROLE, InMemoryRoleStore, RoleSession, RoleStore};

#[test]
fn role_switch_drives_permission_and_visibility_decisions() {
    let store = Arc::new(InMemoryRoleStore::new());
    let session = RoleSession::with_default(store);
    let registry = Registry::global();

    // The default role can barely do anything.
    let policy = registry.lookup(session.current());
    assert!(!check(policy, "payment", Action::Create, &CheckContext::default()));

    // Switch to the borrower CFO and retry within the monetary ceiling.
    session.set_current(Role::BorrowerCfo).unwrap();
    let policy = registry.lookup(session.current());
    assert_eq!(session.current().category(), OrgCategory::Borrower);
    assert!(check(policy, "payment", Action::Create, &CheckContext::with_amount(900_000)));
    assert!(!check(policy, "payment", Action::Create, &CheckContext::with_amount(2_000_000)));

    // Permission granted does not imply visibility: the CFO sees everything,
    // but an underwriter with `assigned` scope does not.
    let borrower = Uuid::now_v7();
    let record = RecordRef {
        owner_id: borrower,
        team_id: None,
    };
    let mut underwriter = Actor::new(Uuid::now_v7());
    assert!(can_see(policy.data_scope, &record, &underwriter));

    let uw_policy = registry.lookup(Role::LenderUnderwriter);
    assert_eq!(uw_policy.data_scope, DataScope::Assigned);
    assert!(!can_see(uw_policy.data_scope, &record, &underwriter));
    underwriter.assigned_ids.insert(borrower);
    assert!(can_see(uw_policy.data_scope, &record, &underwriter));
}

#[test]
fn sibling_context_converges_through_the_shared_slot() {
    let store = Arc::new(InMemoryRoleStore::new());
    let tab_a = RoleSession::with_default(store.clone());
    let tab_b = RoleSession::with_default(store.clone());

    let b_changes = tab_b.subscribe();

    // Tab A switches; the host bridges the slot change to tab B.
    tab_a.set_current(Role::LenderChiefCreditOfficer).unwrap();
    let slot = store.load().unwrap().unwrap();
    tab_b.apply_external(&slot).unwrap();

    assert_eq!(tab_b.current(), Role::LenderChiefCreditOfficer);
    assert_eq!(b_changes.try_recv().unwrap().current, Role::LenderChiefCreditOfficer);

    // The echo back into tab A must not re-notify its observers.
    let a_changes = tab_a.subscribe();
    tab_a.apply_external(&slot).unwrap();
    assert!(a_changes.try_recv().is_err());

    // A restart of either context recovers the persisted selection.
    drop(tab_a);
    let revived = RoleSession::with_default(store);
    assert_eq!(revived.current(), Role::LenderChiefCreditOfficer);
    assert_ne!(revived.current(), DEFAULT_ROLE);
}

#[test]
fn registry_validates_and_labels_every_role_at_startup() {
    let registry = Registry::global();
    registry.validate().unwrap();

    for role in Role::ALL {
        let policy = registry.lookup(role);
        assert!(policy.tier_level <= 6);
        assert!(!role.display_name().is_empty());
    }
}
