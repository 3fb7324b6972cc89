//! Permission rule and policy types.
//!
//! Policies are plain data: constructed once by the registry at first use
//! and never mutated afterwards, so they are safe to share across threads.

use serde::{Deserialize, Serialize};

/// Action on a protected resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    /// Workflow actions (submit, approve, disburse) that are neither plain
    /// writes nor reads.
    Execute,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Create,
        Action::Read,
        Action::Update,
        Action::Delete,
        Action::Execute,
    ];
}

/// Resource selector on a rule.
///
/// The wildcard is an explicit variant rather than a magic `"*"` string, so
/// a legitimate resource that happens to be named `"*"` can never be
/// mistaken for it.
///
/// Rule and policy types serialize (for audit/debug dumps) but do not
/// deserialize; the registry is the only constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Resource {
    /// Matches exactly one named resource, e.g. `"loan_application"`.
    Named(&'static str),
    /// Matches any resource. A rule using `Any` must still list its actions
    /// explicitly; it never implies all actions.
    Any,
}

impl Resource {
    pub fn matches(&self, requested: &str) -> bool {
        match self {
            Resource::Named(name) => *name == requested,
            Resource::Any => true,
        }
    }
}

/// Runtime conditions narrowing an otherwise-granted permission.
///
/// Every condition present on a rule must be satisfied by the request
/// context; a condition the caller did not supply counts as unsatisfied
/// (fail-closed, see [`crate::evaluate::check`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Conditions {
    /// Required ownership flag. `Some(true)` means the caller must assert
    /// ownership of the record; the assertion must match exactly.
    pub ownership: Option<bool>,
    /// Workflow statuses in which the action is allowed.
    pub status: Option<&'static [&'static str]>,
    /// Inclusive ceiling on the transaction amount, in minor currency units.
    pub monetary_limit: Option<u64>,
}

/// One grant: a resource selector, the allowed actions, and optional
/// conditions. A rule with an empty action list never matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PermissionRule {
    pub resource: Resource,
    pub actions: &'static [Action],
    pub conditions: Option<Conditions>,
}

impl PermissionRule {
    pub const fn grant(resource: &'static str, actions: &'static [Action]) -> Self {
        Self {
            resource: Resource::Named(resource),
            actions,
            conditions: None,
        }
    }

    pub const fn grant_if(
        resource: &'static str,
        actions: &'static [Action],
        conditions: Conditions,
    ) -> Self {
        Self {
            resource: Resource::Named(resource),
            actions,
            conditions: Some(conditions),
        }
    }
}

/// Monetary ceilings attached to a role. These gate *actions* on records the
/// role can already see; data visibility is governed separately by
/// [`DataScope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonetaryLimits {
    pub max_transaction_amount: u64,
    pub max_daily_amount: u64,
    /// Transactions above this amount need a senior sign-off. Never
    /// restricts read access.
    pub requires_approval_above: Option<u64>,
}

/// Breadth of records a role may see, independent of what actions it may
/// perform on them. Both checks are required; neither implies the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataScope {
    /// Every record.
    All,
    /// Records belonging to the actor's team.
    Team,
    /// Records owned by principals the actor is assigned to.
    Assigned,
    /// Only the actor's own records.
    Own,
}

/// How a role's grants are expressed.
///
/// `Unrestricted` is the type-level fast path reserved for the two
/// designated system roles; it is never inferred from tier level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AccessModel {
    Unrestricted,
    Rules(Vec<PermissionRule>),
}

/// The full permission record for one role.
///
/// # Invariants (checked by `Registry::validate`)
/// - `tier_level` is in `0..=6` (0 = unrestricted system tier, 6 = least
///   privileged).
/// - `can_manage_team` implies `tier_level <= 3`.
/// - An `Unrestricted` access model appears only on the two designated
///   system roles.
/// - Any `Resource::Any` rule lists a non-empty action set explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RolePolicy {
    pub tier_level: u8,
    pub can_manage_team: bool,
    pub monetary_limits: Option<MonetaryLimits>,
    pub data_scope: DataScope,
    pub access: AccessModel,
}

impl RolePolicy {
    pub fn is_unrestricted(&self) -> bool {
        matches!(self.access, AccessModel::Unrestricted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_resource_matches_only_itself() {
        let r = Resource::Named("payment");
        assert!(r.matches("payment"));
        assert!(!r.matches("invoice"));
        assert!(!r.matches("*"));
    }

    #[test]
    fn wildcard_matches_everything_including_literal_star() {
        assert!(Resource::Any.matches("payment"));
        assert!(Resource::Any.matches("*"));
        assert!(Resource::Any.matches(""));
    }
}
