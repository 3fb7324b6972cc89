//! Permission evaluation.
//!
//! `check` is the single decision entry point: deterministic, side-effect
//! free (no logging, no mutation) and safe to call on every render or
//! request. Denial is a plain `false`; unknown resources and absent context
//! deny rather than error (default-deny posture throughout).

use crate::rules::{AccessModel, Action, Conditions, RolePolicy};

/// Runtime context for conditional rules.
///
/// A conditional rule only grants when the caller supplies the context the
/// condition needs. Leaving a field `None` while the matched rule constrains
/// it makes the check fail closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckContext<'a> {
    /// Whether the acting principal owns the record in question.
    pub ownership: Option<bool>,
    /// Current workflow status of the record.
    pub status: Option<&'a str>,
    /// Transaction amount in minor currency units.
    pub amount: Option<u64>,
}

impl<'a> CheckContext<'a> {
    pub fn owned(owned: bool) -> Self {
        Self {
            ownership: Some(owned),
            ..Self::default()
        }
    }

    pub fn with_status(status: &'a str) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn with_amount(amount: u64) -> Self {
        Self {
            amount: Some(amount),
            ..Self::default()
        }
    }
}

/// Decide whether `policy` permits `action` on `resource` under `ctx`.
///
/// 1. An [`AccessModel::Unrestricted`] policy allows everything. This is a
///    type-level fact limited to the two designated system roles; it is
///    never inferred from tier level.
/// 2. Otherwise the first rule whose resource selector matches and whose
///    action list contains `action` decides. A rule with an empty action
///    list never matches.
/// 3. Every condition on the matched rule must be satisfied by `ctx`; a
///    condition the caller did not supply is unsatisfied (fail-closed).
/// 4. No matching rule means deny.
pub fn check(policy: &RolePolicy, resource: &str, action: Action, ctx: &CheckContext<'_>) -> bool {
    let rules = match &policy.access {
        AccessModel::Unrestricted => return true,
        AccessModel::Rules(rules) => rules,
    };

    let matched = rules
        .iter()
        .find(|rule| rule.resource.matches(resource) && rule.actions.contains(&action));

    match matched {
        Some(rule) => match &rule.conditions {
            Some(conditions) => conditions_satisfied(conditions, ctx),
            None => true,
        },
        None => false,
    }
}

fn conditions_satisfied(conditions: &Conditions, ctx: &CheckContext<'_>) -> bool {
    if let Some(required) = conditions.ownership {
        // Exact match; an unsupplied ownership flag does not satisfy.
        if ctx.ownership != Some(required) {
            return false;
        }
    }
    if let Some(allowed) = conditions.status {
        match ctx.status {
            Some(status) if allowed.contains(&status) => {}
            _ => return false,
        }
    }
    if let Some(limit) = conditions.monetary_limit {
        match ctx.amount {
            Some(amount) if amount <= limit => {}
            _ => return false,
        }
    }
    true
}
