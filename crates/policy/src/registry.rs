//! The role registry: one immutable [`RolePolicy`] per enumerated role.
//!
//! Policies are built once, at first access, from the exhaustive match in
//! [`policy_for`]. Because the match is over the closed [`Role`] enum,
//! adding a role without a policy is a compile error, which is what makes
//! [`Registry::lookup`] total. [`Registry::validate`] re-checks the data
//! invariants that the type system cannot express and is intended as a
//! startup assertion (and a test target).

use std::collections::HashMap;
use std::sync::LazyLock;

use thiserror::Error;

use crate::role::Role;
use crate::rules::{
    AccessModel, Action, Conditions, DataScope, MonetaryLimits, PermissionRule, Resource,
    RolePolicy,
};

/// Registry construction/validation failure. Only surfaces from
/// [`Registry::validate`]; lookups never fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("policy invariant violated for '{role}': {detail}")]
    InvariantViolation { role: Role, detail: String },
}

impl PolicyError {
    fn invariant(role: Role, detail: impl Into<String>) -> Self {
        Self::InvariantViolation {
            role,
            detail: detail.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Action sets and workflow status sets used by the policy table
// ─────────────────────────────────────────────────────────────────────────────

const R: &[Action] = &[Action::Read];
const RE: &[Action] = &[Action::Read, Action::Execute];
const CR: &[Action] = &[Action::Create, Action::Read];
const CRE: &[Action] = &[Action::Create, Action::Read, Action::Execute];
const CRU: &[Action] = &[Action::Create, Action::Read, Action::Update];
const RU: &[Action] = &[Action::Read, Action::Update];
const CRUD: &[Action] = &[Action::Create, Action::Read, Action::Update, Action::Delete];
const EXECUTE: &[Action] = &[Action::Execute];
const UPDATE: &[Action] = &[Action::Update];

const DRAFT: &[&str] = &["draft"];
const DRAFT_OR_REVIEW: &[&str] = &["draft", "under_review"];
const DRAFT_OR_PENDING: &[&str] = &["draft", "pending"];
const DRAFT_OR_SUBMITTED: &[&str] = &["draft", "submitted"];
const SUBMITTED: &[&str] = &["submitted"];
const SUBMITTED_OR_REVIEW: &[&str] = &["submitted", "under_review"];
const UNDER_REVIEW: &[&str] = &["under_review"];

const fn owned() -> Conditions {
    Conditions {
        ownership: Some(true),
        status: None,
        monetary_limit: None,
    }
}

const fn in_status(status: &'static [&'static str]) -> Conditions {
    Conditions {
        ownership: None,
        status: Some(status),
        monetary_limit: None,
    }
}

const fn up_to(amount: u64) -> Conditions {
    Conditions {
        ownership: None,
        status: None,
        monetary_limit: Some(amount),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────────────────────────────────────

static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Static, exhaustive role → policy mapping. Pure data; no behavior beyond
/// lookup and invariant validation.
#[derive(Debug)]
pub struct Registry {
    policies: HashMap<Role, RolePolicy>,
}

impl Registry {
    /// Build the registry from the closed role set.
    pub fn new() -> Self {
        let policies = Role::ALL
            .into_iter()
            .map(|role| (role, policy_for(role)))
            .collect();
        Self { policies }
    }

    /// Process-wide registry instance, built on first access.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Total lookup over the closed role set.
    pub fn lookup(&self, role: Role) -> &RolePolicy {
        self.policies
            .get(&role)
            .expect("registry is built from Role::ALL and covers every role")
    }

    /// Startup assertion over the invariants the type system cannot carry:
    /// tier range, team-management tier bound, the unrestricted whitelist,
    /// and explicit actions on wildcard rules.
    pub fn validate(&self) -> Result<(), PolicyError> {
        for (&role, policy) in &self.policies {
            if policy.tier_level > 6 {
                return Err(PolicyError::invariant(
                    role,
                    format!("tier_level {} outside 0..=6", policy.tier_level),
                ));
            }
            if policy.can_manage_team && policy.tier_level > 3 {
                return Err(PolicyError::invariant(
                    role,
                    "team management granted below tier 3",
                ));
            }
            match &policy.access {
                AccessModel::Unrestricted => {
                    let designated = matches!(
                        role,
                        Role::SystemAdministrator | Role::SystemSuperuser
                    );
                    if !designated {
                        return Err(PolicyError::invariant(
                            role,
                            "unrestricted access outside the designated system roles",
                        ));
                    }
                }
                AccessModel::Rules(rules) => {
                    for rule in rules {
                        if matches!(rule.resource, Resource::Any) && rule.actions.is_empty() {
                            return Err(PolicyError::invariant(
                                role,
                                "wildcard rule without an explicit action set",
                            ));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// The policy table. Amounts are in minor currency units (cents).
fn policy_for(role: Role) -> RolePolicy {
    match role {
        // ── System ──────────────────────────────────────────────────────
        Role::SystemAdministrator | Role::SystemSuperuser => RolePolicy {
            tier_level: 0,
            can_manage_team: true,
            monetary_limits: None,
            data_scope: DataScope::All,
            access: AccessModel::Unrestricted,
        },
        Role::SystemSupportAgent => RolePolicy {
            tier_level: 5,
            can_manage_team: false,
            monetary_limits: None,
            data_scope: DataScope::Assigned,
            access: AccessModel::Rules(vec![
                PermissionRule::grant("loan_application", R),
                PermissionRule::grant("payment", R),
                PermissionRule::grant("invoice", R),
                PermissionRule::grant("document", R),
                PermissionRule::grant("report", R),
            ]),
        },

        // ── Borrower ────────────────────────────────────────────────────
        Role::BorrowerOwner => RolePolicy {
            tier_level: 1,
            can_manage_team: true,
            monetary_limits: Some(MonetaryLimits {
                max_transaction_amount: 10_000_000,
                max_daily_amount: 25_000_000,
                requires_approval_above: None,
            }),
            data_scope: DataScope::All,
            access: AccessModel::Rules(vec![
                PermissionRule::grant("loan_application", CRUD),
                PermissionRule::grant("loan_application", EXECUTE),
                PermissionRule::grant("loan_offer", RE),
                PermissionRule::grant_if("payment", CRE, up_to(10_000_000)),
                PermissionRule::grant("financial_statement", CRUD),
                PermissionRule::grant("invoice", CRUD),
                PermissionRule::grant("document", CRUD),
                PermissionRule::grant("report", RE),
                PermissionRule::grant("team_member", CRUD),
                PermissionRule::grant("kpi_dashboard", R),
            ]),
        },
        Role::BorrowerCfo => RolePolicy {
            tier_level: 2,
            can_manage_team: true,
            monetary_limits: Some(MonetaryLimits {
                max_transaction_amount: 5_000_000,
                max_daily_amount: 10_000_000,
                requires_approval_above: Some(1_000_000),
            }),
            data_scope: DataScope::All,
            access: AccessModel::Rules(vec![
                PermissionRule::grant("loan_application", CRU),
                PermissionRule::grant_if("loan_application", EXECUTE, in_status(DRAFT_OR_REVIEW)),
                PermissionRule::grant("loan_offer", R),
                PermissionRule::grant_if("loan_offer", EXECUTE, up_to(5_000_000)),
                PermissionRule::grant_if("payment", CRE, up_to(1_000_000)),
                PermissionRule::grant("financial_statement", CRUD),
                PermissionRule::grant("invoice", CRU),
                PermissionRule::grant("document", CRU),
                PermissionRule::grant("report", RE),
                PermissionRule::grant("team_member", R),
                PermissionRule::grant("kpi_dashboard", R),
            ]),
        },
        Role::BorrowerController => RolePolicy {
            tier_level: 3,
            can_manage_team: true,
            monetary_limits: Some(MonetaryLimits {
                max_transaction_amount: 1_000_000,
                max_daily_amount: 2_500_000,
                requires_approval_above: Some(250_000),
            }),
            data_scope: DataScope::Team,
            access: AccessModel::Rules(vec![
                PermissionRule::grant("loan_application", R),
                PermissionRule::grant_if("loan_application", UPDATE, in_status(DRAFT)),
                PermissionRule::grant_if("payment", CR, up_to(250_000)),
                PermissionRule::grant("financial_statement", CRU),
                PermissionRule::grant("invoice", CRU),
                PermissionRule::grant("document", CRU),
                PermissionRule::grant("report", R),
                PermissionRule::grant("team_member", R),
                PermissionRule::grant("kpi_dashboard", R),
            ]),
        },
        Role::BorrowerAccountant => RolePolicy {
            tier_level: 4,
            can_manage_team: false,
            monetary_limits: Some(MonetaryLimits {
                max_transaction_amount: 100_000,
                max_daily_amount: 500_000,
                requires_approval_above: Some(50_000),
            }),
            data_scope: DataScope::Team,
            access: AccessModel::Rules(vec![
                PermissionRule::grant_if("payment", CR, up_to(100_000)),
                PermissionRule::grant_if("invoice", CRU, in_status(DRAFT_OR_PENDING)),
                PermissionRule::grant("financial_statement", RU),
                PermissionRule::grant("document", CR),
                PermissionRule::grant("report", R),
            ]),
        },
        Role::BorrowerAnalyst => RolePolicy {
            tier_level: 5,
            can_manage_team: false,
            monetary_limits: None,
            data_scope: DataScope::Assigned,
            access: AccessModel::Rules(vec![
                PermissionRule::grant("loan_application", R),
                PermissionRule::grant("financial_statement", R),
                PermissionRule::grant("report", RE),
                PermissionRule::grant("kpi_dashboard", R),
                PermissionRule::grant("document", R),
            ]),
        },
        Role::BorrowerAdminAssistant => RolePolicy {
            tier_level: 6,
            can_manage_team: false,
            monetary_limits: None,
            data_scope: DataScope::Own,
            access: AccessModel::Rules(vec![
                PermissionRule::grant_if("document", CRU, owned()),
                PermissionRule::grant_if("loan_application", R, owned()),
                PermissionRule::grant("invoice", R),
            ]),
        },

        // ── Vendor ──────────────────────────────────────────────────────
        Role::VendorOwner => RolePolicy {
            tier_level: 1,
            can_manage_team: true,
            monetary_limits: Some(MonetaryLimits {
                max_transaction_amount: 2_000_000,
                max_daily_amount: 5_000_000,
                requires_approval_above: None,
            }),
            data_scope: DataScope::All,
            access: AccessModel::Rules(vec![
                PermissionRule::grant("invoice", CRUD),
                PermissionRule::grant_if("payment", RE, up_to(2_000_000)),
                PermissionRule::grant("document", CRUD),
                PermissionRule::grant("report", R),
                PermissionRule::grant("team_member", CRUD),
                PermissionRule::grant("kpi_dashboard", R),
            ]),
        },
        Role::VendorFinanceManager => RolePolicy {
            tier_level: 3,
            can_manage_team: true,
            monetary_limits: Some(MonetaryLimits {
                max_transaction_amount: 500_000,
                max_daily_amount: 1_000_000,
                requires_approval_above: Some(100_000),
            }),
            data_scope: DataScope::Team,
            access: AccessModel::Rules(vec![
                PermissionRule::grant_if("invoice", CRU, in_status(DRAFT_OR_SUBMITTED)),
                PermissionRule::grant("payment", R),
                PermissionRule::grant("document", CRU),
                PermissionRule::grant("report", R),
                PermissionRule::grant("team_member", R),
            ]),
        },
        Role::VendorClerk => RolePolicy {
            tier_level: 5,
            can_manage_team: false,
            monetary_limits: None,
            data_scope: DataScope::Own,
            access: AccessModel::Rules(vec![
                PermissionRule::grant("invoice", CR),
                PermissionRule::grant_if(
                    "invoice",
                    UPDATE,
                    Conditions {
                        ownership: Some(true),
                        status: Some(DRAFT),
                        monetary_limit: None,
                    },
                ),
                PermissionRule::grant_if("document", CR, owned()),
                PermissionRule::grant_if("payment", R, owned()),
            ]),
        },

        // ── Lender ──────────────────────────────────────────────────────
        Role::LenderOwner => RolePolicy {
            tier_level: 1,
            can_manage_team: true,
            monetary_limits: Some(MonetaryLimits {
                max_transaction_amount: 50_000_000,
                max_daily_amount: 100_000_000,
                requires_approval_above: None,
            }),
            data_scope: DataScope::All,
            access: AccessModel::Rules(vec![
                PermissionRule::grant("loan_application", CRUD),
                PermissionRule::grant("loan_application", EXECUTE),
                PermissionRule::grant("loan_offer", CRUD),
                PermissionRule::grant("loan_offer", EXECUTE),
                PermissionRule::grant_if("payment", CRE, up_to(50_000_000)),
                PermissionRule::grant("financial_statement", R),
                PermissionRule::grant("document", CRUD),
                PermissionRule::grant("report", RE),
                PermissionRule::grant("team_member", CRUD),
                PermissionRule::grant("kpi_dashboard", R),
            ]),
        },
        Role::LenderChiefCreditOfficer => RolePolicy {
            tier_level: 2,
            can_manage_team: true,
            monetary_limits: Some(MonetaryLimits {
                max_transaction_amount: 25_000_000,
                max_daily_amount: 50_000_000,
                requires_approval_above: Some(10_000_000),
            }),
            data_scope: DataScope::All,
            access: AccessModel::Rules(vec![
                PermissionRule::grant("loan_application", RU),
                PermissionRule::grant_if(
                    "loan_application",
                    EXECUTE,
                    in_status(SUBMITTED_OR_REVIEW),
                ),
                PermissionRule::grant("loan_offer", CRU),
                PermissionRule::grant_if("loan_offer", EXECUTE, up_to(25_000_000)),
                PermissionRule::grant("payment", R),
                PermissionRule::grant("financial_statement", R),
                PermissionRule::grant("document", CRU),
                PermissionRule::grant("report", RE),
                PermissionRule::grant("team_member", R),
                PermissionRule::grant("kpi_dashboard", R),
            ]),
        },
        Role::LenderUnderwriter => RolePolicy {
            tier_level: 4,
            can_manage_team: false,
            monetary_limits: Some(MonetaryLimits {
                max_transaction_amount: 5_000_000,
                max_daily_amount: 10_000_000,
                requires_approval_above: Some(1_000_000),
            }),
            data_scope: DataScope::Assigned,
            access: AccessModel::Rules(vec![
                PermissionRule::grant_if("loan_application", RU, in_status(SUBMITTED_OR_REVIEW)),
                PermissionRule::grant_if(
                    "loan_application",
                    EXECUTE,
                    Conditions {
                        ownership: None,
                        status: Some(UNDER_REVIEW),
                        monetary_limit: Some(5_000_000),
                    },
                ),
                PermissionRule::grant_if("loan_offer", CR, up_to(5_000_000)),
                PermissionRule::grant("financial_statement", R),
                PermissionRule::grant("document", CR),
                PermissionRule::grant("report", R),
            ]),
        },
        Role::LenderLoanProcessor => RolePolicy {
            tier_level: 5,
            can_manage_team: false,
            monetary_limits: None,
            data_scope: DataScope::Assigned,
            access: AccessModel::Rules(vec![
                PermissionRule::grant_if("loan_application", RU, in_status(SUBMITTED)),
                PermissionRule::grant("document", CRU),
                PermissionRule::grant("payment", R),
                PermissionRule::grant("report", R),
            ]),
        },
        Role::LenderSupportSpecialist => RolePolicy {
            tier_level: 6,
            can_manage_team: false,
            monetary_limits: None,
            data_scope: DataScope::Own,
            access: AccessModel::Rules(vec![
                PermissionRule::grant("loan_application", R),
                PermissionRule::grant("document", R),
                PermissionRule::grant("report", R),
            ]),
        },

        // ── Broker ──────────────────────────────────────────────────────
        Role::BrokerPrincipal => RolePolicy {
            tier_level: 1,
            can_manage_team: true,
            monetary_limits: Some(MonetaryLimits {
                max_transaction_amount: 10_000_000,
                max_daily_amount: 20_000_000,
                requires_approval_above: None,
            }),
            data_scope: DataScope::All,
            access: AccessModel::Rules(vec![
                PermissionRule::grant("loan_application", CRU),
                PermissionRule::grant("loan_application", EXECUTE),
                PermissionRule::grant("loan_offer", RE),
                PermissionRule::grant("payment", R),
                PermissionRule::grant("document", CRUD),
                PermissionRule::grant("report", R),
                PermissionRule::grant("team_member", CRUD),
                PermissionRule::grant("kpi_dashboard", R),
            ]),
        },
        Role::BrokerAgent => RolePolicy {
            tier_level: 4,
            can_manage_team: false,
            monetary_limits: Some(MonetaryLimits {
                max_transaction_amount: 1_000_000,
                max_daily_amount: 3_000_000,
                requires_approval_above: Some(500_000),
            }),
            data_scope: DataScope::Assigned,
            access: AccessModel::Rules(vec![
                PermissionRule::grant("loan_application", CR),
                PermissionRule::grant_if("loan_application", UPDATE, owned()),
                PermissionRule::grant_if(
                    "loan_application",
                    EXECUTE,
                    Conditions {
                        ownership: Some(true),
                        status: Some(DRAFT),
                        monetary_limit: None,
                    },
                ),
                PermissionRule::grant("loan_offer", R),
                PermissionRule::grant_if("document", CRU, owned()),
                PermissionRule::grant("report", R),
            ]),
        },
        Role::BrokerAdminAssistant => RolePolicy {
            tier_level: 6,
            can_manage_team: false,
            monetary_limits: None,
            data_scope: DataScope::Own,
            access: AccessModel::Rules(vec![
                PermissionRule::grant_if("document", CRU, owned()),
                PermissionRule::grant_if("loan_application", R, owned()),
                PermissionRule::grant("report", R),
            ]),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_every_role() {
        let registry = Registry::new();
        for role in Role::ALL {
            let policy = registry.lookup(role);
            assert!(policy.tier_level <= 6, "{role} tier out of range");
        }
    }

    #[test]
    fn registry_passes_validation() {
        Registry::new().validate().unwrap();
    }

    #[test]
    fn exactly_two_roles_are_unrestricted() {
        let registry = Registry::new();
        let unrestricted: Vec<Role> = Role::ALL
            .into_iter()
            .filter(|&role| registry.lookup(role).is_unrestricted())
            .collect();
        assert_eq!(
            unrestricted,
            vec![Role::SystemAdministrator, Role::SystemSuperuser]
        );
    }

    #[test]
    fn team_managers_sit_at_tier_three_or_above() {
        let registry = Registry::new();
        for role in Role::ALL {
            let policy = registry.lookup(role);
            if policy.can_manage_team {
                assert!(
                    policy.tier_level <= 3,
                    "{role} manages a team from tier {}",
                    policy.tier_level
                );
            }
        }
    }

    #[test]
    fn global_registry_is_shared() {
        let a = Registry::global();
        let b = Registry::global();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn validation_rejects_misplaced_unrestricted_access() {
        let mut registry = Registry::new();
        registry.policies.insert(
            Role::VendorClerk,
            RolePolicy {
                tier_level: 5,
                can_manage_team: false,
                monetary_limits: None,
                data_scope: DataScope::Own,
                access: AccessModel::Unrestricted,
            },
        );
        assert!(registry.validate().is_err());
    }

    #[test]
    fn validation_rejects_wildcard_rule_without_actions() {
        let mut registry = Registry::new();
        registry.policies.insert(
            Role::VendorClerk,
            RolePolicy {
                tier_level: 5,
                can_manage_team: false,
                monetary_limits: None,
                data_scope: DataScope::Own,
                access: AccessModel::Rules(vec![PermissionRule {
                    resource: Resource::Any,
                    actions: &[],
                    conditions: None,
                }]),
            },
        );
        assert!(registry.validate().is_err());
    }

    #[test]
    fn validation_rejects_low_tier_team_management() {
        let mut registry = Registry::new();
        registry.policies.insert(
            Role::VendorClerk,
            RolePolicy {
                tier_level: 5,
                can_manage_team: true,
                monetary_limits: None,
                data_scope: DataScope::Own,
                access: AccessModel::Rules(vec![]),
            },
        );
        assert!(registry.validate().is_err());
    }
}
