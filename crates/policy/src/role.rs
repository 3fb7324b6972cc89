//! The closed role set, organizational classification and display labels.
//!
//! Roles are namespaced by organization family (borrower, vendor, lender,
//! broker, system) and seniority. The set is fixed at compile time; adding a
//! role means adding a variant, and the exhaustive matches below force every
//! table (policy, category, label) to be extended with it.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A role identifier outside the closed set.
///
/// Rejected writes keep prior state; this error is always recoverable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role identifier: '{0}'")]
pub struct InvalidRole(pub String);

/// Role identifier drawn from the closed, exhaustive set.
///
/// The serialized form is the kebab-case identifier (e.g. `"borrower-cfo"`),
/// which is also what the durable current-role slot stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    // System family
    SystemAdministrator,
    SystemSuperuser,
    SystemSupportAgent,

    // Borrower family
    BorrowerOwner,
    BorrowerCfo,
    BorrowerController,
    BorrowerAccountant,
    BorrowerAnalyst,
    BorrowerAdminAssistant,

    // Vendor family
    VendorOwner,
    VendorFinanceManager,
    VendorClerk,

    // Lender family
    LenderOwner,
    LenderChiefCreditOfficer,
    LenderUnderwriter,
    LenderLoanProcessor,
    LenderSupportSpecialist,

    // Broker family
    BrokerPrincipal,
    BrokerAgent,
    BrokerAdminAssistant,
}

impl Role {
    /// Every enumerated role. Registry construction and totality tests
    /// iterate this slice; keep it in sync with the variant list.
    pub const ALL: [Role; 20] = [
        Role::SystemAdministrator,
        Role::SystemSuperuser,
        Role::SystemSupportAgent,
        Role::BorrowerOwner,
        Role::BorrowerCfo,
        Role::BorrowerController,
        Role::BorrowerAccountant,
        Role::BorrowerAnalyst,
        Role::BorrowerAdminAssistant,
        Role::VendorOwner,
        Role::VendorFinanceManager,
        Role::VendorClerk,
        Role::LenderOwner,
        Role::LenderChiefCreditOfficer,
        Role::LenderUnderwriter,
        Role::LenderLoanProcessor,
        Role::LenderSupportSpecialist,
        Role::BrokerPrincipal,
        Role::BrokerAgent,
        Role::BrokerAdminAssistant,
    ];

    /// Kebab-case identifier, stable across releases (persisted in the
    /// durable current-role slot).
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SystemAdministrator => "system-administrator",
            Role::SystemSuperuser => "system-superuser",
            Role::SystemSupportAgent => "system-support-agent",
            Role::BorrowerOwner => "borrower-owner",
            Role::BorrowerCfo => "borrower-cfo",
            Role::BorrowerController => "borrower-controller",
            Role::BorrowerAccountant => "borrower-accountant",
            Role::BorrowerAnalyst => "borrower-analyst",
            Role::BorrowerAdminAssistant => "borrower-admin-assistant",
            Role::VendorOwner => "vendor-owner",
            Role::VendorFinanceManager => "vendor-finance-manager",
            Role::VendorClerk => "vendor-clerk",
            Role::LenderOwner => "lender-owner",
            Role::LenderChiefCreditOfficer => "lender-chief-credit-officer",
            Role::LenderUnderwriter => "lender-underwriter",
            Role::LenderLoanProcessor => "lender-loan-processor",
            Role::LenderSupportSpecialist => "lender-support-specialist",
            Role::BrokerPrincipal => "broker-principal",
            Role::BrokerAgent => "broker-agent",
            Role::BrokerAdminAssistant => "broker-admin-assistant",
        }
    }

    /// Organizational category, as a total table over the known set.
    ///
    /// This is the authoritative classification; the string heuristic in
    /// [`classify_name`] exists only for identifiers that are not (yet)
    /// members of the closed set.
    pub fn category(&self) -> OrgCategory {
        match self {
            Role::SystemAdministrator | Role::SystemSuperuser | Role::SystemSupportAgent => {
                OrgCategory::Admin
            }
            Role::BorrowerOwner
            | Role::BorrowerCfo
            | Role::BorrowerController
            | Role::BorrowerAccountant
            | Role::BorrowerAnalyst
            | Role::BorrowerAdminAssistant => OrgCategory::Borrower,
            Role::VendorOwner | Role::VendorFinanceManager | Role::VendorClerk => {
                OrgCategory::Vendor
            }
            Role::LenderOwner
            | Role::LenderChiefCreditOfficer
            | Role::LenderUnderwriter
            | Role::LenderLoanProcessor
            | Role::LenderSupportSpecialist => OrgCategory::Lender,
            Role::BrokerPrincipal | Role::BrokerAgent | Role::BrokerAdminAssistant => {
                OrgCategory::Broker
            }
        }
    }

    /// Human-readable label. Every role has a non-empty label; presentation
    /// correctness beyond that is the caller's concern.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::SystemAdministrator => "System Administrator",
            Role::SystemSuperuser => "System Superuser",
            Role::SystemSupportAgent => "Support Agent",
            Role::BorrowerOwner => "Owner (Borrower)",
            Role::BorrowerCfo => "Chief Financial Officer",
            Role::BorrowerController => "Financial Controller",
            Role::BorrowerAccountant => "Accountant",
            Role::BorrowerAnalyst => "Financial Analyst",
            Role::BorrowerAdminAssistant => "Administrative Assistant (Borrower)",
            Role::VendorOwner => "Owner (Vendor)",
            Role::VendorFinanceManager => "Finance Manager",
            Role::VendorClerk => "Billing Clerk",
            Role::LenderOwner => "Owner (Lender)",
            Role::LenderChiefCreditOfficer => "Chief Credit Officer",
            Role::LenderUnderwriter => "Underwriter",
            Role::LenderLoanProcessor => "Loan Processor",
            Role::LenderSupportSpecialist => "Support Specialist (Lender)",
            Role::BrokerPrincipal => "Principal Broker",
            Role::BrokerAgent => "Broker Agent",
            Role::BrokerAdminAssistant => "Administrative Assistant (Broker)",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = InvalidRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| InvalidRole(s.to_string()))
    }
}

/// Coarse organizational category used by callers to branch presentation.
/// Independent of permission evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrgCategory {
    Borrower,
    Vendor,
    Lender,
    Broker,
    Admin,
    Unknown,
}

/// Heuristic classification for role identifiers outside the closed set.
///
/// Known roles should go through [`Role::category`]; this fallback tolerates
/// identifiers introduced after the registry was extended, at the cost of
/// permissive substring matching:
///
/// - a business-family namespace substring wins first;
/// - otherwise the `system` namespace and the `admin`, `officer` and
///   `support` substrings classify as [`OrgCategory::Admin`];
/// - empty, `None` or unmatched input yields [`OrgCategory::Unknown`]
///   rather than failing.
pub fn classify_name(name: Option<&str>) -> OrgCategory {
    let Some(name) = name else {
        return OrgCategory::Unknown;
    };
    let name = name.trim().to_ascii_lowercase();
    if name.is_empty() {
        return OrgCategory::Unknown;
    }

    if name.contains("borrower") {
        OrgCategory::Borrower
    } else if name.contains("vendor") {
        OrgCategory::Vendor
    } else if name.contains("lender") {
        OrgCategory::Lender
    } else if name.contains("broker") {
        OrgCategory::Broker
    } else if name.contains("system")
        || name.contains("admin")
        || name.contains("officer")
        || name.contains("support")
    {
        OrgCategory::Admin
    } else {
        OrgCategory::Unknown
    }
}
