//! Data-visibility resolution.
//!
//! Visibility is orthogonal to permission evaluation: an action can be
//! permitted while the record stays invisible, and vice versa. Callers must
//! check both; neither is ever inferred from the other.

use std::collections::HashSet;

use uuid::Uuid;

use crate::rules::DataScope;

/// Ownership/team metadata of the record being considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordRef {
    pub owner_id: Uuid,
    pub team_id: Option<Uuid>,
}

/// The acting principal, as visibility resolution sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub team_id: Option<Uuid>,
    /// Principals whose records this actor is assigned to work.
    pub assigned_ids: HashSet<Uuid>,
}

impl Actor {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            team_id: None,
            assigned_ids: HashSet::new(),
        }
    }
}

/// Decide whether a role with `scope` may see `record`.
///
/// `Team` requires both sides to carry a team id and the ids to match; an
/// actor or record without a team never team-matches (fail-closed).
pub fn can_see(scope: DataScope, record: &RecordRef, actor: &Actor) -> bool {
    match scope {
        DataScope::All => true,
        DataScope::Team => match (record.team_id, actor.team_id) {
            (Some(record_team), Some(actor_team)) => record_team == actor_team,
            _ => false,
        },
        DataScope::Assigned => actor.assigned_ids.contains(&record.owner_id),
        DataScope::Own => record.owner_id == actor.id,
    }
}
