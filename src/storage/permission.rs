// Persisted folder grants and the covering-grant lookup
// Lets a directly picked file reuse an existing folder grant instead of prompting again

use super::Location;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    pub tree_location: Location,
    pub can_read: bool,
}

impl PermissionGrant {
    pub fn readable(tree_location: Location) -> Self {
        Self {
            tree_location,
            can_read: true,
        }
    }
}

/// Read-only view of the platform's persisted grants
pub trait PermissionStore: Send + Sync {
    fn list_grants(&self) -> Vec<PermissionGrant>;
}

/// Fixed grant list, used off-device where grants come from config
#[derive(Debug, Clone, Default)]
pub struct StaticPermissionStore {
    grants: Vec<PermissionGrant>,
}

impl StaticPermissionStore {
    pub fn new(grants: Vec<PermissionGrant>) -> Self {
        Self { grants }
    }
}

impl PermissionStore for StaticPermissionStore {
    fn list_grants(&self) -> Vec<PermissionGrant> {
        self.grants.clone()
    }
}

/// First readable grant whose tree contains `target` on a whole-segment boundary.
///
/// A target whose identifier can't be derived never matches.
pub fn find_covering_grant<'a>(
    grants: &'a [PermissionGrant],
    target: &Location,
) -> Option<&'a PermissionGrant> {
    let Some(target_id) = target.document_id() else {
        debug!("No document id in {}, treating as uncovered", target);
        return None;
    };

    grants
        .iter()
        .filter(|grant| grant.can_read)
        .find(|grant| {
            grant.tree_location.is_document() == target.is_document()
                && grant.tree_location.authority() == target.authority()
                && grant
                    .tree_location
                    .tree_id()
                    .map_or(false, |root| root.covers(&target_id))
        })
}
