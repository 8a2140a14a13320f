// Storage access - location handles, folder listing and folder grants
// Everything here is a thin model over what the platform's document framework hands us

pub mod location;
pub mod permission;
pub mod tree;

pub use location::{DocumentId, Location};
pub use permission::{find_covering_grant, PermissionGrant, PermissionStore, StaticPermissionStore};
pub use tree::{DocumentEntry, DocumentTree, EntryKind, LocalTree};
