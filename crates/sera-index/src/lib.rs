//! Whole-program class hierarchy index.
//!
//! The analysis core only talks to [`ClassHierarchyIndex`]; [`ClassIndex`] is
//! the in-memory implementation built from already-parsed [`ClassMetadata`].

#![forbid(unsafe_code)]

mod hierarchy;
mod snapshot;

use sera_classfile::ClassMetadata;

pub use crate::hierarchy::ClassIndex;
pub use crate::snapshot::{IndexError, IndexSnapshot};

/// Read-only query service over all known classes.
///
/// Results of the set-valued queries are sorted by class name so that
/// resolution over a fixed snapshot is deterministic.
pub trait ClassHierarchyIndex: Send + Sync {
    fn lookup_by_name(&self, name: &str) -> Option<&ClassMetadata>;

    /// All (transitive) subclasses of the class `name`, excluding `name` itself.
    fn all_known_subclasses(&self, name: &str) -> Vec<&ClassMetadata>;

    /// All non-interface classes that implement `interface_name`, directly,
    /// through a sub-interface, or by inheriting from an implementor.
    fn all_known_implementors(&self, interface_name: &str) -> Vec<&ClassMetadata>;
}
