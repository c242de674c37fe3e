use std::collections::HashSet;

use sera_classfile::{ClassMetadata, JAVA_IO_SERIALIZABLE};
use sera_index::ClassHierarchyIndex;

/// Decides whether a class transitively implements the serialization marker
/// interface.
#[derive(Clone, Copy)]
pub struct SerializabilityChecker<'a> {
    index: &'a dyn ClassHierarchyIndex,
    marker: &'a str,
}

impl<'a> SerializabilityChecker<'a> {
    pub fn new(index: &'a dyn ClassHierarchyIndex) -> Self {
        Self::with_marker(index, JAVA_IO_SERIALIZABLE)
    }

    pub fn with_marker(index: &'a dyn ClassHierarchyIndex, marker: &'a str) -> Self {
        Self { index, marker }
    }

    /// True iff the marker appears among the interfaces of `class`, of its
    /// super-interfaces, or of any superclass.
    ///
    /// Supertypes missing from the index end their branch of the walk (logged
    /// at debug); the remaining branches are still searched.
    pub fn is_serializable(&self, class: &ClassMetadata) -> bool {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&ClassMetadata> = vec![class];

        while let Some(current) = stack.pop() {
            if !seen.insert(current.name.as_str()) {
                continue;
            }

            for interface in &current.interfaces {
                if interface == self.marker {
                    return true;
                }
                match self.index.lookup_by_name(interface) {
                    Some(meta) => stack.push(meta),
                    None => tracing::debug!(
                        target: "sera.resolve",
                        interface = %interface,
                        "failed to find implemented interface"
                    ),
                }
            }

            if let Some(super_name) = &current.super_name {
                match self.index.lookup_by_name(super_name) {
                    Some(meta) => stack.push(meta),
                    None => tracing::debug!(
                        target: "sera.resolve",
                        superclass = %super_name,
                        "failed to find superclass"
                    ),
                }
            }
        }

        false
    }
}
