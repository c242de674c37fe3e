use std::collections::{BTreeMap, BTreeSet, VecDeque};

use sera_classfile::ClassMetadata;

use crate::ClassHierarchyIndex;

/// Immutable in-memory class index.
///
/// Direct subtype edges are computed once at construction; the transitive
/// queries walk them breadth-first with a `seen` set so that cyclic metadata
/// (which a well-formed program cannot produce) still terminates.
#[derive(Debug, Clone, Default)]
pub struct ClassIndex {
    classes: BTreeMap<String, ClassMetadata>,
    /// superclass name -> direct subclasses
    subclasses: BTreeMap<String, Vec<String>>,
    /// interface name -> classes and interfaces naming it as a direct supertype
    implementors: BTreeMap<String, Vec<String>>,
}

impl ClassIndex {
    pub fn new(classes: impl IntoIterator<Item = ClassMetadata>) -> Self {
        let mut by_name = BTreeMap::new();
        for class in classes {
            let name = class.name.clone();
            if by_name.insert(name.clone(), class).is_some() {
                tracing::warn!(
                    target: "sera.index",
                    class = %name,
                    "duplicate class definition; last one wins"
                );
            }
        }

        let mut index = Self {
            classes: by_name,
            subclasses: BTreeMap::new(),
            implementors: BTreeMap::new(),
        };
        index.rebuild_maps();
        index
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassMetadata> {
        self.classes.values()
    }

    fn rebuild_maps(&mut self) {
        self.subclasses.clear();
        self.implementors.clear();

        for class in self.classes.values() {
            if let Some(super_name) = &class.super_name {
                self.subclasses
                    .entry(super_name.clone())
                    .or_default()
                    .push(class.name.clone());
            }
            for interface in &class.interfaces {
                self.implementors
                    .entry(interface.clone())
                    .or_default()
                    .push(class.name.clone());
            }
        }

        // Keep results stable for deterministic resolution.
        for children in self.subclasses.values_mut() {
            children.sort();
            children.dedup();
        }
        for children in self.implementors.values_mut() {
            children.sort();
            children.dedup();
        }
    }

    fn subclass_names(&self, base: &str) -> Vec<String> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut out = Vec::new();
        let mut queue: VecDeque<&str> = self
            .subclasses
            .get(base)
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect();

        while let Some(next) = queue.pop_front() {
            if next == base || !seen.insert(next) {
                continue;
            }
            out.push(next.to_string());
            if let Some(children) = self.subclasses.get(next) {
                queue.extend(children.iter().map(String::as_str));
            }
        }

        out
    }

    fn collect(&self, names: BTreeSet<String>) -> Vec<&ClassMetadata> {
        names
            .iter()
            .filter_map(|name| self.classes.get(name))
            .collect()
    }
}

impl ClassHierarchyIndex for ClassIndex {
    fn lookup_by_name(&self, name: &str) -> Option<&ClassMetadata> {
        self.classes.get(name)
    }

    fn all_known_subclasses(&self, name: &str) -> Vec<&ClassMetadata> {
        let names = self.subclass_names(name);
        self.collect(names.into_iter().collect())
    }

    fn all_known_implementors(&self, interface_name: &str) -> Vec<&ClassMetadata> {
        let mut visited_interfaces = BTreeSet::new();
        let mut found = BTreeSet::new();
        let mut queue = VecDeque::from([interface_name.to_string()]);

        while let Some(interface) = queue.pop_front() {
            if !visited_interfaces.insert(interface.clone()) {
                continue;
            }
            let Some(direct) = self.implementors.get(&interface) else {
                continue;
            };
            for name in direct {
                match self.classes.get(name) {
                    Some(class) if class.is_interface() => queue.push_back(name.clone()),
                    Some(_) => {
                        if found.insert(name.clone()) {
                            found.extend(self.subclass_names(name));
                        }
                    }
                    None => {}
                }
            }
        }

        found.retain(|name| {
            self.classes
                .get(name)
                .is_some_and(|class| !class.is_interface())
        });
        self.collect(found)
    }
}
