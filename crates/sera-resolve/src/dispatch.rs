//! Class-hierarchy based virtual dispatch resolution.

use std::collections::{BTreeMap, HashSet};

use sera_classfile::{ClassMetadata, JAVA_LANG_OBJECT};
use sera_config::ResolveConfig;
use sera_index::ClassHierarchyIndex;
use sera_metrics::{DispatchMetrics, DispatchTelemetry};

use crate::cancel::CancellationToken;
use crate::error::ResolveError;
use crate::reference::{is_final_object_method, is_object_method, MethodReference};
use crate::serializable::SerializabilityChecker;
use crate::signature::build_signature;

/// How default-method candidates are collected from the interface graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefaultMethodSearch {
    /// Stop at the first interface (depth-first, declaration order) that
    /// supplies a body. Cannot observe ambiguity between sibling interfaces.
    #[default]
    FirstFound,
    /// Visit the whole interface graph and report every interface that
    /// supplies a body, without descending below a hit.
    Exhaustive,
}

/// Matching approximations applied by [`DispatchResolver::method_matches`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchPolicy {
    /// Accept any same-named variable-arity method regardless of signature.
    /// Call sites of varargs methods cannot be told apart by descriptor alone;
    /// this over-approximates.
    pub varargs_matches_by_name: bool,
    /// Retry constructor matching with the implicit outer-instance parameter
    /// of non-static member classes.
    pub inner_constructor_fix: bool,
    pub default_method_search: DefaultMethodSearch,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self {
            varargs_matches_by_name: true,
            inner_constructor_fix: true,
            default_method_search: DefaultMethodSearch::FirstFound,
        }
    }
}

/// Per-call-site switches for [`DispatchResolver::find_implementors`].
///
/// The default matches [`ResolveConfig::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Log a missing owner at debug level instead of error level.
    pub ignore_not_found: bool,
    /// The caller asserts the receiver's runtime type equals the owner type.
    pub assume_exact_type: bool,
    /// Keep only serializable implementors of interface owners.
    pub serializable_only: bool,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self::from_config(&ResolveConfig::default())
    }
}

impl DispatchOptions {
    pub fn from_config(config: &ResolveConfig) -> Self {
        Self {
            ignore_not_found: config.ignore_not_found,
            assume_exact_type: false,
            serializable_only: config.serializable_only,
        }
    }

    #[must_use]
    pub fn exact(mut self, assume_exact_type: bool) -> Self {
        self.assume_exact_type = assume_exact_type;
        self
    }
}

/// Computes the set of classes whose method body may run for a call site.
pub struct DispatchResolver<'a> {
    index: &'a dyn ClassHierarchyIndex,
    telemetry: &'a dyn DispatchTelemetry,
    policy: DispatchPolicy,
    max_implementors: Option<usize>,
    cancel: Option<CancellationToken>,
}

impl<'a> DispatchResolver<'a> {
    /// Resolver reporting to the process-wide [`DispatchMetrics`].
    pub fn new(index: &'a dyn ClassHierarchyIndex) -> Self {
        Self {
            index,
            telemetry: DispatchMetrics::global(),
            policy: DispatchPolicy::default(),
            max_implementors: None,
            cancel: None,
        }
    }

    pub fn from_config(index: &'a dyn ClassHierarchyIndex, config: &ResolveConfig) -> Self {
        let policy = DispatchPolicy {
            inner_constructor_fix: config.inner_constructor_fix,
            ..DispatchPolicy::default()
        };
        Self::new(index)
            .with_policy(policy)
            .with_max_implementors(config.max_implementors)
    }

    #[must_use]
    pub fn with_telemetry(mut self, telemetry: &'a dyn DispatchTelemetry) -> Self {
        self.telemetry = telemetry;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: DispatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_max_implementors(mut self, limit: Option<usize>) -> Self {
        self.max_implementors = limit;
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn policy(&self) -> DispatchPolicy {
        self.policy
    }

    /// Whether `candidate` itself declares a concrete method matching `reference`.
    pub fn method_matches(&self, reference: &MethodReference, candidate: &ClassMetadata) -> bool {
        for method in candidate.methods_named(reference.name()) {
            if method.is_abstract() {
                continue;
            }
            if self.policy.varargs_matches_by_name && method.is_varargs() {
                return true;
            }

            let signature = build_signature(method, candidate, false);
            if signature == reference.signature() {
                return true;
            }
            tracing::trace!(
                target: "sera.resolve",
                expected = reference.signature(),
                found = %signature,
                class = %candidate.name,
                "signature mismatch"
            );

            if method.is_constructor() && self.policy.inner_constructor_fix {
                let fixed = build_signature(method, candidate, true);
                if fixed == reference.signature() {
                    return true;
                }
            }
        }

        tracing::trace!(
            target: "sera.resolve",
            class = %candidate.name,
            reference = %reference,
            "method not declared"
        );
        false
    }

    /// Whether `class` or one of its superclasses below `java.lang.Object`
    /// declares a concrete method matching `reference`.
    pub fn implements_recursively(
        &self,
        reference: &MethodReference,
        class: &ClassMetadata,
    ) -> bool {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut current = class;

        loop {
            if !seen.insert(current.name.as_str()) {
                tracing::warn!(
                    target: "sera.resolve",
                    class = %class.name,
                    "cyclic superclass chain"
                );
                return false;
            }
            if self.method_matches(reference, current) {
                return true;
            }
            let Some(super_name) = &current.super_name else {
                return false;
            };
            match self.index.lookup_by_name(super_name) {
                Some(super_class) if super_class.name != JAVA_LANG_OBJECT => current = super_class,
                _ => return false,
            }
        }
    }

    /// A concrete class that can receive the call.
    pub fn is_usable_implementor(
        &self,
        reference: &MethodReference,
        candidate: &ClassMetadata,
    ) -> bool {
        !candidate.is_interface()
            && self.implements_recursively(reference, candidate)
            && (reference.is_static() || !candidate.is_abstract())
    }

    /// All classes whose implementation of `reference` may be invoked at run
    /// time, sorted by name.
    ///
    /// A missing owner yields an empty set. Errors are limited to cancellation
    /// and the configured implementor cap.
    pub fn find_implementors(
        &self,
        reference: &MethodReference,
        options: DispatchOptions,
    ) -> Result<Vec<&'a ClassMetadata>, ResolveError> {
        if is_final_object_method(reference) {
            if let Some(object) = self.index.lookup_by_name(JAVA_LANG_OBJECT) {
                return Ok(vec![object]);
            }
        }

        let Some(owner) = self.index.lookup_by_name(reference.owner()) else {
            if options.ignore_not_found {
                tracing::debug!(
                    target: "sera.resolve",
                    class = reference.owner(),
                    "class not found"
                );
            } else {
                tracing::error!(
                    target: "sera.resolve",
                    class = reference.owner(),
                    "class not found"
                );
            }
            return Ok(Vec::new());
        };

        let exact = options.assume_exact_type
            && !owner.is_interface()
            && (reference.is_static() || !owner.is_abstract());

        let found = if exact {
            vec![owner]
        } else if owner.is_interface() {
            self.interface_implementors(reference, owner, options.serializable_only)?
        } else {
            self.class_implementors(reference, owner)?
        };

        self.telemetry.record_fanout(&owner.name, found.len());
        Ok(found)
    }

    fn interface_implementors(
        &self,
        reference: &MethodReference,
        owner: &'a ClassMetadata,
        serializable_only: bool,
    ) -> Result<Vec<&'a ClassMetadata>, ResolveError> {
        let serializability = SerializabilityChecker::new(self.index);
        let mut found = Collector::new(&owner.name, self.max_implementors);

        for candidate in self.index.all_known_implementors(&owner.name) {
            self.check_cancelled()?;
            if !self.is_usable_implementor(reference, candidate) {
                continue;
            }
            if serializable_only && !serializability.is_serializable(candidate) {
                continue;
            }
            found.insert(candidate)?;
        }

        // Serializable-only lookups are bounded by the serialization surface.
        if !serializable_only {
            self.telemetry.record_unbounded_interface_dispatch(&owner.name);
        }
        Ok(found.into_vec())
    }

    fn class_implementors(
        &self,
        reference: &MethodReference,
        owner: &'a ClassMetadata,
    ) -> Result<Vec<&'a ClassMetadata>, ResolveError> {
        let mut found = Collector::new(&owner.name, self.max_implementors);

        // A static method is bound to its owner; subclasses cannot override it.
        if !reference.is_static() {
            for candidate in self.index.all_known_subclasses(&owner.name) {
                self.check_cancelled()?;
                if self.is_usable_implementor(reference, candidate) {
                    found.insert(candidate)?;
                }
            }
        }

        if self.is_usable_implementor(reference, owner) {
            found.insert(owner)?;
        }

        if found.is_empty() && !reference.is_static() && !is_object_method(reference) {
            // Nothing in the class hierarchy; the body may come from an interface default.
            match self.search_default_method(reference, owner) {
                Some(interfaces) if interfaces.len() == 1 => {
                    tracing::debug!(
                        target: "sera.resolve",
                        reference = %reference,
                        interface = %interfaces[0].name,
                        "adding default implementation"
                    );
                    found.insert(owner)?;
                }
                Some(interfaces) => {
                    let candidates: Vec<&str> =
                        interfaces.iter().map(|i| i.name.as_str()).collect();
                    tracing::warn!(
                        target: "sera.resolve",
                        reference = %reference,
                        ?candidates,
                        "multiple default implementations found"
                    );
                }
                None => {}
            }
        }

        Ok(found.into_vec())
    }

    /// Interfaces reachable from `from` that supply a concrete body for
    /// `reference`.
    ///
    /// Depth-first over `from`'s interfaces in declaration order (each
    /// interface before its super-interfaces), then over its superclass.
    /// Returns `None` when no interface supplies a body; with
    /// [`DefaultMethodSearch::FirstFound`] the result has exactly one element.
    pub fn search_default_method(
        &self,
        reference: &MethodReference,
        from: &'a ClassMetadata,
    ) -> Option<Vec<&'a ClassMetadata>> {
        enum Node<'n> {
            Interface(&'n str),
            Class(&'n ClassMetadata),
        }

        let mut hits: Vec<&'a ClassMetadata> = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack = vec![Node::Class(from)];

        while let Some(node) = stack.pop() {
            match node {
                Node::Class(class) => {
                    if !visited.insert(class.name.as_str()) {
                        continue;
                    }
                    if let Some(super_name) = &class.super_name {
                        match self.index.lookup_by_name(super_name) {
                            Some(super_class) => stack.push(Node::Class(super_class)),
                            None => tracing::debug!(
                                target: "sera.resolve",
                                superclass = %super_name,
                                "failed to find superclass"
                            ),
                        }
                    }
                    stack.extend(class.interfaces.iter().rev().map(|i| Node::Interface(i)));
                }
                Node::Interface(name) => {
                    if !visited.insert(name) {
                        continue;
                    }
                    let Some(interface) = self.index.lookup_by_name(name) else {
                        tracing::warn!(
                            target: "sera.resolve",
                            interface = %name,
                            "failed to find interface"
                        );
                        continue;
                    };
                    if self.method_matches(reference, interface) {
                        hits.push(interface);
                        match self.policy.default_method_search {
                            DefaultMethodSearch::FirstFound => break,
                            DefaultMethodSearch::Exhaustive => continue,
                        }
                    }
                    stack.extend(interface.interfaces.iter().rev().map(|i| Node::Interface(i)));
                }
            }
        }

        if hits.is_empty() {
            None
        } else {
            Some(hits)
        }
    }

    fn check_cancelled(&self) -> Result<(), ResolveError> {
        match &self.cancel {
            Some(cancel) if cancel.is_cancelled() => Err(ResolveError::Cancelled),
            _ => Ok(()),
        }
    }
}

/// Name-keyed result set enforcing the implementor cap.
struct Collector<'a, 'o> {
    owner: &'o str,
    limit: Option<usize>,
    found: BTreeMap<&'a str, &'a ClassMetadata>,
}

impl<'a, 'o> Collector<'a, 'o> {
    fn new(owner: &'o str, limit: Option<usize>) -> Self {
        Self {
            owner,
            limit,
            found: BTreeMap::new(),
        }
    }

    fn insert(&mut self, class: &'a ClassMetadata) -> Result<(), ResolveError> {
        self.found.insert(class.name.as_str(), class);
        match self.limit {
            Some(limit) if self.found.len() > limit => Err(ResolveError::TooManyImplementors {
                owner: self.owner.to_owned(),
                limit,
            }),
            _ => Ok(()),
        }
    }

    fn is_empty(&self) -> bool {
        self.found.is_empty()
    }

    fn into_vec(self) -> Vec<&'a ClassMetadata> {
        self.found.into_values().collect()
    }
}
