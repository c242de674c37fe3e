use std::collections::HashSet;

use sera_classfile::{ClassMetadata, TypeDescriptor, JAVA_IO_SERIALIZABLE, JAVA_LANG_OBJECT};
use sera_index::ClassHierarchyIndex;

use crate::error::{IncompatibleReason, ResolveError};

/// Reconciles two type observations for the same program location into the
/// more specific one.
#[derive(Clone, Copy)]
pub struct TypeMerger<'a> {
    index: &'a dyn ClassHierarchyIndex,
}

impl<'a> TypeMerger<'a> {
    pub fn new(index: &'a dyn ClassHierarchyIndex) -> Self {
        Self { index }
    }

    /// Merge `a` and `b`, returning the more derived type.
    ///
    /// `Void` stands for "no observation". `b` is the fallback: it wins for
    /// primitive pairs and when a class is missing from the index under
    /// `ignore_not_found`. Type variables are erased before comparison.
    pub fn merge(
        &self,
        a: &TypeDescriptor,
        b: &TypeDescriptor,
        ignore_not_found: bool,
    ) -> Result<TypeDescriptor, ResolveError> {
        let a = a.erased();
        let b = b.erased();

        if a.is_void() {
            return Ok(b);
        }
        if b.is_void() {
            return Ok(a);
        }

        match (a.is_reference(), b.is_reference()) {
            (false, false) => return Ok(b),
            (true, true) => {}
            _ => {
                return Err(ResolveError::incompatible(
                    &a,
                    &b,
                    IncompatibleReason::ReferenceShape,
                ))
            }
        }

        if is_named(&a, JAVA_LANG_OBJECT) {
            return Ok(b);
        }
        if is_named(&b, JAVA_LANG_OBJECT) {
            return Ok(a);
        }
        if is_named(&a, JAVA_IO_SERIALIZABLE) {
            return Ok(b);
        }
        if is_named(&b, JAVA_IO_SERIALIZABLE) {
            return Ok(a);
        }

        if a.is_array() || b.is_array() {
            return self.merge_arrays(&a, &b, ignore_not_found);
        }

        self.merge_classes(a, b, ignore_not_found)
    }

    fn merge_arrays(
        &self,
        a: &TypeDescriptor,
        b: &TypeDescriptor,
        ignore_not_found: bool,
    ) -> Result<TypeDescriptor, ResolveError> {
        match (a, b) {
            (TypeDescriptor::Array(ca), TypeDescriptor::Array(cb)) => {
                let component = self.merge(ca, cb, ignore_not_found)?;
                Ok(TypeDescriptor::array(component))
            }
            _ => Err(ResolveError::incompatible(a, b, IncompatibleReason::ArrayShape)),
        }
    }

    fn merge_classes(
        &self,
        a: TypeDescriptor,
        b: TypeDescriptor,
        ignore_not_found: bool,
    ) -> Result<TypeDescriptor, ResolveError> {
        let (Some(a_name), Some(b_name)) = (a.class_name(), b.class_name()) else {
            let reason = IncompatibleReason::ReferenceShape;
            return Err(ResolveError::incompatible(&a, &b, reason));
        };

        let Some(a_info) = self.index.lookup_by_name(a_name) else {
            return self.not_found(a_name, b, ignore_not_found);
        };
        let Some(b_info) = self.index.lookup_by_name(b_name) else {
            let missing = b_name.to_owned();
            return self.not_found(&missing, b, ignore_not_found);
        };

        if a_info.name == b_info.name {
            return Ok(a);
        }

        match (a_info.is_interface(), b_info.is_interface()) {
            (true, true) => {
                if self.extends_interface(a_info, &b_info.name) {
                    Ok(a)
                } else if self.extends_interface(b_info, &a_info.name) {
                    Ok(b)
                } else {
                    let reason = IncompatibleReason::UnrelatedInterfaces;
                    Err(ResolveError::incompatible(&a, &b, reason))
                }
            }
            (true, false) => {
                if self.extends_interface(b_info, &a_info.name) {
                    Ok(b)
                } else {
                    Err(ResolveError::incompatible(
                        &a,
                        &b,
                        IncompatibleReason::InterfaceNotImplemented,
                    ))
                }
            }
            (false, true) => {
                if self.extends_interface(a_info, &b_info.name) {
                    Ok(a)
                } else {
                    Err(ResolveError::incompatible(
                        &a,
                        &b,
                        IncompatibleReason::InterfaceNotImplemented,
                    ))
                }
            }
            (false, false) => {
                if self.extends_class(a_info, b_info)? {
                    Ok(a)
                } else if self.extends_class(b_info, a_info)? {
                    Ok(b)
                } else {
                    let reason = IncompatibleReason::UnrelatedClasses;
                    Err(ResolveError::incompatible(&a, &b, reason))
                }
            }
        }
    }

    fn not_found(
        &self,
        name: &str,
        fallback: TypeDescriptor,
        ignore_not_found: bool,
    ) -> Result<TypeDescriptor, ResolveError> {
        if ignore_not_found {
            tracing::warn!(target: "sera.resolve", class = %name, "type not found");
            return Ok(fallback);
        }
        Err(ResolveError::class_not_found(name))
    }

    /// Whether `class` is, implements, or (for interfaces) extends the
    /// interface named `target`, through interfaces or superclasses.
    pub fn extends_interface(&self, class: &ClassMetadata, target: &str) -> bool {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&ClassMetadata> = vec![class];

        while let Some(current) = stack.pop() {
            if current.name == target {
                return true;
            }
            if !seen.insert(current.name.as_str()) {
                continue;
            }

            if let Some(super_name) = &current.super_name {
                match self.index.lookup_by_name(super_name) {
                    Some(meta) => stack.push(meta),
                    None => tracing::warn!(
                        target: "sera.resolve",
                        superclass = %super_name,
                        "failed to find superclass"
                    ),
                }
            }
            // Pushed last so that interfaces are searched before the superclass.
            for interface in current.interfaces.iter().rev() {
                match self.index.lookup_by_name(interface) {
                    Some(meta) => stack.push(meta),
                    None => tracing::error!(
                        target: "sera.resolve",
                        interface = %interface,
                        "failed to find interface"
                    ),
                }
            }
        }

        false
    }

    /// Whether `candidate` is `base` or has it on its superclass chain.
    ///
    /// Fails when a superclass on the chain is missing from the index.
    pub fn extends_class(
        &self,
        candidate: &ClassMetadata,
        base: &ClassMetadata,
    ) -> Result<bool, ResolveError> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut current = candidate;

        loop {
            if current.name == base.name {
                return Ok(true);
            }
            if !seen.insert(current.name.as_str()) {
                tracing::warn!(
                    target: "sera.resolve",
                    class = %candidate.name,
                    "cyclic superclass chain"
                );
                return Ok(false);
            }
            let Some(super_name) = &current.super_name else {
                return Ok(false);
            };
            current = self
                .index
                .lookup_by_name(super_name)
                .ok_or_else(|| ResolveError::class_not_found(super_name.as_str()))?;
        }
    }
}

fn is_named(ty: &TypeDescriptor, name: &str) -> bool {
    ty.class_name() == Some(name)
}
