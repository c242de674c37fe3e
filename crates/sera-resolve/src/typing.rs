//! Consistency checks between a call site's static types and its type hints.

use std::fmt;

use sera_classfile::{parse_method_descriptor, TypeDescriptor};

use crate::error::ResolveError;
use crate::merge::TypeMerger;
use crate::reference::MethodReference;

/// Which value of a call site a diagnostic is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingSubject {
    /// The receiver.
    Target,
    /// The zero-based argument.
    Argument(usize),
    /// The method descriptor itself.
    Signature,
}

impl fmt::Display for TypingSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypingSubject::Target => f.write_str("target"),
            TypingSubject::Argument(idx) => write!(f, "argument {idx}"),
            TypingSubject::Signature => f.write_str("signature"),
        }
    }
}

/// A type hint that contradicts the call site it was attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingDiagnostic {
    pub site: String,
    pub subject: TypingSubject,
    pub error: ResolveError,
}

impl fmt::Display for TypingDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.site, self.subject, self.error)
    }
}

/// Merge every type hint of `reference` with the static type it refines.
///
/// The receiver hint of a virtual call is checked against the owner type and
/// each argument hint against the declared parameter type. Argument hints are
/// only checked when their count matches the descriptor. A failure is
/// reported for its own subject; the remaining subjects are still checked.
pub fn check_reference_typing(
    merger: &TypeMerger<'_>,
    reference: &MethodReference,
    ignore_not_found: bool,
) -> Vec<TypingDiagnostic> {
    let mut diagnostics = Vec::new();
    let mut report = |subject: TypingSubject, error: ResolveError| {
        tracing::warn!(
            target: "sera.resolve",
            site = %reference,
            %subject,
            error = %error,
            "type hint does not fit call site"
        );
        diagnostics.push(TypingDiagnostic {
            site: reference.to_string(),
            subject,
            error,
        });
    };

    if !reference.is_static() {
        if let Some(target) = reference.target_type() {
            let owner = TypeDescriptor::object(reference.owner());
            if let Err(err) = merger.merge(target, &owner, ignore_not_found) {
                report(TypingSubject::Target, err);
            }
        }
    }

    let Some(arguments) = reference.argument_types() else {
        return diagnostics;
    };
    let descriptor = match parse_method_descriptor(reference.signature()) {
        Ok(descriptor) => descriptor,
        Err(err) => {
            report(TypingSubject::Signature, err.into());
            return diagnostics;
        }
    };
    if descriptor.params.len() != arguments.len() {
        tracing::debug!(
            target: "sera.resolve",
            site = %reference,
            expected = descriptor.params.len(),
            found = arguments.len(),
            "argument hint count does not match descriptor"
        );
        return diagnostics;
    }

    for (idx, (hint, param)) in arguments.iter().zip(&descriptor.params).enumerate() {
        if let Err(err) = merger.merge(hint, param, ignore_not_found) {
            report(TypingSubject::Argument(idx), err);
        }
    }

    diagnostics
}
