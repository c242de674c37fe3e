use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncompatibleReason {
    /// One side is a reference type, the other a primitive.
    ReferenceShape,
    /// One side is an array, the other is not.
    ArrayShape,
    UnrelatedClasses,
    UnrelatedInterfaces,
    /// The class operand does not implement the interface operand.
    InterfaceNotImplemented,
}

impl fmt::Display for IncompatibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IncompatibleReason::ReferenceShape => "object/non-object types",
            IncompatibleReason::ArrayShape => "array/non-array types",
            IncompatibleReason::UnrelatedClasses => "non-assignable classes",
            IncompatibleReason::UnrelatedInterfaces => "unrelated interfaces",
            IncompatibleReason::InterfaceNotImplemented => "interface not implemented by class",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("class not found: {name}")]
    ClassNotFound { name: String },
    #[error("incompatible {reason}: {left} and {right}")]
    IncompatibleTypes {
        left: String,
        right: String,
        reason: IncompatibleReason,
    },
    #[error("implementor enumeration for {owner} exceeded the limit of {limit}")]
    TooManyImplementors { owner: String, limit: usize },
    #[error("resolution cancelled")]
    Cancelled,
    #[error(transparent)]
    InvalidSignature(#[from] sera_classfile::Error),
}

impl ResolveError {
    pub(crate) fn class_not_found(name: impl Into<String>) -> Self {
        ResolveError::ClassNotFound { name: name.into() }
    }

    pub(crate) fn incompatible(
        left: impl fmt::Display,
        right: impl fmt::Display,
        reason: IncompatibleReason,
    ) -> Self {
        ResolveError::IncompatibleTypes {
            left: left.to_string(),
            right: right.to_string(),
            reason,
        }
    }
}
