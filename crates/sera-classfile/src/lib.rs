#![forbid(unsafe_code)]

mod descriptor;
mod error;
mod metadata;

pub use crate::descriptor::{
    parse_field_descriptor, parse_method_descriptor, MethodDescriptor, PrimitiveKind,
    TypeDescriptor, MAX_ARRAY_DIMENSIONS,
};
pub use crate::error::{Error, Result};
pub use crate::metadata::{
    ClassKind, ClassMetadata, MethodMetadata, NestingKind, ACC_ABSTRACT, ACC_FINAL,
    ACC_INTERFACE, ACC_PUBLIC, ACC_STATIC, ACC_VARARGS,
};

/// The universal root type.
pub const JAVA_LANG_OBJECT: &str = "java.lang.Object";
/// Marker interface for the serialization mechanism.
pub const JAVA_IO_SERIALIZABLE: &str = "java.io.Serializable";
/// Return type of `Object.getClass()`.
pub const JAVA_LANG_CLASS: &str = "java.lang.Class";
pub const CONSTRUCTOR_NAME: &str = "<init>";
