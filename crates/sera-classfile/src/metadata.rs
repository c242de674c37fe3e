use serde::{Deserialize, Serialize};

use crate::descriptor::TypeDescriptor;
use crate::CONSTRUCTOR_NAME;

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_FINAL: u16 = 0x0010;
pub const ACC_VARARGS: u16 = 0x0080;
pub const ACC_INTERFACE: u16 = 0x0200;
pub const ACC_ABSTRACT: u16 = 0x0400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
}

/// Where a class is declared relative to other classes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NestingKind {
    #[default]
    TopLevel,
    /// A member class; `enclosing` is the dotted name of the declaring class.
    Inner { enclosing: String },
    Local,
    Anonymous,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodMetadata {
    pub name: String,
    #[serde(default)]
    pub access_flags: u16,
    #[serde(default)]
    pub parameters: Vec<TypeDescriptor>,
    pub return_type: TypeDescriptor,
}

impl MethodMetadata {
    pub fn new(
        name: impl Into<String>,
        access_flags: u16,
        parameters: Vec<TypeDescriptor>,
        return_type: TypeDescriptor,
    ) -> Self {
        Self {
            name: name.into(),
            access_flags,
            parameters,
            return_type,
        }
    }

    pub fn is_abstract(&self) -> bool {
        self.access_flags & ACC_ABSTRACT != 0
    }

    pub fn is_static(&self) -> bool {
        self.access_flags & ACC_STATIC != 0
    }

    pub fn is_varargs(&self) -> bool {
        self.access_flags & ACC_VARARGS != 0
    }

    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME
    }
}

/// Parsed metadata of a single class or interface.
///
/// Instances are created once when the index is built and are never mutated
/// by the analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMetadata {
    pub name: String,
    #[serde(default)]
    pub access_flags: u16,
    /// Absent only for `java.lang.Object`.
    #[serde(default)]
    pub super_name: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub nesting: NestingKind,
    #[serde(default)]
    pub methods: Vec<MethodMetadata>,
}

impl ClassMetadata {
    pub fn new(name: impl Into<String>, access_flags: u16) -> Self {
        Self {
            name: name.into(),
            access_flags,
            super_name: None,
            interfaces: Vec::new(),
            nesting: NestingKind::TopLevel,
            methods: Vec::new(),
        }
    }

    pub fn with_super(mut self, super_name: impl Into<String>) -> Self {
        self.super_name = Some(super_name.into());
        self
    }

    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn with_method(mut self, method: MethodMetadata) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_nesting(mut self, nesting: NestingKind) -> Self {
        self.nesting = nesting;
        self
    }

    pub fn kind(&self) -> ClassKind {
        if self.is_interface() {
            ClassKind::Interface
        } else {
            ClassKind::Class
        }
    }

    pub fn is_interface(&self) -> bool {
        self.access_flags & ACC_INTERFACE != 0
    }

    pub fn is_abstract(&self) -> bool {
        self.access_flags & ACC_ABSTRACT != 0
    }

    pub fn is_static(&self) -> bool {
        self.access_flags & ACC_STATIC != 0
    }

    pub fn is_final(&self) -> bool {
        self.access_flags & ACC_FINAL != 0
    }

    /// The declaring class of a member class.
    pub fn enclosing_class(&self) -> Option<&str> {
        match &self.nesting {
            NestingKind::Inner { enclosing } => Some(enclosing),
            _ => None,
        }
    }

    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodMetadata> {
        self.methods.iter().filter(move |m| m.name == name)
    }
}
