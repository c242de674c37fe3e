use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::JAVA_LANG_OBJECT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
}

impl PrimitiveKind {
    /// Single-letter code used by the class-file descriptor grammar.
    pub const fn descriptor_char(self) -> char {
        match self {
            PrimitiveKind::Boolean => 'Z',
            PrimitiveKind::Byte => 'B',
            PrimitiveKind::Char => 'C',
            PrimitiveKind::Double => 'D',
            PrimitiveKind::Float => 'F',
            PrimitiveKind::Int => 'I',
            PrimitiveKind::Long => 'J',
            PrimitiveKind::Short => 'S',
        }
    }

    pub const fn from_descriptor_char(c: char) -> Option<Self> {
        Some(match c {
            'Z' => PrimitiveKind::Boolean,
            'B' => PrimitiveKind::Byte,
            'C' => PrimitiveKind::Char,
            'D' => PrimitiveKind::Double,
            'F' => PrimitiveKind::Float,
            'I' => PrimitiveKind::Int,
            'J' => PrimitiveKind::Long,
            'S' => PrimitiveKind::Short,
            _ => return None,
        })
    }

    pub const fn keyword(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Short => "short",
        }
    }
}

/// A (possibly generic) type as it appears in parsed class metadata or as a
/// type hint produced by the bytecode simulation.
///
/// Class names are stored in dotted binary form (`java.lang.String`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TypeDescriptor {
    Void,
    Primitive(PrimitiveKind),
    Array(Box<TypeDescriptor>),
    Class(String),
    /// A type variable; the bounds are kept in declaration order.
    Generic(Vec<TypeDescriptor>),
    /// A type variable whose declaration could not be resolved.
    UnresolvedGeneric,
}

impl TypeDescriptor {
    pub fn object(name: impl Into<String>) -> Self {
        TypeDescriptor::Class(name.into())
    }

    pub fn array(component: TypeDescriptor) -> Self {
        TypeDescriptor::Array(Box::new(component))
    }

    pub fn java_lang_object() -> Self {
        TypeDescriptor::Class(JAVA_LANG_OBJECT.to_string())
    }

    /// Replaces type variables with their erasure: the first bound, or
    /// `java.lang.Object` when the variable is unresolved or unbounded.
    #[must_use]
    pub fn erased(&self) -> TypeDescriptor {
        match self {
            TypeDescriptor::Generic(bounds) => match bounds.first() {
                Some(first) => first.erased(),
                None => TypeDescriptor::java_lang_object(),
            },
            TypeDescriptor::UnresolvedGeneric => TypeDescriptor::java_lang_object(),
            TypeDescriptor::Array(component) => TypeDescriptor::array(component.erased()),
            other => other.clone(),
        }
    }

    /// Whether values of this type are references (objects or arrays).
    pub fn is_reference(&self) -> bool {
        match self {
            TypeDescriptor::Class(_) | TypeDescriptor::Array(_) => true,
            TypeDescriptor::Generic(_) | TypeDescriptor::UnresolvedGeneric => true,
            TypeDescriptor::Void | TypeDescriptor::Primitive(_) => false,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeDescriptor::Array(_))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeDescriptor::Void)
    }

    pub fn class_name(&self) -> Option<&str> {
        match self {
            TypeDescriptor::Class(name) => Some(name),
            _ => None,
        }
    }

    pub fn array_dimensions(&self) -> usize {
        let mut dims = 0;
        let mut cur = self;
        while let TypeDescriptor::Array(component) = cur {
            dims += 1;
            cur = component;
        }
        dims
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Void => f.write_str("void"),
            TypeDescriptor::Primitive(kind) => f.write_str(kind.keyword()),
            TypeDescriptor::Array(component) => write!(f, "{component}[]"),
            TypeDescriptor::Class(name) => f.write_str(name),
            TypeDescriptor::Generic(bounds) => {
                f.write_str("<")?;
                for (idx, bound) in bounds.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(" & ")?;
                    }
                    write!(f, "{bound}")?;
                }
                f.write_str(">")
            }
            TypeDescriptor::UnresolvedGeneric => f.write_str("<?>"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub params: Vec<TypeDescriptor>,
    pub return_type: TypeDescriptor,
}

pub fn parse_field_descriptor(desc: &str) -> Result<TypeDescriptor> {
    let (ty, rest) = parse_field_type(desc)?;
    if !rest.is_empty() {
        return Err(Error::InvalidDescriptor(desc.to_string()));
    }
    Ok(ty)
}

pub fn parse_method_descriptor(desc: &str) -> Result<MethodDescriptor> {
    let Some(mut rest) = desc.strip_prefix('(') else {
        return Err(Error::InvalidDescriptor(desc.to_string()));
    };

    let mut params = Vec::new();
    loop {
        if let Some(after) = rest.strip_prefix(')') {
            rest = after;
            break;
        }
        if rest.is_empty() {
            return Err(Error::InvalidDescriptor(desc.to_string()));
        }
        let (param, after) = parse_field_type(rest)?;
        params.push(param);
        rest = after;
    }

    let (return_type, rest) = if let Some(after) = rest.strip_prefix('V') {
        (TypeDescriptor::Void, after)
    } else if rest.is_empty() {
        return Err(Error::InvalidDescriptor(desc.to_string()));
    } else {
        parse_field_type(rest)?
    };

    if !rest.is_empty() {
        return Err(Error::InvalidDescriptor(desc.to_string()));
    }

    Ok(MethodDescriptor {
        params,
        return_type,
    })
}

/// Class-file limit on the number of array dimensions in a descriptor.
pub const MAX_ARRAY_DIMENSIONS: usize = 255;

fn parse_field_type(input: &str) -> Result<(TypeDescriptor, &str)> {
    let dimensions = input.bytes().take_while(|&b| b == b'[').count();
    if dimensions > MAX_ARRAY_DIMENSIONS {
        return Err(Error::InvalidDescriptor(truncated(input)));
    }

    let (mut ty, rest) = parse_component_type(&input[dimensions..])?;
    for _ in 0..dimensions {
        ty = TypeDescriptor::array(ty);
    }
    Ok((ty, rest))
}

fn parse_component_type(input: &str) -> Result<(TypeDescriptor, &str)> {
    let Some(first) = input.chars().next() else {
        return Err(Error::InvalidDescriptor(input.to_string()));
    };
    if let Some(kind) = PrimitiveKind::from_descriptor_char(first) {
        return Ok((TypeDescriptor::Primitive(kind), &input[1..]));
    }
    match first {
        'L' => match input.find(';') {
            Some(end) if end > 1 => {
                let name = input[1..end].replace('/', ".");
                Ok((TypeDescriptor::Class(name), &input[end + 1..]))
            }
            _ => Err(Error::InvalidDescriptor(input.to_string())),
        },
        _ => Err(Error::InvalidDescriptor(input.to_string())),
    }
}

fn truncated(input: &str) -> String {
    const MAX_ECHO: usize = 64;
    match input.char_indices().nth(MAX_ECHO) {
        Some((end, _)) => format!("{}...", &input[..end]),
        None => input.to_string(),
    }
}
