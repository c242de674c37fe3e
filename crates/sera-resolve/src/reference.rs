use std::fmt;
use std::hash::{Hash, Hasher};

use sera_classfile::{parse_method_descriptor, TypeDescriptor, JAVA_LANG_CLASS};

/// A method invocation observed at a call site.
///
/// Built once by the bytecode simulation and read-only afterwards. Identity is
/// `(owner, name, signature, is_static)`; the type hints do not participate in
/// equality or hashing.
#[derive(Debug, Clone)]
pub struct MethodReference {
    owner: String,
    name: String,
    signature: String,
    is_static: bool,
    target_type: Option<TypeDescriptor>,
    argument_types: Option<Vec<TypeDescriptor>>,
}

impl MethodReference {
    /// `owner` is the dotted name of the static owner type; `signature` is the
    /// method descriptor (`(Ljava/lang/String;)V`).
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        signature: impl Into<String>,
        is_static: bool,
    ) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            signature: signature.into(),
            is_static,
            target_type: None,
            argument_types: None,
        }
    }

    /// Attach the resolved receiver type hint.
    #[must_use]
    pub fn with_target_type(mut self, target: TypeDescriptor) -> Self {
        self.target_type = Some(target);
        self
    }

    /// Attach the resolved argument type hints.
    #[must_use]
    pub fn with_argument_types(mut self, arguments: Vec<TypeDescriptor>) -> Self {
        self.argument_types = Some(arguments);
        self
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn target_type(&self) -> Option<&TypeDescriptor> {
        self.target_type.as_ref()
    }

    pub fn argument_types(&self) -> Option<&[TypeDescriptor]> {
        self.argument_types.as_deref()
    }
}

impl PartialEq for MethodReference {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner
            && self.name == other.name
            && self.signature == other.signature
            && self.is_static == other.is_static
    }
}

impl Eq for MethodReference {}

impl Hash for MethodReference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owner.hash(state);
        self.name.hash(state);
        self.signature.hash(state);
        self.is_static.hash(state);
    }
}

impl fmt::Display for MethodReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_static {
            f.write_str("static ")?;
        }
        write!(f, "{}::{}{}", self.owner, self.name, self.signature)
    }
}

/// `Object.getClass()`: final, so dispatch always lands on `java.lang.Object`.
pub fn is_final_object_method(reference: &MethodReference) -> bool {
    reference.name == "getClass"
        && matches!(
            parse_method_descriptor(&reference.signature),
            Ok(desc) if desc.params.is_empty()
                && desc.return_type.class_name() == Some(JAVA_LANG_CLASS)
        )
}

/// Methods every class inherits from `java.lang.Object` that are relevant to
/// dispatch: `getClass()`, `hashCode()` and `equals(Object)`.
pub fn is_object_method(reference: &MethodReference) -> bool {
    if is_final_object_method(reference) {
        return true;
    }
    matches!(
        (reference.name.as_str(), reference.signature.as_str()),
        ("hashCode", "()I") | ("equals", "(Ljava/lang/Object;)Z")
    )
}
