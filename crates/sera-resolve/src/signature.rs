//! Canonical method signatures in class-file descriptor form.

use sera_classfile::{ClassMetadata, MethodMetadata, TypeDescriptor};

/// Encode a single type in descriptor form (`I`, `[J`, `Ljava/lang/String;`).
///
/// Total: a type variable encodes as its first bound and an unresolved one as
/// `java.lang.Object`. A type variable without bounds cannot be encoded; it is
/// logged and yields an empty string so one malformed member does not stop
/// the analysis.
pub fn encode_type(ty: &TypeDescriptor) -> String {
    let mut out = String::new();
    encode_into(ty, &mut out);
    out
}

fn encode_into(ty: &TypeDescriptor, out: &mut String) {
    match ty {
        TypeDescriptor::Void => out.push('V'),
        TypeDescriptor::Primitive(kind) => out.push(kind.descriptor_char()),
        TypeDescriptor::Array(component) => {
            out.push('[');
            encode_into(component, out);
        }
        TypeDescriptor::Class(name) => {
            out.push('L');
            out.extend(name.chars().map(|c| if c == '.' { '/' } else { c }));
            out.push(';');
        }
        TypeDescriptor::Generic(bounds) => match bounds.first() {
            Some(first) => encode_into(first, out),
            None => {
                tracing::warn!(
                    target: "sera.resolve",
                    "unhandled type {ty}: type variable without bounds"
                );
            }
        },
        TypeDescriptor::UnresolvedGeneric => out.push_str("Ljava/lang/Object;"),
    }
}

/// Build the descriptor of `method` as declared by `declaring`.
///
/// With `inner_ctor_fix`, a constructor of a non-static member class gets the
/// enclosing instance prepended as an implicit first parameter unless the
/// declared parameters already start with it. Metadata producers sometimes
/// omit that synthetic parameter; the fixed form is only meant as a second
/// attempt after the plain one failed to match.
pub fn build_signature(
    method: &MethodMetadata,
    declaring: &ClassMetadata,
    inner_ctor_fix: bool,
) -> String {
    let mut out = String::from("(");

    if inner_ctor_fix && method.is_constructor() && !declaring.is_static() {
        if let Some(enclosing) = declaring.enclosing_class() {
            let first = method.parameters.first().map(|first| match first {
                TypeDescriptor::Generic(bounds) => bounds.first().unwrap_or(first),
                other => other,
            });
            if first.and_then(TypeDescriptor::class_name) != Some(enclosing) {
                encode_into(&TypeDescriptor::object(enclosing), &mut out);
            }
        }
    }

    for param in &method.parameters {
        encode_into(param, &mut out);
    }
    out.push(')');
    encode_into(&method.return_type, &mut out);
    out
}
