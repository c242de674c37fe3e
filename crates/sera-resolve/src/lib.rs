//! Class-hierarchy based virtual dispatch resolution and type-hint merging.
//!
//! Given a whole-program [`ClassHierarchyIndex`](sera_index::ClassHierarchyIndex),
//! this crate answers two questions for the call-graph builder:
//!
//! - which concrete classes may receive a call observed at a call site
//!   ([`DispatchResolver::find_implementors`]), and
//! - which of two type observations for the same location is more specific
//!   ([`TypeMerger::merge`]).
//!
//! All queries are read-only over an immutable index and may run concurrently.

#![forbid(unsafe_code)]

mod cancel;
mod dispatch;
mod error;
mod merge;
mod reference;
mod serializable;
mod signature;
mod typing;

pub use crate::cancel::CancellationToken;
pub use crate::dispatch::{DefaultMethodSearch, DispatchOptions, DispatchPolicy, DispatchResolver};
pub use crate::error::{IncompatibleReason, ResolveError};
pub use crate::merge::TypeMerger;
pub use crate::reference::{is_final_object_method, is_object_method, MethodReference};
pub use crate::serializable::SerializabilityChecker;
pub use crate::signature::{build_signature, encode_type};
pub use crate::typing::{check_reference_typing, TypingDiagnostic, TypingSubject};
