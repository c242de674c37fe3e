use pretty_assertions::assert_eq;
use sera_classfile::{PrimitiveKind, TypeDescriptor};
use sera_resolve::{IncompatibleReason, ResolveError, TypeMerger};

use super::fixtures::gadget_index;

fn obj(name: &str) -> TypeDescriptor {
    TypeDescriptor::object(name)
}

fn reason(result: Result<TypeDescriptor, ResolveError>) -> IncompatibleReason {
    match result {
        Err(ResolveError::IncompatibleTypes { reason, .. }) => reason,
        other => panic!("expected incompatible types, got {other:?}"),
    }
}

#[test]
fn top_types_yield_the_other_side_in_either_order() {
    let index = gadget_index();
    let merger = TypeMerger::new(&index);

    for top in ["java.lang.Object", "java.io.Serializable"] {
        for other in ["g.Task", "g.Lambda", "java.lang.Runnable"] {
            assert_eq!(merger.merge(&obj(top), &obj(other), false).unwrap(), obj(other));
            assert_eq!(merger.merge(&obj(other), &obj(top), false).unwrap(), obj(other));
        }
    }
}

#[test]
fn subclass_wins_over_superclass() {
    let index = gadget_index();
    let merger = TypeMerger::new(&index);

    assert_eq!(
        merger.merge(&obj("g.Task"), &obj("g.RetryTask"), false).unwrap(),
        obj("g.RetryTask")
    );
    assert_eq!(
        merger.merge(&obj("g.RetryTask"), &obj("g.Task"), false).unwrap(),
        obj("g.RetryTask")
    );
    assert_eq!(
        merger.merge(&obj("g.Task"), &obj("g.Task"), false).unwrap(),
        obj("g.Task")
    );
}

#[test]
fn implementing_class_wins_over_interface() {
    let index = gadget_index();
    let merger = TypeMerger::new(&index);

    assert_eq!(
        merger
            .merge(&obj("java.lang.Runnable"), &obj("g.Job"), false)
            .unwrap(),
        obj("g.Job")
    );
    assert_eq!(
        merger
            .merge(&obj("g.RetryTask"), &obj("java.lang.Runnable"), false)
            .unwrap(),
        obj("g.RetryTask")
    );
    assert_eq!(
        reason(merger.merge(&obj("g.Outer"), &obj("java.lang.Runnable"), false)),
        IncompatibleReason::InterfaceNotImplemented
    );
}

#[test]
fn unrelated_types_are_incompatible() {
    let index = gadget_index();
    let merger = TypeMerger::new(&index);

    assert_eq!(
        reason(merger.merge(&obj("g.Task"), &obj("g.Job"), false)),
        IncompatibleReason::UnrelatedClasses
    );
    assert_eq!(
        reason(merger.merge(&obj("java.lang.Runnable"), &obj("g.Sorting"), false)),
        IncompatibleReason::UnrelatedInterfaces
    );
}

#[test]
fn primitive_and_reference_never_merge() {
    let index = gadget_index();
    let merger = TypeMerger::new(&index);
    let int = TypeDescriptor::Primitive(PrimitiveKind::Int);

    assert_eq!(
        reason(merger.merge(&int, &obj("java.lang.String"), true)),
        IncompatibleReason::ReferenceShape
    );
    assert_eq!(
        reason(merger.merge(&obj("java.lang.String"), &int, true)),
        IncompatibleReason::ReferenceShape
    );
}

#[test]
fn arrays_merge_componentwise() {
    let index = gadget_index();
    let merger = TypeMerger::new(&index);
    let tasks = TypeDescriptor::array(obj("g.Task"));
    let retries = TypeDescriptor::array(obj("g.RetryTask"));

    assert_eq!(merger.merge(&tasks, &retries, false).unwrap(), retries);
    let nested = merger
        .merge(
            &TypeDescriptor::array(tasks.clone()),
            &TypeDescriptor::array(retries.clone()),
            false,
        )
        .unwrap();
    assert_eq!(nested, TypeDescriptor::array(retries));
    assert_eq!(
        reason(merger.merge(&tasks, &obj("g.Task"), false)),
        IncompatibleReason::ArrayShape
    );
    assert_eq!(
        merger.merge(&obj("java.lang.Object"), &tasks, false).unwrap(),
        tasks
    );
}

#[test]
fn missing_classes_follow_the_leniency_flag() {
    let index = gadget_index();
    let merger = TypeMerger::new(&index);

    assert_eq!(
        merger.merge(&obj("g.Task"), &obj("x.Unknown"), true).unwrap(),
        obj("x.Unknown")
    );
    assert_eq!(
        merger.merge(&obj("x.Unknown"), &obj("g.Task"), true).unwrap(),
        obj("g.Task")
    );
    assert_eq!(
        merger.merge(&obj("g.Task"), &obj("x.Unknown"), false),
        Err(ResolveError::ClassNotFound {
            name: "x.Unknown".to_string()
        })
    );
}
