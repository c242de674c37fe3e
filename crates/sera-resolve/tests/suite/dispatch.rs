use pretty_assertions::assert_eq;
use sera_index::ClassIndex;
use sera_metrics::{DispatchMetrics, NoopTelemetry};
use sera_resolve::{DispatchOptions, DispatchResolver, MethodReference};

use super::fixtures::{gadget_index, names};

fn run() -> MethodReference {
    MethodReference::new("java.lang.Runnable", "run", "()V", false)
}

#[test]
fn interface_dispatch_lists_every_concrete_implementor() {
    let index = gadget_index();
    let metrics = DispatchMetrics::default();
    let resolver = DispatchResolver::new(&index).with_telemetry(&metrics);

    let found = resolver
        .find_implementors(&run(), DispatchOptions::default())
        .unwrap();

    assert_eq!(
        names(&found),
        vec!["g.Job", "g.Lambda", "g.RetryTask", "g.Task"]
    );
    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.unbounded_interface_dispatch, 1);
    assert_eq!(snapshot.unbounded_by_owner.get("java.lang.Runnable"), Some(&1));
}

#[test]
fn serializable_filter_drops_plain_implementors() {
    let index = gadget_index();
    let metrics = DispatchMetrics::default();
    let resolver = DispatchResolver::new(&index).with_telemetry(&metrics);
    let options = DispatchOptions {
        serializable_only: true,
        ..DispatchOptions::default()
    };

    let found = resolver.find_implementors(&run(), options).unwrap();

    assert_eq!(names(&found), vec!["g.Job", "g.RetryTask", "g.Task"]);
    assert_eq!(metrics.unbounded_interface_dispatch(), 0);
}

#[test]
fn class_dispatch_skips_abstract_declarations() {
    let index = gadget_index();
    let resolver = DispatchResolver::new(&index).with_telemetry(&NoopTelemetry);
    let reference = MethodReference::new("g.AbstractJob", "run", "()V", false);

    let found = resolver
        .find_implementors(&reference, DispatchOptions::default())
        .unwrap();

    assert_eq!(names(&found), vec!["g.Job"]);
}

#[test]
fn inherited_default_method_resolves_to_the_class() {
    let index = gadget_index();
    let metrics = DispatchMetrics::default();
    let resolver = DispatchResolver::new(&index).with_telemetry(&metrics);
    let reference = MethodReference::new("g.Sorter", "sort", "()V", false);

    let found = resolver
        .find_implementors(&reference, DispatchOptions::default())
        .unwrap();

    assert_eq!(names(&found), vec!["g.Sorter"]);
    assert_eq!(metrics.unbounded_interface_dispatch(), 0);
}

#[test]
fn member_class_constructor_is_found_with_outer_instance() {
    let index = gadget_index();
    let resolver = DispatchResolver::new(&index).with_telemetry(&NoopTelemetry);
    let reference = MethodReference::new("g.Outer$Inner", "<init>", "(Lg/Outer;)V", false);

    let found = resolver
        .find_implementors(&reference, DispatchOptions::default())
        .unwrap();

    assert_eq!(names(&found), vec!["g.Outer$Inner"]);
}

#[test]
fn fanout_is_recorded_per_query() {
    let index = gadget_index();
    let metrics = DispatchMetrics::default();
    let resolver = DispatchResolver::new(&index).with_telemetry(&metrics);

    resolver
        .find_implementors(&run(), DispatchOptions::default())
        .unwrap();
    resolver
        .find_implementors(
            &MethodReference::new("g.Task", "run", "()V", false),
            DispatchOptions::default(),
        )
        .unwrap();

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.resolved_call_sites, 2);
    assert_eq!(snapshot.fanout.max, 4);
}

#[test]
fn index_loaded_from_json_resolves_like_a_built_one() {
    let json = r#"{
        "classes": [
            {
                "name": "s.Shape",
                "access_flags": 1537,
                "methods": [
                    {
                        "name": "draw",
                        "access_flags": 1025,
                        "parameters": [{ "kind": "class", "value": "s.Canvas" }],
                        "return_type": { "kind": "void" }
                    }
                ]
            },
            {
                "name": "s.Circle",
                "access_flags": 1,
                "super_name": "java.lang.Object",
                "interfaces": ["s.Shape"],
                "methods": [
                    {
                        "name": "draw",
                        "access_flags": 1,
                        "parameters": [{ "kind": "class", "value": "s.Canvas" }],
                        "return_type": { "kind": "void" }
                    }
                ]
            }
        ]
    }"#;
    let index = ClassIndex::from_json_str(json).unwrap();
    let resolver = DispatchResolver::new(&index).with_telemetry(&NoopTelemetry);
    let reference = MethodReference::new("s.Shape", "draw", "(Ls/Canvas;)V", false);

    let found = resolver
        .find_implementors(&reference, DispatchOptions::default())
        .unwrap();

    assert_eq!(names(&found), vec!["s.Circle"]);
}
