use sera_config::AnalysisConfig;
use sera_metrics::NoopTelemetry;
use sera_resolve::{
    check_reference_typing, DispatchOptions, DispatchResolver, MethodReference, ResolveError,
    TypeMerger,
};

use super::fixtures::gadget_index;

const CONFIG: &str = r#"
[resolve]
ignore_not_found = false
serializable_only = true
max_implementors = 2
inner_constructor_fix = false

[logging]
level = "debug"
"#;

#[test]
fn config_file_drives_resolution() {
    let (config, diagnostics) = AnalysisConfig::load_from_str_with_diagnostics(CONFIG).unwrap();
    assert!(diagnostics.is_empty(), "{diagnostics:?}");

    let index = gadget_index();
    let resolver =
        DispatchResolver::from_config(&index, &config.resolve).with_telemetry(&NoopTelemetry);
    let options = DispatchOptions::from_config(&config.resolve);
    let run = MethodReference::new("java.lang.Runnable", "run", "()V", false);

    // Three serializable implementors exceed the cap of two.
    assert_eq!(
        resolver.find_implementors(&run, options),
        Err(ResolveError::TooManyImplementors {
            owner: "java.lang.Runnable".to_string(),
            limit: 2,
        })
    );

    let ctor = MethodReference::new("g.Outer$Inner", "<init>", "(Lg/Outer;)V", false);
    assert!(resolver.find_implementors(&ctor, options).unwrap().is_empty());
}

#[test]
fn strict_lookup_from_config_surfaces_missing_hint_classes() {
    let (config, _) = AnalysisConfig::load_from_str_with_diagnostics(CONFIG).unwrap();
    let index = gadget_index();
    let merger = TypeMerger::new(&index);
    let reference = MethodReference::new("g.Task", "run", "()V", false)
        .with_target_type(sera_classfile::TypeDescriptor::object("x.Unknown"));

    let diagnostics =
        check_reference_typing(&merger, &reference, config.resolve.ignore_not_found);
    assert_eq!(diagnostics.len(), 1);
    assert!(matches!(diagnostics[0].error, ResolveError::ClassNotFound { .. }));
}
