use pretty_assertions::assert_eq;
use sera_classfile::{ClassMetadata, ACC_ABSTRACT, ACC_INTERFACE, ACC_PUBLIC};
use sera_index::{ClassHierarchyIndex, ClassIndex};

const INTERFACE: u16 = ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT;

fn names(classes: Vec<&ClassMetadata>) -> Vec<&str> {
    classes.into_iter().map(|c| c.name.as_str()).collect()
}

fn collections_index() -> ClassIndex {
    ClassIndex::new([
        ClassMetadata::new("java.lang.Object", ACC_PUBLIC),
        ClassMetadata::new("java.lang.Iterable", INTERFACE),
        ClassMetadata::new("java.util.Collection", INTERFACE).with_interface("java.lang.Iterable"),
        ClassMetadata::new("java.util.List", INTERFACE).with_interface("java.util.Collection"),
        ClassMetadata::new("java.util.AbstractCollection", ACC_PUBLIC | ACC_ABSTRACT)
            .with_super("java.lang.Object")
            .with_interface("java.util.Collection"),
        ClassMetadata::new("java.util.AbstractList", ACC_PUBLIC | ACC_ABSTRACT)
            .with_super("java.util.AbstractCollection")
            .with_interface("java.util.List"),
        ClassMetadata::new("java.util.ArrayList", ACC_PUBLIC)
            .with_super("java.util.AbstractList")
            .with_interface("java.util.List"),
        ClassMetadata::new("java.util.HashSet", ACC_PUBLIC)
            .with_super("java.util.AbstractCollection"),
    ])
}

#[test]
fn implementors_include_classes_inheriting_the_interface() {
    let index = collections_index();

    assert_eq!(
        names(index.all_known_implementors("java.lang.Iterable")),
        vec![
            "java.util.AbstractCollection",
            "java.util.AbstractList",
            "java.util.ArrayList",
            "java.util.HashSet",
        ]
    );
    assert_eq!(
        names(index.all_known_implementors("java.util.List")),
        vec!["java.util.AbstractList", "java.util.ArrayList"]
    );
}

#[test]
fn implementors_never_contain_interfaces() {
    let index = collections_index();
    assert!(index
        .all_known_implementors("java.lang.Iterable")
        .iter()
        .all(|c| !c.is_interface()));
}

#[test]
fn subclasses_of_the_root_cover_every_class() {
    let index = collections_index();
    assert_eq!(
        names(index.all_known_subclasses("java.util.AbstractCollection")),
        vec![
            "java.util.AbstractList",
            "java.util.ArrayList",
            "java.util.HashSet",
        ]
    );
    assert_eq!(index.all_known_subclasses("java.lang.Object").len(), 4);
}

#[test]
fn unknown_names_yield_empty_results() {
    let index = collections_index();
    assert!(index.lookup_by_name("com.example.Missing").is_none());
    assert!(index.all_known_subclasses("com.example.Missing").is_empty());
    assert!(index.all_known_implementors("com.example.Missing").is_empty());
}

#[test]
fn index_loads_from_json_snapshot() {
    let json = r#"{
        "classes": [
            {"name": "java.lang.Object"},
            {"name": "a.I", "access_flags": 1537},
            {"name": "a.A", "super_name": "java.lang.Object", "interfaces": ["a.I"]}
        ]
    }"#;
    let index = ClassIndex::from_json_str(json).unwrap();
    assert_eq!(names(index.all_known_implementors("a.I")), vec!["a.A"]);
}
