use sera_classfile::{
    ClassMetadata, MethodMetadata, NestingKind, TypeDescriptor, ACC_ABSTRACT, ACC_INTERFACE,
    ACC_PUBLIC,
};
use sera_index::ClassIndex;

pub const INTERFACE: u16 = ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT;

pub fn void_method(name: &str, flags: u16) -> MethodMetadata {
    MethodMetadata::new(name, flags, Vec::new(), TypeDescriptor::Void)
}

pub fn names(found: &[&ClassMetadata]) -> Vec<String> {
    found.iter().map(|c| c.name.clone()).collect()
}

/// A small slice of a serialization gadget surface:
///
/// ```text
/// Runnable (I)           Comparator (I) -- compare() default in Sorting (I)
///   Task implements Runnable, Serializable      run()
///     RetryTask extends Task                    (inherits run)
///   AbstractJob implements Runnable (abstract)  run() abstract
///     Job extends AbstractJob                   run()
///   Lambda implements Runnable                  run(), not serializable
/// Outer, Outer$Inner (member class)             <init>()
/// ```
pub fn gadget_index() -> ClassIndex {
    ClassIndex::new([
        ClassMetadata::new("java.lang.Object", ACC_PUBLIC)
            .with_method(void_method("<init>", ACC_PUBLIC)),
        ClassMetadata::new("java.io.Serializable", INTERFACE),
        ClassMetadata::new("java.lang.Runnable", INTERFACE)
            .with_method(void_method("run", ACC_PUBLIC | ACC_ABSTRACT)),
        ClassMetadata::new("g.Task", ACC_PUBLIC)
            .with_super("java.lang.Object")
            .with_interface("java.lang.Runnable")
            .with_interface("java.io.Serializable")
            .with_method(void_method("run", ACC_PUBLIC)),
        ClassMetadata::new("g.RetryTask", ACC_PUBLIC).with_super("g.Task"),
        ClassMetadata::new("g.AbstractJob", ACC_PUBLIC | ACC_ABSTRACT)
            .with_super("java.lang.Object")
            .with_interface("java.lang.Runnable")
            .with_method(void_method("run", ACC_PUBLIC | ACC_ABSTRACT)),
        ClassMetadata::new("g.Job", ACC_PUBLIC)
            .with_super("g.AbstractJob")
            .with_interface("java.io.Serializable")
            .with_method(void_method("run", ACC_PUBLIC)),
        ClassMetadata::new("g.Lambda", ACC_PUBLIC)
            .with_super("java.lang.Object")
            .with_interface("java.lang.Runnable")
            .with_method(void_method("run", ACC_PUBLIC)),
        ClassMetadata::new("g.Sorting", INTERFACE).with_method(void_method("sort", ACC_PUBLIC)),
        ClassMetadata::new("g.Sorter", ACC_PUBLIC)
            .with_super("java.lang.Object")
            .with_interface("g.Sorting"),
        ClassMetadata::new("g.Outer", ACC_PUBLIC).with_super("java.lang.Object"),
        ClassMetadata::new("g.Outer$Inner", ACC_PUBLIC)
            .with_super("java.lang.Object")
            .with_nesting(NestingKind::Inner {
                enclosing: "g.Outer".to_string(),
            })
            .with_method(void_method("<init>", ACC_PUBLIC)),
    ])
}
