use std::sync::Arc;
use std::thread;

use sera_metrics::DispatchMetrics;
use sera_resolve::{
    CancellationToken, DispatchOptions, DispatchResolver, MethodReference, ResolveError,
};

use super::fixtures::{gadget_index, names};

#[test]
fn parallel_queries_share_one_index_and_counter() {
    let index = Arc::new(gadget_index());
    let metrics = Arc::new(DispatchMetrics::default());
    let reference = MethodReference::new("java.lang.Runnable", "run", "()V", false);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let index = Arc::clone(&index);
            let metrics = Arc::clone(&metrics);
            let reference = reference.clone();
            thread::spawn(move || {
                let resolver = DispatchResolver::new(&*index).with_telemetry(&*metrics);
                (0..25)
                    .map(|_| {
                        let found = resolver
                            .find_implementors(&reference, DispatchOptions::default())
                            .unwrap();
                        names(&found)
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for result in handle.join().unwrap() {
            assert_eq!(result, vec!["g.Job", "g.Lambda", "g.RetryTask", "g.Task"]);
        }
    }
    assert_eq!(metrics.unbounded_interface_dispatch(), 200);
}

#[test]
fn cancelling_one_query_leaves_others_untouched() {
    let index = gadget_index();
    let metrics = DispatchMetrics::default();
    let reference = MethodReference::new("java.lang.Runnable", "run", "()V", false);

    let cancel = CancellationToken::new();
    let cancelled = DispatchResolver::new(&index)
        .with_telemetry(&metrics)
        .with_cancellation(cancel.clone());
    let live = DispatchResolver::new(&index).with_telemetry(&metrics);

    cancel.cancel();
    assert_eq!(
        cancelled.find_implementors(&reference, DispatchOptions::default()),
        Err(ResolveError::Cancelled)
    );
    let found = live
        .find_implementors(&reference, DispatchOptions::default())
        .unwrap();
    assert_eq!(found.len(), 4);
    assert_eq!(metrics.unbounded_interface_dispatch(), 1);
}
