use std::cell::Cell;
use std::rc::Rc;

use serde_json::{json, Value};
use waylay::{handle, CallError, Registry};

struct Counter {
    total: i64,
}

#[test]
fn wrap_once_underlying_method_runs_once_per_call() {
    let mut registry = Registry::<Counter>::new();

    let underlying_calls = Rc::new(Cell::new(0u32));
    let calls = underlying_calls.clone();
    registry.define("ping", move |_reg, _target, _args, _block| {
        calls.set(calls.get() + 1);
        Ok(json!("pong"))
    });

    let first_layer = Rc::new(Cell::new(0u32));
    let second_layer = Rc::new(Cell::new(0u32));

    // Intercept the same slot twice: one alias, observers layered
    registry
        .intercept(&["ping"], |interceptor| {
            let hits = first_layer.clone();
            interceptor.before(move |_| hits.set(hits.get() + 1));
        })
        .unwrap();
    registry
        .intercept(&["ping"], |interceptor| {
            let hits = second_layer.clone();
            interceptor.before(move |_| hits.set(hits.get() + 1));
        })
        .unwrap();

    assert!(registry.is_intercepted("ping"));

    let counter = handle(Counter { total: 0 });
    registry.call(&counter, "ping", vec![]).unwrap();
    registry.call(&counter, "ping", vec![]).unwrap();

    // VERIFY: no double wrapping, both observer layers active
    assert_eq!(underlying_calls.get(), 2, "original runs exactly once per call");
    assert_eq!(first_layer.get(), 2);
    assert_eq!(second_layer.get(), 2);

    println!("Wrap-once verified: one alias, two observer layers");
}

#[test]
fn intercepting_an_undefined_method_fails_at_setup() {
    let mut registry = Registry::<Counter>::new();

    let err = registry.intercept(&["missing"], |_| {}).unwrap_err();
    assert!(
        matches!(err, CallError::NoSuchMethod { .. }),
        "setup mistake surfaces as a missing method"
    );
    assert!(!registry.is_intercepted("missing"));
}

#[test]
fn self_prefix_targets_the_type_level_slot() {
    let mut registry = Registry::<Counter>::new();
    registry.define_type("create", |_reg, _args, _block| Ok(json!("created")));

    let hits = Rc::new(Cell::new(0u32));
    registry
        .intercept(&["self.create"], |interceptor| {
            let hits = hits.clone();
            interceptor.before(move |_| hits.set(hits.get() + 1));
        })
        .unwrap();

    assert_eq!(registry.call_type("create", vec![]).unwrap(), json!("created"));
    assert_eq!(hits.get(), 1, "type-level dispatch goes through the interceptor");

    // The bare name never landed in the instance plane
    let counter = handle(Counter { total: 0 });
    let err = registry.call(&counter, "create", vec![]).unwrap_err();
    assert!(matches!(err, CallError::NoSuchMethod { .. }));
}

#[test]
fn unintercepted_methods_dispatch_directly() {
    let mut registry = Registry::<Counter>::new();
    registry.define("total", |_reg, target, _args, _block| {
        Ok(json!(target.borrow().total))
    });

    let counter = handle(Counter { total: 7 });
    assert_eq!(registry.call(&counter, "total", vec![]).unwrap(), json!(7));

    let err = registry.call(&counter, "unknown", vec![]).unwrap_err();
    assert!(matches!(err, CallError::NoSuchMethod { .. }));
}

#[test]
fn unconfigured_interception_is_plain_passthrough() {
    let mut registry = Registry::<Counter>::new();
    registry.define("bump", |_reg, target, _args, _block| {
        let mut counter = target.borrow_mut();
        counter.total += 1;
        Ok(json!(counter.total))
    });

    registry.intercept(&["bump"], |_| {}).unwrap();

    let counter = handle(Counter { total: 0 });
    assert_eq!(registry.call(&counter, "bump", vec![]).unwrap(), json!(1));
    assert_eq!(registry.call(&counter, "bump", vec![]).unwrap(), json!(2));
}

#[test]
fn seeded_registry_copies_capabilities_but_not_interception_state() {
    let mut parent = Registry::<Counter>::new();
    parent.define("bump", |_reg, target, _args, _block| {
        let mut counter = target.borrow_mut();
        counter.total += 1;
        Ok(json!(counter.total))
    });

    let parent_hits = Rc::new(Cell::new(0u32));
    parent
        .intercept(&["bump"], |interceptor| {
            let hits = parent_hits.clone();
            interceptor.before(move |_| hits.set(hits.get() + 1));
        })
        .unwrap();

    let mut child = Registry::seeded_from(&parent);

    // VERIFY: the capability came across, the wrapping did not
    assert!(!child.is_intercepted("bump"));
    let counter = handle(Counter { total: 0 });
    assert_eq!(child.call(&counter, "bump", vec![]).unwrap(), json!(1));
    assert_eq!(parent_hits.get(), 0, "parent observers never fire for child calls");

    // The child intercepts independently of the parent
    let child_hits = Rc::new(Cell::new(0u32));
    child
        .intercept(&["bump"], |interceptor| {
            let hits = child_hits.clone();
            interceptor.before(move |_| hits.set(hits.get() + 1));
        })
        .unwrap();

    child.call(&counter, "bump", vec![]).unwrap();
    assert_eq!(child_hits.get(), 1);
    assert_eq!(parent_hits.get(), 0);

    let parent_counter = handle(Counter { total: 0 });
    parent.call(&parent_counter, "bump", vec![]).unwrap();
    assert_eq!(parent_hits.get(), 1);
    assert_eq!(child_hits.get(), 1, "child observers never fire for parent calls");
}

#[test]
fn seeded_registry_keeps_its_own_trace() {
    let mut parent = Registry::<Counter>::new();
    parent.define("bump", |_reg, target, _args, _block| {
        let mut counter = target.borrow_mut();
        counter.total += 1;
        Ok(json!(counter.total))
    });

    let mut child = Registry::seeded_from(&parent);
    child.intercept_logged(&["bump"]).unwrap();

    let counter = handle(Counter { total: 0 });
    child.call(&counter, "bump", vec![]).unwrap();

    assert_eq!(child.trace().borrow().len(), 2, "entered + returned");
    assert!(parent.trace().borrow().is_empty(), "parent trace untouched");
}

#[test]
fn args_are_delivered_in_order() {
    let mut registry = Registry::<Counter>::new();
    registry.define("describe", |_reg, _target, args, _block| {
        Ok(Value::Array(args.to_vec()))
    });

    registry.intercept(&["describe"], |_| {}).unwrap();

    let counter = handle(Counter { total: 0 });
    let echoed = registry
        .call(&counter, "describe", vec![json!(1), json!("two"), json!([3])])
        .unwrap();
    assert_eq!(echoed, json!([1, "two", [3]]));
}
