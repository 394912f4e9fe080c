use sovran_context::{Context, ContextError, Contextual, Keyer};
use std::collections::HashSet;
use std::thread;

enum A {}
impl Contextual for A {
    type Value = i32;
}

enum B {}
impl Contextual for B {
    type Value = f64;
}

enum C {}
impl Contextual for C {
    type Value = String;
    const OVERRIDE: Option<&'static str> = Some("Overwrite");
}

// Same value type as A
enum D {}
impl Contextual for D {
    type Value = i32;
}

// Same override name as C
enum E {}
impl Contextual for E {
    type Value = String;
    const OVERRIDE: Option<&'static str> = Some("Overwrite");
}

fn populated() -> Context {
    let mut context = Context::root();
    context.set::<A>(Some(1));
    context.set::<B>(Some(1.0));
    context.set::<C>(Some("string".to_string()));
    context
}

#[test]
fn test_empty_root_context() {
    let context = Context::root();
    assert!(context.is_empty());
    assert_eq!(context.len(), 0);
    assert!(context.items().is_empty());
    assert!(context.map().is_empty());
}

#[test]
fn test_read_write_subscripting() {
    let mut context = Context::root();

    assert_eq!(context.get::<A>(), None);
    assert_eq!(context.get::<B>(), None);
    assert_eq!(context.get::<C>(), None);

    context.set::<A>(Some(1));
    context.set::<B>(Some(1.0));
    context.set::<C>(Some("string".to_string()));

    assert!(!context.is_empty(), "context keys were set");
    assert_eq!(context.len(), 3, "three context keys were set");

    assert_eq!(context.get::<A>(), Some(&1));
    assert_eq!(context.get::<B>(), Some(&1.0));
    assert_eq!(context.get::<C>().map(String::as_str), Some("string"));

    // Setting to None clears the slot
    context.set::<A>(None);
    assert_eq!(context.get::<A>(), None);
    assert!(!context.contains::<A>());
    assert_eq!(context.len(), 2);
}

#[test]
fn test_distinct_keys_with_same_value_type() {
    let mut context = Context::root();
    context.insert::<A>(1);
    context.insert::<D>(2);

    assert_eq!(context.get::<A>(), Some(&1));
    assert_eq!(context.get::<D>(), Some(&2));

    context.set::<D>(None);
    assert_eq!(context.get::<A>(), Some(&1));
    assert_eq!(context.get::<D>(), None);
}

#[test]
fn test_distinct_keys_with_same_override_name() {
    let mut context = Context::root();
    context.insert::<C>("c".to_string());
    context.insert::<E>("e".to_string());

    assert_eq!(context.len(), 2);
    assert_eq!(context.get::<C>().map(String::as_str), Some("c"));
    assert_eq!(context.get::<E>().map(String::as_str), Some("e"));

    let names: Vec<String> = context
        .iter()
        .map(|(key, _)| key.name().into_owned())
        .collect();
    assert_eq!(names, ["Overwrite", "Overwrite"]);

    assert!(context.remove::<C>());
    assert_eq!(context.get::<C>(), None);
    assert_eq!(context.get::<E>().map(String::as_str), Some("e"));
}

#[test]
fn test_count_consistency() {
    let mut context = populated();
    context.insert::<D>(4);
    context.insert::<E>("e".to_string());
    assert_eq!(context.len(), 5);

    assert!(context.remove::<B>());
    assert_eq!(context.len(), 4);
    assert_eq!(context.get::<B>(), None);

    // Removing an absent key is a no-op
    assert!(!context.remove::<B>());
    assert_eq!(context.len(), 4);
}

#[test]
fn test_walking() -> Result<(), ContextError> {
    let context = populated();

    let items = context.items();
    assert_eq!(items.len(), 3);

    let keys: HashSet<Keyer> = items.iter().map(|(key, _)| *key).collect();
    assert_eq!(
        keys,
        HashSet::from([Keyer::of::<A>(), Keyer::of::<B>(), Keyer::of::<C>()])
    );

    let mapping = context.map();

    assert!(mapping.keys().any(|key| key.name() == "A"));
    assert!(mapping.values().any(|value| value.downcast_ref::<i32>() == Ok(&1)));

    assert!(mapping.keys().any(|key| key.name() == "B"));
    assert!(mapping.values().any(|value| value.downcast_ref::<f64>() == Ok(&1.0)));

    assert!(mapping.keys().all(|key| key.name() != "C"));
    assert!(mapping.keys().any(|key| key.name() == "Overwrite"));
    assert_eq!(
        mapping[&Keyer::of::<C>()].downcast_ref::<String>()?,
        "string"
    );

    Ok(())
}

#[test]
fn test_map_is_a_snapshot() {
    let mut context = populated();
    let snapshot = context.map();

    context.set::<A>(None);
    context.insert::<D>(9);

    assert_eq!(snapshot.len(), 3);
    assert!(snapshot.contains_key(&Keyer::of::<A>()));
    assert!(!snapshot.contains_key(&Keyer::of::<D>()));
}

#[test]
fn test_for_each_visits_every_entry() {
    let context = populated();

    let mut visited = HashSet::new();
    let result = context.for_each(|key, _| -> Result<(), ContextError> {
        assert!(visited.insert(*key), "visited {} twice", key);
        Ok(())
    });

    assert!(result.is_ok());
    assert_eq!(visited.len(), 3);
}

#[test]
fn test_for_each_empty() -> Result<(), ContextError> {
    let context = Context::root();

    context.for_each(|_, _| -> Result<(), ContextError> {
        panic!("This closure should never be called!");
    })?;

    Ok(())
}

#[test]
fn test_for_each_stops_at_first_error() {
    let context = populated();

    let mut calls = 0;
    let result = context.for_each(|key, value| {
        calls += 1;
        value.downcast_ref::<bool>().map(|_| ()).map_err(|err| (key.name(), err))
    });

    assert_eq!(calls, 1);
    match result {
        Err((_, ContextError::TypeMismatch { expected, .. })) => assert_eq!(expected, "bool"),
        other => panic!("Expected the visitor's error, got {:?}", other),
    }
}

#[test]
fn test_value_semantics() {
    let original = populated();
    let mut copy = original.clone();

    copy.insert::<A>(100);
    copy.set::<C>(None);
    copy.insert::<D>(7);

    assert_eq!(original.len(), 3);
    assert_eq!(original.get::<A>(), Some(&1));
    assert_eq!(original.get::<C>().map(String::as_str), Some("string"));
    assert_eq!(original.get::<D>(), None);

    assert_eq!(copy.len(), 3);
    assert_eq!(copy.get::<A>(), Some(&100));
}

#[test]
fn test_copies_across_threads() {
    let shared = populated();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let mut local = shared.clone();
            thread::spawn(move || {
                for _ in 0..100 {
                    let next = local.get::<A>().copied().unwrap_or_default() + i;
                    local.insert::<A>(next);
                }
                local.get::<A>().copied()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let result = handle.join().expect("worker panicked");
        assert_eq!(result, Some(1 + 100 * i as i32));
    }

    // The shared instance is never touched by the workers
    assert_eq!(shared.get::<A>(), Some(&1));
}

#[test]
fn test_debug_output() {
    let context = Context::root().with::<C>("string".to_string());
    assert_eq!(format!("{:?}", context), "{Overwrite: \"string\"}");
    assert_eq!(format!("{:?}", Context::root()), "{}");
}
