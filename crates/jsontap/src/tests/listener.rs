use alloc::{rc::Rc, string::ToString, vec, vec::Vec};
use core::{cell::RefCell, time::Duration};

use rstest::*;

use crate::{
    ANY_INDEX, ParseError, PathComponent, PathListener, Value, path, produce_chunks,
};

type Calls = Rc<RefCell<Vec<(Vec<PathComponent>, Value)>>>;

fn recorder() -> (Calls, impl FnMut(&[PathComponent], &Value) + 'static) {
    let calls: Calls = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&calls);
    let callback = move |path: &[PathComponent], value: &Value| {
        sink.borrow_mut().push((path.to_vec(), value.clone()));
    };
    (calls, callback)
}

fn rabbit() -> Value {
    Value::Object(
        [
            ("name".to_string(), Value::from("Rabbit")),
            ("weight".to_string(), Value::Number(3.0)),
        ]
        .into(),
    )
}

fn cat() -> Value {
    Value::Object(
        [
            ("name".to_string(), Value::from("Cat")),
            ("weight".to_string(), Value::Number(6.0)),
        ]
        .into(),
    )
}

const MENAGERIE: &str =
    r#"{"elements":[{"name":"Rabbit","weight":3},{"name":"Cat","weight":6}]}"#;

#[rstest]
#[timeout(Duration::from_millis(1_000))]
fn on_item_fires_per_completed_element() {
    let (calls, callback) = recorder();
    let mut listener = PathListener::new();
    listener.on_item(path!["elements"], callback);
    listener.write(MENAGERIE, true).unwrap();

    assert_eq!(
        *calls.borrow(),
        vec![
            (path!["elements", 0], rabbit()),
            (path!["elements", 1], cat()),
        ]
    );
}

#[rstest]
#[timeout(Duration::from_millis(1_000))]
fn on_complete_with_wildcard() {
    let (calls, callback) = recorder();
    let mut listener = PathListener::new();
    listener.on_complete(path!["elements", ANY_INDEX, "weight"], callback);
    listener.write(MENAGERIE, true).unwrap();

    assert_eq!(
        *calls.borrow(),
        vec![
            (path!["elements", 0, "weight"], Value::Number(3.0)),
            (path!["elements", 1, "weight"], Value::Number(6.0)),
        ]
    );
}

#[test]
fn on_partial_sees_the_string_grow() {
    let (calls, callback) = recorder();
    let mut listener = PathListener::new();
    listener.on_partial(path!["msg"], callback);
    listener.write("{\"msg\":\"He", false).unwrap();
    listener.write("llo\"}", true).unwrap();

    let snapshots: Vec<_> = calls
        .borrow()
        .iter()
        .map(|(path, value)| {
            assert_eq!(path, &path!["msg"]);
            value.clone()
        })
        .collect();
    assert_eq!(
        snapshots,
        vec![
            Value::from(""),
            Value::from("He"),
            Value::from("Hello"),
            Value::from("Hello"),
        ]
    );
}

#[test]
fn on_partial_at_root_converges_to_the_document() {
    let (calls, callback) = recorder();
    let mut listener = PathListener::new();
    listener.on_partial(path![], callback);
    listener.write(MENAGERIE, true).unwrap();

    let expected = Value::Object(
        [(
            "elements".to_string(),
            Value::Array(vec![rabbit(), cat()]),
        )]
        .into(),
    );
    let calls = calls.borrow();
    let (last_path, last_value) = calls.last().unwrap();
    assert_eq!(last_path, &path![]);
    assert_eq!(last_value, &expected);
}

#[test]
fn on_item_with_wildcard_targets_inner_arrays() {
    let (calls, callback) = recorder();
    let mut listener = PathListener::new();
    listener.on_item(path!["a", ANY_INDEX], callback);
    listener.write(r#"{"a":[[1,2],[3]]}"#, true).unwrap();

    assert_eq!(
        *calls.borrow(),
        vec![
            (path!["a", 0, 0], Value::Number(1.0)),
            (path!["a", 0, 1], Value::Number(2.0)),
            (path!["a", 1, 0], Value::Number(3.0)),
        ]
    );
}

#[test]
fn on_complete_requires_the_exact_path() {
    let (calls, callback) = recorder();
    let mut listener = PathListener::new();
    listener.on_complete(path!["a"], callback);
    listener.write(r#"{"a":{"x":1},"b":2}"#, true).unwrap();

    assert_eq!(
        *calls.borrow(),
        vec![(
            path!["a"],
            Value::Object([("x".to_string(), Value::Number(1.0))].into()),
        )]
    );
}

#[test]
fn listeners_fire_partial_then_item_then_complete() {
    let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
    let mut listener = PathListener::new();
    for (tag, register) in [
        ("partial", 0usize),
        ("item", 1),
        ("complete", 2),
    ] {
        let sink = Rc::clone(&log);
        let callback = move |_: &[PathComponent], _: &Value| {
            sink.borrow_mut().push(tag);
        };
        match register {
            0 => listener.on_partial(path![0], callback),
            1 => listener.on_item(path![], callback),
            _ => listener.on_complete(path![0], callback),
        }
    }
    listener.write(r#"["x"]"#, true).unwrap();

    assert_eq!(
        *log.borrow(),
        vec!["partial", "partial", "partial", "item", "complete"]
    );
}

#[test]
fn duplicate_keys_overwrite_silently() {
    let (calls, callback) = recorder();
    let (roots, root_callback) = recorder();
    let mut listener = PathListener::new();
    listener.on_complete(path!["k"], callback);
    listener.on_partial(path![], root_callback);
    listener.write(r#"{"k":1,"k":2}"#, true).unwrap();

    assert_eq!(
        *calls.borrow(),
        vec![
            (path!["k"], Value::Number(1.0)),
            (path!["k"], Value::Number(2.0)),
        ]
    );
    let roots = roots.borrow();
    let (_, final_root) = roots.last().unwrap();
    assert_eq!(
        final_root,
        &Value::Object([("k".to_string(), Value::Number(2.0))].into())
    );
}

#[test]
fn chunked_and_whole_feeds_invoke_identically() {
    let (whole_calls, whole_callback) = recorder();
    let mut listener = PathListener::new();
    listener.on_item(path!["elements"], whole_callback);
    listener.write(MENAGERIE, true).unwrap();

    for parts in 2..8 {
        let (calls, callback) = recorder();
        let mut listener = PathListener::new();
        listener.on_item(path!["elements"], callback);
        let chunks = produce_chunks(MENAGERIE, parts);
        let last = chunks.len() - 1;
        for (i, chunk) in chunks.iter().enumerate() {
            listener.write(chunk, i == last).unwrap();
        }
        assert_eq!(*calls.borrow(), *whole_calls.borrow(), "parts = {parts}");
    }
}

#[test]
fn errors_propagate_after_prior_callbacks() {
    let (calls, callback) = recorder();
    let mut listener = PathListener::new();
    listener.on_complete(path!["a"], callback);
    let err = listener.write(r#"{"a":1,]"#, true).unwrap_err();
    assert!(matches!(err, ParseError::InvalidCharacter { ch: ']', .. }));
    // the value completed by the comma was still delivered
    assert_eq!(*calls.borrow(), vec![(path!["a"], Value::Number(1.0))]);
}

#[test]
fn premature_termination_surfaces_through_the_listener() {
    let mut listener = PathListener::new();
    let err = listener.write("[1, 2", true).unwrap_err();
    assert!(matches!(err, ParseError::PrematureTermination { .. }));
}

#[test]
fn string_keys_may_contain_escapes() {
    let (calls, callback) = recorder();
    let mut listener = PathListener::new();
    listener.on_complete(path!["a\nb"], callback);
    listener.write(r#"{"a\nb":true}"#, true).unwrap();
    assert_eq!(
        *calls.borrow(),
        vec![(path!["a\nb"], Value::Boolean(true))]
    );
}
