//! Path-subscribed callbacks over the event stream.
//!
//! [`PathListener`] owns a [`StreamingParser`] and dispatches three kinds of
//! callbacks against registered path patterns: partial updates, completed
//! array items, and finalized values. Patterns may contain [`ANY_INDEX`] to
//! match every element of an array.
//!
//! Each subscription maintains its own accumulator: a minimal partial value
//! rooted at the subscription's pattern, grown event by event. Callbacks fire
//! synchronously while [`write`](PathListener::write) runs, in event order;
//! within one event partial listeners fire before item listeners before
//! complete listeners.
//!
//! [`ANY_INDEX`]: crate::ANY_INDEX
//!
//! # Examples
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//!
//! use jsontap::{PathListener, Value, path};
//!
//! let weights = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&weights);
//!
//! let mut listener = PathListener::new();
//! listener.on_complete(path!["pets", jsontap::ANY_INDEX, "kg"], move |path, value| {
//!     sink.borrow_mut().push((path.to_vec(), value.clone()));
//! });
//! listener
//!     .write(r#"{"pets":[{"kg":3},{"kg":6}]}"#, true)
//!     .unwrap();
//!
//! assert_eq!(
//!     *weights.borrow(),
//!     vec![
//!         (path!["pets", 0, "kg"], Value::Number(3.0)),
//!         (path!["pets", 1, "kg"], Value::Number(6.0)),
//!     ]
//! );
//! ```
use alloc::{boxed::Box, string::String, vec::Vec};

use crate::{
    error::ParseError,
    event::{ParseEvent, PathComponent},
    parser::StreamingParser,
    value::{Map, Value},
};

type Callback = Box<dyn FnMut(&[PathComponent], &Value)>;

/// One subscription and the accumulator backing it.
struct Subscription {
    pattern: Vec<PathComponent>,
    partial: Option<Value>,
    callback: Callback,
}

impl Subscription {
    fn new(pattern: Vec<PathComponent>, callback: Callback) -> Self {
        Self {
            pattern,
            partial: None,
            callback,
        }
    }

    /// Grow the accumulator for an event whose path the pattern covers.
    fn apply(&mut self, event: &ParseEvent) {
        let path = event.path();
        if !covers(&self.pattern, path) {
            return;
        }
        let rel = &path[self.pattern.len()..];
        match event {
            ParseEvent::ObjectOpen { .. } => place(&mut self.partial, rel, Value::Object(Map::new())),
            ParseEvent::ArrayOpen { .. } => place(&mut self.partial, rel, Value::Array(Vec::new())),
            ParseEvent::StringOpen { .. } => {
                place(&mut self.partial, rel, Value::String(String::new()));
            }
            ParseEvent::StringAppend { delta, .. } => append_string(&mut self.partial, rel, delta),
            ParseEvent::NumberValue { value, .. } => {
                place(&mut self.partial, rel, Value::Number(*value));
            }
            ParseEvent::BooleanClose { value, .. } => {
                place(&mut self.partial, rel, Value::Boolean(*value));
            }
            ParseEvent::NullClose { .. } => place(&mut self.partial, rel, Value::Null),
            _ => {}
        }
    }

    fn fire_partial(&mut self, event: &ParseEvent) {
        let path = event.path();
        if !covers(&self.pattern, path) {
            return;
        }
        // Key events may precede the first value below the pattern; there is
        // nothing to report until the accumulator holds one.
        if let Some(value) = &self.partial {
            let concrete = substitute(&self.pattern, path);
            (self.callback)(&concrete, value);
        }
    }

    fn fire_item(&mut self, event: &ParseEvent) {
        if !event.is_close() {
            return;
        }
        let path = event.path();
        let Some((last, parent)) = path.split_last() else {
            return;
        };
        let PathComponent::Index(index) = last else {
            return;
        };
        if self.pattern.len() != parent.len() || !covers(&self.pattern, parent) {
            return;
        }
        let array = self
            .partial
            .as_ref()
            .expect("accumulator must cover a completed item");
        let Value::Array(items) = array else {
            panic!("item subscription accumulated a non-array");
        };
        let value = items
            .get(*index)
            .expect("completed item must be present in its accumulator");
        (self.callback)(path, value);
    }

    fn fire_complete(&mut self, event: &ParseEvent) {
        if !event.is_close() {
            return;
        }
        let path = event.path();
        if self.pattern.len() != path.len() || !covers(&self.pattern, path) {
            return;
        }
        let value = self
            .partial
            .as_ref()
            .expect("accumulator must cover a completed value");
        (self.callback)(path, value);
    }
}

/// Listener dispatching path-subscribed callbacks while parsing.
///
/// See the [module documentation](self) for an overview and example.
pub struct PathListener {
    parser: StreamingParser,
    partial_subs: Vec<Subscription>,
    item_subs: Vec<Subscription>,
    complete_subs: Vec<Subscription>,
}

impl Default for PathListener {
    fn default() -> Self {
        Self::new()
    }
}

impl PathListener {
    #[must_use]
    pub fn new() -> Self {
        Self {
            parser: StreamingParser::new(),
            partial_subs: Vec::new(),
            item_subs: Vec::new(),
            complete_subs: Vec::new(),
        }
    }

    /// Invokes `callback` whenever any event occurs at or below a path
    /// matching `pattern`, passing the (possibly partial) value currently
    /// accumulated at the pattern.
    pub fn on_partial(
        &mut self,
        pattern: Vec<PathComponent>,
        callback: impl FnMut(&[PathComponent], &Value) + 'static,
    ) {
        self.partial_subs
            .push(Subscription::new(pattern, Box::new(callback)));
    }

    /// Invokes `callback` each time an element of the array at `pattern`
    /// completes, passing the element's full value.
    pub fn on_item(
        &mut self,
        pattern: Vec<PathComponent>,
        callback: impl FnMut(&[PathComponent], &Value) + 'static,
    ) {
        self.item_subs
            .push(Subscription::new(pattern, Box::new(callback)));
    }

    /// Invokes `callback` once the value at `pattern` is finalized, passing
    /// the final value.
    pub fn on_complete(
        &mut self,
        pattern: Vec<PathComponent>,
        callback: impl FnMut(&[PathComponent], &Value) + 'static,
    ) {
        self.complete_subs
            .push(Subscription::new(pattern, Box::new(callback)));
    }

    /// Feeds a chunk through the parser, updating accumulators and firing
    /// callbacks for every event it produces.
    ///
    /// # Errors
    ///
    /// Propagates the parser's [`ParseError`] unchanged. Callbacks for events
    /// preceding the error have already fired by the time it is returned.
    pub fn write(&mut self, text: &str, terminate: bool) -> Result<(), ParseError> {
        let Self {
            parser,
            partial_subs,
            item_subs,
            complete_subs,
        } = self;

        for event in parser.write(text, terminate) {
            let event = event?;

            for sub in partial_subs
                .iter_mut()
                .chain(item_subs.iter_mut())
                .chain(complete_subs.iter_mut())
            {
                sub.apply(&event);
            }

            for sub in partial_subs.iter_mut() {
                sub.fire_partial(&event);
            }
            for sub in item_subs.iter_mut() {
                sub.fire_item(&event);
            }
            for sub in complete_subs.iter_mut() {
                sub.fire_complete(&event);
            }
        }
        Ok(())
    }
}

/// Pattern `P` covers path `C` iff `P` is no longer than `C` and agrees with
/// it positionally, with `AnyIndex` matching any array index.
fn covers(pattern: &[PathComponent], path: &[PathComponent]) -> bool {
    pattern.len() <= path.len()
        && pattern.iter().zip(path).all(|(p, c)| match (p, c) {
            (PathComponent::AnyIndex, PathComponent::Index(_)) => true,
            _ => p == c,
        })
}

/// Replace wildcard positions in `pattern` with the concrete components of
/// `path`. Callers guarantee `pattern` covers `path`.
fn substitute(pattern: &[PathComponent], path: &[PathComponent]) -> Vec<PathComponent> {
    pattern
        .iter()
        .zip(path)
        .map(|(p, c)| match p {
            PathComponent::AnyIndex => c.clone(),
            _ => p.clone(),
        })
        .collect()
}

/// Put `value` at `rel` within the accumulator, replacing whatever was there.
/// Containers along the way exist by construction; their absence is a logic
/// error and panics.
fn place(partial: &mut Option<Value>, rel: &[PathComponent], value: Value) {
    let Some((last, parents)) = rel.split_last() else {
        *partial = Some(value);
        return;
    };
    let mut current = partial
        .as_mut()
        .expect("accumulator has no root for a nested update");
    for component in parents {
        current = child_mut(current, component);
    }
    match (current, last) {
        (Value::Object(map), PathComponent::Key(key)) => {
            map.insert(key.clone(), value);
        }
        (Value::Array(items), PathComponent::Index(index)) => {
            if *index == items.len() {
                items.push(value);
            } else if *index < items.len() {
                items[*index] = value;
            } else {
                panic!("array index beyond the accumulated elements");
            }
        }
        _ => panic!("path component does not address its container"),
    }
}

/// Append a string delta to the value at `rel`.
fn append_string(partial: &mut Option<Value>, rel: &[PathComponent], delta: &str) {
    let mut current = partial
        .as_mut()
        .expect("accumulator has no root for a string append");
    for component in rel {
        current = child_mut(current, component);
    }
    match current {
        Value::String(s) => s.push_str(delta),
        _ => panic!("string delta addressed a non-string"),
    }
}

fn child_mut<'v>(value: &'v mut Value, component: &PathComponent) -> &'v mut Value {
    match (value, component) {
        (Value::Object(map), PathComponent::Key(key)) => map
            .get_mut(key)
            .expect("accumulated object is missing a key on the event path"),
        (Value::Array(items), PathComponent::Index(index)) => items
            .get_mut(*index)
            .expect("accumulated array is missing an index on the event path"),
        _ => panic!("path component does not address its container"),
    }
}
