//! Events emitted by the streaming parser.
//!
//! [`ParseEvent`] enumerates parser outputs; every variant carries the path
//! of the node it describes. [`PathComponent`] represents one key or index in
//! such a path, and [`ANY_INDEX`] is the wildcard component accepted in
//! subscription patterns.
//!
//! # Examples
//!
//! ```
//! use jsontap::{ParseEvent, StreamingParser, path};
//!
//! let mut parser = StreamingParser::new();
//! let events: Vec<_> = parser
//!     .write("[\"hi\"]", true)
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(
//!     events,
//!     vec![
//!         ParseEvent::ArrayOpen { path: path![] },
//!         ParseEvent::StringOpen { path: path![0] },
//!         ParseEvent::StringAppend {
//!             path: path![0],
//!             delta: "hi".to_string(),
//!         },
//!         ParseEvent::StringClose { path: path![0] },
//!         ParseEvent::ArrayClose { path: path![] },
//!     ]
//! );
//! ```
use alloc::{
    string::{String, ToString},
    vec::Vec,
};

/// A component in the path to a JSON node.
///
/// Paths are sequences of keys or indices (for objects and arrays,
/// respectively) rooted at the document. Subscription patterns may
/// additionally contain [`AnyIndex`](PathComponent::AnyIndex), which matches
/// any array position at that depth; parser events never do.
///
/// # Examples
///
/// ```
/// use jsontap::PathComponent;
///
/// let key = PathComponent::Key("foo".to_string());
/// assert_eq!(key.as_key(), Some(&"foo".to_string()));
///
/// let idx = PathComponent::Index(3);
/// assert_eq!(idx.as_index(), Some(&3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathComponent {
    Key(String),
    Index(usize),
    AnyIndex,
}

/// Wildcard path component for subscription patterns.
///
/// Serializes as `-1`, the conventional sentinel distinct from every valid
/// array index.
pub const ANY_INDEX: PathComponent = PathComponent::AnyIndex;

impl PathComponent {
    #[must_use]
    /// Returns the index if this component is an index, otherwise `None`.
    pub fn as_index(&self) -> Option<&usize> {
        if let Self::Index(v) = self {
            Some(v)
        } else {
            None
        }
    }

    #[must_use]
    /// Returns the key if this component is a key, otherwise `None`.
    pub fn as_key(&self) -> Option<&String> {
        if let Self::Key(v) = self {
            Some(v)
        } else {
            None
        }
    }
}

// Convenient conversions so users can write `path![0, "foo", ANY_INDEX]`.
macro_rules! impl_from_int_for_path_component {
    ($($t:ty),*) => {
        $(
            impl From<$t> for PathComponent {
                fn from(i: $t) -> Self {
                    #[allow(clippy::cast_possible_truncation)]
                    PathComponent::Index(i as usize)
                }
            }
        )*
    };
}

impl_from_int_for_path_component!(u8, u16, u32, u64, usize);

impl From<&str> for PathComponent {
    fn from(s: &str) -> Self {
        Self::Key(s.to_string())
    }
}

impl From<String> for PathComponent {
    fn from(s: String) -> Self {
        Self::Key(s)
    }
}

#[doc(hidden)]
pub trait PathComponentFrom<T> {
    fn from_path_component(value: T) -> PathComponent;
}

// Signed integers are accepted so that bare literals like `path![0]` infer;
// negative values mean the wildcard, matching the `-1` wire sentinel.
macro_rules! impl_integer_as_path_component {
    ($($t:ty),+) => {
        $(
            impl PathComponentFrom<$t> for PathComponent {
                #[allow(unused_comparisons, clippy::absurd_extreme_comparisons)]
                fn from_path_component(value: $t) -> Self {
                    if value < 0 {
                        return PathComponent::AnyIndex;
                    }
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    PathComponent::Index(value as usize)
                }
            }
        )+
    };
}
impl_integer_as_path_component!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl PathComponentFrom<&str> for PathComponent {
    fn from_path_component(value: &str) -> PathComponent {
        PathComponent::Key(value.to_string())
    }
}

impl PathComponentFrom<String> for PathComponent {
    fn from_path_component(value: String) -> PathComponent {
        PathComponent::Key(value)
    }
}

impl PathComponentFrom<PathComponent> for PathComponent {
    fn from_path_component(value: PathComponent) -> PathComponent {
        value
    }
}

#[doc(hidden)]
pub fn path_from<const N: usize>(components: [PathComponent; N]) -> Vec<PathComponent> {
    components.into_iter().collect()
}

/// Builds a `Vec<PathComponent>` from keys, indices and [`ANY_INDEX`].
///
/// ```
/// use jsontap::{path, PathComponent, ANY_INDEX};
///
/// assert_eq!(
///     path!["items", 0],
///     vec![
///         PathComponent::Key("items".to_string()),
///         PathComponent::Index(0),
///     ]
/// );
/// assert_eq!(path![ANY_INDEX], vec![PathComponent::AnyIndex]);
/// ```
#[macro_export]
macro_rules! path {
    ($($component:expr),* $(,)?) => {
        $crate::path_from([$(
            <$crate::PathComponent as $crate::PathComponentFrom<_>>::from_path_component(
                $component,
            )
        ),*])
    };
}

// Custom (de)serialization so that a `Vec<PathComponent>` becomes e.g.
// `["foo", 0, "bar"]` instead of the default tagged representation, with the
// wildcard spelled `-1`.
#[cfg(any(test, feature = "serde"))]
mod serde_impls {
    use alloc::string::{String, ToString};
    use core::fmt;

    use serde::{
        Deserialize, Deserializer, Serialize, Serializer,
        de::{Error, Unexpected, Visitor},
    };

    use super::PathComponent;

    impl Serialize for PathComponent {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match self {
                PathComponent::Key(k) => serializer.serialize_str(k),
                PathComponent::Index(i) => serializer.serialize_u64(*i as u64),
                PathComponent::AnyIndex => serializer.serialize_i64(-1),
            }
        }
    }

    struct PathComponentVisitor;

    impl Visitor<'_> for PathComponentVisitor {
        type Value = PathComponent;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, an unsigned integer, or -1")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(PathComponent::Key(value.to_string()))
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(PathComponent::Key(value))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            #[allow(clippy::cast_possible_truncation)]
            Ok(PathComponent::Index(value as usize))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            if value == -1 {
                return Ok(PathComponent::AnyIndex);
            }
            if value < 0 {
                return Err(Error::invalid_value(
                    Unexpected::Signed(value),
                    &"a non-negative index or -1",
                ));
            }

            #[allow(clippy::cast_sign_loss)]
            #[allow(clippy::cast_possible_truncation)]
            Ok(PathComponent::Index(value as usize))
        }
    }

    impl<'de> Deserialize<'de> for PathComponent {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(PathComponentVisitor)
        }
    }
}

/// An event generated by the streaming parser.
///
/// The `path` is a sequence of [`PathComponent`] starting at the root; the
/// empty path denotes the root itself. Paths on key events exclude the
/// pending key until [`KeyClose`](ParseEvent::KeyClose), which carries the
/// finalized key both in its `path` and in its `key` field.
///
/// String and key content arrives as `delta` fragments: concatenating every
/// fragment between the matching open and close yields the decoded text,
/// escapes resolved. [`NumberValue`](ParseEvent::NumberValue) may be emitted
/// several times for one number as digits accrue; the last one wins.
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
#[cfg_attr(any(test, feature = "serde"), serde(tag = "kind"))]
#[derive(Debug, Clone, PartialEq)]
pub enum ParseEvent {
    /// Marks the start of an object; the path is the object's own position.
    ObjectOpen { path: Vec<PathComponent> },
    /// Marks the end of an object.
    ObjectClose { path: Vec<PathComponent> },
    /// Marks the start of an array.
    ArrayOpen { path: Vec<PathComponent> },
    /// Marks the end of an array.
    ArrayClose { path: Vec<PathComponent> },
    /// An object key begins; the path is the enclosing object's.
    KeyOpen { path: Vec<PathComponent> },
    /// A decoded fragment of the key under construction.
    KeyAppend {
        path: Vec<PathComponent>,
        delta: String,
    },
    /// The key is complete; the path now includes it.
    KeyClose {
        path: Vec<PathComponent>,
        key: String,
    },
    /// A string value begins.
    StringOpen { path: Vec<PathComponent> },
    /// A decoded fragment of the string under construction.
    StringAppend {
        path: Vec<PathComponent>,
        delta: String,
    },
    /// The string value is complete.
    StringClose { path: Vec<PathComponent> },
    /// A number begins.
    NumberOpen { path: Vec<PathComponent> },
    /// The numeric interpretation of the digits seen so far.
    NumberValue {
        path: Vec<PathComponent>,
        value: f64,
    },
    /// The number is complete.
    NumberClose { path: Vec<PathComponent> },
    /// A boolean literal, recognized from its first character.
    BooleanOpen {
        path: Vec<PathComponent>,
        value: bool,
    },
    /// The boolean literal is complete.
    BooleanClose {
        path: Vec<PathComponent>,
        value: bool,
    },
    /// A null literal begins.
    NullOpen { path: Vec<PathComponent> },
    /// The null literal is complete.
    NullClose { path: Vec<PathComponent> },
}

impl ParseEvent {
    /// The path of the node this event describes.
    #[must_use]
    pub fn path(&self) -> &[PathComponent] {
        use ParseEvent::*;
        match self {
            ObjectOpen { path }
            | ObjectClose { path }
            | ArrayOpen { path }
            | ArrayClose { path }
            | KeyOpen { path }
            | KeyAppend { path, .. }
            | KeyClose { path, .. }
            | StringOpen { path }
            | StringAppend { path, .. }
            | StringClose { path }
            | NumberOpen { path }
            | NumberValue { path, .. }
            | NumberClose { path }
            | BooleanOpen { path, .. }
            | BooleanClose { path, .. }
            | NullOpen { path }
            | NullClose { path } => path,
        }
    }

    /// `true` for events that finalize a value.
    ///
    /// [`KeyClose`](ParseEvent::KeyClose) finalizes key structure, not a
    /// value, and is deliberately excluded.
    #[must_use]
    pub fn is_close(&self) -> bool {
        use ParseEvent::*;
        matches!(
            self,
            ObjectClose { .. }
                | ArrayClose { .. }
                | StringClose { .. }
                | NumberClose { .. }
                | BooleanClose { .. }
                | NullClose { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn paths_serialize_flat() {
        let event = ParseEvent::KeyClose {
            path: path!["items", 2, "name"],
            key: "name".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "KeyClose",
                "path": ["items", 2, "name"],
                "key": "name",
            })
        );
    }

    #[test]
    fn wildcard_serializes_as_minus_one() {
        let pattern = path!["items", ANY_INDEX];
        let json = serde_json::to_value(&pattern).unwrap();
        assert_eq!(json, serde_json::json!(["items", -1]));

        let back: Vec<PathComponent> = serde_json::from_value(json).unwrap();
        assert_eq!(back, pattern);
    }

    #[test]
    fn negative_indices_other_than_wildcard_rejected() {
        let err = serde_json::from_value::<PathComponent>(serde_json::json!(-2));
        assert!(err.is_err());
    }

    #[test]
    fn event_roundtrips_through_serde() {
        let events = vec![
            ParseEvent::NumberValue {
                path: path![0],
                value: 2.5,
            },
            ParseEvent::BooleanOpen {
                path: path!["ok"],
                value: true,
            },
        ];
        let json = serde_json::to_string(&events).unwrap();
        let back: Vec<ParseEvent> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, events);
    }
}
