//! Key-sequence pointers into a generic tree.
//!
//! A pointer is written as `/spec/template/metadata/annotations`. A single
//! leading `/` is stripped and the rest is split on `/`; every segment is used
//! verbatim as an object key. Escape sequences (`~0`, `~1`) are not decoded,
//! so keys containing `/` cannot be addressed.

use std::fmt;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use snafu::ResultExt;

use crate::error::{self, Error};

/// A location inside a generic tree, addressed by object keys only.
///
/// List elements cannot be addressed; containers inside lists are reached
/// with a [`Query`](crate::Query) and then addressed relative to each match.
///
/// ```rust,ignore
/// let pointer = Pointer::parse("/spec/template/metadata/annotations");
/// let annotations: BTreeMap<String, String> = pointer.get(&tree)?;
/// pointer.set(&mut tree, &annotations)?;
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Pointer {
    keys: Vec<String>,
}

impl Pointer {
    /// Splits `pointer` into keys. Parsing never fails.
    ///
    /// A single leading `/` is dropped, so `/a/b` and `a/b` are the same
    /// pointer. Empty segments are kept as empty keys.
    #[must_use]
    pub fn parse(pointer: &str) -> Self {
        let pointer = pointer.strip_prefix('/').unwrap_or(pointer);
        Self { keys: pointer.split('/').map(ToString::to_string).collect() }
    }

    /// The keys walked from the root, outermost first.
    #[inline]
    #[must_use]
    pub fn keys(&self) -> &[String] { &self.keys }

    /// Walks the tree without modifying it.
    ///
    /// Returns `None` when a key is missing, when a non-object node is reached
    /// before the keys are exhausted, or when the target is `null`.
    #[must_use]
    pub fn resolve<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.keys
            .iter()
            .try_fold(root, |node, key| match node {
                Value::Object(map) => map.get(key),
                _ => None,
            })
            .filter(|value| !value.is_null())
    }

    /// Walks the tree, creating an empty object for every missing or `null`
    /// node along the way, the target included.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathConflict`] when an existing non-object node sits
    /// where an object is needed. Nodes created before the conflict was
    /// detected stay in the tree.
    pub fn resolve_mut<'a>(&self, root: &'a mut Value) -> Result<&'a mut Value, Error> {
        let mut node = root;
        for (depth, key) in self.keys.iter().enumerate() {
            if node.is_null() {
                *node = Value::Object(Map::new());
            }
            let Value::Object(map) = node else {
                return error::PathConflictSnafu {
                    pointer: self.to_string(),
                    key: key.clone(),
                    path: self.prefix(depth),
                }
                .fail();
            };
            node = map.entry(key.clone()).or_insert_with(|| Value::Object(Map::new()));
        }
        if node.is_null() {
            *node = Value::Object(Map::new());
        }
        Ok(node)
    }

    /// Reads the value at this pointer, falling back to `T::default()` when
    /// nothing is there.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DecodeValue`] when the value exists but does not fit
    /// `T`.
    pub fn get<T>(&self, root: &Value) -> Result<T, Error>
    where
        T: DeserializeOwned + Default,
    {
        self.resolve(root).map_or_else(
            || Ok(T::default()),
            |value| {
                T::deserialize(value)
                    .context(error::DecodeValueSnafu { pointer: self.to_string() })
            },
        )
    }

    /// Replaces whatever is at this pointer with `value`, creating missing
    /// parents.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EncodeValue`] when `value` fails to serialize and
    /// [`Error::PathConflict`] when a parent is not an object.
    pub fn set<T>(&self, root: &mut Value, value: &T) -> Result<(), Error>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(value)
            .context(error::EncodeValueSnafu { pointer: self.to_string() })?;
        *self.resolve_mut(root)? = value;
        Ok(())
    }

    fn prefix(&self, depth: usize) -> String { format!("/{}", self.keys[..depth].join("/")) }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.keys.join("/"))
    }
}

impl From<&str> for Pointer {
    fn from(pointer: &str) -> Self { Self::parse(pointer) }
}
