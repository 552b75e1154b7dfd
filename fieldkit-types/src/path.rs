//! Path algebra for addressing fields and values.
//!
//! Two complementary addressing schemes are used:
//!
//! - [`KeyPath`] is schema-relative. It names "the field at struct key X,
//!   then element of that list, then ..." and ignores how containers wrap
//!   their children at runtime.
//! - [`ValuePath`] is concrete. Every segment names the runtime container it
//!   steps through, including wrappers such as lists and optionals, so it can
//!   be translated into a query field-access expression or used to fan out
//!   over multi-valued containers.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// One step of a [`KeyPath`]: a struct/union/map key or a tuple/list index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeySegment {
    Index(usize),
    Key(String),
}

impl KeySegment {
    /// Returns the key if this is a string segment.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Key(key) => Some(key),
            Self::Index(_) => None,
        }
    }

    /// Returns the index if this is a numeric segment.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Index(index) => Some(*index),
            Self::Key(_) => None,
        }
    }

    /// The segment as a member name. Parsed paths turn all-digit keys
    /// such as `2024` into indices, which still name the member `"2024"`.
    pub fn key_name(&self) -> Cow<'_, str> {
        match self {
            Self::Key(key) => Cow::Borrowed(key),
            Self::Index(index) => Cow::Owned(index.to_string()),
        }
    }
}

impl fmt::Display for KeySegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Key(key) => write!(f, "{key}"),
        }
    }
}

impl From<&str> for KeySegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for KeySegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for KeySegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Schema-relative address of a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyPath(Vec<KeySegment>);

impl KeyPath {
    /// The empty path, addressing the root field itself.
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns a new path with `segment` appended.
    #[must_use]
    pub fn child(&self, segment: impl Into<KeySegment>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// Consumes the path and returns its segments.
    pub fn into_segments(self) -> Vec<KeySegment> {
        self.0
    }
}

impl Deref for KeyPath {
    type Target = [KeySegment];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<KeySegment>> for KeyPath {
    fn from(segments: Vec<KeySegment>) -> Self {
        Self(segments)
    }
}

impl<S: Into<KeySegment>> FromIterator<S> for KeyPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for KeyPath {
    type Err = crate::Error;

    /// Parses `a/0/b` style paths. Purely numeric segments become indices.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        s.split('/')
            .map(|part| {
                if part.is_empty() {
                    return Err(crate::Error::InvalidKeyPath(s.to_string()));
                }
                Ok(match part.parse::<usize>() {
                    Ok(index) => KeySegment::Index(index),
                    Err(_) => KeySegment::Key(part.to_string()),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

/// One step of a [`ValuePath`].
///
/// Sets are addressed with [`ValuePathSegment::List`]; their runtime value
/// shape is the same ordered element array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ValuePathSegment {
    Struct { key: String },
    Tuple { index: usize },
    Union { key: String },
    List,
    Map,
    Optional,
}

impl fmt::Display for ValuePathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Struct { key } => write!(f, "{key}"),
            Self::Tuple { index } => write!(f, "{index}"),
            Self::Union { key } => write!(f, "union[{key}]"),
            Self::List => f.write_str("list[*]"),
            Self::Map => f.write_str("map[*]"),
            Self::Optional => f.write_str("optional"),
        }
    }
}

/// Concrete, container-aware address of one or more values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValuePath(Vec<ValuePathSegment>);

impl ValuePath {
    /// The empty path, addressing the value itself.
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns a new path with `segment` in front of the existing segments.
    #[must_use]
    pub fn prefixed(&self, segment: ValuePathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.push(segment);
        segments.extend(self.0.iter().cloned());
        Self(segments)
    }

    /// Returns `true` if the path steps through a list, set or map and may
    /// therefore address more than one value.
    pub fn is_multi_valued(&self) -> bool {
        self.0
            .iter()
            .any(|s| matches!(s, ValuePathSegment::List | ValuePathSegment::Map))
    }

    /// Consumes the path and returns its segments.
    pub fn into_segments(self) -> Vec<ValuePathSegment> {
        self.0
    }
}

impl Deref for ValuePath {
    type Target = [ValuePathSegment];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<ValuePathSegment>> for ValuePath {
    fn from(segments: Vec<ValuePathSegment>) -> Self {
        Self(segments)
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
