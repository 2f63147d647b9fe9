//! Generic wire container.
//!
//! Every value crossing the host boundary is carried as a [`Variant`].
//! Structured values travel as [`Variant::Map`], sequences as
//! [`Variant::List`] and absent optional values as [`Variant::Null`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Keyed wire container used for struct payloads and call arguments.
pub type VariantMap = BTreeMap<String, Variant>;

/// A dynamically typed wire value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Variant {
    /// No value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value, also used for enumerations.
    Int(i32),
    /// Floating point value.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Ordered list of values.
    List(Vec<Variant>),
    /// Keyed container of values.
    Map(VariantMap),
}

/// Shape of a [`Variant`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantKind {
    /// [`Variant::Null`].
    Null,
    /// [`Variant::Bool`].
    Bool,
    /// [`Variant::Int`].
    Int,
    /// [`Variant::Float`].
    Float,
    /// [`Variant::String`].
    String,
    /// [`Variant::List`].
    List,
    /// [`Variant::Map`].
    Map,
}

impl VariantKind {
    /// Returns a lowercase name for the kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::List => "list",
            Self::Map => "map",
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Variant {
    /// Returns the shape of this value.
    #[must_use]
    pub const fn kind(&self) -> VariantKind {
        match self {
            Self::Null => VariantKind::Null,
            Self::Bool(_) => VariantKind::Bool,
            Self::Int(_) => VariantKind::Int,
            Self::Float(_) => VariantKind::Float,
            Self::String(_) => VariantKind::String,
            Self::List(_) => VariantKind::List,
            Self::Map(_) => VariantKind::Map,
        }
    }

    /// Returns true for [`Variant::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the keyed container if this is a map.
    #[must_use]
    pub fn as_map(&self) -> Option<&VariantMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the elements if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Variant]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for Variant {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Variant {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Variant {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Variant {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<VariantMap> for Variant {
    fn from(value: VariantMap) -> Self {
        Self::Map(value)
    }
}

impl From<Vec<Variant>> for Variant {
    fn from(value: Vec<Variant>) -> Self {
        Self::List(value)
    }
}

/// Conversion from a host-native slot argument.
///
/// Host signals deliver their arguments as loosely typed values; generated
/// slots unpack them positionally with [`native_arg`].
pub trait FromNative: Sized {
    /// Converts the argument at a slot position, `None` when it is missing
    /// or has the wrong shape.
    fn from_native(value: Option<&Variant>) -> Option<Self>;
}

impl FromNative for i32 {
    fn from_native(value: Option<&Variant>) -> Option<Self> {
        match value {
            Some(Variant::Int(v)) => Some(*v),
            _ => None,
        }
    }
}

impl FromNative for bool {
    fn from_native(value: Option<&Variant>) -> Option<Self> {
        match value {
            Some(Variant::Bool(v)) => Some(*v),
            _ => None,
        }
    }
}

impl FromNative for f64 {
    fn from_native(value: Option<&Variant>) -> Option<Self> {
        match value {
            Some(Variant::Float(v)) => Some(*v),
            Some(Variant::Int(v)) => Some(f64::from(*v)),
            _ => None,
        }
    }
}

impl FromNative for String {
    fn from_native(value: Option<&Variant>) -> Option<Self> {
        match value {
            Some(Variant::String(v)) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromNative for Variant {
    /// A missing trailing argument reads as [`Variant::Null`].
    fn from_native(value: Option<&Variant>) -> Option<Self> {
        Some(value.cloned().unwrap_or_default())
    }
}

/// Unpacks the slot argument at `index`.
#[inline]
#[must_use]
pub fn native_arg<T: FromNative>(args: &[Variant], index: usize) -> Option<T> {
    T::from_native(args.get(index))
}
