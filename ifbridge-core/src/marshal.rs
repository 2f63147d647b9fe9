//! Conversion between typed values and the wire container.
//!
//! Generated structs implement [`Marshal`] field by field. Primitives,
//! [`Vec<T>`] and [`Option<T>`] are covered here, so a generated struct only
//! ever composes these impls with those of other generated structs.

use crate::error::DecodeError;
use crate::variant::{Variant, VariantKind, VariantMap};

/// Two-way conversion between a value and its [`Variant`] form.
///
/// `from_variant(&v.to_variant())` must return a value equal to `v`.
pub trait Marshal: Sized {
    /// Encodes the value.
    fn to_variant(&self) -> Variant;

    /// Decodes a value, failing on the first field that is missing or has
    /// the wrong shape.
    ///
    /// # Errors
    /// Returns `DecodeError` describing the offending value.
    fn from_variant(variant: &Variant) -> Result<Self, DecodeError>;

    /// Inserts the encoded value into `map` under `name`.
    fn put_arg(&self, map: &mut VariantMap, name: &str) {
        map.insert(name.to_string(), self.to_variant());
    }

    /// Extracts and decodes the value stored under `name`.
    ///
    /// # Errors
    /// Returns `DecodeError` if the key is missing or the value cannot be
    /// decoded.
    fn get_arg(map: &VariantMap, name: &str) -> Result<Self, DecodeError> {
        let value = map.get(name).ok_or_else(|| DecodeError::missing(name))?;
        Self::from_variant(value).map_err(|err| err.within(name))
    }
}

impl Marshal for i32 {
    fn to_variant(&self) -> Variant {
        Variant::Int(*self)
    }

    fn from_variant(variant: &Variant) -> Result<Self, DecodeError> {
        match variant {
            Variant::Int(value) => Ok(*value),
            other => Err(DecodeError::mismatch(VariantKind::Int, other.kind())),
        }
    }
}

impl Marshal for f64 {
    fn to_variant(&self) -> Variant {
        Variant::Float(*self)
    }

    /// Integers widen to floats.
    fn from_variant(variant: &Variant) -> Result<Self, DecodeError> {
        match variant {
            Variant::Float(value) => Ok(*value),
            Variant::Int(value) => Ok(f64::from(*value)),
            other => Err(DecodeError::mismatch(VariantKind::Float, other.kind())),
        }
    }
}

impl Marshal for bool {
    fn to_variant(&self) -> Variant {
        Variant::Bool(*self)
    }

    fn from_variant(variant: &Variant) -> Result<Self, DecodeError> {
        match variant {
            Variant::Bool(value) => Ok(*value),
            other => Err(DecodeError::mismatch(VariantKind::Bool, other.kind())),
        }
    }
}

impl Marshal for String {
    fn to_variant(&self) -> Variant {
        Variant::String(self.clone())
    }

    fn from_variant(variant: &Variant) -> Result<Self, DecodeError> {
        match variant {
            Variant::String(value) => Ok(value.clone()),
            other => Err(DecodeError::mismatch(VariantKind::String, other.kind())),
        }
    }
}

impl<T: Marshal> Marshal for Vec<T> {
    fn to_variant(&self) -> Variant {
        Variant::List(self.iter().map(Marshal::to_variant).collect())
    }

    fn from_variant(variant: &Variant) -> Result<Self, DecodeError> {
        let items = match variant {
            Variant::List(items) => items,
            other => return Err(DecodeError::mismatch(VariantKind::List, other.kind())),
        };
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                T::from_variant(item).map_err(|err| err.within(&format!("[{index}]")))
            })
            .collect()
    }
}

/// `None` travels as an absent key inside a map and as [`Variant::Null`]
/// anywhere else.
impl<T: Marshal> Marshal for Option<T> {
    fn to_variant(&self) -> Variant {
        match self {
            Some(value) => value.to_variant(),
            None => Variant::Null,
        }
    }

    fn from_variant(variant: &Variant) -> Result<Self, DecodeError> {
        if variant.is_null() {
            return Ok(None);
        }
        T::from_variant(variant).map(Some)
    }

    fn put_arg(&self, map: &mut VariantMap, name: &str) {
        if let Some(value) = self {
            value.put_arg(map, name);
        }
    }

    fn get_arg(map: &VariantMap, name: &str) -> Result<Self, DecodeError> {
        match map.get(name) {
            None | Some(Variant::Null) => Ok(None),
            Some(value) => T::from_variant(value)
                .map(Some)
                .map_err(|err| err.within(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_round_trip() {
        assert_eq!(i32::from_variant(&42_i32.to_variant()), Ok(42));
        assert_eq!(bool::from_variant(&true.to_variant()), Ok(true));
        assert_eq!(f64::from_variant(&1.5_f64.to_variant()), Ok(1.5));
        let text = "hello".to_string();
        assert_eq!(String::from_variant(&text.to_variant()), Ok(text));
    }

    #[test]
    fn test_primitive_mismatch() {
        let err = i32::from_variant(&Variant::String("1".into())).unwrap_err();
        assert_eq!(err, DecodeError::mismatch(VariantKind::Int, VariantKind::String));
        assert!(bool::from_variant(&Variant::Int(1)).is_err());
    }

    #[test]
    fn test_float_accepts_int() {
        assert_eq!(f64::from_variant(&Variant::Int(3)), Ok(3.0));
    }

    #[test]
    fn test_vec_requires_list() {
        let list = vec![1_i32, 2, 3].to_variant();
        assert_eq!(Vec::<i32>::from_variant(&list), Ok(vec![1, 2, 3]));

        let err = Vec::<i32>::from_variant(&Variant::Map(VariantMap::new())).unwrap_err();
        assert_eq!(err, DecodeError::mismatch(VariantKind::List, VariantKind::Map));
    }

    #[test]
    fn test_vec_element_error_path() {
        let list = Variant::List(vec![Variant::Int(1), Variant::Bool(true)]);
        let err = Vec::<i32>::from_variant(&list).unwrap_err();
        assert_eq!(err.path(), "[1]");
    }

    #[test]
    fn test_get_arg_missing() {
        let map = VariantMap::new();
        assert_eq!(i32::get_arg(&map, "x"), Err(DecodeError::missing("x")));
    }

    #[test]
    fn test_option_absent_key() {
        let mut map = VariantMap::new();
        let value: Option<i32> = None;
        value.put_arg(&mut map, "x");
        assert!(map.is_empty());
        assert_eq!(Option::<i32>::get_arg(&map, "x"), Ok(None));

        Some(5_i32).put_arg(&mut map, "x");
        assert_eq!(map.get("x"), Some(&Variant::Int(5)));
        assert_eq!(Option::<i32>::get_arg(&map, "x"), Ok(Some(5)));
    }

    #[test]
    fn test_option_null_value() {
        let mut map = VariantMap::new();
        map.insert("x".into(), Variant::Null);
        assert_eq!(Option::<i32>::get_arg(&map, "x"), Ok(None));
        assert_eq!(Option::<Vec<i32>>::from_variant(&Variant::Null), Ok(None));
    }

    #[test]
    fn test_option_array_round_trip() {
        let value = Some(vec!["a".to_string(), "b".to_string()]);
        let decoded = Option::<Vec<String>>::from_variant(&value.to_variant());
        assert_eq!(decoded, Ok(value));
    }
}
