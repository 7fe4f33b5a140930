//! Typed attribute values and capability-checked casts.
//!
//! A [`Value`] carries both data and its role (`texCoord2f[]` and
//! `float2[]` hold the same data but are distinct declared types).
//! Readers never match on variants directly; they ask for a target type with
//! [`Value::cast`], which succeeds for every variant that can represent it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::util::{Error, Result, Vec2, Vec3};

/// Declared type of an attribute or primvar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueTypeName {
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "double")]
    Double,
    #[serde(rename = "token")]
    Token,
    #[serde(rename = "string")]
    String,
    #[serde(rename = "int[]")]
    IntArray,
    #[serde(rename = "float[]")]
    FloatArray,
    #[serde(rename = "double[]")]
    DoubleArray,
    #[serde(rename = "float2[]")]
    Float2Array,
    #[serde(rename = "texCoord2f[]")]
    TexCoord2fArray,
    #[serde(rename = "float3[]")]
    Float3Array,
    #[serde(rename = "point3f[]")]
    Point3fArray,
    #[serde(rename = "normal3f[]")]
    Normal3fArray,
    #[serde(rename = "vector3f[]")]
    Vector3fArray,
    #[serde(rename = "color3f[]")]
    Color3fArray,
    #[serde(rename = "token[]")]
    TokenArray,
}

impl ValueTypeName {
    /// Scene type name string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Double => "double",
            Self::Token => "token",
            Self::String => "string",
            Self::IntArray => "int[]",
            Self::FloatArray => "float[]",
            Self::DoubleArray => "double[]",
            Self::Float2Array => "float2[]",
            Self::TexCoord2fArray => "texCoord2f[]",
            Self::Float3Array => "float3[]",
            Self::Point3fArray => "point3f[]",
            Self::Normal3fArray => "normal3f[]",
            Self::Vector3fArray => "vector3f[]",
            Self::Color3fArray => "color3f[]",
            Self::TokenArray => "token[]",
        }
    }

    /// Check if values of this type are arrays.
    pub fn is_array(&self) -> bool {
        self.as_str().ends_with("[]")
    }
}

impl fmt::Display for ValueTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An attribute value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i32),
    Float(f32),
    Double(f64),
    Token(String),
    String(String),
    IntArray(Vec<i32>),
    FloatArray(Vec<f32>),
    DoubleArray(Vec<f64>),
    Float2Array(Vec<Vec2>),
    TexCoord2fArray(Vec<Vec2>),
    Float3Array(Vec<Vec3>),
    Point3fArray(Vec<Vec3>),
    Normal3fArray(Vec<Vec3>),
    Vector3fArray(Vec<Vec3>),
    Color3fArray(Vec<Vec3>),
    TokenArray(Vec<String>),
}

impl Value {
    /// Declared type of this value.
    pub fn type_name(&self) -> ValueTypeName {
        match self {
            Self::Bool(_) => ValueTypeName::Bool,
            Self::Int(_) => ValueTypeName::Int,
            Self::Float(_) => ValueTypeName::Float,
            Self::Double(_) => ValueTypeName::Double,
            Self::Token(_) => ValueTypeName::Token,
            Self::String(_) => ValueTypeName::String,
            Self::IntArray(_) => ValueTypeName::IntArray,
            Self::FloatArray(_) => ValueTypeName::FloatArray,
            Self::DoubleArray(_) => ValueTypeName::DoubleArray,
            Self::Float2Array(_) => ValueTypeName::Float2Array,
            Self::TexCoord2fArray(_) => ValueTypeName::TexCoord2fArray,
            Self::Float3Array(_) => ValueTypeName::Float3Array,
            Self::Point3fArray(_) => ValueTypeName::Point3fArray,
            Self::Normal3fArray(_) => ValueTypeName::Normal3fArray,
            Self::Vector3fArray(_) => ValueTypeName::Vector3fArray,
            Self::Color3fArray(_) => ValueTypeName::Color3fArray,
            Self::TokenArray(_) => ValueTypeName::TokenArray,
        }
    }

    /// Number of elements for array values, `None` for scalars.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::IntArray(v) => Some(v.len()),
            Self::FloatArray(v) => Some(v.len()),
            Self::DoubleArray(v) => Some(v.len()),
            Self::Float2Array(v) | Self::TexCoord2fArray(v) => Some(v.len()),
            Self::Float3Array(v)
            | Self::Point3fArray(v)
            | Self::Normal3fArray(v)
            | Self::Vector3fArray(v)
            | Self::Color3fArray(v) => Some(v.len()),
            Self::TokenArray(v) => Some(v.len()),
            _ => None,
        }
    }

    /// Check if this is an empty array.
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Convert to `T`, failing with [`Error::TypeMismatch`] if this value
    /// cannot represent it.
    pub fn cast<T: FromValue>(&self) -> Result<T> {
        T::from_value(self).ok_or_else(|| Error::TypeMismatch {
            expected: T::EXPECTED.to_string(),
            actual: self.type_name().to_string(),
        })
    }

    /// Check whether [`Value::cast`] to `T` would succeed.
    pub fn can_cast<T: FromValue>(&self) -> bool {
        T::from_value(self).is_some()
    }

    /// Linear interpolation towards `other`.
    ///
    /// Defined for floating-point scalars and for floating-point arrays of
    /// equal length and type; everything else returns `None` and is held.
    pub fn lerp(&self, other: &Value, alpha: f64) -> Option<Value> {
        let a = alpha as f32;
        let v = match (self, other) {
            (Self::Float(x), Self::Float(y)) => Self::Float(x + (y - x) * a),
            (Self::Double(x), Self::Double(y)) => Self::Double(x + (y - x) * alpha),
            (Self::FloatArray(x), Self::FloatArray(y)) if x.len() == y.len() => {
                Self::FloatArray(x.iter().zip(y).map(|(p, q)| p + (q - p) * a).collect())
            }
            (Self::DoubleArray(x), Self::DoubleArray(y)) if x.len() == y.len() => {
                Self::DoubleArray(x.iter().zip(y).map(|(p, q)| p + (q - p) * alpha).collect())
            }
            (Self::Float2Array(x), Self::Float2Array(y)) if x.len() == y.len() => {
                Self::Float2Array(lerp_vec2(x, y, a))
            }
            (Self::TexCoord2fArray(x), Self::TexCoord2fArray(y)) if x.len() == y.len() => {
                Self::TexCoord2fArray(lerp_vec2(x, y, a))
            }
            (Self::Float3Array(x), Self::Float3Array(y)) if x.len() == y.len() => {
                Self::Float3Array(lerp_vec3(x, y, a))
            }
            (Self::Point3fArray(x), Self::Point3fArray(y)) if x.len() == y.len() => {
                Self::Point3fArray(lerp_vec3(x, y, a))
            }
            (Self::Normal3fArray(x), Self::Normal3fArray(y)) if x.len() == y.len() => {
                Self::Normal3fArray(lerp_vec3(x, y, a))
            }
            (Self::Vector3fArray(x), Self::Vector3fArray(y)) if x.len() == y.len() => {
                Self::Vector3fArray(lerp_vec3(x, y, a))
            }
            (Self::Color3fArray(x), Self::Color3fArray(y)) if x.len() == y.len() => {
                Self::Color3fArray(lerp_vec3(x, y, a))
            }
            _ => return None,
        };
        Some(v)
    }
}

fn lerp_vec2(x: &[Vec2], y: &[Vec2], a: f32) -> Vec<Vec2> {
    x.iter().zip(y).map(|(p, q)| p.lerp(*q, a)).collect()
}

fn lerp_vec3(x: &[Vec3], y: &[Vec3], a: f32) -> Vec<Vec3> {
    x.iter().zip(y).map(|(p, q)| p.lerp(*q, a)).collect()
}

/// Target type of a [`Value::cast`].
pub trait FromValue: Sized {
    /// Name reported in a type mismatch.
    const EXPECTED: &'static str;

    /// Convert if the value can represent `Self`.
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromValue for i32 {
    const EXPECTED: &'static str = "int";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl FromValue for f32 {
    const EXPECTED: &'static str = "float";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(f) => Some(*f),
            Value::Double(d) => Some(*d as f32),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "double";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Double(d) => Some(*d),
            Value::Float(f) => Some(*f as f64),
            _ => None,
        }
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "token";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Token(s) | Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromValue for Vec<i32> {
    const EXPECTED: &'static str = "int[]";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::IntArray(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromValue for Vec<f32> {
    const EXPECTED: &'static str = "float[]";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::FloatArray(v) => Some(v.clone()),
            Value::DoubleArray(v) => Some(v.iter().map(|&d| d as f32).collect()),
            _ => None,
        }
    }
}

impl FromValue for Vec<Vec2> {
    const EXPECTED: &'static str = "float2[]";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float2Array(v) | Value::TexCoord2fArray(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromValue for Vec<Vec3> {
    const EXPECTED: &'static str = "float3[]";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float3Array(v)
            | Value::Point3fArray(v)
            | Value::Normal3fArray(v)
            | Value::Vector3fArray(v)
            | Value::Color3fArray(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromValue for Vec<String> {
    const EXPECTED: &'static str = "token[]";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::TokenArray(v) => Some(v.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(Value::TexCoord2fArray(vec![]).type_name(), ValueTypeName::TexCoord2fArray);
        assert_eq!(ValueTypeName::TexCoord2fArray.to_string(), "texCoord2f[]");
        assert!(ValueTypeName::Point3fArray.is_array());
        assert!(!ValueTypeName::Token.is_array());
    }

    #[test]
    fn test_cast_roles() {
        let uv = Value::TexCoord2fArray(vec![Vec2::new(0.5, 1.0)]);
        let flat = Value::Float2Array(vec![Vec2::new(0.5, 1.0)]);
        assert_eq!(uv.cast::<Vec<Vec2>>().unwrap(), flat.cast::<Vec<Vec2>>().unwrap());

        let pts = Value::Point3fArray(vec![Vec3::X]);
        assert_eq!(pts.cast::<Vec<Vec3>>().unwrap(), vec![Vec3::X]);
        assert!(!pts.can_cast::<Vec<Vec2>>());
    }

    #[test]
    fn test_cast_mismatch() {
        let err = Value::Token("loop".into()).cast::<Vec<i32>>().unwrap_err();
        match err {
            Error::TypeMismatch { expected, actual } => {
                assert_eq!(expected, "int[]");
                assert_eq!(actual, "token");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_double_array_to_float() {
        let v = Value::DoubleArray(vec![1.5, 2.5]);
        assert_eq!(v.cast::<Vec<f32>>().unwrap(), vec![1.5f32, 2.5]);
    }

    #[test]
    fn test_lerp() {
        let a = Value::Point3fArray(vec![Vec3::ZERO]);
        let b = Value::Point3fArray(vec![Vec3::new(2.0, 4.0, 0.0)]);
        assert_eq!(a.lerp(&b, 0.5), Some(Value::Point3fArray(vec![Vec3::new(1.0, 2.0, 0.0)])));

        // Mismatched lengths and integer data are held.
        let c = Value::Point3fArray(vec![Vec3::ZERO, Vec3::ONE]);
        assert_eq!(a.lerp(&c, 0.5), None);
        assert_eq!(Value::IntArray(vec![0]).lerp(&Value::IntArray(vec![2]), 0.5), None);
    }
}
