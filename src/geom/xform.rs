//! Transform operations and their composition.

use serde::{Deserialize, Serialize};

use crate::util::{mat4_from_row_major, DMat4, DVec3, Error, Result};

/// Transform operation type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum XformOpType {
    Scale,
    Translate,
    RotateX,
    RotateY,
    RotateZ,
    Rotate,    // axis + angle
    Transform, // 4x4 row-major
}

impl XformOpType {
    /// Number of values the op consumes.
    pub fn num_values(&self) -> usize {
        match self {
            Self::Scale | Self::Translate => 3,
            Self::RotateX | Self::RotateY | Self::RotateZ => 1,
            Self::Rotate => 4,
            Self::Transform => 16,
        }
    }

    /// Scene token for this op.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scale => "scale",
            Self::Translate => "translate",
            Self::RotateX => "rotateX",
            Self::RotateY => "rotateY",
            Self::RotateZ => "rotateZ",
            Self::Rotate => "rotate",
            Self::Transform => "transform",
        }
    }
}

/// A single transform operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct XformOp {
    #[serde(rename = "type")]
    pub op_type: XformOpType,
    pub values: Vec<f64>,
}

impl XformOp {
    /// Create a scale operation.
    pub fn scale(x: f64, y: f64, z: f64) -> Self {
        Self { op_type: XformOpType::Scale, values: vec![x, y, z] }
    }

    /// Create a translate operation.
    pub fn translate(x: f64, y: f64, z: f64) -> Self {
        Self { op_type: XformOpType::Translate, values: vec![x, y, z] }
    }

    /// Create a rotation around X axis (angle in degrees).
    pub fn rotate_x(angle: f64) -> Self {
        Self { op_type: XformOpType::RotateX, values: vec![angle] }
    }

    /// Create a rotation around Y axis (angle in degrees).
    pub fn rotate_y(angle: f64) -> Self {
        Self { op_type: XformOpType::RotateY, values: vec![angle] }
    }

    /// Create a rotation around Z axis (angle in degrees).
    pub fn rotate_z(angle: f64) -> Self {
        Self { op_type: XformOpType::RotateZ, values: vec![angle] }
    }

    /// Create a rotation around an arbitrary axis (angle in degrees).
    pub fn rotate(axis: DVec3, angle: f64) -> Self {
        Self { op_type: XformOpType::Rotate, values: vec![axis.x, axis.y, axis.z, angle] }
    }

    /// Create a 4x4 matrix operation from row-major values.
    pub fn transform(m: [f64; 16]) -> Self {
        Self { op_type: XformOpType::Transform, values: m.to_vec() }
    }

    /// Matrix of this single op.
    pub fn matrix(&self) -> Result<DMat4> {
        let expected = self.op_type.num_values();
        if self.values.len() != expected {
            return Err(Error::InvalidXformOp {
                op: self.op_type.as_str().to_string(),
                expected,
                actual: self.values.len(),
            });
        }
        let v = &self.values;
        let m = match self.op_type {
            XformOpType::Scale => DMat4::from_scale(DVec3::new(v[0], v[1], v[2])),
            XformOpType::Translate => DMat4::from_translation(DVec3::new(v[0], v[1], v[2])),
            XformOpType::RotateX => DMat4::from_rotation_x(v[0].to_radians()),
            XformOpType::RotateY => DMat4::from_rotation_y(v[0].to_radians()),
            XformOpType::RotateZ => DMat4::from_rotation_z(v[0].to_radians()),
            XformOpType::Rotate => {
                let axis = DVec3::new(v[0], v[1], v[2]).normalize_or_zero();
                if axis.length_squared() > 0.0001 {
                    DMat4::from_axis_angle(axis, v[3].to_radians())
                } else {
                    DMat4::IDENTITY
                }
            }
            XformOpType::Transform => {
                let mut values = [0.0; 16];
                values.copy_from_slice(v);
                mat4_from_row_major(&values)
            }
        };
        Ok(m)
    }
}

/// An ordered op stack, outermost op first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct XformSample {
    pub ops: Vec<XformOp>,
}

impl XformSample {
    /// Create identity xform.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create from an op list.
    pub fn from_ops(ops: Vec<XformOp>) -> Self {
        Self { ops }
    }

    /// Compute the local 4x4 transformation matrix.
    pub fn matrix(&self) -> Result<DMat4> {
        // Ops are listed outermost first; with column vectors each op
        // multiplies on the right.
        self.ops
            .iter()
            .try_fold(DMat4::IDENTITY, |acc, op| Ok(acc * op.matrix()?))
    }

    /// Interpolate op values towards `other`. Op stacks must have the same
    /// shape, otherwise `None`.
    pub fn lerp(&self, other: &XformSample, alpha: f64) -> Option<XformSample> {
        if self.ops.len() != other.ops.len() {
            return None;
        }
        let ops = self
            .ops
            .iter()
            .zip(&other.ops)
            .map(|(a, b)| {
                if a.op_type != b.op_type || a.values.len() != b.values.len() {
                    return None;
                }
                let values = a.values.iter().zip(&b.values).map(|(x, y)| x + (y - x) * alpha).collect();
                Some(XformOp { op_type: a.op_type, values })
            })
            .collect::<Option<Vec<_>>>()?;
        Some(XformSample { ops })
    }
}
