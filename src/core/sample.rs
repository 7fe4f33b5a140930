//! Time selection and primvar interpolation types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::util::Chrono;

/// Time at which an attribute is read.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum TimeCode {
    /// The authored default value; time samples are ignored.
    #[default]
    Default,
    /// The earliest time sample, or the default if none are authored.
    EarliestTime,
    /// An explicit time.
    At(Chrono),
}

impl TimeCode {
    /// Selector for an explicit time.
    pub const fn at(t: Chrono) -> Self {
        Self::At(t)
    }

    /// Check if this is the default time.
    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }
}

impl From<Chrono> for TimeCode {
    fn from(time: Chrono) -> Self {
        Self::At(time)
    }
}

impl From<i32> for TimeCode {
    fn from(frame: i32) -> Self {
        Self::At(frame as Chrono)
    }
}

impl fmt::Display for TimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::EarliestTime => f.write_str("earliest"),
            Self::At(t) => write!(f, "{}", t),
        }
    }
}

/// Result of sample interpolation query.
#[derive(Clone, Copy, Debug)]
pub struct SampleInterp {
    /// Floor sample index.
    pub floor_index: usize,
    /// Ceil sample index.
    pub ceil_index: usize,
    /// Interpolation factor (0.0 = floor, 1.0 = ceil).
    pub alpha: f64,
}

impl SampleInterp {
    /// Create for exact sample (no interpolation needed).
    pub fn exact(index: usize) -> Self {
        Self {
            floor_index: index,
            ceil_index: index,
            alpha: 0.0,
        }
    }

    /// Create for interpolation between two samples.
    pub fn lerp(floor: usize, ceil: usize, alpha: f64) -> Self {
        Self {
            floor_index: floor,
            ceil_index: ceil,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    /// Check if this is an exact sample (no interpolation).
    pub fn is_exact(&self) -> bool {
        self.floor_index == self.ceil_index || self.alpha == 0.0
    }
}

/// How a primvar's values map onto the mesh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Interpolation {
    /// One value for the whole prim.
    #[default]
    Constant,
    /// One value per face.
    Uniform,
    /// One value per point, linearly interpolated.
    Varying,
    /// One value per point, interpolated by the subdivision scheme.
    Vertex,
    /// One value per face corner.
    FaceVarying,
}

impl Interpolation {
    /// Parse from a scene token. Unknown tokens are `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "constant" => Some(Self::Constant),
            "uniform" => Some(Self::Uniform),
            "varying" => Some(Self::Varying),
            "vertex" => Some(Self::Vertex),
            "faceVarying" => Some(Self::FaceVarying),
            _ => None,
        }
    }

    /// Scene token for this interpolation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::Uniform => "uniform",
            Self::Varying => "varying",
            Self::Vertex => "vertex",
            Self::FaceVarying => "faceVarying",
        }
    }

    /// Per-point or per-corner data, the only kinds usable as UVs.
    pub fn is_vertex_or_face_varying(&self) -> bool {
        matches!(self, Self::Vertex | Self::FaceVarying)
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_code() {
        let t: TimeCode = 3.into();
        assert_eq!(t, TimeCode::At(3.0));

        let t: TimeCode = 1.5.into();
        assert!(matches!(t, TimeCode::At(v) if (v - 1.5).abs() < 1e-10));

        assert!(TimeCode::default().is_default());
        assert_eq!(TimeCode::EarliestTime.to_string(), "earliest");
    }

    #[test]
    fn test_sample_interp() {
        let exact = SampleInterp::exact(5);
        assert!(exact.is_exact());
        assert_eq!(exact.floor_index, 5);

        let lerp = SampleInterp::lerp(2, 3, 0.5);
        assert!(!lerp.is_exact());
        assert_eq!(lerp.floor_index, 2);
        assert_eq!(lerp.ceil_index, 3);
        assert!((lerp.alpha - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_interpolation() {
        assert_eq!(Interpolation::parse("faceVarying"), Some(Interpolation::FaceVarying));
        assert_eq!(Interpolation::parse("facevarying"), None);
        assert_eq!(Interpolation::Vertex.as_str(), "vertex");
        assert!(Interpolation::Vertex.is_vertex_or_face_varying());
        assert!(!Interpolation::Uniform.is_vertex_or_face_varying());
    }
}
