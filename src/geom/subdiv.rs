//! Subdivision tags and their integer codes.
//!
//! Scene tokens map onto closed enums through explicit tables. Unknown
//! tokens become `Unspecified` instead of reusing a numeric default.

/// Subdivision scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubdivScheme {
    /// Not a subdivision mesh.
    #[default]
    None,
    /// Catmull-Clark subdivision.
    CatmullClark,
    /// Loop subdivision (for triangles).
    Loop,
    /// Bilinear subdivision.
    Bilinear,
    /// Subdivided with a scheme outside the known set.
    Unspecified,
}

impl SubdivScheme {
    /// Map a scheme token.
    pub fn from_token(token: &str) -> Self {
        match token {
            "none" => Self::None,
            "catmullClark" => Self::CatmullClark,
            "loop" => Self::Loop,
            "bilinear" => Self::Bilinear,
            _ => Self::Unspecified,
        }
    }

    /// Whether the mesh is subdivided at all.
    pub fn is_subdivision(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Downstream scheme name; empty for `None` and `Unspecified`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CatmullClark => "catmullClark",
            Self::Loop => "loop",
            Self::Bilinear => "bilinear",
            Self::None | Self::Unspecified => "",
        }
    }
}

/// Boundary interpolation rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BoundaryInterpolation {
    None,
    EdgeAndCorner,
    EdgeOnly,
    #[default]
    Unspecified,
}

impl BoundaryInterpolation {
    /// Map a boundary token.
    pub fn from_token(token: &str) -> Self {
        match token {
            "none" => Self::None,
            "edgeAndCorner" => Self::EdgeAndCorner,
            "edgeOnly" => Self::EdgeOnly,
            _ => Self::Unspecified,
        }
    }

    /// Integer code consumed downstream.
    pub fn code(&self) -> i32 {
        match self {
            Self::None | Self::Unspecified => 0,
            Self::EdgeAndCorner => 1,
            Self::EdgeOnly => 2,
        }
    }
}

/// Face-varying linear interpolation rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FaceVaryingInterpolation {
    All,
    CornersPlus1,
    None,
    Boundaries,
    CornersPlus2,
    #[default]
    Unspecified,
}

impl FaceVaryingInterpolation {
    /// Map a face-varying token.
    pub fn from_token(token: &str) -> Self {
        match token {
            "all" => Self::All,
            "cornersPlus1" => Self::CornersPlus1,
            "none" => Self::None,
            "boundaries" => Self::Boundaries,
            "cornersPlus2" => Self::CornersPlus2,
            _ => Self::Unspecified,
        }
    }

    /// Integer code consumed downstream. Both corner rules share code 1 and
    /// differ in [`propagate_corner`](Self::propagate_corner).
    pub fn code(&self) -> i32 {
        match self {
            Self::All | Self::Unspecified => 0,
            Self::CornersPlus1 | Self::CornersPlus2 => 1,
            Self::None => 2,
            Self::Boundaries => 3,
        }
    }

    /// Corner propagation flag.
    pub fn propagate_corner(&self) -> i32 {
        match self {
            Self::CornersPlus2 => 1,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme() {
        assert_eq!(SubdivScheme::from_token("catmullClark"), SubdivScheme::CatmullClark);
        assert_eq!(SubdivScheme::from_token("loop").name(), "loop");
        assert_eq!(SubdivScheme::from_token("bilinear").name(), "bilinear");
        assert!(!SubdivScheme::from_token("none").is_subdivision());

        let unknown = SubdivScheme::from_token("sqrt3");
        assert_eq!(unknown, SubdivScheme::Unspecified);
        assert!(unknown.is_subdivision());
        assert_eq!(unknown.name(), "");
    }

    #[test]
    fn test_boundary_codes() {
        assert_eq!(BoundaryInterpolation::from_token("none").code(), 0);
        assert_eq!(BoundaryInterpolation::from_token("edgeAndCorner").code(), 1);
        assert_eq!(BoundaryInterpolation::from_token("edgeOnly").code(), 2);
        assert_eq!(BoundaryInterpolation::from_token("bogus"), BoundaryInterpolation::Unspecified);
        assert_eq!(BoundaryInterpolation::Unspecified.code(), 0);
    }

    #[test]
    fn test_face_varying_codes() {
        let table = [
            ("all", 0, 0),
            ("cornersPlus1", 1, 0),
            ("none", 2, 0),
            ("boundaries", 3, 0),
            ("cornersPlus2", 1, 1),
            ("cornersOnly", 0, 0),
        ];
        for (token, code, propagate) in table {
            let fv = FaceVaryingInterpolation::from_token(token);
            assert_eq!(fv.code(), code, "{token}");
            assert_eq!(fv.propagate_corner(), propagate, "{token}");
        }
    }
}
