//! Math type re-exports and point/transform helpers.
//!
//! Transforms are kept in double precision like the scene graph evaluates
//! them; baked vertex data is single precision.

pub use glam::{DMat4, DVec3, Vec2, Vec3};

/// Chrono type - time value (frames).
pub type Chrono = f64;

/// Build a matrix from 16 values stored row-major with row vectors
/// (translation in elements 12..15).
///
/// A column-major read of that layout yields the transpose, which is the
/// equivalent column-vector matrix.
#[inline]
pub fn mat4_from_row_major(values: &[f64; 16]) -> DMat4 {
    DMat4::from_cols_array(values)
}

/// Exact identity test. Baking is skipped only for a true identity.
#[inline]
pub fn is_identity(m: &DMat4) -> bool {
    *m == DMat4::IDENTITY
}

/// Flatten Vec2 values into interleaved `u, v` pairs.
#[inline]
pub fn flatten_vec2(values: &[Vec2]) -> Vec<f32> {
    bytemuck::cast_slice::<Vec2, f32>(values).to_vec()
}

/// Flatten Vec3 values into interleaved `x, y, z` triples.
#[inline]
pub fn flatten_vec3(values: &[Vec3]) -> Vec<f32> {
    bytemuck::cast_slice::<Vec3, f32>(values).to_vec()
}

/// Transform interleaved `x, y, z` triples in place as points (w = 1).
pub fn transform_points_in_place(points: &mut [f32], m: &DMat4) {
    for p in points.chunks_exact_mut(3) {
        let v = m.transform_point3(DVec3::new(p[0] as f64, p[1] as f64, p[2] as f64));
        p[0] = v.x as f32;
        p[1] = v.y as f32;
        p[2] = v.z as f32;
    }
}

/// Identity index sequence `[0, len)`.
#[inline]
pub fn identity_indices(len: usize) -> Vec<i32> {
    (0..len as i32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_translation() {
        let m = mat4_from_row_major(&[
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            5.0, 6.0, 7.0, 1.0,
        ]);
        assert_eq!(m.transform_point3(DVec3::ZERO), DVec3::new(5.0, 6.0, 7.0));
    }

    #[test]
    fn test_flatten() {
        let v = [Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)];
        assert_eq!(flatten_vec3(&v), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let uv = [Vec2::new(0.25, 0.5)];
        assert_eq!(flatten_vec2(&uv), vec![0.25, 0.5]);
    }

    #[test]
    fn test_transform_points() {
        let mut pts = vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let m = DMat4::from_translation(DVec3::new(0.0, 0.0, 2.0));
        transform_points_in_place(&mut pts, &m);
        assert_eq!(pts, vec![1.0, 0.0, 2.0, 0.0, 1.0, 2.0]);
        assert!(!is_identity(&m));
        assert!(is_identity(&DMat4::IDENTITY));
    }

    #[test]
    fn test_identity_indices() {
        assert_eq!(identity_indices(4), vec![0, 1, 2, 3]);
        assert!(identity_indices(0).is_empty());
    }
}
