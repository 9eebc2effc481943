//! CPU mirror of the point-cloud hover shader (`shaders/globe_points.wgsl`).
//!
//! Every point of the globe is pushed toward the viewer by its elevation
//! sample, plus a bump that grows linearly as its texture coordinate nears the
//! hover coordinate. Inside the same radius its colour blends from the colour
//! map toward the highlight map. Points facing away from the camera are
//! discarded outright.
//!
//! The WGSL reads the same constants through the globe uniform, so keep the two
//! in step.

use glam::{Vec2, Vec3};

/// Hover radius in texture-space units.
pub const HOVER_THRESHOLD: f32 = 0.04;
/// View-space lift per unit of `(threshold − distance)`.
pub const HOVER_LIFT_GAIN: f32 = 10.0;
/// Colour blend weight per unit of `(threshold − distance)`.
pub const HOVER_BLEND_GAIN: f32 = 50.0;
/// View-space lift per unit of elevation sample.
pub const ELEVATION_SCALE: f32 = 0.35;

/// Displacement contributed by hover proximity. Zero at and beyond the threshold.
#[inline]
pub fn hover_lift(distance: f32) -> f32 {
    if distance < HOVER_THRESHOLD {
        (HOVER_THRESHOLD - distance) * HOVER_LIFT_GAIN
    } else {
        0.0
    }
}

/// Highlight blend weight in [0, 1]. Zero at and beyond the threshold.
#[inline]
pub fn hover_blend(distance: f32) -> f32 {
    if distance < HOVER_THRESHOLD {
        ((HOVER_THRESHOLD - distance) * HOVER_BLEND_GAIN).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// `dot(camera→point reversed, normal) > 0`, both in view space.
#[inline]
pub fn is_front_facing(view_pos: Vec3, view_normal: Vec3) -> bool {
    (-view_pos.normalize_or_zero()).dot(view_normal.normalize_or_zero()) > 0.0
}

/// Inputs of one point for one frame.
#[derive(Debug, Clone, Copy)]
pub struct PointSample {
    pub uv: Vec2,
    pub hover_uv: Vec2,
    pub view_pos: Vec3,
    pub view_normal: Vec3,
    /// Red channel of the elevation map.
    pub elevation: f32,
    /// Red channel of the specular map; alpha is its complement.
    pub specular: f32,
    pub base_color: Vec3,
    pub highlight_color: Vec3,
}

/// What the shader produces for a visible point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointShade {
    /// Added to the view-space z of the point.
    pub lift: f32,
    pub color: Vec3,
    pub alpha: f32,
}

/// Returns `None` for back-facing points, whatever the hover state.
pub fn shade_point(s: &PointSample) -> Option<PointShade> {
    if !is_front_facing(s.view_pos, s.view_normal) {
        return None;
    }

    let d = s.uv.distance(s.hover_uv);
    Some(PointShade {
        lift: ELEVATION_SCALE * s.elevation + hover_lift(d),
        color: s.base_color.lerp(s.highlight_color, hover_blend(d)),
        alpha: 1.0 - s.specular,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn front_sample(uv: Vec2, hover_uv: Vec2) -> PointSample {
        PointSample {
            uv,
            hover_uv,
            view_pos: Vec3::new(0.0, 0.0, -3.0),
            view_normal: Vec3::Z,
            elevation: 0.5,
            specular: 0.25,
            base_color: Vec3::new(0.0, 0.0, 1.0),
            highlight_color: Vec3::new(1.0, 0.0, 0.0),
        }
    }

    #[test]
    fn no_hover_contribution_beyond_threshold() {
        for d in [HOVER_THRESHOLD, 0.05, 0.5, 2.0] {
            assert_eq!(hover_lift(d), 0.0, "lift at {d}");
            assert_eq!(hover_blend(d), 0.0, "blend at {d}");
        }
    }

    #[test]
    fn exact_hover_is_clamped() {
        // threshold × gain = 2.0, clamped to a valid mix factor.
        assert_eq!(hover_blend(0.0), 1.0);
        assert!((hover_lift(0.0) - HOVER_THRESHOLD * HOVER_LIFT_GAIN).abs() < 1e-6);
    }

    #[test]
    fn blend_is_linear_near_the_edge() {
        let d = HOVER_THRESHOLD - 0.01;
        assert!((hover_blend(d) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn back_faces_are_discarded_regardless_of_hover() {
        let mut s = front_sample(Vec2::splat(0.5), Vec2::splat(0.5));
        s.view_normal = -Vec3::Z;
        assert!(shade_point(&s).is_none());

        // Grazing (dot == 0) is discarded as well.
        s.view_normal = Vec3::X;
        assert!(shade_point(&s).is_none());
    }

    #[test]
    fn shading_far_from_hover() {
        let s = front_sample(Vec2::new(0.2, 0.2), Vec2::new(0.8, 0.8));
        let shade = shade_point(&s).unwrap();
        assert!((shade.lift - ELEVATION_SCALE * 0.5).abs() < 1e-6);
        assert_eq!(shade.color, s.base_color);
        assert!((shade.alpha - 0.75).abs() < 1e-6);
    }

    #[test]
    fn shading_at_hover() {
        let s = front_sample(Vec2::splat(0.5), Vec2::splat(0.5));
        let shade = shade_point(&s).unwrap();
        assert!((shade.lift - (ELEVATION_SCALE * 0.5 + 0.4)).abs() < 1e-5);
        assert_eq!(shade.color, s.highlight_color);
    }
}
