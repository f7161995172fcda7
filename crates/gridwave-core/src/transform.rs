use std::f32::consts::TAU;
use std::time::Duration;

/// Uniform scale plus 2D translation, applied to the whole grid in clip space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self { scale: 1.0, translate_x: 0.0, translate_y: 0.0 };

    /// Row-major 4×4 matrix: scale on the diagonal, translation in the last column.
    #[rustfmt::skip]
    pub fn to_matrix(self) -> [f32; 16] {
        let Self { scale: s, translate_x: tx, translate_y: ty } = self;
        [
            s,   0.0, 0.0, tx,
            0.0, s,   0.0, ty,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ]
    }
}

/// Time-driven animation of the grid transform.
///
/// Translation follows a sinusoid of period `translate_period` on both axes
/// (y a quarter period behind x, so the grid circles). Scale swings between
/// `scale_min` and `scale_max` on the slower `scale_period`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Animation {
    pub translate_period: Duration,
    pub translate_amplitude: f32,
    pub scale_period: Duration,
    pub scale_min: f32,
    pub scale_max: f32,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            translate_period: Duration::from_secs(4),
            translate_amplitude: 0.25,
            scale_period: Duration::from_secs(10),
            scale_min: 0.5,
            scale_max: 1.5,
        }
    }
}

impl Animation {
    /// Transform at `elapsed` since rendering started.
    pub fn transform_at(&self, elapsed: Duration) -> Transform {
        let t = elapsed.as_secs_f32();

        let translate_phase = phase(t, self.translate_period);
        let scale_phase = phase(t, self.scale_period);

        let mid = (self.scale_min + self.scale_max) * 0.5;
        let half_range = (self.scale_max - self.scale_min) * 0.5;

        Transform {
            scale: mid + half_range * scale_phase.sin(),
            translate_x: self.translate_amplitude * translate_phase.sin(),
            translate_y: self.translate_amplitude * translate_phase.cos(),
        }
    }
}

/// Angle in radians for `t` seconds into a cycle of length `period`.
fn phase(t: f32, period: Duration) -> f32 {
    let period = period.as_secs_f32();
    if period <= 0.0 {
        return 0.0;
    }
    TAU * (t / period).fract()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn matrix_layout_is_row_major() {
        let m = Transform { scale: 2.0, translate_x: 0.3, translate_y: -0.4 }.to_matrix();
        assert_eq!(m[0], 2.0);
        assert_eq!(m[5], 2.0);
        assert_eq!(m[3], 0.3);
        assert_eq!(m[7], -0.4);
        assert_eq!(m[10], 1.0);
        assert_eq!(m[15], 1.0);
        assert_eq!(m[12..15], [0.0, 0.0, 0.0]);
    }

    #[test]
    fn identity_is_the_unit_matrix() {
        let m = Transform::IDENTITY.to_matrix();
        for (i, v) in m.iter().enumerate() {
            let expected = if i % 5 == 0 { 1.0 } else { 0.0 };
            assert_eq!(*v, expected, "element {i}");
        }
    }

    #[test]
    fn starts_centered_at_mid_scale() {
        let t = Animation::default().transform_at(Duration::ZERO);
        assert!(close(t.scale, 1.0));
        assert!(close(t.translate_x, 0.0));
        assert!(close(t.translate_y, 0.25));
    }

    #[test]
    fn translation_repeats_every_period() {
        let a = Animation::default();
        let t0 = a.transform_at(Duration::from_millis(700));
        let t1 = a.transform_at(Duration::from_millis(4700));
        assert!(close(t0.translate_x, t1.translate_x));
        assert!(close(t0.translate_y, t1.translate_y));
    }

    #[test]
    fn scale_stays_within_bounds() {
        let a = Animation::default();
        for ms in (0..20_000).step_by(37) {
            let s = a.transform_at(Duration::from_millis(ms)).scale;
            assert!(s >= a.scale_min - EPS && s <= a.scale_max + EPS, "scale {s} at {ms}ms");
        }
        // Quarter of the scale period reaches the maximum.
        assert!(close(a.transform_at(Duration::from_millis(2500)).scale, 1.5));
        assert!(close(a.transform_at(Duration::from_millis(7500)).scale, 0.5));
    }

    #[test]
    fn zero_period_does_not_move() {
        let a = Animation { translate_period: Duration::ZERO, ..Animation::default() };
        let t = a.transform_at(Duration::from_secs(3));
        assert!(close(t.translate_x, 0.0));
    }
}
