use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

/// The four directional movement signals sampled each tick.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct DirectionalInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl DirectionalInput {
    #[inline]
    pub fn any(self) -> bool {
        self.forward || self.back || self.left || self.right
    }
}

/// Camera position plus Euler rotation (x = pitch, y = yaw, z = roll), radians.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl CameraPose {
    /// Orientation as roll about Z, then pitch about X, then yaw about Y.
    #[inline]
    pub fn orientation(&self) -> Quat {
        euler_to_quat(self.rotation)
    }

    /// Camera-relative unit forward (+Z) and right (+X) axes.
    pub fn basis(&self) -> (Vec3, Vec3) {
        let q = self.orientation();
        (q * Vec3::Z, q * Vec3::X)
    }

    /// Applies one tick of directional movement. Returns whether any key was held.
    ///
    /// Each held direction contributes `axis × speed × dt`; diagonals are not
    /// normalized. Opposite keys cancel exactly.
    pub fn translate(&mut self, keys: DirectionalInput, speed: f32, dt: f32) -> bool {
        if !keys.any() {
            return false;
        }

        let (forward, right) = self.basis();
        let step = speed * dt;
        let mut displacement = Vec3::ZERO;

        if keys.forward {
            displacement += forward * step;
        }
        if keys.back {
            displacement -= forward * step;
        }
        if keys.left {
            displacement -= right * step;
        }
        if keys.right {
            displacement += right * step;
        }

        self.position += displacement;
        true
    }

    /// Applies an accumulated pointer delta. Returns whether the rotation changed.
    ///
    /// Horizontal motion yaws, vertical motion pitches. Pitch is clamped to
    /// [-π/2, π/2], then every component is wrapped into [-π, π].
    pub fn rotate(&mut self, mouse_delta: Vec2, speed: f32) -> bool {
        if mouse_delta == Vec2::ZERO {
            return false;
        }

        self.rotation.y += speed * mouse_delta.x;
        self.rotation.x = (self.rotation.x + speed * mouse_delta.y).clamp(-FRAC_PI_2, FRAC_PI_2);

        self.rotation = Vec3::new(
            wrap_angle(self.rotation.x),
            wrap_angle(self.rotation.y),
            wrap_angle(self.rotation.z),
        );
        true
    }

    /// World-to-camera matrix: inverse of rotate-then-translate.
    pub fn view_matrix(&self) -> Mat4 {
        (Mat4::from_translation(self.position) * Mat4::from_quat(self.orientation())).inverse()
    }
}

#[inline]
pub(crate) fn euler_to_quat(rotation: Vec3) -> Quat {
    Quat::from_euler(EulerRot::YXZ, rotation.y, rotation.x, rotation.z)
}

/// Wraps an angle into [-π, π].
#[inline]
pub fn wrap_angle(a: f32) -> f32 {
    a - TAU * (a / TAU).round()
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use super::*;

    fn pose() -> CameraPose {
        CameraPose { position: Vec3::new(0.0, 0.0, -3.0), rotation: Vec3::ZERO }
    }

    fn keys(forward: bool, back: bool, left: bool, right: bool) -> DirectionalInput {
        DirectionalInput { forward, back, left, right }
    }

    // ── translate ─────────────────────────────────────────────────────────

    #[test]
    fn forward_moves_along_plus_z() {
        let mut p = pose();
        assert!(p.translate(keys(true, false, false, false), 1.0, 0.5));
        assert!(p.position.abs_diff_eq(Vec3::new(0.0, 0.0, -2.5), 1e-6));
    }

    #[test]
    fn opposite_keys_cancel_exactly() {
        let start = CameraPose {
            position: Vec3::new(0.3, -1.7, 4.1),
            rotation: Vec3::new(0.4, -2.2, 0.0),
        };
        for k in [keys(true, true, false, false), keys(false, false, true, true), keys(true, true, true, true)] {
            let mut p = start;
            p.translate(k, 1.0, 0.016);
            assert_eq!(p.position, start.position);
        }
    }

    #[test]
    fn diagonal_is_not_normalized() {
        let mut p = pose();
        p.translate(keys(true, false, false, true), 1.0, 1.0);
        let moved = p.position - pose().position;
        assert!((moved.length() - 2.0f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn movement_follows_yaw() {
        let mut p = CameraPose { position: Vec3::ZERO, rotation: Vec3::new(0.0, FRAC_PI_2, 0.0) };
        p.translate(keys(true, false, false, false), 2.0, 1.0);
        // Yawing +90° turns forward (+Z) toward +X.
        assert!(p.position.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn no_keys_reports_no_change() {
        let mut p = pose();
        assert!(!p.translate(DirectionalInput::default(), 1.0, 1.0));
        assert_eq!(p, pose());
    }

    // ── rotate ────────────────────────────────────────────────────────────

    #[test]
    fn pitch_never_exceeds_half_pi() {
        let mut p = pose();
        for _ in 0..200 {
            p.rotate(Vec2::new(0.0, 250.0), 0.005);
            assert!(p.rotation.x <= FRAC_PI_2);
        }
        assert_eq!(p.rotation.x, FRAC_PI_2);
        for _ in 0..400 {
            p.rotate(Vec2::new(3.0, -250.0), 0.005);
            assert!(p.rotation.x >= -FRAC_PI_2);
        }
        assert_eq!(p.rotation.x, -FRAC_PI_2);
    }

    #[test]
    fn yaw_wraps_into_canonical_range() {
        let mut p = pose();
        for _ in 0..1000 {
            p.rotate(Vec2::new(97.0, 0.0), 0.005);
            assert!(p.rotation.y >= -PI && p.rotation.y <= PI);
        }
    }

    #[test]
    fn zero_delta_is_not_a_change() {
        let mut p = pose();
        assert!(!p.rotate(Vec2::ZERO, 0.005));
    }

    // ── view ──────────────────────────────────────────────────────────────

    #[test]
    fn view_at_origin_is_identity() {
        let p = CameraPose { position: Vec3::ZERO, rotation: Vec3::ZERO };
        assert!(p.view_matrix().abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn view_moves_camera_to_origin() {
        let p = CameraPose { position: Vec3::new(1.0, 2.0, -3.0), rotation: Vec3::new(0.3, 1.1, 0.0) };
        let eye = p.view_matrix().transform_point3(p.position);
        assert!(eye.abs_diff_eq(Vec3::ZERO, 1e-5));
    }

    #[test]
    fn wrap_angle_examples() {
        assert!((wrap_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
        assert!((wrap_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-5);
        assert_eq!(wrap_angle(1.0), 1.0);
    }
}
