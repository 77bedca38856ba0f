use glam::{Mat4, Vec2, Vec3};

use crate::frame::WvpConstants;

use super::camera::{euler_to_quat, CameraPose, DirectionalInput};

/// Fixed parameters of the transform pipeline.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TransformConfig {
    pub world_scale: Vec3,
    pub world_position: Vec3,
    pub world_rotation: Vec3,

    pub camera_position: Vec3,
    pub camera_rotation: Vec3,

    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,

    /// World units per second per held direction.
    pub movement_speed: f32,
    /// Radians per pointer pixel.
    pub rotation_speed: f32,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            world_scale: Vec3::ONE,
            world_position: Vec3::ZERO,
            world_rotation: Vec3::ZERO,
            camera_position: Vec3::new(0.0, 0.0, -3.0),
            camera_rotation: Vec3::ZERO,
            fov_y_degrees: 60.0,
            near: 0.01,
            far: 1000.0,
            movement_speed: 1.0,
            rotation_speed: 0.005,
        }
    }
}

/// Per-tick input to the transform pipeline.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct TransformInput {
    pub keys: DirectionalInput,
    /// Pointer movement accumulated while the rotation modifier was held.
    pub mouse_delta: Vec2,
}

/// World/view/projection matrices and the camera that drives them.
///
/// The world matrix is fixed at construction; only the camera moves. View and
/// WVP are recomputed only on ticks where the camera changed.
#[derive(Debug, Clone)]
pub struct TransformState {
    config: TransformConfig,
    camera: CameraPose,
    aspect: f32,

    world: Mat4,
    view: Mat4,
    projection: Mat4,
    wvp: WvpConstants,
}

impl TransformState {
    pub fn new(config: TransformConfig, width: u32, height: u32) -> Self {
        let world = Mat4::from_quat(euler_to_quat(config.world_rotation))
            * Mat4::from_translation(config.world_position)
            * Mat4::from_scale(config.world_scale);

        let camera = CameraPose {
            position: config.camera_position,
            rotation: config.camera_rotation,
        };

        let aspect = aspect_ratio(width, height).unwrap_or(1.0);

        let mut state = Self {
            config,
            camera,
            aspect,
            world,
            view: camera.view_matrix(),
            projection: Mat4::IDENTITY,
            wvp: WvpConstants::default(),
        };
        state.rebuild_projection();
        state.rebuild_wvp();
        state
    }

    /// Advances the camera by one tick. Returns whether the view changed.
    pub fn update(&mut self, dt: f32, input: &TransformInput) -> bool {
        let moved = self
            .camera
            .translate(input.keys, self.config.movement_speed, dt);
        let turned = self
            .camera
            .rotate(input.mouse_delta, self.config.rotation_speed);

        let changed = moved || turned;
        if changed {
            self.view = self.camera.view_matrix();
            self.rebuild_wvp();
        }
        changed
    }

    /// Rebuilds the projection for a new drawable size. Zero-sized targets are ignored.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        let Some(aspect) = aspect_ratio(width, height) else { return };
        if aspect == self.aspect {
            return;
        }
        self.aspect = aspect;
        self.rebuild_projection();
        self.rebuild_wvp();
    }

    #[inline]
    pub fn camera(&self) -> &CameraPose {
        &self.camera
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    #[inline]
    pub fn world(&self) -> Mat4 {
        self.world
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        self.view
    }

    #[inline]
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// WVP in upload layout.
    #[inline]
    pub fn wvp(&self) -> WvpConstants {
        self.wvp
    }

    fn rebuild_projection(&mut self) {
        self.projection = Mat4::perspective_lh(
            self.config.fov_y_degrees.to_radians(),
            self.aspect,
            self.config.near,
            self.config.far,
        );
    }

    fn rebuild_wvp(&mut self) {
        // Column-vector form of world × view × projection.
        let wvp = self.projection * self.view * self.world;
        self.wvp = WvpConstants::from_matrix(&wvp);
    }
}

fn aspect_ratio(width: u32, height: u32) -> Option<f32> {
    (width > 0 && height > 0).then(|| width as f32 / height as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_origin() -> TransformConfig {
        TransformConfig { camera_position: Vec3::ZERO, ..Default::default() }
    }

    fn held(forward: bool, back: bool) -> TransformInput {
        TransformInput {
            keys: DirectionalInput { forward, back, ..Default::default() },
            mouse_delta: Vec2::ZERO,
        }
    }

    // ── wvp ───────────────────────────────────────────────────────────────

    #[test]
    fn origin_camera_yields_projection_only() {
        let t = TransformState::new(at_origin(), 800, 600);
        assert!(t.view().abs_diff_eq(Mat4::IDENTITY, 1e-6));
        assert!(t.world().abs_diff_eq(Mat4::IDENTITY, 1e-6));

        let wvp = t.wvp();
        let proj = t.projection();
        for c in 0..4 {
            for r in 0..4 {
                // Uploaded rows are the projection's columns.
                assert!((wvp.matrix[c][r] - proj.col(c)[r]).abs() < 1e-6);
                assert!((wvp.matrix[c][r] - proj.transpose().row(c)[r]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn default_camera_sees_cube_in_front() {
        let t = TransformState::new(TransformConfig::default(), 800, 600);
        let clip = t.wvp().to_matrix() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn projection_uses_sixty_degree_fov() {
        let t = TransformState::new(at_origin(), 800, 600);
        let expected_y = 1.0 / (30.0f32.to_radians()).tan();
        assert!((t.projection().col(1)[1] - expected_y).abs() < 1e-5);
        assert!((t.projection().col(0)[0] - expected_y / (800.0 / 600.0)).abs() < 1e-5);
    }

    // ── update ────────────────────────────────────────────────────────────

    #[test]
    fn idle_tick_reports_unchanged() {
        let mut t = TransformState::new(TransformConfig::default(), 800, 600);
        let before = t.wvp();
        assert!(!t.update(0.016, &TransformInput::default()));
        assert_eq!(t.wvp(), before);
    }

    #[test]
    fn forward_and_back_leave_position_unchanged() {
        let mut t = TransformState::new(TransformConfig::default(), 800, 600);
        let before = t.camera().position;
        t.update(0.016, &held(true, true));
        assert_eq!(t.camera().position, before);
    }

    #[test]
    fn moving_forward_changes_wvp() {
        let mut t = TransformState::new(TransformConfig::default(), 800, 600);
        let before = t.wvp();
        assert!(t.update(0.5, &held(true, false)));
        assert!((t.camera().position.z + 2.5).abs() < 1e-6);
        assert_ne!(t.wvp(), before);
    }

    #[test]
    fn mouse_delta_turns_camera() {
        let mut t = TransformState::new(TransformConfig::default(), 800, 600);
        let input = TransformInput { mouse_delta: Vec2::new(100.0, -40.0), ..Default::default() };
        assert!(t.update(0.016, &input));
        assert!((t.camera().rotation.y - 0.5).abs() < 1e-6);
        assert!((t.camera().rotation.x + 0.2).abs() < 1e-6);
    }

    // ── aspect ────────────────────────────────────────────────────────────

    #[test]
    fn resize_rebuilds_projection() {
        let mut t = TransformState::new(TransformConfig::default(), 800, 600);
        let before = t.projection();
        t.set_aspect(1920, 1080);
        assert!((t.aspect() - 1920.0 / 1080.0).abs() < 1e-6);
        assert_ne!(t.projection(), before);
    }

    #[test]
    fn zero_height_is_ignored() {
        let mut t = TransformState::new(TransformConfig::default(), 800, 600);
        t.set_aspect(800, 0);
        assert!((t.aspect() - 800.0 / 600.0).abs() < 1e-6);
    }
}
