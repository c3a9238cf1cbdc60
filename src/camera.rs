use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};

/// What the camera faces: a fixed point in the world, or a direction.
///
/// Both variants carry one vector; the tag decides how the view matrix is
/// built from it. Rig transitions rewrap the stored vector under the other
/// tag rather than reinterpreting a shared field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LookTarget {
    /// Face a world-space point.
    At(Vec3),
    /// Face along a world-space direction vector.
    Along(Vec3),
}

impl LookTarget {
    /// Returns the stored vector regardless of variant.
    pub fn vector(self) -> Vec3 {
        match self {
            Self::At(v) | Self::Along(v) => v,
        }
    }

    /// Rewraps the stored vector as a look-at point.
    pub fn to_at(self) -> Self {
        Self::At(self.vector())
    }

    /// Rewraps the stored vector as a look direction.
    pub fn to_along(self) -> Self {
        Self::Along(self.vector())
    }

    /// Replaces the stored vector, keeping the variant.
    pub fn with_vector(self, vector: Vec3) -> Self {
        match self {
            Self::At(_) => Self::At(vector),
            Self::Along(_) => Self::Along(vector),
        }
    }
}

/// Left-handed perspective camera with eagerly derived matrices.
///
/// Every mutation recomputes both the view and projection so the stored
/// matrices are never stale. The vertical field of view is fixed at 90
/// degrees; aspect follows the viewport.
#[derive(Debug, Clone)]
pub struct Camera {
    eye: Vec3,
    look: LookTarget,
    up: Vec3,
    width: f32,
    height: f32,
    near: f32,
    far: f32,
    view: Mat4,
    projection: Mat4,
}

impl Camera {
    const FOV_Y: f32 = FRAC_PI_2;

    pub fn new(
        eye: Vec3,
        look: LookTarget,
        up: Vec3,
        width: f32,
        height: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let mut camera = Self {
            eye,
            look,
            up,
            width,
            height,
            near,
            far,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        };
        camera.refresh();
        camera
    }

    fn refresh(&mut self) {
        self.view = match self.look {
            LookTarget::At(at) => Mat4::look_at_lh(self.eye, at, self.up),
            LookTarget::Along(dir) => Mat4::look_to_lh(self.eye, dir, self.up),
        };
        self.projection =
            Mat4::perspective_lh(Self::FOV_Y, self.width / self.height, self.near, self.far);
    }

    pub fn set_eye(&mut self, eye: Vec3) {
        self.eye = eye;
        self.refresh();
    }

    pub fn set_look(&mut self, look: LookTarget) {
        self.look = look;
        self.refresh();
    }

    pub fn set_up(&mut self, up: Vec3) {
        self.up = up;
        self.refresh();
    }

    /// Replaces the look vector while keeping the current look mode.
    pub fn retarget(&mut self, vector: Vec3) {
        self.look = self.look.with_vector(vector);
        self.refresh();
    }

    /// Updates the viewport and depth range and recomputes the projection.
    pub fn reshape(&mut self, width: f32, height: f32, near: f32, far: f32) {
        self.width = width;
        self.height = height;
        self.near = near;
        self.far = far;
        self.refresh();
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn look(&self) -> LookTarget {
        self.look
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Camera {
        Camera::new(
            Vec3::new(0.0, 10.0, -10.0),
            LookTarget::At(Vec3::ZERO),
            Vec3::Y,
            640.0,
            480.0,
            0.01,
            100.0,
        )
    }

    #[test]
    fn view_matches_look_at() {
        let camera = sample();
        let expected = Mat4::look_at_lh(Vec3::new(0.0, 10.0, -10.0), Vec3::ZERO, Vec3::Y);
        assert_eq!(camera.view(), expected);
    }

    #[test]
    fn projection_is_fixed_fov_perspective() {
        let camera = sample();
        let expected = Mat4::perspective_lh(FRAC_PI_2, 640.0 / 480.0, 0.01, 100.0);
        assert_eq!(camera.projection(), expected);
    }

    #[test]
    fn direction_mode_uses_look_to() {
        let mut camera = sample();
        camera.set_look(LookTarget::Along(Vec3::new(0.0, 0.0, 100.0)));
        let expected = Mat4::look_to_lh(
            Vec3::new(0.0, 10.0, -10.0),
            Vec3::new(0.0, 0.0, 100.0),
            Vec3::Y,
        );
        assert_eq!(camera.view(), expected);
    }

    #[test]
    fn setters_recompute_the_view() {
        let mut camera = sample();
        let before = camera.view();
        camera.set_eye(Vec3::new(5.0, 10.0, -10.0));
        assert_ne!(camera.view(), before);
    }

    #[test]
    fn resetting_the_same_value_is_bit_identical() {
        let mut camera = sample();
        let view = camera.view().to_cols_array();
        let projection = camera.projection().to_cols_array();
        camera.set_eye(camera.eye());
        camera.set_look(camera.look());
        camera.set_up(camera.up());
        assert_eq!(camera.view().to_cols_array(), view);
        assert_eq!(camera.projection().to_cols_array(), projection);
    }

    #[test]
    fn reshape_recomputes_projection_immediately() {
        let mut camera = sample();
        camera.reshape(1280.0, 720.0, 0.5, 200.0);
        let expected = Mat4::perspective_lh(FRAC_PI_2, 1280.0 / 720.0, 0.5, 200.0);
        assert_eq!(camera.projection(), expected);
    }

    #[test]
    fn retarget_keeps_the_look_mode() {
        let mut camera = sample();
        camera.set_look(LookTarget::Along(Vec3::Z));
        camera.retarget(Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(camera.look(), LookTarget::Along(Vec3::new(1.0, 0.0, 1.0)));

        camera.set_look(camera.look().to_at());
        camera.retarget(Vec3::new(2.0, 0.0, 2.0));
        assert_eq!(camera.look(), LookTarget::At(Vec3::new(2.0, 0.0, 2.0)));
    }
}
