use std::cmp::Ordering;

use glam::{Mat4, Vec3};

use crate::camera::{Camera, LookTarget};
use crate::config::SceneLayout;
use crate::input::{InputState, KeyCode};

/// Near plane shared by every camera in the rig.
const NEAR_PLANE: f32 = 0.01;
/// Far plane shared by every camera in the rig.
const FAR_PLANE: f32 = 100.0;

/// World units the movement keys cover per frame.
const MOVE_STEP: f32 = 0.005;
/// Speed gained per frame while shift boosts a movement key.
const TURBO_ACCEL: f32 = 0.000_01;
/// Speed shed per frame, per axis, once the boost is released.
const SPEED_DECAY: f32 = 0.000_001;
/// Distance the cursor-derived look vector is pushed out to.
const LOOK_DISTANCE: f32 = 100.0;
/// Cursor x mapping to zero steering angle.
const STEER_ORIGIN_X: f32 = 500.0;
/// Cursor pixels per radian of steering.
const STEER_SCALE: f32 = 100.0;
/// Pitch at cursor y = 0, in radians.
const STEER_PITCH_BASE: f32 = 10.0;
/// Where the car respawns on reset.
const CAR_SPAWN: Vec3 = Vec3::new(0.0, 10.0, 0.0);
/// Uniform scale applied to the car model.
const CAR_SCALE: f32 = 0.05;
/// Eye heights above the car for the person cameras.
const FIRST_PERSON_RIDE_HEIGHT: f32 = 3.0;
const THIRD_PERSON_RIDE_HEIGHT: f32 = 7.0;

/// Geometry an instance draws; the renderer resolves this to GPU buffers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MeshSource {
    Cube,
    Pyramid,
    Floor,
    Obj(String),
}

/// Pass an instance renders in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendMode {
    Opaque,
    Transparent,
}

/// Rasterizer fill, toggled at runtime and applied scene-wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillMode {
    #[default]
    Solid,
    Wireframe,
}

/// One stage of an animation track. Spin rates are radians per second of
/// scene time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackStep {
    Scale(Vec3),
    SpinX(f32),
    SpinY(f32),
    SpinZ(f32),
    Offset(Vec3),
}

impl TrackStep {
    fn matrix(self, t: f32) -> Mat4 {
        match self {
            TrackStep::Scale(factor) => Mat4::from_scale(factor),
            TrackStep::SpinX(rate) => Mat4::from_rotation_x(rate * t),
            TrackStep::SpinY(rate) => Mat4::from_rotation_y(rate * t),
            TrackStep::SpinZ(rate) => Mat4::from_rotation_z(rate * t),
            TrackStep::Offset(offset) => Mat4::from_translation(offset),
        }
    }
}

/// How an instance obtains its world transform each frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Track {
    /// Fixed pipeline of steps; the first listed step applies to the mesh
    /// first.
    Steps(Vec<TrackStep>),
    /// Follows the drivable car instead of the clock.
    Drive,
}

fn evaluate_steps(steps: &[TrackStep], t: f32) -> Mat4 {
    steps
        .iter()
        .fold(Mat4::IDENTITY, |world, step| step.matrix(t) * world)
}

/// A drawable object plus its current world transform.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneInstance {
    pub name: &'static str,
    pub mesh: MeshSource,
    pub blend: BlendMode,
    pub track: Track,
    pub world: Mat4,
}

/// Mutable state of the drivable car.
///
/// `speed` is carried velocity from the boost keys; `step` is the fixed
/// per-frame nudge of the plain movement keys.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveState {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub speed: Vec3,
    pub step: f32,
}

impl DriveState {
    fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            speed: Vec3::ZERO,
            step: MOVE_STEP,
        }
    }
}

/// The four fixed viewpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraId {
    Static,
    TopDown,
    FirstPerson,
    ThirdPerson,
}

const CAMERA_COUNT: usize = 4;

impl CameraId {
    fn index(self) -> usize {
        match self {
            CameraId::Static => 0,
            CameraId::TopDown => 1,
            CameraId::FirstPerson => 2,
            CameraId::ThirdPerson => 3,
        }
    }

    /// Person cameras look along a direction, the overview cameras at a
    /// point.
    fn prefers_direction(self) -> bool {
        matches!(self, CameraId::FirstPerson | CameraId::ThirdPerson)
    }
}

/// The whole simulated world: instances, the camera rig and the car.
#[derive(Debug)]
pub struct Scene {
    pub instances: Vec<SceneInstance>,
    pub drive: DriveState,
    pub fill: FillMode,
    cameras: [Camera; CAMERA_COUNT],
    active: CameraId,
}

impl Scene {
    pub fn new(layout: &SceneLayout, width: f32, height: f32) -> Self {
        Self {
            instances: build_instances(layout),
            drive: DriveState::new(layout.car),
            fill: FillMode::default(),
            cameras: camera_rig(width, height),
            active: CameraId::Static,
        }
    }

    pub fn active_id(&self) -> CameraId {
        self.active
    }

    pub fn active_camera(&self) -> &Camera {
        &self.cameras[self.active.index()]
    }

    pub fn camera(&self, id: CameraId) -> &Camera {
        &self.cameras[id.index()]
    }

    /// Makes `id` the active camera.
    ///
    /// The camera being left is dropped back to look-at mode so its last
    /// steering vector freezes into a fixed target; the incoming camera
    /// adopts the mode its role calls for.
    pub fn select(&mut self, id: CameraId) {
        let outgoing = &mut self.cameras[self.active.index()];
        outgoing.set_look(outgoing.look().to_at());

        let incoming = &mut self.cameras[id.index()];
        let look = if id.prefers_direction() {
            incoming.look().to_along()
        } else {
            incoming.look().to_at()
        };
        incoming.set_look(look);
        self.active = id;
    }

    /// Propagates a viewport change to every camera in the rig.
    pub fn reshape(&mut self, width: f32, height: f32) {
        for camera in &mut self.cameras {
            camera.reshape(width, height, NEAR_PLANE, FAR_PLANE);
        }
    }

    /// Advances the world by one frame.
    ///
    /// `t` is total scene time in seconds. Ordering matters: transforms
    /// animate from last frame's car state, the person eyes re-pin to the
    /// car, and only then does input steer and move it.
    pub fn update(&mut self, t: f32, input: &InputState) {
        self.animate(t);
        self.pin_person_eyes();

        if self.person_mode() {
            self.drive_movement(input);
            self.drive_acceleration(input);
            self.steer_with_cursor(input);
            if input.is_key_down(KeyCode::Character('R')) {
                self.reset_drive();
            }
            self.apply_speed();
        }

        if input.is_key_down(KeyCode::Character('K')) {
            self.fill = FillMode::Wireframe;
        }
        if input.is_key_down(KeyCode::Character('L')) {
            self.fill = FillMode::Solid;
        }

        if input.is_key_down(KeyCode::Character('Z')) {
            self.select(CameraId::Static);
        }
        if input.is_key_down(KeyCode::Character('X')) {
            self.select(CameraId::TopDown);
        }
        if input.is_key_down(KeyCode::Character('V')) {
            self.select(CameraId::FirstPerson);
        }
        if input.is_key_down(KeyCode::Character('B')) {
            self.select(CameraId::ThirdPerson);
        }
    }

    /// Instances in draw order: opaque ones as declared, then transparent
    /// ones far-to-near in the active camera's view space.
    pub fn draw_list(&self) -> Vec<&SceneInstance> {
        let view = self.active_camera().view();
        let mut order: Vec<&SceneInstance> = self
            .instances
            .iter()
            .filter(|instance| instance.blend == BlendMode::Opaque)
            .collect();

        let mut transparent: Vec<(f32, &SceneInstance)> = self
            .instances
            .iter()
            .filter(|instance| instance.blend == BlendMode::Transparent)
            .map(|instance| (view_depth(view, instance.world), instance))
            .collect();
        transparent
            .sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        order.extend(transparent.into_iter().map(|(_, instance)| instance));
        order
    }

    fn person_mode(&self) -> bool {
        self.active.prefers_direction()
    }

    fn animate(&mut self, t: f32) {
        let car_world = Mat4::from_translation(self.drive.position)
            * Mat4::from_scale(Vec3::splat(CAR_SCALE))
            * Mat4::from_rotation_y(self.drive.yaw);
        for instance in &mut self.instances {
            instance.world = match &instance.track {
                Track::Steps(steps) => evaluate_steps(steps, t),
                Track::Drive => car_world,
            };
        }
    }

    fn pin_person_eyes(&mut self) {
        let car = self.drive.position;
        self.cameras[CameraId::FirstPerson.index()]
            .set_eye(car + Vec3::new(0.0, FIRST_PERSON_RIDE_HEIGHT, 0.0));
        self.cameras[CameraId::ThirdPerson.index()]
            .set_eye(car + Vec3::new(0.0, THIRD_PERSON_RIDE_HEIGHT, 0.0));
    }

    /// Plain movement: eyes slide on world axes while the car itself takes
    /// a yaw-rotated step, so the heading decides where it actually goes.
    fn drive_movement(&mut self, input: &InputState) {
        let step = self.drive.step;
        let (sin, cos) = self.drive.yaw.sin_cos();

        if input.is_key_down(KeyCode::Character('D')) {
            self.nudge_person_eyes(Vec3::new(step, 0.0, 0.0));
            self.drive.position.x += step * cos;
            self.drive.position.z -= step * sin;
        }
        if input.is_key_down(KeyCode::Character('A')) {
            self.nudge_person_eyes(Vec3::new(-step, 0.0, 0.0));
            self.drive.position.x -= step * cos;
            self.drive.position.z += step * sin;
        }
        if input.is_key_down(KeyCode::Character('Q')) {
            self.nudge_person_eyes(Vec3::new(0.0, step, 0.0));
            self.drive.position.y += step;
        }
        if input.is_key_down(KeyCode::Character('E')) {
            self.nudge_person_eyes(Vec3::new(0.0, -step, 0.0));
            self.drive.position.y -= step;
        }
        if input.is_key_down(KeyCode::Character('W')) {
            self.nudge_person_eyes(Vec3::new(0.0, 0.0, step));
            self.drive.position.z += step * cos;
            self.drive.position.x += step * sin;
        }
        if input.is_key_down(KeyCode::Character('S')) {
            self.nudge_person_eyes(Vec3::new(0.0, 0.0, -step));
            self.drive.position.z -= step * cos;
            self.drive.position.x -= step * sin;
        }
    }

    /// Shift turns movement keys into accelerators; without it the carried
    /// speed bleeds off toward zero, never crossing it.
    fn drive_acceleration(&mut self, input: &InputState) {
        if input.shift_down() {
            let (sin, cos) = self.drive.yaw.sin_cos();
            if input.is_key_down(KeyCode::Character('W')) {
                self.drive.speed.z += TURBO_ACCEL * cos;
                self.drive.speed.x += TURBO_ACCEL * sin;
            } else if input.is_key_down(KeyCode::Character('S')) {
                self.drive.speed.z -= TURBO_ACCEL * cos;
                self.drive.speed.x -= TURBO_ACCEL * sin;
            }
            if input.is_key_down(KeyCode::Character('A')) {
                self.drive.speed.x -= TURBO_ACCEL * cos;
                self.drive.speed.z += TURBO_ACCEL * sin;
            } else if input.is_key_down(KeyCode::Character('D')) {
                self.drive.speed.x += TURBO_ACCEL * cos;
                self.drive.speed.z -= TURBO_ACCEL * sin;
            }
            if input.is_key_down(KeyCode::Character('Q')) {
                self.drive.speed.y += TURBO_ACCEL;
            } else if input.is_key_down(KeyCode::Character('E')) {
                self.drive.speed.y -= TURBO_ACCEL;
            }
        } else {
            self.drive.speed.x = decay_toward_zero(self.drive.speed.x);
            self.drive.speed.y = decay_toward_zero(self.drive.speed.y);
            self.drive.speed.z = decay_toward_zero(self.drive.speed.z);
        }
    }

    /// Maps the cursor to heading and pitch and points the active camera's
    /// look vector there.
    fn steer_with_cursor(&mut self, input: &InputState) {
        let Some(cursor) = input.cursor_position() else {
            return;
        };
        self.drive.yaw = (cursor.x - STEER_ORIGIN_X) / STEER_SCALE;
        self.drive.pitch = STEER_PITCH_BASE - cursor.y / STEER_SCALE;

        let look = Vec3::new(
            self.drive.yaw.sin() * LOOK_DISTANCE,
            self.drive.pitch.sin() * LOOK_DISTANCE,
            self.drive.yaw.cos() * LOOK_DISTANCE,
        );
        self.cameras[self.active.index()].retarget(look);
    }

    fn reset_drive(&mut self) {
        self.drive.speed = Vec3::ZERO;
        self.drive.position = CAR_SPAWN;
        self.drive.yaw = 0.0;
        self.drive.pitch = 0.0;
    }

    fn apply_speed(&mut self) {
        let speed = self.drive.speed;
        self.nudge_person_eyes(speed);
        self.drive.position += speed;
    }

    fn nudge_person_eyes(&mut self, delta: Vec3) {
        for id in [CameraId::FirstPerson, CameraId::ThirdPerson] {
            let camera = &mut self.cameras[id.index()];
            let eye = camera.eye() + delta;
            camera.set_eye(eye);
        }
    }
}

fn decay_toward_zero(value: f32) -> f32 {
    if value.abs() <= SPEED_DECAY {
        0.0
    } else {
        value - value.signum() * SPEED_DECAY
    }
}

/// Depth of a transform's origin in view space; larger is farther in a
/// left-handed view.
fn view_depth(view: Mat4, world: Mat4) -> f32 {
    (view * world).transform_point3(Vec3::ZERO).z
}

fn camera_rig(width: f32, height: f32) -> [Camera; CAMERA_COUNT] {
    let up = Vec3::Y;
    [
        Camera::new(
            Vec3::new(0.0, 10.0, -10.0),
            LookTarget::At(Vec3::ZERO),
            up,
            width,
            height,
            NEAR_PLANE,
            FAR_PLANE,
        ),
        // nudged off the y axis so the up vector stays usable
        Camera::new(
            Vec3::new(0.1, 20.0, 0.1),
            LookTarget::At(Vec3::ZERO),
            up,
            width,
            height,
            NEAR_PLANE,
            FAR_PLANE,
        ),
        // person cameras start in look-at mode like the rest; selecting
        // them rewraps the vector as a direction
        Camera::new(
            Vec3::new(0.0, 13.0, 0.0),
            LookTarget::At(Vec3::new(0.0, 0.0, 100.0)),
            up,
            width,
            height,
            NEAR_PLANE,
            FAR_PLANE,
        ),
        Camera::new(
            Vec3::new(0.0, 15.0, -5.0),
            LookTarget::At(Vec3::new(0.0, -10.0, 100.0)),
            up,
            width,
            height,
            NEAR_PLANE,
            FAR_PLANE,
        ),
    ]
}

fn build_instances(layout: &SceneLayout) -> Vec<SceneInstance> {
    use TrackStep::{Offset, Scale, SpinX, SpinY, SpinZ};

    let fixed = |name, mesh, blend, steps: Vec<TrackStep>| SceneInstance {
        name,
        mesh,
        blend,
        track: Track::Steps(steps),
        world: Mat4::IDENTITY,
    };

    vec![
        fixed(
            "sun",
            MeshSource::Pyramid,
            BlendMode::Opaque,
            vec![
                Scale(Vec3::splat(2.0)),
                SpinY(0.1),
                SpinX(0.1),
                Offset(layout.sun),
            ],
        ),
        fixed(
            "planet1",
            MeshSource::Pyramid,
            BlendMode::Opaque,
            vec![SpinY(0.3), Offset(layout.planet1), SpinY(1.0)],
        ),
        fixed(
            "planet2",
            MeshSource::Pyramid,
            BlendMode::Transparent,
            vec![SpinY(0.7), Offset(layout.planet2), SpinY(0.3)],
        ),
        fixed(
            "moon1",
            MeshSource::Cube,
            BlendMode::Transparent,
            vec![
                SpinZ(5.0),
                Scale(Vec3::splat(0.2)),
                Offset(Vec3::new(2.0, 0.0, 0.0)),
                SpinY(1.0),
                Offset(layout.moon1),
                SpinY(1.0),
            ],
        ),
        fixed(
            "moon2",
            MeshSource::Cube,
            BlendMode::Transparent,
            vec![
                Scale(Vec3::splat(0.15)),
                Offset(Vec3::new(1.5, 0.0, 0.0)),
                SpinY(0.8),
                Offset(layout.moon2),
                SpinY(0.3),
            ],
        ),
        fixed(
            "floor",
            MeshSource::Floor,
            BlendMode::Transparent,
            vec![Offset(layout.floor)],
        ),
        fixed(
            "sphere",
            MeshSource::Obj("star.obj".to_string()),
            BlendMode::Transparent,
            vec![Offset(layout.sphere)],
        ),
        SceneInstance {
            name: "car",
            mesh: MeshSource::Obj("car.obj".to_string()),
            blend: BlendMode::Opaque,
            track: Track::Drive,
            world: Mat4::IDENTITY,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn test_scene() -> Scene {
        Scene::new(&SceneLayout::default(), 640.0, 480.0)
    }

    fn press(input: &InputState, keys: &[char]) {
        for &key in keys {
            input.set_key_down(KeyCode::Character(key));
        }
    }

    #[test]
    fn tracks_compose_in_listed_order() {
        let steps = [
            TrackStep::SpinY(0.3),
            TrackStep::Offset(Vec3::new(4.0, 0.0, 0.0)),
            TrackStep::SpinY(1.0),
        ];
        let t = 2.0;
        let expected = Mat4::from_rotation_y(t)
            * Mat4::from_translation(Vec3::new(4.0, 0.0, 0.0))
            * Mat4::from_rotation_y(0.3 * t);
        assert!(evaluate_steps(&steps, t).abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn car_world_follows_drive_state() {
        let mut scene = test_scene();
        scene.drive.position = Vec3::new(3.0, 10.0, -2.0);
        scene.drive.yaw = 0.5;
        scene.update(0.0, &InputState::new());
        let car = scene
            .instances
            .iter()
            .find(|instance| instance.name == "car")
            .unwrap();
        let expected = Mat4::from_translation(Vec3::new(3.0, 10.0, -2.0))
            * Mat4::from_scale(Vec3::splat(CAR_SCALE))
            * Mat4::from_rotation_y(0.5);
        assert!(car.world.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn person_eyes_pin_to_the_car() {
        let mut scene = test_scene();
        scene.drive.position = Vec3::new(4.0, 0.0, 9.0);
        scene.update(0.0, &InputState::new());
        assert_eq!(
            scene.camera(CameraId::FirstPerson).eye(),
            Vec3::new(4.0, 3.0, 9.0)
        );
        assert_eq!(
            scene.camera(CameraId::ThirdPerson).eye(),
            Vec3::new(4.0, 7.0, 9.0)
        );
    }

    #[test]
    fn movement_requires_a_person_camera() {
        let mut scene = test_scene();
        let input = InputState::new();
        press(&input, &['W']);
        let before = scene.drive.position;
        scene.update(0.0, &input);
        assert_eq!(scene.drive.position, before);
    }

    #[test]
    fn forward_step_follows_the_heading() {
        let mut scene = test_scene();
        scene.select(CameraId::FirstPerson);
        scene.drive.yaw = 1.0;
        let input = InputState::new();
        press(&input, &['W']);
        let before = scene.drive.position;
        scene.update(0.0, &input);
        let moved = scene.drive.position - before;
        assert!((moved.z - MOVE_STEP * 1.0f32.cos()).abs() < 1e-6);
        assert!((moved.x - MOVE_STEP * 1.0f32.sin()).abs() < 1e-6);
        assert_eq!(moved.y, 0.0);
    }

    #[test]
    fn strafe_nudges_eyes_on_the_world_axis() {
        let mut scene = test_scene();
        scene.select(CameraId::FirstPerson);
        scene.drive.yaw = 1.0;
        let input = InputState::new();
        press(&input, &['D']);
        scene.update(0.0, &input);
        // eyes re-pin to the car first, then take the raw step on x
        let car = scene.drive.position
            - Vec3::new(
                MOVE_STEP * 1.0f32.cos(),
                0.0,
                -MOVE_STEP * 1.0f32.sin(),
            );
        assert_eq!(
            scene.camera(CameraId::FirstPerson).eye(),
            car + Vec3::new(MOVE_STEP, 3.0, 0.0)
        );
        assert_eq!(
            scene.camera(CameraId::ThirdPerson).eye(),
            car + Vec3::new(MOVE_STEP, 7.0, 0.0)
        );
    }

    #[test]
    fn boost_accumulates_and_decay_stops_at_zero() {
        let mut scene = test_scene();
        scene.select(CameraId::FirstPerson);
        let input = InputState::new();
        press(&input, &['Q']);
        input.set_key_down(KeyCode::Named(crate::input::NamedKey::LeftShift));
        scene.update(0.0, &input);
        scene.update(0.0, &input);
        assert!((scene.drive.speed.y - 2.0 * TURBO_ACCEL).abs() < 1e-9);

        input.set_key_up(KeyCode::Named(crate::input::NamedKey::LeftShift));
        input.set_key_up(KeyCode::Character('Q'));
        let mut last = scene.drive.speed.y;
        for _ in 0..100 {
            scene.update(0.0, &input);
            let current = scene.drive.speed.y;
            assert!(current <= last);
            assert!(current >= 0.0);
            last = current;
        }
        assert_eq!(scene.drive.speed.y, 0.0);
    }

    #[test]
    fn cursor_steers_heading_and_look() {
        let mut scene = test_scene();
        scene.select(CameraId::FirstPerson);
        let input = InputState::new();
        input.set_cursor_position(Vec2::new(600.0, 1000.0));
        scene.update(0.0, &input);
        assert!((scene.drive.yaw - 1.0).abs() < 1e-6);
        assert!(scene.drive.pitch.abs() < 1e-6);
        let look = scene.camera(CameraId::FirstPerson).look();
        assert!(matches!(look, LookTarget::Along(_)));
        let vector = look.vector();
        assert!((vector.x - 1.0f32.sin() * 100.0).abs() < 1e-4);
        assert!(vector.y.abs() < 1e-4);
        assert!((vector.z - 1.0f32.cos() * 100.0).abs() < 1e-4);
    }

    #[test]
    fn reset_restores_spawn_state() {
        let mut scene = test_scene();
        scene.select(CameraId::ThirdPerson);
        scene.drive.position = Vec3::new(5.0, 3.0, 2.0);
        scene.drive.speed = Vec3::new(0.1, 0.2, 0.3);
        scene.drive.yaw = 1.5;
        let input = InputState::new();
        press(&input, &['R']);
        scene.update(0.0, &input);
        assert_eq!(scene.drive.speed, Vec3::ZERO);
        assert_eq!(scene.drive.position, CAR_SPAWN);
        assert_eq!(scene.drive.yaw, 0.0);
        assert_eq!(scene.drive.pitch, 0.0);
    }

    #[test]
    fn switching_cameras_freezes_the_old_target() {
        let mut scene = test_scene();
        let input = InputState::new();
        press(&input, &['V']);
        scene.update(0.0, &input);
        assert_eq!(scene.active_id(), CameraId::FirstPerson);
        assert!(matches!(
            scene.camera(CameraId::FirstPerson).look(),
            LookTarget::Along(_)
        ));

        scene.select(CameraId::Static);
        assert!(matches!(
            scene.camera(CameraId::FirstPerson).look(),
            LookTarget::At(_)
        ));
        scene.select(CameraId::FirstPerson);
        assert!(matches!(
            scene.camera(CameraId::FirstPerson).look(),
            LookTarget::Along(_)
        ));
    }

    #[test]
    fn fill_keys_toggle_wireframe() {
        let mut scene = test_scene();
        let input = InputState::new();
        press(&input, &['K']);
        scene.update(0.0, &input);
        assert_eq!(scene.fill, FillMode::Wireframe);
        input.set_key_up(KeyCode::Character('K'));
        press(&input, &['L']);
        scene.update(0.0, &input);
        assert_eq!(scene.fill, FillMode::Solid);
    }

    #[test]
    fn draw_list_sorts_transparent_far_to_near() {
        let mut scene = test_scene();
        scene.update(1.0, &InputState::new());
        let order = scene.draw_list();
        assert_eq!(order.len(), scene.instances.len());

        let first_transparent = order
            .iter()
            .position(|instance| instance.blend == BlendMode::Transparent)
            .unwrap();
        assert!(order[..first_transparent]
            .iter()
            .all(|instance| instance.blend == BlendMode::Opaque));
        assert!(order[first_transparent..]
            .iter()
            .all(|instance| instance.blend == BlendMode::Transparent));

        let view = scene.active_camera().view();
        let depths: Vec<f32> = order[first_transparent..]
            .iter()
            .map(|instance| view_depth(view, instance.world))
            .collect();
        assert!(depths.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn opaque_order_is_declaration_order() {
        let mut scene = test_scene();
        scene.update(0.5, &InputState::new());
        let order = scene.draw_list();
        let opaque: Vec<&str> = order
            .iter()
            .filter(|instance| instance.blend == BlendMode::Opaque)
            .map(|instance| instance.name)
            .collect();
        assert_eq!(opaque, vec!["sun", "planet1", "car"]);
    }
}
