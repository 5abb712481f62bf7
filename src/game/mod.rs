pub mod input;
pub mod level;
pub mod ship;

use glam::Vec3;
use rand::Rng;

use crate::core::{CameraFrame, Scene, ShipPose, ViewBank, ViewId};
use crate::util::normalize_or;
use input::Action;
use level::{Level, LevelMeshes, PLANET_BODY, SHIP_BODY};
use ship::{Axis, Ship};

/// Length of the ship→planet guide line drawn as an overlay.
const GUIDE_LENGTH: f32 = 8.0;

/// All mutable game state, owned by the main loop. One `update` per
/// simulated tick: inputs have already mutated intents and the view
/// selector; motion integrates, the ship body is synced, and the camera is
/// recomputed from the result.
pub struct GameState {
    pub scene: Scene,
    pub ship: Ship,
    pub views: ViewBank,
    pub level: Level,
    pub level_counter: u32,
    pub elapsed: f32,
    meshes: LevelMeshes,
}

impl GameState {
    pub fn new(meshes: LevelMeshes, rng: &mut impl Rng) -> Self {
        let mut scene = Scene::new();
        let level = level::generate(&mut scene, &meshes, 1, rng);
        Self {
            scene,
            ship: Ship::new(),
            views: ViewBank::new(),
            level,
            level_counter: 1,
            elapsed: 0.0,
            meshes,
        }
    }

    /// Tear the level down and build the next one. Only safe between
    /// frames: the render pass must not be holding the draw store.
    pub fn advance_level(&mut self, rng: &mut impl Rng) {
        self.level_counter += 1;
        self.level = level::generate(&mut self.scene, &self.meshes, self.level_counter, rng);
        self.ship = Ship::new();
    }

    /// Ship reached the planet; the docking feature this feeds is not built
    /// yet, so for now it just rolls the level over.
    pub fn reached_planet(&self) -> bool {
        let planet = &self.scene.bodies[PLANET_BODY];
        crate::util::is_colliding(
            self.ship.pos,
            self.scene.bodies[SHIP_BODY].radius,
            planet.pos,
            planet.radius,
        )
    }

    /// Route one decoded action. Rotation/thrust intents follow press AND
    /// release; view switches fire on release only, so a held key cannot
    /// re-trigger the switch every repeat.
    pub fn apply_action(&mut self, action: Action, pressed: bool) {
        match action {
            Action::RollLeft => self.ship.set_rotation(Axis::Roll, -1, pressed),
            Action::RollRight => self.ship.set_rotation(Axis::Roll, 1, pressed),
            Action::PitchLeft => self.ship.set_rotation(Axis::Pitch, -1, pressed),
            Action::PitchRight => self.ship.set_rotation(Axis::Pitch, 1, pressed),
            Action::YawLeft => self.ship.set_rotation(Axis::Yaw, -1, pressed),
            Action::YawRight => self.ship.set_rotation(Axis::Yaw, 1, pressed),
            Action::RollCenter if pressed => self.ship.center_rotation(Axis::Roll),
            Action::PitchCenter if pressed => self.ship.center_rotation(Axis::Pitch),
            Action::YawCenter if pressed => self.ship.center_rotation(Axis::Yaw),
            Action::ThrustUp => self.ship.set_thrust(1, pressed),
            Action::ThrustDown => self.ship.set_thrust(-1, pressed),
            Action::ThrustCenter => self.ship.set_braking(pressed),
            Action::ViewBackRight if !pressed => self.select_view(ViewId::BackRight),
            Action::ViewFrontLeft if !pressed => self.select_view(ViewId::FrontLeft),
            Action::ViewTop if !pressed => self.select_view(ViewId::Top),
            Action::ViewStatic if !pressed => self.select_view(ViewId::Static),
            Action::ViewOrbit if !pressed => self.select_view(ViewId::Orbit),
            _ => {}
        }
    }

    fn select_view(&mut self, id: ViewId) {
        self.views.select(id, self.ship.pose(), self.elapsed);
    }

    /// Integrate one tick and sync the ship's body.
    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
        self.ship.update(dt);
        let body = &mut self.scene.bodies[SHIP_BODY];
        body.pos = self.ship.pos;
        body.orient = self.ship.orient;
    }

    pub fn ship_pose(&self) -> ShipPose {
        self.ship.pose()
    }

    pub fn camera_frame(&self) -> CameraFrame {
        self.views.frame(self.ship.pose(), self.elapsed)
    }

    /// Fixed-length pointer from the ship toward the planet, drawn as an
    /// overlay so the player can find the planet from any view.
    pub fn guide_line(&self) -> (Vec3, Vec3) {
        let planet = &self.scene.bodies[PLANET_BODY];
        let dir = normalize_or(planet.pos - self.ship.pos, Vec3::X);
        (self.ship.pos, self.ship.pos + dir * GUIDE_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Mesh;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn game() -> GameState {
        let meshes = LevelMeshes {
            ship: Mesh::test_triangle(),
            planet: Mesh::test_triangle(),
            asteroid: Mesh::test_triangle(),
        };
        let mut rng = StdRng::seed_from_u64(42);
        GameState::new(meshes, &mut rng)
    }

    #[test]
    fn view_switch_fires_on_release_only() {
        let mut game = game();
        assert_eq!(game.views.current(), ViewId::BackRight);
        game.apply_action(Action::ViewOrbit, true);
        assert_eq!(game.views.current(), ViewId::BackRight);
        game.apply_action(Action::ViewOrbit, false);
        assert_eq!(game.views.current(), ViewId::Orbit);
    }

    #[test]
    fn static_switch_freezes_camera_against_ship_motion() {
        let mut game = game();
        game.apply_action(Action::ViewStatic, false);
        let frozen = game.camera_frame();

        game.apply_action(Action::ThrustUp, true);
        for _ in 0..300 {
            game.update(1.0 / 60.0);
        }
        assert_eq!(game.camera_frame(), frozen);

        game.apply_action(Action::ViewBackRight, false);
        assert_ne!(game.camera_frame(), frozen);
    }

    #[test]
    fn update_syncs_ship_body() {
        let mut game = game();
        game.apply_action(Action::ThrustUp, true);
        for _ in 0..60 {
            game.update(1.0 / 60.0);
        }
        assert_eq!(game.scene.bodies[SHIP_BODY].pos, game.ship.pos);
        assert!(game.ship.pos.length() > 0.0);
    }

    #[test]
    fn advancing_levels_bumps_counter_and_resets_ship() {
        let mut game = game();
        game.apply_action(Action::ThrustUp, true);
        game.update(1.0);
        let mut rng = StdRng::seed_from_u64(1);
        game.advance_level(&mut rng);
        assert_eq!(game.level_counter, 2);
        assert_eq!(game.ship.pos, Vec3::ZERO);
        assert_eq!(
            game.scene.store.live_count(),
            2 + game.level.asteroid_count
        );
    }

    #[test]
    fn guide_line_has_fixed_length() {
        let game = game();
        let (from, to) = game.guide_line();
        assert!(((to - from).length() - GUIDE_LENGTH).abs() < 1e-4);
    }
}
