use glam::{Quat, Vec3};

use crate::core::ShipPose;

/// Full-intent rotation rate, radians per second.
pub const ROT_RATE: f32 = 1.2;
/// Acceleration along the local forward axis at full thrust, units/s².
pub const THRUST_ACCEL: f32 = 12.0;
pub const MAX_SPEED: f32 = 60.0;
/// Exponential damping coefficient applied while braking.
pub const BRAKE_RATE: f32 = 3.0;

const STOP_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Roll,
    Pitch,
    Yaw,
}

/// The player ship. Control inputs set per-axis *intents* in {-1, 0, +1};
/// `update` integrates intents into orientation and velocity once per tick,
/// so intents themselves never accumulate.
#[derive(Debug, Clone)]
pub struct Ship {
    pub pos: Vec3,
    pub orient: Quat,
    pub velocity: Vec3,
    roll: i8,
    pitch: i8,
    yaw: i8,
    thrust: i8,
    braking: bool,
}

impl Ship {
    pub fn new() -> Self {
        Self {
            pos: Vec3::ZERO,
            orient: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            roll: 0,
            pitch: 0,
            yaw: 0,
            thrust: 0,
            braking: false,
        }
    }

    pub fn pose(&self) -> ShipPose {
        ShipPose::new(self.pos, self.orient)
    }

    /// Local forward axis: world +X rotated into the ship frame. The view
    /// presets look down +X, so this keeps thrust aligned with the cameras.
    pub fn forward(&self) -> Vec3 {
        self.orient * Vec3::X
    }

    /// Press sets the axis intent to `dir`; release clears it only if the
    /// intent still belongs to that key, so opposite-key rollover behaves.
    pub fn set_rotation(&mut self, axis: Axis, dir: i8, pressed: bool) {
        let dir = dir.signum();
        let slot = match axis {
            Axis::Roll => &mut self.roll,
            Axis::Pitch => &mut self.pitch,
            Axis::Yaw => &mut self.yaw,
        };
        if pressed {
            *slot = dir;
        } else if *slot == dir {
            *slot = 0;
        }
    }

    /// Zero one axis's intent. Does not touch the orientation itself; it
    /// only stops further rotation on that axis.
    pub fn center_rotation(&mut self, axis: Axis) {
        self.set_rotation(axis, self.rotation_intent(axis), false);
    }

    pub fn rotation_intent(&self, axis: Axis) -> i8 {
        match axis {
            Axis::Roll => self.roll,
            Axis::Pitch => self.pitch,
            Axis::Yaw => self.yaw,
        }
    }

    pub fn set_thrust(&mut self, dir: i8, pressed: bool) {
        let dir = dir.signum();
        if pressed {
            self.thrust = dir;
        } else if self.thrust == dir {
            self.thrust = 0;
        }
    }

    /// The cancel-thrust action: while held, velocity decays toward zero.
    /// Also drops the thrust intent so the brake is not fighting the engine.
    pub fn set_braking(&mut self, pressed: bool) {
        self.braking = pressed;
        if pressed {
            self.thrust = 0;
        }
    }

    pub fn thrust_intent(&self) -> i8 {
        self.thrust
    }

    /// Integrate one simulated tick.
    ///
    /// Axis rotations only commute approximately, so the composition order
    /// is fixed: yaw (local Y), then pitch (local X), then roll (local Z),
    /// post-multiplied for local-frame application. The quaternion is
    /// re-normalized every tick to stop drift from creeping into scale.
    pub fn update(&mut self, dt: f32) {
        let step = ROT_RATE * dt;
        if self.yaw != 0 || self.pitch != 0 || self.roll != 0 {
            let rot = Quat::from_rotation_y(self.yaw as f32 * step)
                * Quat::from_rotation_x(self.pitch as f32 * step)
                * Quat::from_rotation_z(self.roll as f32 * step);
            self.orient = (self.orient * rot).normalize();
        }

        if self.thrust != 0 {
            self.velocity += self.forward() * (self.thrust as f32 * THRUST_ACCEL * dt);
            let speed = self.velocity.length();
            if speed > MAX_SPEED {
                self.velocity *= MAX_SPEED / speed;
            }
        }

        if self.braking {
            // dt-normalized exponential decay; identical trajectories at any
            // frame rate, and a snap to zero once below the epsilon.
            self.velocity *= (-BRAKE_RATE * dt).exp();
            if self.velocity.length_squared() < STOP_EPSILON * STOP_EPSILON {
                self.velocity = Vec3::ZERO;
            }
        }

        self.pos += self.velocity * dt;
    }
}

impl Default for Ship {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn opposite_rotations_cancel() {
        let mut ship = Ship::new();
        ship.set_rotation(Axis::Yaw, 1, true);
        for _ in 0..120 {
            ship.update(DT);
        }
        ship.set_rotation(Axis::Yaw, 1, false);
        ship.set_rotation(Axis::Yaw, -1, true);
        for _ in 0..120 {
            ship.update(DT);
        }
        let ident = ship.orient.dot(Quat::IDENTITY).abs();
        assert!(ident > 0.9999, "orientation drifted: {:?}", ship.orient);
    }

    #[test]
    fn orientation_stays_normalized() {
        let mut ship = Ship::new();
        ship.set_rotation(Axis::Roll, 1, true);
        ship.set_rotation(Axis::Pitch, -1, true);
        ship.set_rotation(Axis::Yaw, 1, true);
        for _ in 0..10_000 {
            ship.update(DT);
        }
        assert_relative_eq!(ship.orient.length(), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn release_only_clears_matching_direction() {
        let mut ship = Ship::new();
        ship.set_rotation(Axis::Roll, 1, true);
        ship.set_rotation(Axis::Roll, -1, true); // rollover to the other key
        ship.set_rotation(Axis::Roll, 1, false); // stale release
        assert_eq!(ship.rotation_intent(Axis::Roll), -1);
        ship.set_rotation(Axis::Roll, -1, false);
        assert_eq!(ship.rotation_intent(Axis::Roll), 0);
    }

    #[test]
    fn center_stops_rotation_without_resetting_orientation() {
        let mut ship = Ship::new();
        ship.set_rotation(Axis::Pitch, 1, true);
        ship.update(DT);
        let turned = ship.orient;
        ship.center_rotation(Axis::Pitch);
        ship.update(DT);
        assert_eq!(ship.orient, turned);
    }

    #[test]
    fn thrust_accelerates_along_local_forward() {
        let mut ship = Ship::new();
        ship.set_thrust(1, true);
        ship.update(DT);
        assert!(ship.velocity.x > 0.0);
        assert_relative_eq!(ship.velocity.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(ship.velocity.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn speed_is_clamped() {
        let mut ship = Ship::new();
        ship.set_thrust(1, true);
        for _ in 0..2_000 {
            ship.update(DT);
        }
        assert!(ship.velocity.length() <= MAX_SPEED + 1e-3);
    }

    #[test]
    fn braking_decays_to_exact_zero() {
        let mut ship = Ship::new();
        ship.set_thrust(1, true);
        for _ in 0..60 {
            ship.update(DT);
        }
        ship.set_thrust(1, false);
        ship.set_braking(true);
        for _ in 0..600 {
            ship.update(DT);
        }
        assert_eq!(ship.velocity, Vec3::ZERO);
    }

    #[test]
    fn braking_drops_thrust_intent() {
        let mut ship = Ship::new();
        ship.set_thrust(1, true);
        ship.set_braking(true);
        assert_eq!(ship.thrust_intent(), 0);
    }
}
