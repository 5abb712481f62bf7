use glam::{Mat4, Quat, Vec3};

use crate::util::normalize_or;

/// Angular speed of the orbit view, radians per second.
const ORBIT_RATE: f32 = 0.5;

/// Ship position and attitude sampled once per frame for view computation.
#[derive(Debug, Clone, Copy)]
pub struct ShipPose {
    pub pos: Vec3,
    pub orient: Quat,
}

impl ShipPose {
    pub fn new(pos: Vec3, orient: Quat) -> Self {
        Self { pos, orient }
    }
}

/// A resolved camera for one frame: eye, look-at target and up vector in
/// world space, ready for a standard look-at transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl CameraFrame {
    /// Right-handed look-at matrix. Degenerate inputs are repaired rather
    /// than propagated: a zero look direction (ship sitting exactly on the
    /// eye) falls back to world -Z, and an up vector parallel to the look
    /// direction falls back to world Y, then world X.
    pub fn view_matrix(&self) -> Mat4 {
        let forward = normalize_or(self.target - self.eye, Vec3::NEG_Z);
        let mut up = normalize_or(self.up, Vec3::Y);
        if forward.cross(up).length_squared() < 1e-8 {
            up = Vec3::Y;
            if forward.cross(up).length_squared() < 1e-8 {
                up = Vec3::X;
            }
        }
        Mat4::look_at_rh(self.eye, self.eye + forward, up)
    }
}

/// One camera variant. Exactly one is active at a time; switching is a plain
/// assignment of the selector, never a blend.
#[derive(Debug, Clone, Copy)]
pub enum View {
    /// Offset and look-at given in the ship's local frame; recomputed every
    /// frame so the camera always tracks the ship.
    ShipRelative { offset: Vec3, look_at: Vec3, up: Vec3 },
    /// World-space pose captured when the view was entered; never moves
    /// afterwards, regardless of ship motion.
    Static { eye: Vec3, target: Vec3, up: Vec3 },
    /// Revolves around the ship at a fixed radius. The angle is
    /// `ORBIT_RATE * elapsed`, continuous across any wrap-around since it is
    /// only ever fed to sin/cos.
    Orbit { radius: f32, height: f32 },
}

impl View {
    pub fn frame(&self, ship: ShipPose, elapsed: f32) -> CameraFrame {
        match *self {
            View::ShipRelative { offset, look_at, up } => CameraFrame {
                eye: ship.pos + ship.orient * offset,
                target: ship.pos + ship.orient * look_at,
                up: ship.orient * up,
            },
            View::Static { eye, target, up } => CameraFrame { eye, target, up },
            View::Orbit { radius, height } => {
                let angle = ORBIT_RATE * elapsed;
                CameraFrame {
                    eye: ship.pos + Vec3::new(radius * angle.cos(), height, radius * angle.sin()),
                    target: ship.pos,
                    up: Vec3::Y,
                }
            }
        }
    }
}

/// Selector for the five configured views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewId {
    BackRight,
    FrontLeft,
    Top,
    Static,
    Orbit,
}

/// The five camera presets plus the currently selected one. Owned by the
/// game state and passed to the view computation explicitly; there is no
/// global selector.
#[derive(Debug, Clone)]
pub struct ViewBank {
    back_right: View,
    front_left: View,
    top: View,
    stat: View,
    orbit: View,
    current: ViewId,
}

impl ViewBank {
    pub fn new() -> Self {
        Self {
            back_right: View::ShipRelative {
                offset: Vec3::new(-20.0, 8.0, 5.0),
                look_at: Vec3::new(7.0, 0.0, 0.0),
                up: Vec3::Y,
            },
            front_left: View::ShipRelative {
                offset: Vec3::new(20.0, 8.0, -5.0),
                look_at: Vec3::new(-7.0, 0.0, 0.0),
                up: Vec3::Y,
            },
            top: View::ShipRelative {
                offset: Vec3::new(0.0, 20.0, 0.0),
                look_at: Vec3::ZERO,
                up: Vec3::X,
            },
            // Placeholder until the first switch captures a real pose.
            stat: View::Static {
                eye: Vec3::new(0.0, 0.0, -30.0),
                target: Vec3::ZERO,
                up: Vec3::Y,
            },
            orbit: View::Orbit {
                radius: 30.0,
                height: 20.0,
            },
            current: ViewId::BackRight,
        }
    }

    pub fn current(&self) -> ViewId {
        self.current
    }

    fn view(&self, id: ViewId) -> &View {
        match id {
            ViewId::BackRight => &self.back_right,
            ViewId::FrontLeft => &self.front_left,
            ViewId::Top => &self.top,
            ViewId::Static => &self.stat,
            ViewId::Orbit => &self.orbit,
        }
    }

    /// Resolve the currently selected view against the ship pose.
    pub fn frame(&self, ship: ShipPose, elapsed: f32) -> CameraFrame {
        self.view(self.current).frame(ship, elapsed)
    }

    /// Switch the active view. Entering the static view captures the
    /// outgoing view's derived eye and up plus the ship position at this
    /// instant, so the previous frame must be resolved before the selector
    /// is overwritten.
    pub fn select(&mut self, id: ViewId, ship: ShipPose, elapsed: f32) {
        if id == ViewId::Static {
            let outgoing = self.frame(ship, elapsed);
            self.stat = View::Static {
                eye: outgoing.eye,
                target: ship.pos,
                up: outgoing.up,
            };
        }
        log::debug!("view switch: {:?} -> {:?}", self.current, id);
        self.current = id;
    }
}

impl Default for ViewBank {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pose_at(pos: Vec3) -> ShipPose {
        ShipPose::new(pos, Quat::IDENTITY)
    }

    #[test]
    fn ship_relative_tracks_the_ship() {
        let bank = ViewBank::new();
        let a = bank.frame(pose_at(Vec3::ZERO), 0.0);
        let b = bank.frame(pose_at(Vec3::new(10.0, 0.0, 0.0)), 0.0);
        assert_relative_eq!(b.eye.x - a.eye.x, 10.0, epsilon = 1e-5);
        assert_relative_eq!(b.target.x - a.target.x, 10.0, epsilon = 1e-5);
    }

    #[test]
    fn ship_relative_rotates_with_orientation() {
        let bank = ViewBank::new();
        // Yaw the ship 180 degrees; the back-right camera must end up in
        // front of it.
        let turned = ShipPose::new(Vec3::ZERO, Quat::from_rotation_y(std::f32::consts::PI));
        let frame = bank.frame(turned, 0.0);
        assert!(frame.eye.x > 19.0, "eye {:?}", frame.eye);
    }

    #[test]
    fn static_view_freezes_until_reselected() {
        let mut bank = ViewBank::new();
        let start = pose_at(Vec3::ZERO);
        bank.select(ViewId::Static, start, 0.0);
        let frozen = bank.frame(start, 0.0);

        // Ship flies away; the static camera must not move.
        let moved = pose_at(Vec3::new(100.0, 50.0, -25.0));
        let later = bank.frame(moved, 3.0);
        assert_eq!(frozen, later);

        // Switching back to a ship-relative view immediately reflects the
        // new pose.
        bank.select(ViewId::BackRight, moved, 3.0);
        let tracking = bank.frame(moved, 3.0);
        assert_relative_eq!(tracking.target.x, 107.0, epsilon = 1e-4);
    }

    #[test]
    fn static_capture_uses_outgoing_view_position() {
        let mut bank = ViewBank::new();
        let pose = pose_at(Vec3::new(5.0, 0.0, 0.0));
        let before = bank.frame(pose, 0.0);
        bank.select(ViewId::Static, pose, 0.0);
        let captured = bank.frame(pose, 0.0);
        assert_eq!(captured.eye, before.eye);
        assert_eq!(captured.target, pose.pos);
    }

    #[test]
    fn orbit_is_continuous_across_wraparound() {
        let bank = {
            let mut b = ViewBank::new();
            b.select(ViewId::Orbit, pose_at(Vec3::ZERO), 0.0);
            b
        };
        // Sample either side of a full revolution; positions must differ by
        // no more than the arc the camera sweeps in the sample gap.
        let period = std::f32::consts::TAU / 0.5;
        let dt = 1e-3;
        let a = bank.frame(pose_at(Vec3::ZERO), period - dt);
        let b = bank.frame(pose_at(Vec3::ZERO), period + dt);
        assert!(a.eye.distance(b.eye) < 0.1);
    }

    #[test]
    fn degenerate_look_direction_never_panics() {
        // Ship parked exactly on the captured camera position.
        let view = View::Static {
            eye: Vec3::ZERO,
            target: Vec3::ZERO,
            up: Vec3::ZERO,
        };
        let frame = view.frame(pose_at(Vec3::ZERO), 0.0);
        let m = frame.view_matrix();
        assert!(m.is_finite());
    }

    #[test]
    fn up_parallel_to_look_falls_back() {
        let frame = CameraFrame {
            eye: Vec3::ZERO,
            target: Vec3::new(0.0, 10.0, 0.0),
            up: Vec3::Y, // parallel to the look direction
        };
        assert!(frame.view_matrix().is_finite());
    }
}
