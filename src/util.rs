use glam::Vec3;

/// Convert spherical coordinates to a cartesian point.
///
/// Convention: `theta` is the azimuth in [0, 2π), `phi` the polar angle in
/// [0, π], so x = rho·sin(phi)·cos(theta), y = rho·sin(phi)·sin(theta),
/// z = rho·cos(phi). Angles outside the canonical range reduce by
/// periodicity through sin/cos, so the function is total over finite input.
pub fn spherical_to_cartesian(rho: f32, theta: f32, phi: f32) -> Vec3 {
    Vec3::new(
        rho * phi.sin() * theta.cos(),
        rho * phi.sin() * theta.sin(),
        rho * phi.cos(),
    )
}

/// Sphere-sphere overlap test. True iff the distance between the centers is
/// strictly less than the sum of the radii, so touching spheres do NOT
/// collide. Compared on squared lengths to skip the sqrt.
pub fn is_colliding(pos_a: Vec3, radius_a: f32, pos_b: Vec3, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    pos_a.distance_squared(pos_b) < reach * reach
}

/// Normalize `v`, falling back to `fallback` when the input is too short to
/// yield a meaningful direction.
pub fn normalize_or(v: Vec3, fallback: Vec3) -> Vec3 {
    v.try_normalize().unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{PI, TAU};

    #[test]
    fn spherical_preserves_radius() {
        let samples = [
            (1.0, 0.0, 0.0),
            (5.5, 1.2, 0.7),
            (200.0, TAU - 0.01, PI - 0.01),
            (42.0, 3.9, 2.2),
            (0.0, 1.0, 1.0),
        ];
        for (rho, theta, phi) in samples {
            let p = spherical_to_cartesian(rho, theta, phi);
            assert_relative_eq!(p.length(), rho, epsilon = 1e-3);
        }
    }

    #[test]
    fn spherical_poles_land_on_z() {
        let north = spherical_to_cartesian(3.0, 1.234, 0.0);
        assert_relative_eq!(north.z, 3.0, epsilon = 1e-5);
        let south = spherical_to_cartesian(3.0, 1.234, PI);
        assert_relative_eq!(south.z, -3.0, epsilon = 1e-5);
    }

    #[test]
    fn spherical_accepts_out_of_range_angles() {
        let a = spherical_to_cartesian(7.0, 1.0, 0.5);
        let b = spherical_to_cartesian(7.0, 1.0 + TAU, 0.5 + TAU);
        assert_relative_eq!(a.x, b.x, epsilon = 1e-3);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-3);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-3);
    }

    #[test]
    fn collision_self_overlap() {
        let p = Vec3::new(1.0, -2.0, 3.0);
        assert!(is_colliding(p, 0.5, p, 0.5));
        assert!(is_colliding(p, 1e-4, p, 1e-4));
    }

    #[test]
    fn collision_is_symmetric() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 0.0, 0.0);
        for (ra, rb) in [(1.0, 1.5), (2.0, 2.0), (0.1, 0.2)] {
            assert_eq!(is_colliding(a, ra, b, rb), is_colliding(b, rb, a, ra));
        }
    }

    #[test]
    fn touching_spheres_do_not_collide() {
        let a = Vec3::ZERO;
        let b = Vec3::new(2.0, 0.0, 0.0);
        assert!(!is_colliding(a, 1.0, b, 1.0));
        assert!(is_colliding(a, 1.0, b, 1.001));
    }

    #[test]
    fn normalize_or_falls_back_on_zero() {
        assert_eq!(normalize_or(Vec3::ZERO, Vec3::Y), Vec3::Y);
        let n = normalize_or(Vec3::new(0.0, 3.0, 0.0), Vec3::X);
        assert_relative_eq!(n.y, 1.0, epsilon = 1e-6);
    }
}
