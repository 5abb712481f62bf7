use std::f32::consts::{PI, TAU};
use std::path::Path;

use glam::Vec3;
use rand::Rng;

use crate::core::geometry::{AssetError, Mesh};
use crate::core::{Body, Scene};
use crate::util::{is_colliding, spherical_to_cartesian};

/// Index of the ship body within a generated scene.
pub const SHIP_BODY: usize = 0;
/// Index of the planet body within a generated scene.
pub const PLANET_BODY: usize = 1;

/// Per-axis asteroid position noise bound, world units.
const NOISE_MAX: f32 = 20.0;
/// Attempts at a non-colliding pre-noise asteroid placement before giving
/// the last candidate up as-is.
const PLACEMENT_RETRIES: usize = 32;

/// Mesh sources for the three body kinds, loaded once at startup and
/// re-registered into the draw store on every level reset.
pub struct LevelMeshes {
    pub ship: Mesh,
    pub planet: Mesh,
    pub asteroid: Mesh,
}

impl LevelMeshes {
    pub fn load(dir: &Path) -> Result<Self, AssetError> {
        Ok(Self {
            ship: Mesh::from_obj(&dir.join("ship.obj"))?,
            planet: Mesh::from_obj(&dir.join("planet.obj"))?,
            asteroid: Mesh::from_obj(&dir.join("asteroid.obj"))?,
        })
    }
}

/// What level generation decided, beyond the bodies pushed into the scene.
#[derive(Debug, Clone)]
pub struct Level {
    pub planet_radius: f32,
    /// Docking target inside the planet. Computed and carried for the
    /// not-yet-built landing feature; nothing consumes it downstream.
    pub landing_point: Vec3,
    pub asteroid_count: usize,
}

/// Generate one level into `scene`: the ship at the origin, a planet placed
/// in spherical coordinates, and a noise-scattered asteroid field along the
/// ship→planet line. The scene is cleared first, releasing every previous
/// drawable, so this must only run between frames.
///
/// Asteroid placement retries while the pre-noise candidate overlaps the
/// planet; the per-axis noise added afterwards is NOT re-checked, so an
/// overlap post-noise remains possible.
pub fn generate(
    scene: &mut Scene,
    meshes: &LevelMeshes,
    level: u32,
    rng: &mut impl Rng,
) -> Level {
    let level = level.max(1);
    scene.clear();

    let ship_handle = scene.store.register(meshes.ship.clone());
    scene.add_body(
        Body::new("ship", Vec3::ZERO)
            .with_radius(meshes.ship.bounding_radius)
            .with_drawable(ship_handle),
    );

    // Planet: distance grows with the level, radius within a bounded band.
    let rho = rng.gen_range(200.0..200.0 + level as f32 * 100.0);
    let theta = rng.gen_range(0.0..TAU);
    let phi = rng.gen_range(0.0..PI);
    let planet_pos = spherical_to_cartesian(rho, theta, phi);
    let planet_radius = rng.gen_range(16.0..20.0 + (level as f32).min(5.0));

    let planet_scale = if meshes.planet.bounding_radius > 0.0 {
        planet_radius / meshes.planet.bounding_radius
    } else {
        1.0
    };
    let planet_handle = scene.store.register(meshes.planet.clone());
    scene.add_body(
        Body::new("planet", planet_pos)
            .with_radius(planet_radius)
            .with_scale(planet_scale)
            .with_drawable(planet_handle),
    );

    // Landing point: an inner-sphere offset whose allowed radial fraction
    // shifts upward with the level, capped at 1.5x.
    let level_adjust = (1.0 + 0.05 * (level - 1) as f32).min(1.5);
    let fraction = rng.gen_range(0.45..0.65) * level_adjust;
    let landing_dir = spherical_to_cartesian(1.0, rng.gen_range(0.0..TAU), rng.gen_range(0.0..PI));
    let landing_point = planet_pos + landing_dir * fraction * planet_radius;

    // Asteroid field: a random count that grows with the level, each rock a
    // random fraction along the ship→planet vector plus bounded noise.
    let asteroid_count = rng.gen_range(4..=4 + 2 * level as usize);
    let asteroid_radius = meshes.asteroid.bounding_radius;
    for i in 0..asteroid_count {
        let mut pos = planet_pos * rng.gen_range(0.1..0.9);
        for _ in 0..PLACEMENT_RETRIES {
            if !is_colliding(pos, asteroid_radius, planet_pos, planet_radius) {
                break;
            }
            pos = planet_pos * rng.gen_range(0.1..0.9);
        }
        // Post-noise positions are intentionally not re-validated.
        pos += Vec3::new(
            rng.gen_range(-NOISE_MAX..NOISE_MAX),
            rng.gen_range(-NOISE_MAX..NOISE_MAX),
            rng.gen_range(-NOISE_MAX..NOISE_MAX),
        );
        let handle = scene.store.register(meshes.asteroid.clone());
        scene.add_body(
            Body::new(format!("asteroid_{i}"), pos)
                .with_radius(asteroid_radius)
                .with_drawable(handle),
        );
    }

    log::info!(
        "level {level}: planet at {planet_pos:?} r={planet_radius:.1}, {asteroid_count} asteroids"
    );

    Level {
        planet_radius,
        landing_point,
        asteroid_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn meshes() -> LevelMeshes {
        LevelMeshes {
            ship: Mesh::test_triangle(),
            planet: Mesh::test_triangle(),
            asteroid: Mesh::test_triangle(),
        }
    }

    #[test]
    fn level_one_yields_four_to_six_asteroids() {
        let meshes = meshes();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut scene = Scene::new();
            let level = generate(&mut scene, &meshes, 1, &mut rng);
            assert!(
                (4..=6).contains(&level.asteroid_count),
                "seed {seed}: {}",
                level.asteroid_count
            );
            assert_eq!(scene.bodies.len(), 2 + level.asteroid_count);
        }
    }

    #[test]
    fn level_ten_yields_four_to_twentyfour_asteroids() {
        let meshes = meshes();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut scene = Scene::new();
            let level = generate(&mut scene, &meshes, 10, &mut rng);
            assert!((4..=24).contains(&level.asteroid_count));
        }
    }

    #[test]
    fn seeded_generation_end_to_end() {
        let meshes = meshes();
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        let mut scene = Scene::new();
        let level = generate(&mut scene, &meshes, 1, &mut rng);

        assert!((16.0..=25.0).contains(&level.planet_radius));

        let planet = &scene.bodies[PLANET_BODY];
        let frac = level.landing_point.distance(planet.pos) / level.planet_radius;
        // level 1: level_adjust is exactly 1.0
        assert!((0.45..=0.65).contains(&frac), "fraction {frac}");

        // Known gap: noise may push an asteroid into the planet, so overlap
        // is possible; assert only that nothing panicked and the field is
        // where it should roughly be.
        for body in &scene.bodies[PLANET_BODY + 1..] {
            assert!(body.pos.is_finite());
        }
    }

    #[test]
    fn ship_and_planet_always_present() {
        let meshes = meshes();
        let mut rng = StdRng::seed_from_u64(7);
        let mut scene = Scene::new();
        // Degenerate counter: clamped to 1, never panics.
        generate(&mut scene, &meshes, 0, &mut rng);
        assert!(scene.bodies.len() >= 2);
        assert_eq!(scene.bodies[SHIP_BODY].name, "ship");
        assert_eq!(scene.bodies[PLANET_BODY].name, "planet");
    }

    #[test]
    fn regeneration_releases_previous_drawables() {
        let meshes = meshes();
        let mut rng = StdRng::seed_from_u64(3);
        let mut scene = Scene::new();
        let first = generate(&mut scene, &meshes, 1, &mut rng);
        assert_eq!(scene.store.live_count(), 2 + first.asteroid_count);

        let second = generate(&mut scene, &meshes, 2, &mut rng);
        // Only the fresh registrations survive.
        assert_eq!(scene.store.live_count(), 2 + second.asteroid_count);
        assert_eq!(scene.bodies.len(), 2 + second.asteroid_count);
    }

    #[test]
    fn pre_noise_positions_clear_the_planet() {
        // With noise at most NOISE_MAX per axis, no asteroid can end up
        // deeper than sqrt(3)*NOISE_MAX inside the planet.
        let meshes = meshes();
        let worst = (3.0f32).sqrt() * NOISE_MAX;
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut scene = Scene::new();
            let level = generate(&mut scene, &meshes, 3, &mut rng);
            let planet_pos = scene.bodies[PLANET_BODY].pos;
            for body in &scene.bodies[PLANET_BODY + 1..] {
                let dist = body.pos.distance(planet_pos);
                assert!(
                    dist + worst + body.radius > level.planet_radius,
                    "seed {seed}: asteroid fully buried at {dist}"
                );
            }
        }
    }
}
