use macroquad::prelude::*;

use crate::config;
use crate::entity::Entity;

/// Anything with kinematic state the physics step can act on.
pub trait Body {
    fn position(&self) -> Vec3;
    fn velocity(&self) -> Vec3;
    fn mass(&self) -> f32;
    fn set_position(&mut self, pos: Vec3);
    fn set_velocity(&mut self, velocity: Vec3);
}

impl Body for Entity {
    fn position(&self) -> Vec3 {
        self.pos
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn mass(&self) -> f32 {
        self.mass
    }

    fn set_position(&mut self, pos: Vec3) {
        self.pos = pos;
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }
}

/// Immobile attractor, copied out of the world before the player step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GravitySource {
    pub pos: Vec3,
    pub mass: f32,
}

/// Softened, capped pull exerted by `source` on a body at `pos`.
pub fn gravitational_acceleration(pos: Vec3, source: &GravitySource) -> Vec3 {
    let d = source.pos - pos;
    let dist_sq = d.length_squared() + config::GRAVITY_SOFTENING;
    let dist = dist_sq.sqrt();
    let accel = (config::GRAVITY_CONSTANT * source.mass / dist_sq).clamp(0.0, config::MAX_ACCEL);
    d / dist * accel
}

/// Accumulate pull from every source and apply it to velocity.
/// `resistance` only ever dampens the pull.
pub fn apply_gravity(body: &mut impl Body, sources: &[GravitySource], delta: f32, resistance: f32) {
    let pos = body.position();
    let total: Vec3 = sources
        .iter()
        .map(|s| gravitational_acceleration(pos, s))
        .sum();
    let damp = 1.0 - resistance.clamp(0.0, config::MAX_GRAVITY_RESISTANCE);
    body.set_velocity(body.velocity() + total * delta * damp);
}

/// Semi-implicit Euler position step.
pub fn integrate(body: &mut impl Body, delta: f32) {
    body.set_position(body.position() + body.velocity() * delta);
}

pub fn apply_drag(body: &mut impl Body, delta: f32, strength: f32) {
    let v = body.velocity();
    body.set_velocity(v - v * strength * delta);
}

/// Impact damage dealt to `body` by `other`: closing speed scaled by relative mass.
pub fn collision_damage(body: &impl Body, other: &impl Body) -> f32 {
    let rel_speed = (body.velocity() - other.velocity()).length();
    rel_speed * (other.mass() / body.mass().max(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;

    fn body(pos: Vec3, velocity: Vec3, mass: f32) -> Entity {
        let mut e = Entity::new(EntityKind::Asteroid, pos, velocity, 1.0);
        e.mass = mass;
        e
    }

    #[test]
    fn acceleration_is_capped_at_zero_distance() {
        let huge = GravitySource {
            pos: Vec3::ZERO,
            mass: 1.0e6,
        };
        for offset in [0.0, 1.0e-6, 0.01, 0.5] {
            let a = gravitational_acceleration(vec3(offset, 0.0, 0.0), &huge);
            assert!(a.length() <= config::MAX_ACCEL + 1e-4, "offset {offset}");
            assert!(a.is_finite());
        }
    }

    #[test]
    fn gravity_pulls_toward_source_with_expected_magnitude() {
        let source = GravitySource {
            pos: vec3(10.0, 0.0, 0.0),
            mass: 100.0,
        };
        let mut b = body(Vec3::ZERO, Vec3::ZERO, 1.0);
        apply_gravity(&mut b, &[source], 1.0, 0.0);

        // Softened distance in the denominator and the direction.
        let expected = 0.15 * 100.0 / 106.0 * 10.0 / 106f32.sqrt();
        assert!((b.velocity.x - expected).abs() < 1e-5);
        assert_eq!(b.velocity.y, 0.0);
    }

    #[test]
    fn resistance_dampens_but_never_reverses() {
        let source = GravitySource {
            pos: vec3(0.0, 5.0, 0.0),
            mass: 50.0,
        };
        let mut free = body(Vec3::ZERO, Vec3::ZERO, 1.0);
        let mut shielded = body(Vec3::ZERO, Vec3::ZERO, 1.0);
        apply_gravity(&mut free, &[source], 0.1, 0.0);
        apply_gravity(&mut shielded, &[source], 0.1, 5.0);

        assert!(shielded.velocity.y > 0.0);
        assert!((shielded.velocity.y - free.velocity.y * 0.3).abs() < 1e-6);
    }

    #[test]
    fn drag_and_integrate_are_linear_in_delta() {
        let mut b = body(Vec3::ZERO, vec3(10.0, -4.0, 2.0), 1.0);
        apply_drag(&mut b, 0.5, 0.2);
        assert!((b.velocity - vec3(9.0, -3.6, 1.8)).length() < 1e-5);
        integrate(&mut b, 0.5);
        assert!((b.pos - vec3(4.5, -1.8, 0.9)).length() < 1e-5);
    }

    #[test]
    fn collision_damage_scales_with_speed_and_mass_ratio() {
        let player = body(Vec3::ZERO, vec3(3.0, 0.0, 0.0), 10.0);
        let rock = body(Vec3::ZERO, vec3(-1.0, 0.0, 0.0), 20.0);
        assert!((collision_damage(&player, &rock) - 8.0).abs() < 1e-5);

        let grain = body(Vec3::ZERO, vec3(0.0, 2.0, 0.0), 0.5);
        let other = body(Vec3::ZERO, Vec3::ZERO, 3.0);
        assert!((collision_damage(&grain, &other) - 6.0).abs() < 1e-5);
    }
}
