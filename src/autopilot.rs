use macroquad::prelude::*;

use crate::config;
use crate::entity::EntityKind;
use crate::game::{GameController, GameState};
use crate::input::InputIntents;

/// Bodies closer than this many combined radii are treated as a threat.
const THREAT_MARGIN: f32 = 3.0;
/// Only prey within this range is chased.
const PREY_RANGE: f32 = 120.0;
/// Keep this much energy in reserve before spending on abilities.
const ABILITY_RESERVE: f32 = 40.0;

/// Scripted pilot: chase the nearest absorbable body, flee from anything that
/// would hurt on contact.
#[derive(Clone, Debug, Default)]
pub struct Autopilot {
    pub decisions: u64,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decide(&mut self, game: &GameController) -> InputIntents {
        let mut input = InputIntents::default();
        if game.state != GameState::Playing {
            return input;
        }
        self.decisions += 1;

        let player = &game.player;
        let edible = player.mass * config::ABSORB_MASS_RATIO;

        let mut prey: Option<(f32, Vec3)> = None;
        let mut flee = Vec3::ZERO;
        for entity in game.world.iter() {
            let offset = entity.pos - player.pos;
            let dist = offset.length();
            if entity.mass < edible {
                if dist < PREY_RANGE && prey.map_or(true, |(best, _)| dist < best) {
                    prey = Some((dist, offset));
                }
            } else {
                let danger = (entity.radius + player.radius) * THREAT_MARGIN;
                if entity.kind == EntityKind::Hunter || dist < danger {
                    // Weight by proximity so the closest threat dominates.
                    flee -= offset.normalize_or_zero() / dist.max(1.0);
                }
            }
        }

        let threatened = flee != Vec3::ZERO;
        let heading = if threatened {
            flee
        } else if let Some((_, offset)) = prey {
            offset
        } else {
            // Drift back toward the populated centre.
            -player.pos
        };
        let heading = vec2(heading.x, heading.y).normalize_or_zero();
        input.move_axis = heading;
        input.aim = heading;

        if player.velocity.length() > player.speed * 2.0 {
            input.brake = true;
        } else if threatened && player.energy > config::BOOST_MIN_ENERGY * 4.0 {
            input.boost = true;
        }

        input.primary_ability =
            threatened && player.primary.ready() && player.energy > ABILITY_RESERVE;
        input.secondary_ability = player.secondary.ready()
            && player.energy > ABILITY_RESERVE + player.secondary.energy_cost
            && game
                .world
                .iter()
                .any(|e| e.kind == EntityKind::Star && e.pos.distance(player.pos) < e.radius * config::SIPHON_RANGE_RATIO);
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use crate::storage::MemoryStorage;
    use crate::world::{Bounds, World};

    fn empty_game() -> GameController {
        let mut game = GameController::new(Box::new(MemoryStorage::new()), 11);
        game.world = World::new(Bounds::new(50_000.0));
        game.start();
        game
    }

    #[test]
    fn idle_outside_play() {
        let game = GameController::new(Box::new(MemoryStorage::new()), 11);
        let mut pilot = Autopilot::new();
        assert_eq!(pilot.decide(&game), InputIntents::default());
        assert_eq!(pilot.decisions, 0);
    }

    #[test]
    fn chases_prey_and_flees_threats() {
        let mut game = empty_game();
        let mut mote = Entity::new(EntityKind::Mote, vec3(20.0, 0.0, 0.0), Vec3::ZERO, 1.0);
        mote.mass = 1.0;
        game.world.insert(mote);

        let mut pilot = Autopilot::new();
        let input = pilot.decide(&game);
        assert!(input.move_axis.x > 0.99);
        assert!(!input.boost);

        let mut rock = Entity::new(EntityKind::Asteroid, vec3(0.0, 8.0, 0.0), Vec3::ZERO, 3.0);
        rock.mass = 100.0;
        game.world.insert(rock);
        let input = pilot.decide(&game);
        assert!(input.move_axis.y < -0.99);
        assert!(input.boost);
        assert!(input.primary_ability);
    }

    /// Long autopilot run checking resource bounds every tick.
    #[test]
    fn long_run_keeps_resources_in_bounds() {
        let mut game = GameController::new(Box::new(MemoryStorage::new()), 2024);
        let mut pilot = Autopilot::new();
        game.start();

        let mut levels_seen = 1;
        for _ in 0..6000 {
            match game.state {
                GameState::UpgradeSelection => {
                    let form = game.offers[0].forms.first().copied();
                    assert!(game.select_upgrade(0, form));
                }
                GameState::GameOver => break,
                _ => {}
            }
            let input = pilot.decide(&game);
            game.tick(config::FIXED_DT, &input);

            let p = &game.player;
            assert!((0.0..=p.max_energy).contains(&p.energy));
            assert!((0.0..=p.max_shield).contains(&p.shield));
            assert!((0.0..=p.max_integrity).contains(&p.integrity));
            assert!(p.mass >= config::PLAYER_START_MASS);
            assert!(p.level >= levels_seen);
            assert!(p.xp < p.next_level as f32);
            assert!(p.phase >= 0.0 && p.siphon >= 0.0 && p.drones >= 0.0);
            assert!(p.primary.cooldown >= 0.0 && p.primary.cooldown <= p.primary.max_cooldown);
            levels_seen = p.level;

            let mote_cap = crate::world::target_population(EntityKind::Mote, config::DIFFICULTY_MAX)
                .unwrap_or(usize::MAX);
            assert!(game.world.count_of(EntityKind::Mote) <= mote_cap);
        }
        assert!(game.player.stats.time > 0.0);
        assert!(pilot.decisions > 0);
    }
}
