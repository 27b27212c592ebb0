use ::rand::{Rng, SeedableRng};
use macroquad::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config;
use crate::entity::{EntityId, EntityKind};
use crate::forms::{AbilityKind, Form};
use crate::input::InputIntents;
use crate::physics;
use crate::player::{AbilitySlot, Player};
use crate::settings::Settings;
use crate::snapshot::{OfferView, PlayerView, RadarBlip, Snapshot};
use crate::storage::{BestRun, Storage};
use crate::upgrades::{self, UpgradeOffer};
use crate::world::{Bounds, World, WorldEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    MainMenu,
    Playing,
    Paused,
    UpgradeSelection,
    GameOver,
}

/// Gameplay notifications for audio/effects collaborators.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Absorbed { id: EntityId, kind: EntityKind, pos: Vec3 },
    Impact { damage: f32, pos: Vec3 },
    AbilityUsed { kind: AbilityKind, pos: Vec3 },
    LeveledUp { level: u32 },
    GameOver { best: BestRun },
}

pub struct GameController {
    pub state: GameState,
    pub world: World,
    pub player: Player,
    pub settings: Settings,
    pub best: BestRun,
    pub offers: Vec<UpgradeOffer>,
    pub rng: ChaCha8Rng,
    pub tick_count: u64,
    storage: Box<dyn Storage>,
    events: Vec<GameEvent>,
}

impl GameController {
    /// Build a fresh game, reading settings and the best record from `storage`.
    /// Missing or unreadable values fall back to defaults.
    pub fn new(storage: Box<dyn Storage>, seed: u64) -> Self {
        let settings = match storage.load_settings() {
            Ok(s) => s.sanitized(),
            Err(e) => {
                warn!("settings unavailable, using defaults: {e:#}");
                Settings::default()
            }
        };
        let best = match storage.load_best() {
            Ok(b) => b,
            Err(e) => {
                warn!("best record unavailable, using defaults: {e:#}");
                BestRun::default()
            }
        };

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut world = World::new(Bounds::new(config::WORLD_BOUNDS));
        world.spawn_initial(&mut rng);

        Self {
            state: GameState::MainMenu,
            world,
            player: Player::new(),
            settings,
            best,
            offers: Vec::new(),
            rng,
            tick_count: 0,
            storage,
            events: Vec::new(),
        }
    }

    fn transition(&mut self, to: GameState) {
        debug!(from = ?self.state, to = ?to, "state change");
        self.state = to;
    }

    pub fn start(&mut self) -> bool {
        if self.state != GameState::MainMenu {
            return false;
        }
        self.player.pos = Vec3::ZERO;
        self.player.velocity = Vec3::ZERO;
        self.transition(GameState::Playing);
        info!("run started");
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        self.transition(GameState::Paused);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != GameState::Paused {
            return false;
        }
        self.transition(GameState::Playing);
        true
    }

    /// Apply the offer at `index` and resume play. `form` is only read for the
    /// form choice. Out-of-range indices are ignored.
    pub fn select_upgrade(&mut self, index: usize, form: Option<Form>) -> bool {
        if self.state != GameState::UpgradeSelection {
            return false;
        }
        let Some(offer) = self.offers.get(index) else {
            return false;
        };
        let form = form.filter(|f| offer.forms.contains(f));
        info!(upgrade = offer.upgrade.id, rarity = offer.rarity.label(), "upgrade selected");
        self.player.apply_upgrade(offer.upgrade, form);
        self.offers.clear();
        self.transition(GameState::Playing);
        true
    }

    /// Abandon the current run (paused or finished) and return to the menu with
    /// a fresh world and player.
    pub fn restart(&mut self) -> bool {
        if !matches!(self.state, GameState::Paused | GameState::GameOver) {
            return false;
        }
        self.persist_best();
        self.world = World::new(Bounds::new(config::WORLD_BOUNDS));
        self.world.spawn_initial(&mut self.rng);
        self.player = Player::new();
        self.offers.clear();
        self.tick_count = 0;
        self.transition(GameState::MainMenu);
        true
    }

    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings.sanitized();
        if let Err(e) = self.storage.save_settings(&self.settings) {
            warn!("failed to save settings: {e:#}");
        }
    }

    fn persist_best(&mut self) {
        if let Err(e) = self.storage.save_best(&self.best) {
            warn!("failed to save best record: {e:#}");
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn drain_world_events(&mut self) -> Vec<WorldEvent> {
        self.world.drain_events()
    }

    /// Advance one frame. Returns false when the game is not in play.
    pub fn tick(&mut self, raw_delta: f32, input: &InputIntents) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let delta = raw_delta.clamp(0.0, config::MAX_FRAME_DT);

        self.apply_controls(delta, input);

        let sources = self.world.gravity_sources();
        let resistance = self.player.gravity_resistance;
        physics::apply_gravity(&mut self.player, &sources, delta, resistance);
        if self.settings.orbit_assist || self.player.orbit_assist {
            physics::apply_drag(&mut self.player, delta, config::ORBIT_ASSIST_DRAG);
        }
        physics::integrate(&mut self.player, delta);

        let difficulty = upgrades::difficulty_for_mass(self.player.mass);
        self.world.update(delta, difficulty, &mut self.rng);

        let mut leveled = self.apply_siphon(delta);
        self.steer_hunters(delta);
        self.pull_motes(delta);
        let absorbed = self.resolve_collisions(&mut leveled);
        for id in absorbed {
            self.world.remove_entity(id);
        }

        self.player.tick_status(delta);
        self.player.update(delta);
        self.tick_count += 1;

        if self.player.is_destroyed() {
            self.finish_run();
        } else if leveled {
            self.offers = upgrades::roll_upgrades(self.player.level, &mut self.rng);
            self.events.push(GameEvent::LeveledUp {
                level: self.player.level,
            });
            info!(level = self.player.level, offers = self.offers.len(), "level up");
            self.transition(GameState::UpgradeSelection);
        }
        true
    }

    fn apply_controls(&mut self, delta: f32, input: &InputIntents) {
        let player = &mut self.player;

        let thrust = input.thrust_direction();
        if thrust != Vec3::ZERO {
            let cost = delta * config::THRUST_ENERGY_RATE;
            if player.energy > cost {
                player.spend_energy(cost);
                player.velocity += thrust * delta * player.speed;
            }
        }

        if input.boost && player.energy > config::BOOST_MIN_ENERGY {
            let dir = input.boost_direction();
            player.velocity += dir * delta * player.speed * config::BOOST_SPEED_MULT;
            player.spend_energy(delta * config::BOOST_ENERGY_RATE * player.boost_efficiency);
        }

        if input.brake && player.energy > config::BRAKE_MIN_ENERGY {
            physics::apply_drag(player, delta, config::BRAKE_DRAG);
            player.spend_energy(delta * config::BRAKE_ENERGY_RATE);
        }

        if input.primary_ability {
            self.activate(AbilitySlot::Primary);
        }
        if input.secondary_ability {
            self.activate(AbilitySlot::Secondary);
        }
    }

    fn activate(&mut self, slot: AbilitySlot) {
        let Some(kind) = self.player.try_activate(slot) else {
            return;
        };
        match kind {
            AbilityKind::WarpDash => {
                let j = config::WARP_DASH_JITTER;
                let offset = vec3(self.rng.gen_range(-j..j), self.rng.gen_range(-j..j), 0.0);
                self.player.pos += offset;
            }
            AbilityKind::GravityWell => {
                self.world.add_entity(EntityKind::Planet, &mut self.rng);
            }
            AbilityKind::PhaseShift => self.player.phase = config::PHASE_DURATION,
            AbilityKind::PulseShockwave => {}
            AbilityKind::EchoDrones => self.player.drones = config::DRONE_CHARGE,
            AbilityKind::SolarSiphon => self.player.siphon = config::SIPHON_DURATION,
        }
        debug!(ability = kind.label(), "ability activated");
        self.events.push(GameEvent::AbilityUsed {
            kind,
            pos: self.player.pos,
        });
    }

    /// Harvest energy and xp from a nearby star while the siphon runs.
    fn apply_siphon(&mut self, delta: f32) -> bool {
        if self.player.siphon <= 0.0 {
            return false;
        }
        let pos = self.player.pos;
        let star = self
            .world
            .gravity_source_ids()
            .iter()
            .filter_map(|&id| self.world.get(id))
            .find(|e| {
                e.kind == EntityKind::Star
                    && e.pos.distance(pos) < e.radius * config::SIPHON_RANGE_RATIO
            })
            .map(|e| (e.pos, e.radius));
        let Some((star_pos, star_radius)) = star else {
            return false;
        };

        let harvest = delta * config::SIPHON_ENERGY_RATE * (1.0 + self.player.harvest_bonus);
        self.player.add_energy(harvest);
        let leveled = self.player.gain_xp(delta * config::SIPHON_XP_RATE);
        if star_pos.distance(pos) < star_radius * config::SIPHON_BURN_RATIO {
            self.player.take_damage(delta * config::SIPHON_BURN_DAMAGE);
        }
        leveled
    }

    fn steer_hunters(&mut self, delta: f32) {
        let target = self.player.pos;
        let hunters: Vec<EntityId> = self.world.hunter_ids().to_vec();
        for id in hunters {
            if let Some(hunter) = self.world.get_mut(id) {
                let to_player = target - hunter.pos;
                if to_player.length() < config::HUNTER_SENSE_RADIUS {
                    hunter.velocity += to_player.normalize_or_zero() * delta * config::HUNTER_STEER;
                }
            }
        }
    }

    pub fn magnet_range(&self) -> f32 {
        let drones = if self.player.drones > 0.0 {
            config::DRONE_MAGNET_BONUS
        } else {
            0.0
        };
        self.player.radius + config::MAGNET_BASE_RANGE + self.player.magnet_radius + drones
    }

    fn pull_motes(&mut self, delta: f32) {
        let range = self.magnet_range();
        let target = self.player.pos;
        let t = (delta * config::MAGNET_PULL).min(1.0);
        for entity in self.world.arena.iter_mut() {
            if entity.kind == EntityKind::Mote && entity.pos.distance(target) < range {
                entity.pos = entity.pos.lerp(target, t);
            }
        }
    }

    /// Absorb or take damage from every overlapping entity. Returns absorbed ids
    /// for deferred removal.
    fn resolve_collisions(&mut self, leveled: &mut bool) -> Vec<EntityId> {
        let mut absorbed = Vec::new();
        if self.player.is_phased() {
            return absorbed;
        }
        for entity in self.world.arena.iter() {
            let distance = entity.pos.distance(self.player.pos);
            if distance >= entity.radius + self.player.radius {
                continue;
            }
            if entity.mass < self.player.mass * config::ABSORB_MASS_RATIO {
                self.player.absorb(entity);
                if self.player.gain_xp(entity.mass * config::ABSORB_XP_PER_MASS) {
                    *leveled = true;
                }
                absorbed.push(entity.id);
                self.events.push(GameEvent::Absorbed {
                    id: entity.id,
                    kind: entity.kind,
                    pos: entity.pos,
                });
            } else {
                let damage = physics::collision_damage(&self.player, entity);
                self.player.take_damage(damage);
                self.events.push(GameEvent::Impact {
                    damage,
                    pos: self.player.pos,
                });
            }
        }
        absorbed
    }

    fn finish_run(&mut self) {
        let run = BestRun::from_player(&self.player);
        self.best = self.best.merge(&run);
        info!(
            time = run.time,
            max_mass = run.max_mass,
            level = run.level,
            kills = run.kills,
            "run ended"
        );
        self.persist_best();
        self.events.push(GameEvent::GameOver { best: self.best });
        self.offers.clear();
        self.transition(GameState::GameOver);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick_count,
            state: self.state,
            player: PlayerView::from_player(&self.player),
            radar: self
                .world
                .iter()
                .map(|e| RadarBlip {
                    id: e.id,
                    kind: e.kind,
                    position: e.pos.into(),
                    radius: e.radius,
                })
                .collect(),
            offers: self.offers.iter().map(OfferView::from).collect(),
            best: self.best,
            settings: self.settings,
        }
    }
}
