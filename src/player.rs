use macroquad::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::entity::Entity;
use crate::forms::{AbilityKind, Form};
use crate::physics::Body;
use crate::upgrades::{Upgrade, UpgradeEffect};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilitySlot {
    Primary,
    Secondary,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ability {
    pub kind: AbilityKind,
    pub cooldown: f32,
    pub max_cooldown: f32,
    pub energy_cost: f32,
}

impl Ability {
    pub fn ready(&self) -> bool {
        self.cooldown <= 0.0
    }
}

/// Cumulative statistics for the current run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub time: f32,
    pub max_mass: f32,
    pub kills: u32,
}

pub struct Player {
    pub pos: Vec3,
    pub velocity: Vec3,
    pub mass: f32,
    pub radius: f32,

    pub integrity: f32,
    pub max_integrity: f32,
    pub shield: f32,
    pub max_shield: f32,
    pub energy: f32,
    pub max_energy: f32,

    pub level: u32,
    pub xp: f32,
    pub next_level: u32,

    pub form: Form,
    pub speed: f32,
    pub absorption: f32,
    pub gravity_resistance: f32,
    pub harvest_bonus: f32,
    pub magnet_radius: f32,
    pub cooldown_reduction: f32,
    pub boost_efficiency: f32,
    pub orbit_assist: bool,

    pub primary: Ability,
    pub secondary: Ability,

    // Transient status timers, seconds (drones decay at their own rate).
    pub phase: f32,
    pub siphon: f32,
    pub drones: f32,

    pub stats: RunStats,
}

impl Player {
    pub fn new() -> Self {
        let form = Form::default();
        let base = form.profile();
        Self {
            pos: Vec3::ZERO,
            velocity: Vec3::ZERO,
            mass: config::PLAYER_START_MASS,
            radius: config::PLAYER_START_RADIUS,
            integrity: config::PLAYER_MAX_INTEGRITY,
            max_integrity: config::PLAYER_MAX_INTEGRITY,
            shield: base.shield,
            max_shield: base.shield,
            energy: base.max_energy,
            max_energy: base.max_energy,
            level: 1,
            xp: 0.0,
            next_level: config::XP_FIRST_THRESHOLD,
            form,
            speed: base.speed,
            absorption: base.absorption,
            gravity_resistance: 0.0,
            harvest_bonus: 0.0,
            magnet_radius: 0.0,
            cooldown_reduction: 0.0,
            boost_efficiency: 1.0,
            orbit_assist: false,
            primary: Ability {
                kind: base.ability,
                cooldown: 0.0,
                max_cooldown: config::PRIMARY_MAX_COOLDOWN,
                energy_cost: config::PRIMARY_ENERGY_COST,
            },
            secondary: Ability {
                kind: AbilityKind::SolarSiphon,
                cooldown: 0.0,
                max_cooldown: config::SECONDARY_MAX_COOLDOWN,
                energy_cost: config::SECONDARY_ENERGY_COST,
            },
            phase: 0.0,
            siphon: 0.0,
            drones: 0.0,
            stats: RunStats {
                time: 0.0,
                max_mass: config::PLAYER_START_MASS,
                kills: 0,
            },
        }
    }

    pub fn ability(&self, slot: AbilitySlot) -> &Ability {
        match slot {
            AbilitySlot::Primary => &self.primary,
            AbilitySlot::Secondary => &self.secondary,
        }
    }

    fn ability_mut(&mut self, slot: AbilitySlot) -> &mut Ability {
        match slot {
            AbilitySlot::Primary => &mut self.primary,
            AbilitySlot::Secondary => &mut self.secondary,
        }
    }

    /// Add xp, applying every threshold crossing. Returns whether any level was gained.
    pub fn gain_xp(&mut self, amount: f32) -> bool {
        self.xp += amount;
        let mut leveled = false;
        while self.xp >= self.next_level as f32 {
            self.xp -= self.next_level as f32;
            self.level += 1;
            self.next_level = (self.next_level as f64 * config::XP_THRESHOLD_GROWTH).floor() as u32;
            leveled = true;
        }
        leveled
    }

    pub fn absorb(&mut self, entity: &Entity) {
        self.mass += entity.mass * config::ABSORB_MASS_FRACTION * self.absorption;
        self.radius = self.mass.cbrt() * config::PLAYER_RADIUS_SCALE;
        self.stats.max_mass = self.stats.max_mass.max(self.mass);
        self.stats.kills += 1;
    }

    /// Shield soaks damage first; only the overflow reaches integrity.
    pub fn take_damage(&mut self, amount: f32) {
        let overflow = amount - self.shield;
        self.shield = (self.shield - amount).clamp(0.0, self.max_shield);
        if overflow > 0.0 {
            self.integrity = (self.integrity - overflow).clamp(0.0, self.max_integrity);
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.integrity <= 0.0
    }

    pub fn add_energy(&mut self, amount: f32) {
        self.energy = (self.energy + amount).clamp(0.0, self.max_energy);
    }

    pub fn spend_energy(&mut self, amount: f32) {
        self.add_energy(-amount);
    }

    /// Regenerate resources, advance run stats and tick cooldowns.
    pub fn update(&mut self, delta: f32) {
        self.stats.time += delta;
        self.stats.max_mass = self.stats.max_mass.max(self.mass);
        self.energy = (self.energy + delta * config::ENERGY_REGEN).clamp(0.0, self.max_energy);
        self.shield = (self.shield + delta * config::SHIELD_REGEN).clamp(0.0, self.max_shield);
        let step = delta * (1.0 + self.cooldown_reduction);
        for ability in [&mut self.primary, &mut self.secondary] {
            ability.cooldown = (ability.cooldown - step).clamp(0.0, ability.max_cooldown);
        }
    }

    pub fn tick_status(&mut self, delta: f32) {
        self.phase = (self.phase - delta).max(0.0);
        self.siphon = (self.siphon - delta).max(0.0);
        self.drones = (self.drones - delta * config::DRONE_DECAY).max(0.0);
    }

    pub fn is_phased(&self) -> bool {
        self.phase > 0.0
    }

    /// Fire the ability in `slot` if it is off cooldown and affordable.
    pub fn try_activate(&mut self, slot: AbilitySlot) -> Option<AbilityKind> {
        let energy = self.energy;
        let ability = self.ability_mut(slot);
        if !ability.ready() || energy < ability.energy_cost {
            return None;
        }
        ability.cooldown = ability.max_cooldown;
        let (kind, cost) = (ability.kind, ability.energy_cost);
        self.spend_energy(cost);
        Some(kind)
    }

    pub fn set_form(&mut self, form: Form) {
        let base = form.profile();
        self.form = form;
        self.speed = base.speed;
        self.max_energy = base.max_energy;
        self.energy = self.energy.min(self.max_energy);
        self.max_shield = base.shield;
        self.shield = self.shield.min(self.max_shield);
        self.absorption = base.absorption;
        self.primary.kind = base.ability;
    }

    /// Unknown names leave the player untouched.
    pub fn set_form_by_name(&mut self, name: &str) {
        if let Some(form) = Form::from_name(name) {
            self.set_form(form);
        }
    }

    pub fn apply_upgrade(&mut self, upgrade: &Upgrade, chosen_form: Option<Form>) {
        match upgrade.effect {
            UpgradeEffect::Absorption(amount) => self.absorption += amount,
            UpgradeEffect::MaxEnergy(amount) => {
                self.max_energy += amount;
                self.energy += amount;
            }
            UpgradeEffect::BoostEfficiency(factor) => self.boost_efficiency *= factor,
            UpgradeEffect::MaxShield(amount) => {
                self.max_shield += amount;
                self.shield += amount;
            }
            UpgradeEffect::GravityResistance(amount) => self.gravity_resistance += amount,
            UpgradeEffect::HarvestBonus(amount) => self.harvest_bonus += amount,
            UpgradeEffect::MagnetRadius(amount) => self.magnet_radius += amount,
            UpgradeEffect::CooldownReduction(amount) => self.cooldown_reduction += amount,
            UpgradeEffect::OrbitAssist => self.orbit_assist = true,
            UpgradeEffect::FormChoice => {
                if let Some(form) = chosen_form {
                    self.set_form(form);
                }
            }
        }
        self.energy = self.energy.clamp(0.0, self.max_energy);
        self.shield = self.shield.clamp(0.0, self.max_shield);
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Body for Player {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use crate::upgrades::{upgrade_by_id, FORM_CHOICE_ID};

    fn mote_of_mass(mass: f32) -> Entity {
        let mut e = Entity::new(EntityKind::Mote, Vec3::ZERO, Vec3::ZERO, 1.0);
        e.mass = mass;
        e
    }

    #[test]
    fn absorbing_a_unit_mote_as_photon_drifter() {
        let mut player = Player::new();
        assert_eq!(player.absorption, 1.2);
        player.absorb(&mote_of_mass(1.0));
        assert!((player.mass - 6.24).abs() < 1e-5);
        assert!((player.radius - 6.24f32.cbrt() * 1.2).abs() < 1e-5);
        assert!((player.radius - 2.2093).abs() < 1e-3);
        assert_eq!(player.stats.kills, 1);
    }

    #[test]
    fn gain_xp_applies_every_crossing_but_reports_once() {
        let mut player = Player::new();
        assert!(!player.gain_xp(29.0));
        // 30 + 39 + 50 = 119 needed for three levels.
        assert!(player.gain_xp(100.0));
        assert_eq!(player.level, 4);
        assert_eq!(player.next_level, 65);
        assert!((player.xp - 10.0).abs() < 1e-4);
    }

    #[test]
    fn shield_soaks_damage_before_integrity() {
        let mut player = Player::new();
        player.take_damage(10.0);
        assert_eq!(player.shield, 20.0);
        assert_eq!(player.integrity, 100.0);

        player.take_damage(50.0);
        assert_eq!(player.shield, 0.0);
        assert_eq!(player.integrity, 70.0);

        player.take_damage(500.0);
        assert_eq!(player.integrity, 0.0);
        assert!(player.is_destroyed());
    }

    #[test]
    fn update_regenerates_and_clamps() {
        let mut player = Player::new();
        player.energy = 0.0;
        player.shield = 0.0;
        player.primary.cooldown = 1.0;
        player.cooldown_reduction = 1.0;
        player.update(0.25);
        assert!((player.energy - 1.5).abs() < 1e-5);
        assert!((player.shield - 0.5).abs() < 1e-5);
        assert!((player.primary.cooldown - 0.5).abs() < 1e-5);

        player.update(100.0);
        assert_eq!(player.energy, player.max_energy);
        assert_eq!(player.shield, player.max_shield);
        assert_eq!(player.primary.cooldown, 0.0);
        assert!((player.stats.time - 100.25).abs() < 1e-3);
    }

    #[test]
    fn set_form_clamps_resources_and_swaps_primary() {
        let mut player = Player::new();
        player.set_form(Form::TitanSeed);
        assert_eq!(player.max_energy, 160.0);
        assert_eq!(player.energy, 120.0);
        assert_eq!(player.primary.kind, AbilityKind::PulseShockwave);

        player.set_form_by_name("Nova Sprinter");
        assert_eq!(player.form, Form::NovaSprinter);
        assert_eq!(player.energy, 100.0);
        assert_eq!(player.shield, 25.0);
        assert_eq!(player.secondary.kind, AbilityKind::SolarSiphon);

        player.set_form_by_name("Unknown Form");
        assert_eq!(player.form, Form::NovaSprinter);
    }

    #[test]
    fn activation_needs_cooldown_and_energy() {
        let mut player = Player::new();
        assert_eq!(player.try_activate(AbilitySlot::Primary), Some(AbilityKind::WarpDash));
        assert_eq!(player.energy, 95.0);
        assert_eq!(player.primary.cooldown, 8.0);
        assert_eq!(player.try_activate(AbilitySlot::Primary), None);

        player.energy = 10.0;
        assert_eq!(player.try_activate(AbilitySlot::Secondary), None);
        assert_eq!(player.secondary.cooldown, 0.0);
    }

    #[test]
    fn upgrades_mutate_modifiers() {
        let mut player = Player::new();
        player.apply_upgrade(upgrade_by_id("max-energy").unwrap(), None);
        assert_eq!(player.max_energy, 145.0);
        assert_eq!(player.energy, 145.0);

        player.apply_upgrade(upgrade_by_id("boost-efficiency").unwrap(), None);
        player.apply_upgrade(upgrade_by_id("boost-efficiency").unwrap(), None);
        assert!((player.boost_efficiency - 0.64).abs() < 1e-5);

        player.apply_upgrade(upgrade_by_id("orbit-stability").unwrap(), None);
        assert!(player.orbit_assist);

        let choice = upgrade_by_id(FORM_CHOICE_ID).unwrap();
        player.apply_upgrade(choice, None);
        assert_eq!(player.form, Form::PhotonDrifter);
        player.apply_upgrade(choice, Some(Form::GravWeaver));
        assert_eq!(player.form, Form::GravWeaver);
        assert_eq!(player.primary.kind, AbilityKind::GravityWell);
    }

    #[test]
    fn status_timers_floor_at_zero() {
        let mut player = Player::new();
        player.phase = 0.5;
        player.siphon = 4.0;
        player.drones = 3.0;
        player.tick_status(1.0);
        assert_eq!(player.phase, 0.0);
        assert_eq!(player.siphon, 3.0);
        assert!((player.drones - 2.6).abs() < 1e-5);
        assert!(!player.is_phased());
    }
}
