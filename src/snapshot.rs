use std::sync::{Arc, Mutex};

use macroquad::prelude::*;
use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, EntityKind};
use crate::forms::{AbilityKind, Form};
use crate::game::GameState;
use crate::player::{AbilitySlot, Player};
use crate::settings::Settings;
use crate::storage::BestRun;
use crate::upgrades::{Rarity, UpgradeOffer};

// Serde-friendly wrapper for macroquad vectors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SerdVec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Vec3> for SerdVec3 {
    fn from(v: Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<SerdVec3> for Vec3 {
    fn from(v: SerdVec3) -> Self {
        vec3(v.x, v.y, v.z)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityView {
    pub kind: AbilityKind,
    pub name: String,
    pub cooldown: f32,
    pub max_cooldown: f32,
    pub energy_cost: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub position: SerdVec3,
    pub velocity: SerdVec3,
    pub mass: f32,
    pub radius: f32,
    pub integrity: f32,
    pub shield: f32,
    pub max_shield: f32,
    pub energy: f32,
    pub max_energy: f32,
    pub level: u32,
    pub xp: f32,
    pub next_level: u32,
    pub form: Form,
    pub form_name: String,
    pub passive: String,
    pub phased: bool,
    pub drones_active: bool,
    pub siphon_active: bool,
    pub primary: AbilityView,
    pub secondary: AbilityView,
    pub time: f32,
    pub max_mass: f32,
    pub kills: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RadarBlip {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: SerdVec3,
    pub radius: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub rarity: Rarity,
    pub forms: Vec<Form>,
}

impl From<&UpgradeOffer> for OfferView {
    fn from(offer: &UpgradeOffer) -> Self {
        Self {
            id: offer.upgrade.id.to_string(),
            name: offer.upgrade.name.to_string(),
            description: offer.upgrade.description.to_string(),
            tags: offer.upgrade.tags.iter().map(|t| t.to_string()).collect(),
            rarity: offer.rarity,
            forms: offer.forms.clone(),
        }
    }
}

/// Owned, read-only projection of the game between ticks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub tick: u64,
    pub state: GameState,
    pub player: PlayerView,
    pub radar: Vec<RadarBlip>,
    pub offers: Vec<OfferView>,
    pub best: BestRun,
    pub settings: Settings,
}

impl PlayerView {
    pub fn from_player(player: &Player) -> Self {
        let ability = |a: &crate::player::Ability| AbilityView {
            kind: a.kind,
            name: a.kind.label().to_string(),
            cooldown: a.cooldown,
            max_cooldown: a.max_cooldown,
            energy_cost: a.energy_cost,
        };
        Self {
            position: player.pos.into(),
            velocity: player.velocity.into(),
            mass: player.mass,
            radius: player.radius,
            integrity: player.integrity,
            shield: player.shield,
            max_shield: player.max_shield,
            energy: player.energy,
            max_energy: player.max_energy,
            level: player.level,
            xp: player.xp,
            next_level: player.next_level,
            form: player.form,
            form_name: player.form.label().to_string(),
            passive: player.form.profile().passive.to_string(),
            phased: player.is_phased(),
            drones_active: player.drones > 0.0,
            siphon_active: player.siphon > 0.0,
            primary: ability(player.ability(AbilitySlot::Primary)),
            secondary: ability(player.ability(AbilitySlot::Secondary)),
            time: player.stats.time,
            max_mass: player.stats.max_mass,
            kills: player.stats.kills,
        }
    }
}

/// Single-writer handoff of the latest snapshot to reader threads.
#[derive(Clone)]
pub struct SnapshotPublisher {
    latest: Arc<Mutex<Arc<Snapshot>>>,
}

impl SnapshotPublisher {
    pub fn new(initial: Snapshot) -> Self {
        Self {
            latest: Arc::new(Mutex::new(Arc::new(initial))),
        }
    }

    /// Swap in a new snapshot. Readers holding the old one keep it intact.
    pub fn publish(&self, snapshot: Snapshot) {
        let next = Arc::new(snapshot);
        match self.latest.lock() {
            Ok(mut slot) => *slot = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }

    pub fn latest(&self) -> Arc<Snapshot> {
        match self.latest.lock() {
            Ok(slot) => Arc::clone(&*slot),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }
}
