use ::rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::forms::Form;

pub const FORM_CHOICE_ID: &str = "form-choice";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
}

impl Rarity {
    /// Map a uniform draw in [0, 1) onto the 72/20/8 split.
    pub fn from_roll(roll: f32) -> Self {
        if roll <= config::RARITY_COMMON_CUTOFF {
            Self::Common
        } else if roll <= config::RARITY_RARE_CUTOFF {
            Self::Rare
        } else {
            Self::Epic
        }
    }

    pub fn roll(rng: &mut impl Rng) -> Self {
        Self::from_roll(rng.gen::<f32>())
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Rare => "rare",
            Self::Epic => "epic",
        }
    }
}

/// Mutation an upgrade performs on the player, interpreted by `Player::apply_upgrade`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UpgradeEffect {
    Absorption(f32),
    MaxEnergy(f32),
    BoostEfficiency(f32),
    MaxShield(f32),
    GravityResistance(f32),
    HarvestBonus(f32),
    MagnetRadius(f32),
    CooldownReduction(f32),
    OrbitAssist,
    FormChoice,
}

#[derive(Debug, PartialEq)]
pub struct Upgrade {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub tags: &'static [&'static str],
    pub effect: UpgradeEffect,
}

impl Upgrade {
    pub fn is_form_choice(&self) -> bool {
        self.effect == UpgradeEffect::FormChoice
    }
}

pub static UPGRADE_POOL: [Upgrade; 9] = [
    Upgrade {
        id: "mass-gain",
        name: "Assimilation Boost",
        description: "+20% mass gain from absorption.",
        tags: &["growth"],
        effect: UpgradeEffect::Absorption(0.2),
    },
    Upgrade {
        id: "max-energy",
        name: "Expanded Core",
        description: "+25 max energy.",
        tags: &["energy"],
        effect: UpgradeEffect::MaxEnergy(25.0),
    },
    Upgrade {
        id: "boost-efficiency",
        name: "Ion Spars",
        description: "Boost costs 20% less energy.",
        tags: &["mobility"],
        effect: UpgradeEffect::BoostEfficiency(0.8),
    },
    Upgrade {
        id: "shield-regen",
        name: "Radiant Plating",
        description: "+15 max shield.",
        tags: &["defense"],
        effect: UpgradeEffect::MaxShield(15.0),
    },
    Upgrade {
        id: "gravity-resistance",
        name: "Grav Insulation",
        description: "Reduce gravity pull by 15%.",
        tags: &["gravity"],
        effect: UpgradeEffect::GravityResistance(0.15),
    },
    Upgrade {
        id: "harvest-efficiency",
        name: "Solar Lattice",
        description: "+30% harvest efficiency near stars.",
        tags: &["harvest"],
        effect: UpgradeEffect::HarvestBonus(0.3),
    },
    Upgrade {
        id: "magnet-radius",
        name: "Magnet Halo",
        description: "+6 pickup radius for motes.",
        tags: &["utility"],
        effect: UpgradeEffect::MagnetRadius(6.0),
    },
    Upgrade {
        id: "cooldown-reduction",
        name: "Quantum Focus",
        description: "+15% ability cooldown reduction.",
        tags: &["ability"],
        effect: UpgradeEffect::CooldownReduction(0.15),
    },
    Upgrade {
        id: "orbit-stability",
        name: "Orbit Stabilizers",
        description: "Unlock orbit assist toggle.",
        tags: &["gravity"],
        effect: UpgradeEffect::OrbitAssist,
    },
];

pub static FORM_CHOICE: Upgrade = Upgrade {
    id: FORM_CHOICE_ID,
    name: "Evolution Shift",
    description: "Choose a new cosmic form.",
    tags: &["form"],
    effect: UpgradeEffect::FormChoice,
};

pub fn upgrade_by_id(id: &str) -> Option<&'static Upgrade> {
    if id == FORM_CHOICE_ID {
        return Some(&FORM_CHOICE);
    }
    UPGRADE_POOL.iter().find(|u| u.id == id)
}

/// One entry of an upgrade selection screen.
#[derive(Clone, Debug, PartialEq)]
pub struct UpgradeOffer {
    pub upgrade: &'static Upgrade,
    pub rarity: Rarity,
    /// Selectable forms; empty unless this is the form choice.
    pub forms: Vec<Form>,
}

/// Build the offer list for `level`: three pool draws, preceded by the form
/// choice on every fifth level.
pub fn roll_upgrades(level: u32, rng: &mut impl Rng) -> Vec<UpgradeOffer> {
    let mut offers = Vec::with_capacity(config::UPGRADE_OFFER_COUNT + 1);
    if level % config::FORM_MILESTONE == 0 {
        offers.push(UpgradeOffer {
            upgrade: &FORM_CHOICE,
            rarity: Rarity::Epic,
            forms: Form::ALL.to_vec(),
        });
    }
    for _ in 0..config::UPGRADE_OFFER_COUNT {
        let upgrade = &UPGRADE_POOL[rng.gen_range(0..UPGRADE_POOL.len())];
        offers.push(UpgradeOffer {
            upgrade,
            rarity: Rarity::roll(rng),
            forms: Vec::new(),
        });
    }
    offers
}

/// Population scaling factor; saturates once the player reaches mass 160.
pub fn difficulty_for_mass(mass: f32) -> f32 {
    (mass / config::DIFFICULTY_MASS_SCALE).clamp(0.0, config::DIFFICULTY_MAX)
}
