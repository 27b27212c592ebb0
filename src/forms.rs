use serde::{Deserialize, Serialize};

/// Ability carried in a player slot. Each kind has its own effect in the game step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityKind {
    WarpDash,
    GravityWell,
    PhaseShift,
    PulseShockwave,
    EchoDrones,
    SolarSiphon,
}

impl AbilityKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::WarpDash => "Warp Dash",
            Self::GravityWell => "Gravity Well",
            Self::PhaseShift => "Phase Shift",
            Self::PulseShockwave => "Pulse Shockwave",
            Self::EchoDrones => "Echo Drones",
            Self::SolarSiphon => "Solar Siphon",
        }
    }
}

/// Stat profile of a form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FormProfile {
    pub speed: f32,
    pub max_energy: f32,
    pub absorption: f32,
    pub shield: f32,
    pub ability: AbilityKind,
    pub passive: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Form {
    #[default]
    PhotonDrifter,
    GravWeaver,
    VoidLeech,
    TitanSeed,
    NovaSprinter,
}

impl Form {
    pub const ALL: [Self; 5] = [
        Self::PhotonDrifter,
        Self::GravWeaver,
        Self::VoidLeech,
        Self::TitanSeed,
        Self::NovaSprinter,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::PhotonDrifter => "Photon Drifter",
            Self::GravWeaver => "Grav Weaver",
            Self::VoidLeech => "Void Leech",
            Self::TitanSeed => "Titan Seed",
            Self::NovaSprinter => "Nova Sprinter",
        }
    }

    /// Look a form up by its display name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.label() == name)
    }

    pub fn profile(self) -> FormProfile {
        match self {
            Self::PhotonDrifter => FormProfile {
                speed: 5.0,
                max_energy: 120.0,
                absorption: 1.2,
                shield: 30.0,
                ability: AbilityKind::WarpDash,
                passive: "Gains bonus energy near stars.",
            },
            Self::GravWeaver => FormProfile {
                speed: 4.2,
                max_energy: 140.0,
                absorption: 1.0,
                shield: 45.0,
                ability: AbilityKind::GravityWell,
                passive: "Gravity resistance increases.",
            },
            Self::VoidLeech => FormProfile {
                speed: 4.0,
                max_energy: 110.0,
                absorption: 1.3,
                shield: 35.0,
                ability: AbilityKind::PhaseShift,
                passive: "Steals energy from hunters.",
            },
            Self::TitanSeed => FormProfile {
                speed: 3.2,
                max_energy: 160.0,
                absorption: 1.5,
                shield: 70.0,
                ability: AbilityKind::PulseShockwave,
                passive: "Growth multiplier on absorb.",
            },
            Self::NovaSprinter => FormProfile {
                speed: 5.5,
                max_energy: 100.0,
                absorption: 1.0,
                shield: 25.0,
                ability: AbilityKind::EchoDrones,
                passive: "Chain boosts recharge faster.",
            },
        }
    }
}
