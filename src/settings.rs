use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    Med,
    High,
}

impl Quality {
    pub const ALL: [Self; 3] = [Self::Low, Self::Med, Self::High];

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Med => "med",
            Self::High => "high",
        }
    }

    pub fn parse_cli(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "med" | "medium" => Some(Self::Med),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// User options. Only `orbit_assist` reaches the simulation; the rest are carried
/// through for presentation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub orbit_assist: bool,
    pub screen_shake: bool,
    pub quality: Quality,
    pub volume: f32,
    pub muted: bool,
    pub cinematic: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            orbit_assist: false,
            screen_shake: true,
            quality: Quality::High,
            volume: 0.6,
            muted: false,
            cinematic: false,
        }
    }
}

impl Settings {
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self
    }

    /// Clamp out-of-range values read from storage.
    pub fn sanitized(self) -> Self {
        let volume = if self.volume.is_finite() { self.volume } else { 0.6 };
        self.with_volume(volume)
    }
}
