use serde::{Deserialize, Serialize};

use crate::entity::EntityKind;
use crate::game::{GameController, GameState};
use crate::storage::BestRun;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub p50: f64,
    pub p90: f64,
    pub last: f64,
}

/// Streaming samples of one scalar over a run.
#[derive(Debug, Clone)]
pub struct MetricAggregator {
    samples: Vec<f64>,
    sum: f64,
    min: f64,
    max: f64,
    last: f64,
}

impl Default for MetricAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricAggregator {
    pub fn new() -> Self {
        Self {
            samples: Vec::new(),
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            last: 0.0,
        }
    }

    /// Record one tick's reading. Non-finite readings are skipped.
    pub fn push(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.samples.push(value);
        self.sum += value;
        self.min = value.min(self.min);
        self.max = value.max(self.max);
        self.last = value;
    }

    pub fn summary(&self) -> MetricSummary {
        if self.samples.is_empty() {
            return MetricSummary::default();
        }
        let mut sorted = self.samples.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));

        MetricSummary {
            count: sorted.len(),
            min: self.min,
            max: self.max,
            mean: self.sum / sorted.len() as f64,
            p50: nearest_rank(&sorted, 0.50),
            p90: nearest_rank(&sorted, 0.90),
            last: self.last,
        }
    }
}

fn nearest_rank(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = ((p.clamp(0.0, 1.0) * sorted.len() as f64).ceil() as usize).saturating_sub(1);
    sorted[rank.min(sorted.len() - 1)]
}

/// Per-tick sampler for a headless run.
#[derive(Debug, Clone, Default)]
pub struct RunRecorder {
    pub entities: MetricAggregator,
    pub motes: MetricAggregator,
    pub mass: MetricAggregator,
    pub integrity: MetricAggregator,
    pub energy: MetricAggregator,
    pub upgrades: Vec<String>,
}

impl RunRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample(&mut self, game: &GameController) {
        self.entities.push(game.world.len() as f64);
        self.motes.push(game.world.count_of(EntityKind::Mote) as f64);
        self.mass.push(game.player.mass as f64);
        self.integrity.push(game.player.integrity as f64);
        self.energy.push(game.player.energy as f64);
    }

    pub fn record_upgrade(&mut self, id: &str) {
        self.upgrades.push(id.to_string());
    }

    pub fn finish(&self, seed: u64, game: &GameController) -> RunReport {
        RunReport {
            seed,
            ticks: game.tick_count,
            survived: game.state != GameState::GameOver,
            time: game.player.stats.time,
            level: game.player.level,
            kills: game.player.stats.kills,
            form: game.player.form.label().to_string(),
            upgrades: self.upgrades.clone(),
            best: game.best,
            entities: self.entities.summary(),
            motes: self.motes.summary(),
            mass: self.mass.summary(),
            integrity: self.integrity.summary(),
            energy: self.energy.summary(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub seed: u64,
    pub ticks: u64,
    pub survived: bool,
    pub time: f32,
    pub level: u32,
    pub kills: u32,
    pub form: String,
    pub upgrades: Vec<String>,
    pub best: BestRun,
    pub entities: MetricSummary,
    pub motes: MetricSummary,
    pub mass: MetricSummary,
    pub integrity: MetricSummary,
    pub energy: MetricSummary,
}
