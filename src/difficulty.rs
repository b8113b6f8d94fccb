//! Level progression and fall speed
//!
//! The level only goes up during a game. Every level change recomputes the
//! gravity interval and the named tier from the same source, so the three
//! values never disagree.

use crate::error::EngineError;
use crate::events::{EventQueue, GameEvent};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Named difficulty tiers, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Beginner,
    Novice,
    Intermediate,
    Advanced,
    Expert,
    Master,
    Grandmaster,
}

/// Minimum level for each tier, ascending
pub const TIER_THRESHOLDS: [(u32, Tier); 7] = [
    (1, Tier::Beginner),
    (4, Tier::Novice),
    (7, Tier::Intermediate),
    (10, Tier::Advanced),
    (15, Tier::Expert),
    (20, Tier::Master),
    (25, Tier::Grandmaster),
];

impl Tier {
    /// Highest tier whose threshold is at or below `level`
    pub fn for_level(level: u32) -> Tier {
        TIER_THRESHOLDS
            .iter()
            .take_while(|(threshold, _)| *threshold <= level)
            .last()
            .map_or(Tier::Beginner, |&(_, tier)| tier)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tier::Beginner => "Beginner",
            Tier::Novice => "Novice",
            Tier::Intermediate => "Intermediate",
            Tier::Advanced => "Advanced",
            Tier::Expert => "Expert",
            Tier::Master => "Master",
            Tier::Grandmaster => "Grandmaster",
        }
    }
}

/// How the gravity interval shrinks as the level rises
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpeedCurve {
    /// `base * decay^(level - 1)`
    Exponential { decay: f64 },
    /// `base - step_ms * (level - 1)`
    Linear { step_ms: u64 },
}

impl Default for SpeedCurve {
    fn default() -> Self {
        SpeedCurve::Exponential { decay: 0.8 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    pub max_level: u32,
    pub lines_per_level: u32,
    /// Gravity interval at level 1
    pub base_interval_ms: u64,
    /// Floor for the gravity interval
    pub min_interval_ms: u64,
    pub curve: SpeedCurve,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            max_level: 30,
            lines_per_level: 10,
            base_interval_ms: 1000,
            min_interval_ms: 50,
            curve: SpeedCurve::default(),
        }
    }
}

impl DifficultyConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.max_level == 0 {
            return Err(EngineError::InvalidConfig("max_level must be at least 1".into()));
        }
        if self.lines_per_level == 0 {
            return Err(EngineError::InvalidConfig(
                "lines_per_level must be at least 1".into(),
            ));
        }
        if self.min_interval_ms == 0 || self.min_interval_ms > self.base_interval_ms {
            return Err(EngineError::InvalidConfig(format!(
                "min_interval_ms must be in 1..={}",
                self.base_interval_ms
            )));
        }
        if let SpeedCurve::Exponential { decay } = self.curve {
            if !(decay > 0.0 && decay <= 1.0) {
                return Err(EngineError::InvalidConfig(format!(
                    "decay must be in (0, 1], got {}",
                    decay
                )));
            }
        }
        Ok(())
    }

    /// Gravity interval for a level, clamped to the minimum
    pub fn interval_for(&self, level: u32) -> Duration {
        let steps = level.saturating_sub(1);
        let millis = match self.curve {
            SpeedCurve::Exponential { decay } => {
                let raw = self.base_interval_ms as f64 * decay.powi(steps as i32);
                raw.round() as u64
            }
            SpeedCurve::Linear { step_ms } => self
                .base_interval_ms
                .saturating_sub(step_ms.saturating_mul(u64::from(steps))),
        };
        Duration::from_millis(millis.max(self.min_interval_ms))
    }
}

/// Progress toward the next level
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelProgress {
    pub lines_in_level: u32,
    pub lines_per_level: u32,
    pub lines_to_next: u32,
    /// 0.0..=100.0
    pub percent: f64,
    pub is_max_level: bool,
}

#[derive(Debug, Clone)]
pub struct DifficultyController {
    config: DifficultyConfig,
    level: u32,
    current_level_lines: u32,
    drop_interval: Duration,
    tier: Tier,
}

impl Default for DifficultyController {
    fn default() -> Self {
        Self::from_config(DifficultyConfig::default())
    }
}

impl DifficultyController {
    pub fn new(config: DifficultyConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: DifficultyConfig) -> Self {
        let drop_interval = config.interval_for(1);
        Self {
            config,
            level: 1,
            current_level_lines: 0,
            drop_interval,
            tier: Tier::for_level(1),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::from_config(self.config.clone());
    }

    pub fn config(&self) -> &DifficultyConfig {
        &self.config
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn current_level_lines(&self) -> u32 {
        self.current_level_lines
    }

    pub fn drop_interval(&self) -> Duration {
        self.drop_interval
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn is_max_level(&self) -> bool {
        self.level >= self.config.max_level
    }

    /// Feed a batch of cleared lines. Returns true if the level changed.
    /// A large batch can jump several levels at once.
    pub fn process_lines_cleared(&mut self, lines: u32, events: &mut EventQueue) -> bool {
        let old = self.level;
        self.current_level_lines += lines;

        while self.current_level_lines >= self.config.lines_per_level
            && self.level < self.config.max_level
        {
            self.level += 1;
            self.current_level_lines -= self.config.lines_per_level;
        }

        if self.level == old {
            return false;
        }
        self.recompute();
        tracing::info!(
            old,
            new = self.level,
            tier = self.tier.name(),
            interval_ms = self.drop_interval.as_millis() as u64,
            "level up"
        );
        events.push(GameEvent::LevelUpdated {
            new: self.level,
            old,
        });
        true
    }

    /// Out-of-band override, clamped to 1..=max_level
    pub fn set_level(&mut self, level: u32, events: &mut EventQueue) {
        let old = self.level;
        self.level = level.clamp(1, self.config.max_level);
        self.current_level_lines = 0;
        self.recompute();
        if self.level != old {
            events.push(GameEvent::LevelUpdated {
                new: self.level,
                old,
            });
        }
    }

    fn recompute(&mut self) {
        self.drop_interval = self.config.interval_for(self.level);
        self.tier = Tier::for_level(self.level);
    }

    pub fn level_progress(&self) -> LevelProgress {
        let per_level = self.config.lines_per_level;
        if self.is_max_level() {
            return LevelProgress {
                lines_in_level: self.current_level_lines,
                lines_per_level: per_level,
                lines_to_next: 0,
                percent: 100.0,
                is_max_level: true,
            };
        }
        LevelProgress {
            lines_in_level: self.current_level_lines,
            lines_per_level: per_level,
            lines_to_next: per_level - self.current_level_lines,
            percent: f64::from(self.current_level_lines) * 100.0 / f64::from(per_level),
            is_max_level: false,
        }
    }
}
