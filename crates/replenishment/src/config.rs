use serde::{Deserialize, Serialize};

/// Parameters of one metrics run.
///
/// `lead_time_days` and `z_score` are expected to be positive; the engine
/// does not validate them.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplenishmentConfig {
    /// Trailing demand window in calendar days.
    pub window_days: u32,
    /// Days between placing a reorder and stock arriving.
    pub lead_time_days: f64,
    /// Service-level multiplier (1.65 ≈ 95%).
    pub z_score: f64,
}

impl ReplenishmentConfig {
    pub const DEFAULT_WINDOW_DAYS: u32 = 30;
    pub const DEFAULT_LEAD_TIME_DAYS: f64 = 7.0;
    pub const DEFAULT_Z_SCORE: f64 = 1.65;
    /// Longest window accepted from configuration (ten years).
    pub const MAX_WINDOW_DAYS: u32 = 3660;

    pub fn with_window_days(mut self, window_days: u32) -> Self {
        self.window_days = window_days;
        self
    }

    pub fn with_lead_time_days(mut self, lead_time_days: f64) -> Self {
        self.lead_time_days = lead_time_days;
        self
    }

    pub fn with_z_score(mut self, z_score: f64) -> Self {
        self.z_score = z_score;
        self
    }
}

impl Default for ReplenishmentConfig {
    fn default() -> Self {
        Self {
            window_days: Self::DEFAULT_WINDOW_DAYS,
            lead_time_days: Self::DEFAULT_LEAD_TIME_DAYS,
            z_score: Self::DEFAULT_Z_SCORE,
        }
    }
}
