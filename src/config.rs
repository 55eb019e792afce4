/// Project configuration for one crawl run.
///
/// Constructed once before the crawl starts (from a JSON file or by the
/// embedding application) and passed by parameter throughout; there is no
/// ambient or interactively-derived state.
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Free-form project identifier, used in report headers and log lines.
    pub project_id: String,
    /// Number of days the project runs.
    pub total_days: u32,
    /// Expected number of posts per project day, keyed by day (1-based).
    pub tasks_per_day: BTreeMap<u32, u32>,
    /// Current project day, 1..=total_days.
    pub current_day: u32,
    /// Early-exit policy for low-cost verification runs.
    #[serde(default)]
    pub sample_mode: bool,
    /// Number of authenticated participants to process in sample mode.
    #[serde(default = "default_sample_limit")]
    pub sample_limit: u32,
    /// Hard cap on listing pages, guarding against a next-page control that
    /// never disappears.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

fn default_sample_limit() -> u32 {
    3
}

fn default_max_pages() -> u32 {
    50
}

impl ProjectConfig {
    /// Load and validate a configuration from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: ProjectConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config JSON from: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants: current day inside the project span, a quota
    /// entry for every day, a usable page cap.
    pub fn validate(&self) -> Result<()> {
        if self.total_days == 0 {
            bail!("total_days must be at least 1");
        }
        if self.current_day == 0 || self.current_day > self.total_days {
            bail!(
                "current_day {} outside project span 1..={}",
                self.current_day,
                self.total_days
            );
        }
        for day in 1..=self.total_days {
            if !self.tasks_per_day.contains_key(&day) {
                bail!("tasks_per_day is missing an entry for day {}", day);
            }
        }
        if self.max_pages == 0 {
            bail!("max_pages must be at least 1");
        }
        Ok(())
    }

    /// Posts a participant should have written before today started
    /// (sum of quotas for days 1..current_day-1).
    pub fn expected_minimum_before_today(&self) -> u32 {
        (1..self.current_day)
            .map(|day| self.tasks_per_day.get(&day).copied().unwrap_or(0))
            .sum()
    }

    /// Cumulative quota through the end of today.
    pub fn expected_through_today(&self) -> u32 {
        (1..=self.current_day)
            .map(|day| self.tasks_per_day.get(&day).copied().unwrap_or(0))
            .sum()
    }
}
