use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::schema::AgencyType;

pub const FEDERAL_RESPONSE_DAYS: u32 = 20;
pub const FALLBACK_RESPONSE_DAYS: u32 = 20;

/// Statutory response windows, in business days, per jurisdiction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseWindows {
    pub federal_days: u32,
    pub fallback_days: u32,
    pub state_days: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, Deserialize)]
struct WindowsFile {
    federal_days: Option<u32>,
    fallback_days: Option<u32>,
    #[serde(default)]
    states: BTreeMap<String, u32>,
}

impl Default for ResponseWindows {
    fn default() -> Self {
        let state_days = [("MO", 3), ("IN", 7), ("MN", 10)]
            .into_iter()
            .map(|(code, days)| (code.to_string(), days))
            .collect();
        Self {
            federal_days: FEDERAL_RESPONSE_DAYS,
            fallback_days: FALLBACK_RESPONSE_DAYS,
            state_days,
        }
    }
}

impl ResponseWindows {
    /// Loads a window table from a `.toml`, `.yaml` or `.yml` file. Missing
    /// keys fall back to the built-in table.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let file: WindowsFile = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&raw)?,
            Some("yaml" | "yml") => serde_yaml::from_str(&raw)?,
            _ => return Err(anyhow!("Unsupported window table format: {}", path.display())),
        };
        let windows = Self::from_file(file)?;
        tracing::debug!(
            path = %path.display(),
            states = windows.state_days.len(),
            "loaded response windows"
        );
        Ok(windows)
    }

    fn from_file(file: WindowsFile) -> Result<Self> {
        let defaults = Self::default();
        let mut state_days = defaults.state_days;
        for (code, days) in file.states {
            let code = normalize_state_code(&code);
            if code.is_empty() {
                return Err(anyhow!("Empty state code in window table"));
            }
            state_days.insert(code, days);
        }
        let windows = Self {
            federal_days: file.federal_days.unwrap_or(defaults.federal_days),
            fallback_days: file.fallback_days.unwrap_or(defaults.fallback_days),
            state_days,
        };
        if windows.federal_days == 0
            || windows.fallback_days == 0
            || windows.state_days.values().any(|days| *days == 0)
        {
            return Err(anyhow!("Response windows must be at least one business day"));
        }
        Ok(windows)
    }

    /// Business days an agency has to respond.
    pub fn window_for(&self, agency_type: AgencyType, state_code: Option<&str>) -> u32 {
        match agency_type {
            AgencyType::Federal => self.federal_days,
            AgencyType::State | AgencyType::Local => state_code
                .map(normalize_state_code)
                .and_then(|code| self.state_days.get(&code).copied())
                .unwrap_or(self.fallback_days),
        }
    }
}

pub fn normalize_state_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
