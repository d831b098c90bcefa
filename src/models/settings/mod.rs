// Settings module
// Tunables for recurrence expansion, persisted as TOML

use serde::{Deserialize, Serialize};

use crate::services::recurrence::DEFAULT_CYCLE_LIMIT;
use crate::utils::date::{parse_timezone, OCCURRENCE_FORMAT};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorSettings {
    /// Termination checks allowed per computation before giving up.
    pub cycle_limit: usize,
    /// IANA zone used when a request does not name one.
    pub default_timezone: String,
    /// chrono format string for occurrence output.
    pub output_format: String,
}

impl CalculatorSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.cycle_limit == 0 {
            return Err("Cycle limit must be greater than 0".to_string());
        }

        if parse_timezone(&self.default_timezone).is_err() {
            return Err(format!(
                "Default timezone '{}' is not a known IANA zone",
                self.default_timezone
            ));
        }

        if self.output_format.trim().is_empty() {
            return Err("Output format cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Default for CalculatorSettings {
    fn default() -> Self {
        Self {
            cycle_limit: DEFAULT_CYCLE_LIMIT,
            default_timezone: "UTC".to_string(),
            output_format: OCCURRENCE_FORMAT.to_string(),
        }
    }
}
