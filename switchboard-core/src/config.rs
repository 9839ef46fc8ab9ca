use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Hard cap on tool-call rounds per orchestration run. Guarantees loop
/// termination independent of delegation-cycle detection.
pub const MAX_TOOL_ROUNDS: usize = 10;

/// Maximum delegation chain length before `call_agent` is rejected.
pub const MAX_DELEGATION_DEPTH: usize = 4;

const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 60;
const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TRANSIENT_RETRIES: u32 = 1;

/// Runtime configuration, loadable from `SWITCHBOARD_*` environment
/// variables with defaults suitable for local runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub log_level: String,
    pub max_tool_rounds: usize,
    pub max_delegation_depth: usize,
    pub completion_timeout_secs: u64,
    pub tool_timeout_secs: u64,
    /// Retries granted to transient adapter failures and timed-out calls.
    pub transient_retries: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            max_tool_rounds: MAX_TOOL_ROUNDS,
            max_delegation_depth: MAX_DELEGATION_DEPTH,
            completion_timeout_secs: DEFAULT_COMPLETION_TIMEOUT_SECS,
            tool_timeout_secs: DEFAULT_TOOL_TIMEOUT_SECS,
            transient_retries: DEFAULT_TRANSIENT_RETRIES,
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_level: env_string("SWITCHBOARD_LOG_LEVEL", defaults.log_level),
            max_tool_rounds: env_parse("SWITCHBOARD_MAX_TOOL_ROUNDS", defaults.max_tool_rounds),
            max_delegation_depth: env_parse(
                "SWITCHBOARD_MAX_DELEGATION_DEPTH",
                defaults.max_delegation_depth,
            ),
            completion_timeout_secs: env_parse(
                "SWITCHBOARD_COMPLETION_TIMEOUT_SECS",
                defaults.completion_timeout_secs,
            ),
            tool_timeout_secs: env_parse(
                "SWITCHBOARD_TOOL_TIMEOUT_SECS",
                defaults.tool_timeout_secs,
            ),
            transient_retries: env_parse(
                "SWITCHBOARD_TRANSIENT_RETRIES",
                defaults.transient_retries,
            ),
        }
    }

    pub fn completion_timeout(&self) -> Duration {
        Duration::from_secs(self.completion_timeout_secs)
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }
}

fn env_string(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
