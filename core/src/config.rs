//! Runtime configuration for the announcer and the pollers.
//!
//! Defaults come from environment variables, falling back to the built-in
//! timing constants:
//! - BLOCKSPEAK_MIN_SPEAK_MS, BLOCKSPEAK_HIGH_PREEMPT_MS
//! - BLOCKSPEAK_INTERRUPTION_DELAY_MS, BLOCKSPEAK_SETTLE_MS, BLOCKSPEAK_FORCE_SETTLE_MS
//! - BLOCKSPEAK_POLL_MS, BLOCKSPEAK_PALETTE_POLL_MS

use std::time::Duration;

/// Shortest time an utterance plays before a normal request may cut it off.
pub const MIN_SPEAK_TIME: Duration = Duration::from_millis(500);
/// A high priority request waits at least this long before preempting.
pub const HIGH_PREEMPT_THRESHOLD: Duration = Duration::from_millis(200);
/// Grace added on top of the remaining minimum speak time before a pending
/// utterance forcibly takes over.
pub const INTERRUPTION_DELAY: Duration = Duration::from_millis(300);
/// Pause between cancelling the device and starting the replacement.
pub const SETTLE_DELAY: Duration = Duration::from_millis(50);
/// Pause used by `force_announce`.
pub const FORCE_SETTLE_DELAY: Duration = Duration::from_millis(100);

pub const POLL_INTERVAL: Duration = Duration::from_millis(250);
pub const PALETTE_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Timing policy of the utterance scheduler
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub min_speak_time: Duration,
    pub high_preempt_threshold: Duration,
    pub interruption_delay: Duration,
    pub settle_delay: Duration,
    pub force_settle_delay: Duration,
}

impl SchedulerConfig {
    /// Built-in constants, ignoring the environment.
    pub fn builtin() -> Self {
        Self {
            min_speak_time: MIN_SPEAK_TIME,
            high_preempt_threshold: HIGH_PREEMPT_THRESHOLD,
            interruption_delay: INTERRUPTION_DELAY,
            settle_delay: SETTLE_DELAY,
            force_settle_delay: FORCE_SETTLE_DELAY,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_speak_time: env_ms("BLOCKSPEAK_MIN_SPEAK_MS").unwrap_or(MIN_SPEAK_TIME),
            high_preempt_threshold: env_ms("BLOCKSPEAK_HIGH_PREEMPT_MS")
                .unwrap_or(HIGH_PREEMPT_THRESHOLD),
            interruption_delay: env_ms("BLOCKSPEAK_INTERRUPTION_DELAY_MS")
                .unwrap_or(INTERRUPTION_DELAY),
            settle_delay: env_ms("BLOCKSPEAK_SETTLE_MS").unwrap_or(SETTLE_DELAY),
            force_settle_delay: env_ms("BLOCKSPEAK_FORCE_SETTLE_MS").unwrap_or(FORCE_SETTLE_DELAY),
        }
    }
}

/// Polling cadence for the cursor and palette watchers
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WatcherConfig {
    pub poll_interval: Duration,
    pub palette_poll_interval: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: env_ms("BLOCKSPEAK_POLL_MS")
                .filter(|d| !d.is_zero())
                .unwrap_or(POLL_INTERVAL),
            palette_poll_interval: env_ms("BLOCKSPEAK_PALETTE_POLL_MS")
                .filter(|d| !d.is_zero())
                .unwrap_or(PALETTE_POLL_INTERVAL),
        }
    }
}

fn env_ms(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_constants() {
        let cfg = SchedulerConfig::builtin();
        assert!(cfg.high_preempt_threshold < cfg.min_speak_time);
        assert_eq!(cfg.settle_delay, Duration::from_millis(50));
        assert_eq!(cfg.interruption_delay, Duration::from_millis(300));
    }

    #[test]
    fn test_env_override() {
        std::env::set_var("BLOCKSPEAK_PALETTE_POLL_MS", "750");
        let cfg = WatcherConfig::default();
        assert_eq!(cfg.palette_poll_interval, Duration::from_millis(750));
        std::env::remove_var("BLOCKSPEAK_PALETTE_POLL_MS");
    }
}
