//! Engine timing configuration.

use std::time::Duration;

/// Shortest delay the engine will schedule. Zero (or negative, from file and
/// CLI input) delays are clamped up to this.
pub const MIN_TICK: Duration = Duration::from_millis(1);

/// Longest delay the engine will schedule. Longer delays are capped to this
/// in code and rejected in config files and on the command line.
pub const MAX_DELAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Default delay between revealed characters.
pub const DEFAULT_TYPE_DELAY: Duration = Duration::from_millis(100);

/// Default dwell time with the full phrase visible.
pub const DEFAULT_PAUSE_DURATION: Duration = Duration::from_millis(1500);

/// Default full caret blink period.
pub const DEFAULT_BLINK_INTERVAL: Duration = Duration::from_millis(800);

/// Clamps a delay into [`MIN_TICK`]`..=`[`MAX_DELAY`].
#[must_use]
pub fn clamp_delay(delay: Duration) -> Duration {
    delay.clamp(MIN_TICK, MAX_DELAY)
}

/// Converts a signed millisecond count into a clamped delay.
#[must_use]
pub fn delay_from_millis(ms: i64) -> Duration {
    clamp_delay(Duration::from_millis(u64::try_from(ms).unwrap_or(0)))
}

/// Configuration for one typewriter engine.
///
/// Values are stored as given; the `effective_*` accessors apply the
/// derivation and clamping rules the engine actually runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterConfig {
    /// Delay between revealing successive characters.
    pub type_delay: Duration,
    /// Delay between removing characters. `None` derives `type_delay / 2`.
    pub delete_delay: Option<Duration>,
    /// Dwell time with the full phrase visible before deletion.
    pub pause_duration: Duration,
    /// Repeat the phrase cycle forever, or stop after the last phrase.
    pub infinite: bool,
    /// Full caret blink period (one visible half plus one hidden half).
    pub blink_interval: Duration,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            type_delay: DEFAULT_TYPE_DELAY,
            delete_delay: None,
            pause_duration: DEFAULT_PAUSE_DURATION,
            infinite: true,
            blink_interval: DEFAULT_BLINK_INTERVAL,
        }
    }
}

impl TypewriterConfig {
    /// Sets the typing delay.
    #[must_use]
    pub const fn with_type_delay(mut self, delay: Duration) -> Self {
        self.type_delay = delay;
        self
    }

    /// Sets an explicit deletion delay.
    #[must_use]
    pub const fn with_delete_delay(mut self, delay: Duration) -> Self {
        self.delete_delay = Some(delay);
        self
    }

    /// Sets the pause duration.
    #[must_use]
    pub const fn with_pause_duration(mut self, pause: Duration) -> Self {
        self.pause_duration = pause;
        self
    }

    /// Sets whether the cycle repeats forever.
    #[must_use]
    pub const fn with_infinite(mut self, infinite: bool) -> Self {
        self.infinite = infinite;
        self
    }

    /// Sets the caret blink period.
    #[must_use]
    pub const fn with_blink_interval(mut self, interval: Duration) -> Self {
        self.blink_interval = interval;
        self
    }

    /// Typing delay after clamping.
    #[must_use]
    pub fn effective_type_delay(&self) -> Duration {
        clamp_delay(self.type_delay)
    }

    /// Deletion delay: the explicit value, or half the typing delay.
    #[must_use]
    pub fn effective_delete_delay(&self) -> Duration {
        clamp_delay(self.delete_delay.unwrap_or(self.type_delay / 2))
    }

    /// Pause duration after clamping.
    #[must_use]
    pub fn effective_pause_duration(&self) -> Duration {
        clamp_delay(self.pause_duration)
    }

    /// Time between caret toggles while blinking.
    #[must_use]
    pub fn blink_half_period(&self) -> Duration {
        clamp_delay(self.blink_interval / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = TypewriterConfig::default();
        assert_eq!(config.effective_type_delay(), Duration::from_millis(100));
        assert_eq!(config.effective_delete_delay(), Duration::from_millis(50));
        assert_eq!(config.effective_pause_duration(), Duration::from_millis(1500));
        assert_eq!(config.blink_half_period(), Duration::from_millis(400));
        assert!(config.infinite);
    }

    #[test]
    fn explicit_delete_delay_wins() {
        let config = TypewriterConfig::default()
            .with_type_delay(Duration::from_millis(80))
            .with_delete_delay(Duration::from_millis(10));
        assert_eq!(config.effective_delete_delay(), Duration::from_millis(10));
    }

    #[test]
    fn zero_delays_clamped() {
        let config = TypewriterConfig::default()
            .with_type_delay(Duration::ZERO)
            .with_pause_duration(Duration::ZERO)
            .with_blink_interval(Duration::ZERO);
        assert_eq!(config.effective_type_delay(), MIN_TICK);
        assert_eq!(config.effective_delete_delay(), MIN_TICK);
        assert_eq!(config.effective_pause_duration(), MIN_TICK);
        assert_eq!(config.blink_half_period(), MIN_TICK);
    }

    #[test]
    fn huge_delays_capped() {
        let config = TypewriterConfig::default()
            .with_type_delay(Duration::MAX)
            .with_pause_duration(Duration::MAX)
            .with_blink_interval(Duration::MAX);
        assert_eq!(config.effective_type_delay(), MAX_DELAY);
        assert_eq!(config.effective_delete_delay(), MAX_DELAY);
        assert_eq!(config.effective_pause_duration(), MAX_DELAY);
        assert_eq!(config.blink_half_period(), MAX_DELAY);
    }

    #[test]
    fn negative_millis_clamped() {
        assert_eq!(delay_from_millis(-250), MIN_TICK);
        assert_eq!(delay_from_millis(0), MIN_TICK);
        assert_eq!(delay_from_millis(75), Duration::from_millis(75));
    }
}
