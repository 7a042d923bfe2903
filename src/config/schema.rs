//! Configuration file schema.
//!
//! ```yaml
//! phrases:
//!   - build things for the web.
//!   - design beautiful interfaces.
//! timing:
//!   type_delay: 100ms
//!   delete_delay: 50ms
//!   pause: 1500ms
//!   blink_interval: 800ms
//! infinite: true
//! ```
//!
//! Delays are either integers (milliseconds) or `humantime` strings such as
//! `"250ms"` or `"1s 500ms"`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::timing::{MAX_DELAY, TypewriterConfig, clamp_delay, delay_from_millis};

/// Top-level configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TypewriterFile {
    /// Phrases in cycling order.
    pub phrases: Vec<String>,

    /// Timing overrides.
    #[serde(default)]
    pub timing: TimingSection,

    /// Repeat forever (default) or stop after the last phrase.
    #[serde(default = "default_infinite")]
    pub infinite: bool,
}

const fn default_infinite() -> bool {
    true
}

/// Optional timing overrides. Missing values use engine defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TimingSection {
    /// Delay between revealed characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_delay: Option<DelayValue>,

    /// Delay between removed characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_delay: Option<DelayValue>,

    /// Dwell time with the full phrase visible.
    #[serde(default, alias = "pause_duration", skip_serializing_if = "Option::is_none")]
    pub pause: Option<DelayValue>,

    /// Full caret blink period.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blink_interval: Option<DelayValue>,
}

/// A delay as written in a config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum DelayValue {
    /// Milliseconds. Negative values clamp to the minimum tick.
    Millis(i64),
    /// Human-readable duration.
    Text(String),
}

impl DelayValue {
    /// Resolves to a clamped delay.
    ///
    /// # Errors
    ///
    /// Returns the parser's message if the text form is not a duration, or
    /// if the value is longer than [`MAX_DELAY`].
    pub fn to_duration(&self) -> Result<Duration, String> {
        match self {
            Self::Millis(ms) => {
                let too_long = u64::try_from(*ms)
                    .is_ok_and(|ms| Duration::from_millis(ms) > MAX_DELAY);
                if too_long {
                    return Err(too_long_message(&ms.to_string()));
                }
                Ok(delay_from_millis(*ms))
            }
            Self::Text(text) => parse_delay(text),
        }
    }

    /// Whether the written value is zero or negative (and will be clamped).
    #[must_use]
    pub fn is_non_positive(&self) -> bool {
        match self {
            Self::Millis(ms) => *ms <= 0,
            Self::Text(text) => {
                let text = text.trim();
                text.starts_with('-')
                    || parse_unclamped(text).is_ok_and(|d| d.is_zero())
            }
        }
    }
}

/// Parses a delay string: bare integers are milliseconds, anything else goes
/// through `humantime`. A leading `-` clamps to the minimum tick.
///
/// # Errors
///
/// Returns a description of the problem if `text` is not a duration or is
/// longer than [`MAX_DELAY`].
pub fn parse_delay(text: &str) -> Result<Duration, String> {
    let text = text.trim();
    if let Some(rest) = text.strip_prefix('-') {
        parse_unclamped(rest)?;
        return Ok(clamp_delay(Duration::ZERO));
    }
    let delay = parse_unclamped(text)?;
    if delay > MAX_DELAY {
        return Err(too_long_message(text));
    }
    Ok(clamp_delay(delay))
}

fn too_long_message(text: &str) -> String {
    format!(
        "duration '{text}' exceeds the maximum of {}",
        humantime::format_duration(MAX_DELAY)
    )
}

fn parse_unclamped(text: &str) -> Result<Duration, String> {
    if let Ok(ms) = text.parse::<u64>() {
        return Ok(Duration::from_millis(ms));
    }
    humantime::parse_duration(text).map_err(|e| format!("invalid duration '{text}': {e}"))
}

impl TypewriterFile {
    /// Builds the engine configuration.
    ///
    /// # Errors
    ///
    /// Returns `(field, message)` for the first delay that does not parse.
    pub fn engine_config(&self) -> Result<TypewriterConfig, (&'static str, String)> {
        let mut config = TypewriterConfig::default().with_infinite(self.infinite);
        let timing = &self.timing;

        if let Some(v) = &timing.type_delay {
            config.type_delay = v.to_duration().map_err(|e| ("timing.type_delay", e))?;
        }
        if let Some(v) = &timing.delete_delay {
            config.delete_delay = Some(v.to_duration().map_err(|e| ("timing.delete_delay", e))?);
        }
        if let Some(v) = &timing.pause {
            config.pause_duration = v.to_duration().map_err(|e| ("timing.pause", e))?;
        }
        if let Some(v) = &timing.blink_interval {
            config.blink_interval = v.to_duration().map_err(|e| ("timing.blink_interval", e))?;
        }
        Ok(config)
    }
}
