//! Timeline length policy: automatic growth and the user-facing menu.

use crate::config::EditorConfig;
use crate::error::TimelineError;
use isound_transport::{Clip, Millis};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationOption {
    pub value: Millis,
    pub label: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationManager {
    step: Millis,
    extend: Millis,
    min_shrunk: Millis,
}

impl DurationManager {
    pub fn new(step: Millis, extend: Millis, min_shrunk: Millis) -> Self {
        Self {
            step,
            extend,
            min_shrunk,
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(
            config.duration_step_ms as Millis,
            config.duration_extend_ms as Millis,
            config.min_shrunk_duration_ms as Millis,
        )
    }

    /// Duration needed to contain `end`, rounded up to the next step.
    /// `None` when the current duration already fits; it never shrinks.
    pub fn grown_to_fit(&self, current: Millis, end: Millis) -> Option<Millis> {
        if self.step <= 0.0 || end <= current {
            return None;
        }
        let needed = (end / self.step).ceil() * self.step;
        (needed > current).then_some(needed)
    }

    /// The three menu candidates: one step, current minus a step (floored),
    /// and current plus the extension.
    pub fn options(&self, current: Millis, clips: &[Clip]) -> Vec<DurationOption> {
        [
            self.step,
            (current - self.step).max(self.min_shrunk),
            current + self.extend,
        ]
        .into_iter()
        .map(|value| DurationOption {
            value,
            label: duration_label(value),
            enabled: longest_blocking(value, clips).is_none(),
        })
        .collect()
    }

    /// Reject a selection that is not a positive multiple of the step, or
    /// that some clip's full duration would not fit into.
    pub fn validate(&self, requested: Millis, clips: &[Clip]) -> Result<(), TimelineError> {
        if !requested.is_finite() || requested <= 0.0 {
            return Err(TimelineError::InvalidDuration(requested));
        }
        if self.step > 0.0 && (requested % self.step) != 0.0 {
            return Err(TimelineError::InvalidDuration(requested));
        }
        if let Some(longest_clip) = longest_blocking(requested, clips) {
            return Err(TimelineError::InvalidDurationSelection {
                requested,
                longest_clip,
            });
        }
        Ok(())
    }

    pub fn step(&self) -> Millis {
        self.step
    }
}

impl Default for DurationManager {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

// Compares the raw clip duration, not the trimmed span, and a clip exactly
// as long as the candidate also blocks it.
fn longest_blocking(candidate: Millis, clips: &[Clip]) -> Option<Millis> {
    clips
        .iter()
        .map(|clip| clip.duration)
        .filter(|duration| *duration >= candidate)
        .reduce(Millis::max)
}

fn duration_label(value: Millis) -> String {
    if value < 60_000.0 {
        format!("{}s", value / 1000.0)
    } else {
        format!("{}m", value / 60_000.0)
    }
}
