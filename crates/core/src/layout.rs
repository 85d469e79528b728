//! Percent-based geometry handed to the rendering side.

use isound_transport::{Clip, Millis};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipLayout {
    /// Clip body left edge, % of the timeline.
    pub left: f64,
    /// Clip body width (full media length), % of the timeline.
    pub width: f64,
    /// Trim handles, % of the clip body.
    pub trim_start: f64,
    pub trim_end: f64,
}

pub fn clip_layout(clip: &Clip, timeline_duration: Millis) -> ClipLayout {
    ClipLayout {
        left: percent(clip.start_time, timeline_duration),
        width: percent(clip.duration, timeline_duration),
        trim_start: percent(clip.start_point, clip.duration),
        trim_end: percent(clip.end_point, clip.duration),
    }
}

pub fn playhead_percent(current_time: Millis, timeline_duration: Millis) -> f64 {
    percent(current_time, timeline_duration)
}

fn percent(value: Millis, whole: Millis) -> f64 {
    if whole <= 0.0 { 0.0 } else { value * 100.0 / whole }
}
