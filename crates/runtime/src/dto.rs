//! Serialisable views of the session for an external UI.
//!
//! A fresh [`SessionSnapshot`] is published after every event the editor
//! processes, so a frontend never has to query state separately.

use isound_core::{
    ClipLayout, DragTarget, DurationOption, MediaResources, Millis, PlaybackState, RulerMarkKind,
    Session, TimeDisplay, clip_layout, playhead_percent, ruler_marks,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub current_time: Millis,
    /// `MM:SS:FF` clock label.
    pub time_display: String,
    pub timeline_duration: Millis,
    pub playback_state: PlaybackState,
    pub speed: f64,
    pub playhead_percent: f64,
    pub clips: Vec<ClipSummary>,
    pub duration_options: Vec<DurationOption>,
    pub ruler: Vec<RulerMarkDto>,
    pub dragging: Option<DragTarget>,
    /// Message for the most recent rejected command, cleared by the next
    /// accepted one.
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipSummary {
    pub index: usize,
    pub title: String,
    pub color: String,
    pub source: String,
    pub duration: Millis,
    pub start_time: Millis,
    pub start_point: Millis,
    pub end_point: Millis,
    /// Length of the audible region.
    pub trimmed_length: Millis,
    pub layout: ClipLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RulerMarkDto {
    pub position: f64,
    pub label: Option<String>,
}

impl SessionSnapshot {
    pub fn capture<M: MediaResources>(session: &Session<M>, last_error: Option<String>) -> Self {
        let duration = session.timeline_duration();
        Self {
            current_time: session.current_time(),
            time_display: TimeDisplay::new(session.current_time()).to_string(),
            timeline_duration: duration,
            playback_state: session.playback_state(),
            speed: session.speed(),
            playhead_percent: playhead_percent(session.current_time(), duration),
            clips: session
                .clips()
                .iter()
                .enumerate()
                .map(|(index, clip)| ClipSummary {
                    index,
                    title: clip.title.clone(),
                    color: clip.color.clone(),
                    source: clip.source.clone(),
                    duration: clip.duration,
                    start_time: clip.start_time,
                    start_point: clip.start_point,
                    end_point: clip.end_point,
                    trimmed_length: clip.trimmed_length(),
                    layout: clip_layout(clip, duration),
                })
                .collect(),
            duration_options: session.duration_options(),
            ruler: ruler_marks(duration)
                .into_iter()
                .map(|mark| RulerMarkDto {
                    position: mark.position,
                    label: match mark.kind {
                        RulerMarkKind::Origin => Some("0s".to_string()),
                        RulerMarkKind::Major { label } => Some(label),
                        RulerMarkKind::Minor => None,
                    },
                })
                .collect(),
            dragging: session.active_drag().map(|drag| drag.target),
            last_error,
        }
    }
}
