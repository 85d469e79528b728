//! Shared data model for the timeline editor.
//!
//! Everything here is plain data plus the collaborator traits the engine uses
//! to drive per-clip media. No timing logic lives in this crate.

mod media;

pub use media::{MediaCommand, MediaError, MediaRack, MediaResource, MediaResources};

use serde::{Deserialize, Serialize};

/// Milliseconds on the timeline or inside a media resource.
///
/// Fractional because pointer geometry maps pixels onto time linearly.
pub type Millis = f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Stopped,
    Playing,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing)
    }
}

/// Minimal "add track" request as supplied by the palette or file-drop side.
///
/// Placement fields are optional; the registry fills in the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipSpec {
    #[serde(default)]
    pub color: String,
    pub title: String,
    pub duration: Millis,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Millis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_point: Option<Millis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_point: Option<Millis>,
}

impl ClipSpec {
    pub fn new(title: impl Into<String>, source: impl Into<String>, duration: Millis) -> Self {
        Self {
            color: String::new(),
            title: title.into(),
            duration,
            source: source.into(),
            start_time: None,
            start_point: None,
            end_point: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn at(mut self, start_time: Millis) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn trimmed(mut self, start_point: Millis, end_point: Millis) -> Self {
        self.start_point = Some(start_point);
        self.end_point = Some(end_point);
        self
    }
}

/// A placed, trimmable reference to an audio resource.
///
/// `0 <= start_point <= end_point <= duration` holds for every clip the
/// registry hands out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub color: String,
    pub title: String,
    pub source: String,
    pub duration: Millis,
    pub start_time: Millis,
    pub start_point: Millis,
    pub end_point: Millis,
}

impl Clip {
    /// Timeline position where the trimmed region starts sounding.
    pub fn audible_start(&self) -> Millis {
        self.start_time + self.start_point
    }

    /// Timeline position where the trimmed region stops sounding.
    pub fn audible_end(&self) -> Millis {
        self.start_time + self.end_point
    }

    /// Inclusive at both ends.
    pub fn is_audible_at(&self, time: Millis) -> bool {
        self.audible_start() <= time && time <= self.audible_end()
    }

    /// Offset into the media resource that corresponds to timeline `time`.
    pub fn intrinsic_offset_at(&self, time: Millis) -> Millis {
        (time - self.audible_start()) + self.start_point
    }

    /// `start_time + duration`. Ignores trimming, so it can run past the
    /// audible end; duration growth relies on it being an upper bound.
    pub fn end_time(&self) -> Millis {
        self.start_time + self.duration
    }

    pub fn trimmed_length(&self) -> Millis {
        self.end_point - self.start_point
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(start_time: Millis, start_point: Millis, end_point: Millis) -> Clip {
        Clip {
            color: "#ff9f0a".to_string(),
            title: "Clip".to_string(),
            source: "clip.mp3".to_string(),
            duration: 10_000.0,
            start_time,
            start_point,
            end_point,
        }
    }

    #[test]
    fn test_audible_window_is_inclusive() {
        let c = clip(1000.0, 500.0, 2500.0);
        assert!(!c.is_audible_at(1499.0));
        assert!(c.is_audible_at(1500.0));
        assert!(c.is_audible_at(3500.0));
        assert!(!c.is_audible_at(3501.0));
    }

    #[test]
    fn test_intrinsic_offset_accounts_for_trim() {
        let c = clip(1000.0, 500.0, 2500.0);
        // 200ms into the audible region, which itself begins 500ms into the media
        assert_eq!(c.intrinsic_offset_at(1700.0), 700.0);
        assert_eq!(c.intrinsic_offset_at(c.audible_start()), c.start_point);
    }

    #[test]
    fn test_end_time_ignores_trim() {
        let c = clip(2000.0, 1000.0, 3000.0);
        assert_eq!(c.end_time(), 12_000.0);
        assert_eq!(c.audible_end(), 5000.0);
        assert_eq!(c.trimmed_length(), 2000.0);
    }

    #[test]
    fn test_clip_spec_deserializes_optional_placement() {
        let json = r##"{"color":"#30d158","title":"Drums","duration":40000,"source":"drums.mp3"}"##;
        let spec: ClipSpec = serde_json::from_str(json).expect("deserialize");
        assert_eq!(spec.title, "Drums");
        assert_eq!(spec.duration, 40_000.0);
        assert!(spec.start_time.is_none());
        assert!(spec.end_point.is_none());

        let json = r#"{"color":"","title":"Vox","duration":5000,"source":"v.mp3","startTime":3000,"startPoint":250,"endPoint":4000}"#;
        let spec: ClipSpec = serde_json::from_str(json).expect("deserialize");
        assert_eq!(spec.start_time, Some(3000.0));
        assert_eq!(spec.start_point, Some(250.0));
        assert_eq!(spec.end_point, Some(4000.0));
    }

    #[test]
    fn test_playback_state() {
        assert!(PlaybackState::Playing.is_playing());
        assert!(!PlaybackState::Stopped.is_playing());
    }
}
