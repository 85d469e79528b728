//! Authoritative list of placed clips.
//!
//! Order is display order only. Every mutation clamps into
//! `0 <= start_point <= end_point <= duration`, so invalid geometry is never
//! stored.

use crate::duration::DurationManager;
use crate::error::TimelineError;
use isound_transport::{Clip, ClipSpec, Millis};

/// Result of [`TrackRegistry::add_clip`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipAdded {
    pub index: usize,
    /// New timeline duration the caller must apply, if the clip did not fit.
    pub grown_duration: Option<Millis>,
}

#[derive(Debug, Default, Clone)]
pub struct TrackRegistry {
    clips: Vec<Clip>,
}

impl TrackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill defaults for a minimal spec and clamp it into a valid clip.
    pub fn build_clip(spec: ClipSpec) -> Result<Clip, TimelineError> {
        if !spec.duration.is_finite() || spec.duration < 0.0 {
            return Err(TimelineError::InvalidClip(format!(
                "'{}' has unusable duration {}",
                spec.title, spec.duration
            )));
        }

        let duration = spec.duration;
        let end_point = clamp_or(spec.end_point, duration, 0.0, duration);
        let start_point = clamp_or(spec.start_point, 0.0, 0.0, end_point);
        let start_time = spec.start_time.filter(|t| t.is_finite()).unwrap_or(0.0).max(0.0);

        Ok(Clip {
            color: spec.color,
            title: spec.title,
            source: spec.source,
            duration,
            start_time,
            start_point,
            end_point,
        })
    }

    /// Build and append a clip. Growth is computed before insertion so the
    /// caller can extend the timeline before the clip becomes visible.
    pub fn add_clip(
        &mut self,
        spec: ClipSpec,
        durations: &DurationManager,
        timeline_duration: Millis,
    ) -> Result<ClipAdded, TimelineError> {
        let clip = Self::build_clip(spec)?;
        let grown_duration = durations.grown_to_fit(timeline_duration, clip.end_time());

        log::info!(
            "adding '{}' at {}ms ({}ms long)",
            clip.title,
            clip.start_time,
            clip.duration
        );
        self.clips.push(clip);

        Ok(ClipAdded {
            index: self.clips.len() - 1,
            grown_duration,
        })
    }

    pub fn remove_clip(&mut self, index: usize) -> Result<Clip, TimelineError> {
        self.check_index(index)?;
        let clip = self.clips.remove(index);
        log::info!("removed '{}' (clip {index})", clip.title);
        Ok(clip)
    }

    pub fn set_start_time(&mut self, index: usize, start_time: Millis) -> Result<&Clip, TimelineError> {
        let clip = self.clip_mut(index)?;
        clip.start_time = if start_time.is_finite() { start_time.max(0.0) } else { 0.0 };
        Ok(clip)
    }

    /// Clamped into `[0, end_point]`.
    pub fn set_start_point(&mut self, index: usize, start_point: Millis) -> Result<&Clip, TimelineError> {
        let clip = self.clip_mut(index)?;
        clip.start_point = clamp_or(Some(start_point), 0.0, 0.0, clip.end_point);
        Ok(clip)
    }

    /// Clamped into `[start_point, duration]`.
    pub fn set_end_point(&mut self, index: usize, end_point: Millis) -> Result<&Clip, TimelineError> {
        let clip = self.clip_mut(index)?;
        clip.end_point = clamp_or(Some(end_point), clip.end_point, clip.start_point, clip.duration);
        Ok(clip)
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn get(&self, index: usize) -> Option<&Clip> {
        self.clips.get(index)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn check_index(&self, index: usize) -> Result<(), TimelineError> {
        if index < self.clips.len() {
            Ok(())
        } else {
            Err(TimelineError::ClipIndexOutOfRange {
                index,
                len: self.clips.len(),
            })
        }
    }

    fn clip_mut(&mut self, index: usize) -> Result<&mut Clip, TimelineError> {
        self.check_index(index)?;
        Ok(&mut self.clips[index])
    }
}

fn clamp_or(value: Option<Millis>, fallback: Millis, min: Millis, max: Millis) -> Millis {
    let value = value.filter(|v| v.is_finite()).unwrap_or(fallback);
    value.max(min).min(max)
}
