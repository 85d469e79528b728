//! Pointer-driven editing.
//!
//! Every drag follows one shape: press on an affordance fixes the horizontal
//! anchor between the pointer and the affordance's left edge; each move
//! recomputes a candidate left edge inside a reference container, clamps it,
//! and maps it linearly onto time; release ends the drag. Mouse and touch
//! only differ in how a [`PointerInput`] is built.

use isound_transport::{Clip, Millis};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerSource {
    Mouse,
    Touch,
}

/// Horizontal geometry of one pointer event.
///
/// On press the target is the affordance that was hit; on move it is the
/// reference container the drag maps against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerSample {
    pub client_x: f64,
    pub target_left: f64,
    pub target_width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchPoint {
    pub identifier: u64,
    pub client_x: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerInput {
    pub source: PointerSource,
    pub sample: PointerSample,
}

impl PointerInput {
    pub fn mouse(client_x: f64, target_left: f64, target_width: f64) -> Self {
        Self {
            source: PointerSource::Mouse,
            sample: PointerSample {
                client_x,
                target_left,
                target_width,
            },
        }
    }

    /// Built from the first active touch; `None` if there is none.
    pub fn touch(touches: &[TouchPoint], target_left: f64, target_width: f64) -> Option<Self> {
        let first = touches.first()?;
        Some(Self {
            source: PointerSource::Touch,
            sample: PointerSample {
                client_x: first.client_x,
                target_left,
                target_width,
            },
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "camelCase")]
pub enum DragTarget {
    Playhead,
    ClipBody(usize),
    TrimStart(usize),
    TrimEnd(usize),
}

impl DragTarget {
    /// Everything except moving a clip stops playback when grabbed.
    pub fn pauses_clock(&self) -> bool {
        !matches!(self, DragTarget::ClipBody(_))
    }

    pub fn clip_index(&self) -> Option<usize> {
        match *self {
            DragTarget::Playhead => None,
            DragTarget::ClipBody(index) | DragTarget::TrimStart(index) | DragTarget::TrimEnd(index) => {
                Some(index)
            }
        }
    }
}

/// A mutation requested by one move event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DragEdit {
    Seek { time: Millis },
    MoveClip { index: usize, start_time: Millis },
    TrimStart { index: usize, start_point: Millis },
    TrimEnd { index: usize, end_point: Millis },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub target: DragTarget,
    pub source: PointerSource,
    /// Pointer x minus the affordance's left edge at press time.
    pub anchor: f64,
    /// Width of the pressed affordance (playhead thumb or clip body).
    pub affordance_width: f64,
}

impl DragSession {
    pub fn begin(target: DragTarget, press: &PointerInput) -> Self {
        Self {
            target,
            source: press.source,
            anchor: press.sample.client_x - press.sample.target_left,
            affordance_width: press.sample.target_width,
        }
    }

    /// Map a move event onto an edit. `clip` must be the clip the target
    /// refers to. Returns `None` when nothing should be committed.
    pub fn resolve(
        &self,
        input: &PointerInput,
        timeline_duration: Millis,
        clip: Option<&Clip>,
    ) -> Option<DragEdit> {
        let sample = &input.sample;
        if sample.target_width.is_nan() || sample.target_width <= 0.0 {
            return None;
        }
        let left = sample.client_x - self.anchor - sample.target_left;

        match self.target {
            DragTarget::Playhead => {
                let left = clamp_left(left, sample.target_width - self.affordance_width);
                Some(DragEdit::Seek {
                    time: pixels_to_time(left, sample.target_width, timeline_duration),
                })
            }
            DragTarget::ClipBody(index) => {
                let left = clamp_left(left, sample.target_width - self.affordance_width);
                Some(DragEdit::MoveClip {
                    index,
                    start_time: pixels_to_time(left, sample.target_width, timeline_duration),
                })
            }
            DragTarget::TrimStart(index) => {
                let clip = clip?;
                let start_point = pixels_to_time(left.max(0.0), sample.target_width, clip.duration);
                Some(DragEdit::TrimStart {
                    index,
                    start_point: start_point.min(clip.end_point),
                })
            }
            DragTarget::TrimEnd(index) => {
                let clip = clip?;
                let left = clamp_left(left, sample.target_width);
                let end_point = pixels_to_time(left, sample.target_width, clip.duration);
                // dragging before the start handle keeps the old end point
                if end_point < clip.start_point {
                    return None;
                }
                Some(DragEdit::TrimEnd { index, end_point })
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// At most one drag at a time; a new press replaces the previous drag.
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, target: DragTarget, press: &PointerInput) -> DragSession {
        let session = DragSession::begin(target, press);
        if let DragState::Dragging(previous) = self.state {
            log::debug!("drag on {:?} replaced by {:?}", previous.target, target);
        } else {
            log::debug!("drag begin on {target:?} ({:?})", press.source);
        }
        self.state = DragState::Dragging(session);
        session
    }

    pub fn end(&mut self) -> Option<DragSession> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging(session) => {
                log::debug!("drag end on {:?}", session.target);
                Some(session)
            }
            DragState::Idle => None,
        }
    }

    pub fn active(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }
}

/// Lock a candidate left edge into `[0, max]`; a negative `max` counts as 0.
pub fn clamp_left(left: f64, max: f64) -> f64 {
    if left.is_nan() {
        return 0.0;
    }
    left.max(0.0).min(max.max(0.0))
}

pub fn pixels_to_time(pixels: f64, width: f64, span: Millis) -> Millis {
    if width <= 0.0 {
        return 0.0;
    }
    pixels / width * span
}
