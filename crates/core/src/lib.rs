pub mod clock;
pub mod config;
pub mod duration;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod registry;
pub mod scheduler;
pub mod session;
pub mod time;

#[cfg(test)]
mod testing;

pub use clock::{Clock, ManualTicker, ManualTickerState, TickSource};
pub use config::EditorConfig;
pub use duration::{DurationManager, DurationOption};
pub use error::{ConfigError, TimelineError};
pub use interaction::{
    DragController, DragEdit, DragSession, DragState, DragTarget, PointerInput, PointerSample,
    PointerSource, TouchPoint,
};
pub use layout::{ClipLayout, clip_layout, playhead_percent};
pub use registry::{ClipAdded, TrackRegistry};
pub use scheduler::{SchedulePlan, TrackScheduler};
pub use session::Session;
pub use time::{RulerMark, RulerMarkKind, TimeDisplay, ruler_marks};

pub use isound_transport::{
    Clip, ClipSpec, MediaCommand, MediaError, MediaRack, MediaResource, MediaResources, Millis,
    PlaybackState,
};
