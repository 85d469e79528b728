//! Async host for the timeline engine: a tokio-driven clock timer, the
//! editor event loop, and the snapshot DTOs published to a frontend.

mod dto;
mod editor;
mod media;
mod ticker;

pub use dto::{ClipSummary, RulerMarkDto, SessionSnapshot};
pub use editor::{
    DEMO_SPACING, Editor, EditorCommand, EditorError, EditorEvent, EditorHandle, add_staggered,
    load_demo_tracks,
};
pub use media::{LoggedTrack, LoggingMedia};
pub use ticker::TokioTicker;
