//! Single-threaded event loop around a [`Session`].
//!
//! User commands and clock ticks share one queue, so the session is only
//! ever touched from the editor task.

use crate::dto::SessionSnapshot;
use crate::ticker::TokioTicker;
use isound_core::{
    ClipSpec, DragTarget, EditorConfig, MediaResources, Millis, PointerInput, Session,
    TimelineError,
};
use isound_project::PresetLibrary;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Delay between consecutive demo tracks while a demo session loads.
pub const DEMO_SPACING: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum EditorCommand {
    Play,
    Pause,
    TogglePlayback,
    Seek { time: Millis },
    SetSpeed { speed: f64 },
    ToggleSpeed,
    AddClip { spec: ClipSpec },
    RemoveClip { index: usize },
    SelectDuration { duration: Millis },
    PointerDown { target: DragTarget, input: PointerInput },
    PointerMove { input: PointerInput },
    PointerUp,
    Refresh,
    Shutdown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    Command(EditorCommand),
    Tick { generation: u64 },
}

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("no tokio runtime available: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    #[error("editor has shut down")]
    Closed,
}

pub struct Editor<M> {
    session: Session<M>,
    events: mpsc::UnboundedReceiver<EditorEvent>,
    snapshots: watch::Sender<SessionSnapshot>,
    last_error: Option<String>,
}

impl<M: MediaResources> Editor<M> {
    /// Builds an editor on the current tokio runtime.
    pub fn new(config: &EditorConfig, media: M) -> Result<(Self, EditorHandle), EditorError> {
        Ok(Self::with_runtime(config, media, Handle::try_current()?))
    }

    pub fn with_runtime(config: &EditorConfig, media: M, runtime: Handle) -> (Self, EditorHandle) {
        let (sender, events) = mpsc::unbounded_channel();
        let ticker = TokioTicker::new(runtime, &sender);
        let session = Session::new(config, Box::new(ticker), media);
        let (snapshots, receiver) = watch::channel(SessionSnapshot::capture(&session, None));

        let editor = Self {
            session,
            events,
            snapshots,
            last_error: None,
        };
        let handle = EditorHandle {
            sender,
            snapshots: receiver,
        };
        (editor, handle)
    }

    pub fn session(&self) -> &Session<M> {
        &self.session
    }

    /// Processes events until `Shutdown` arrives or every handle is dropped,
    /// then hands the session back.
    pub async fn run(mut self) -> Session<M> {
        log::info!("Editor started");
        while let Some(event) = self.events.recv().await {
            match event {
                EditorEvent::Tick { generation } => {
                    if !self.session.on_timer(generation) {
                        continue;
                    }
                }
                EditorEvent::Command(EditorCommand::Shutdown) => break,
                EditorEvent::Command(command) => self.handle(command),
            }
            self.publish();
        }

        self.session.pause();
        self.publish();
        log::info!("Editor stopped");
        self.session
    }

    /// Applies one command synchronously; used by `run` and by hosts that
    /// drive the session themselves.
    pub fn handle(&mut self, command: EditorCommand) {
        log::trace!("command: {command:?}");
        match self.apply(command) {
            Ok(()) => self.last_error = None,
            Err(e) => {
                log::warn!("Command rejected: {e}");
                self.last_error = Some(e.to_string());
            }
        }
    }

    fn apply(&mut self, command: EditorCommand) -> Result<(), TimelineError> {
        let session = &mut self.session;
        match command {
            EditorCommand::Play => session.play(),
            EditorCommand::Pause => session.pause(),
            EditorCommand::TogglePlayback => session.toggle_playback(),
            EditorCommand::Seek { time } => session.seek(time),
            EditorCommand::SetSpeed { speed } => session.set_speed(speed)?,
            EditorCommand::ToggleSpeed => session.toggle_speed()?,
            EditorCommand::AddClip { spec } => {
                let index = session.add_clip(spec)?;
                log::debug!("Clip {index} added");
            }
            EditorCommand::RemoveClip { index } => {
                let clip = session.remove_clip(index)?;
                log::debug!("Clip {index} ({}) removed", clip.title);
            }
            EditorCommand::SelectDuration { duration } => session.select_duration(duration)?,
            EditorCommand::PointerDown { target, input } => session.pointer_down(target, input)?,
            EditorCommand::PointerMove { input } => {
                session.pointer_move(input)?;
            }
            EditorCommand::PointerUp => {
                session.pointer_up();
            }
            EditorCommand::Refresh => session.refresh(),
            EditorCommand::Shutdown => {}
        }
        Ok(())
    }

    fn publish(&self) {
        self.snapshots
            .send_replace(SessionSnapshot::capture(&self.session, self.last_error.clone()));
    }
}

/// Cloneable front door to a running [`Editor`].
#[derive(Debug, Clone)]
pub struct EditorHandle {
    sender: mpsc::UnboundedSender<EditorEvent>,
    snapshots: watch::Receiver<SessionSnapshot>,
}

impl EditorHandle {
    pub fn send(&self, command: EditorCommand) -> Result<(), EditorError> {
        self.sender
            .send(EditorEvent::Command(command))
            .map_err(|_| EditorError::Closed)
    }

    /// Latest published state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    pub fn shutdown(&self) -> Result<(), EditorError> {
        self.send(EditorCommand::Shutdown)
    }
}

/// Adds each spec in order, `spacing` apart, starting immediately.
pub fn add_staggered(
    handle: &EditorHandle,
    specs: Vec<ClipSpec>,
    spacing: Duration,
) -> JoinHandle<()> {
    let handle = handle.clone();
    tokio::spawn(async move {
        let start = tokio::time::Instant::now();
        for (i, spec) in specs.into_iter().enumerate() {
            tokio::time::sleep_until(start + spacing * i as u32).await;
            log::debug!("Loading demo track '{}'", spec.title);
            if handle.send(EditorCommand::AddClip { spec }).is_err() {
                log::warn!("Editor closed while loading demo tracks");
                break;
            }
        }
    })
}

/// Loads the library's demo session, each track with a random tint.
pub fn load_demo_tracks(handle: &EditorHandle, library: &PresetLibrary) -> JoinHandle<()> {
    let specs = library.demo_specs();
    log::info!("Loading {} demo tracks", specs.len());
    add_staggered(handle, specs, DEMO_SPACING)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::LoggingMedia;
    use isound_core::{PlaybackState, PointerSource};

    fn spawn_editor() -> (EditorHandle, JoinHandle<Session<LoggingMedia>>) {
        let (editor, handle) =
            Editor::new(&EditorConfig::default(), LoggingMedia::new()).expect("runtime");
        let task = tokio::spawn(editor.run());
        (handle, task)
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    fn clip(title: &str, duration: Millis, start_time: Millis) -> ClipSpec {
        ClipSpec::new(title, format!("{title}.mp3"), duration).at(start_time)
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_advance_playhead() {
        let (handle, task) = spawn_editor();
        handle.send(EditorCommand::AddClip { spec: clip("a", 5000.0, 0.0) }).unwrap();
        handle.send(EditorCommand::Play).unwrap();

        tokio::time::sleep(Duration::from_millis(1050)).await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.playback_state, PlaybackState::Playing);
        assert_eq!(snapshot.current_time, 1000.0);
        assert_eq!(snapshot.time_display, "00:01:00");

        handle.shutdown().unwrap();
        let session = task.await.unwrap();
        assert!(!session.is_playing());
        let track = &session.media().tracks()[0];
        assert!(track.paused);
        assert_eq!(track.offset, 1000.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_stops_ticks() {
        let (handle, task) = spawn_editor();
        handle.send(EditorCommand::Play).unwrap();
        tokio::time::sleep(Duration::from_millis(350)).await;
        handle.send(EditorCommand::Pause).unwrap();
        settle().await;

        let paused_at = handle.snapshot().current_time;
        assert_eq!(paused_at, 300.0);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(handle.snapshot().current_time, paused_at);
        assert_eq!(handle.snapshot().playback_state, PlaybackState::Stopped);

        handle.shutdown().unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_speed_covers_twice_the_time() {
        let (handle, task) = spawn_editor();
        handle.send(EditorCommand::ToggleSpeed).unwrap();
        handle.send(EditorCommand::Play).unwrap();

        tokio::time::sleep(Duration::from_millis(550)).await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.speed, 2.0);
        assert_eq!(snapshot.current_time, 1000.0);

        handle.shutdown().unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_command_sets_last_error() {
        let (handle, task) = spawn_editor();
        handle.send(EditorCommand::AddClip { spec: clip("long", 40_000.0, 0.0) }).unwrap();
        settle().await;
        assert_eq!(handle.snapshot().timeline_duration, 60_000.0);

        handle.send(EditorCommand::SelectDuration { duration: 30_000.0 }).unwrap();
        settle().await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.timeline_duration, 60_000.0);
        assert!(snapshot.last_error.is_some());

        handle.send(EditorCommand::Seek { time: 500.0 }).unwrap();
        settle().await;
        assert_eq!(handle.snapshot().last_error, None);

        handle.shutdown().unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_playhead_drag_through_commands() {
        let (handle, task) = spawn_editor();
        handle.send(EditorCommand::Play).unwrap();
        handle
            .send(EditorCommand::PointerDown {
                target: DragTarget::Playhead,
                input: PointerInput::mouse(105.0, 100.0, 10.0),
            })
            .unwrap();
        settle().await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.playback_state, PlaybackState::Stopped);
        assert_eq!(snapshot.dragging, Some(DragTarget::Playhead));

        // Halfway across a 1000px container.
        handle
            .send(EditorCommand::PointerMove {
                input: PointerInput::mouse(505.0, 0.0, 1000.0),
            })
            .unwrap();
        handle.send(EditorCommand::PointerUp).unwrap();
        settle().await;

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.current_time, 15_000.0);
        assert_eq!(snapshot.dragging, None);

        handle.shutdown().unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_demo_tracks_arrive_staggered() {
        let (handle, task) = spawn_editor();
        let library = PresetLibrary {
            tints: vec!["#30D158FF".to_string()],
            tracks: vec![],
            demo_tracks: vec![
                clip("one", 4000.0, 0.0),
                clip("two", 4000.0, 1000.0),
                clip("three", 4000.0, 2000.0),
            ],
        };

        let loader = load_demo_tracks(&handle, &library);
        settle().await;
        assert_eq!(handle.snapshot().clips.len(), 1);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(handle.snapshot().clips.len(), 2);

        loader.await.unwrap();
        settle().await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.clips.len(), 3);
        assert!(snapshot.clips.iter().all(|c| c.color == "#30D158FF"));
        assert_eq!(snapshot.clips[2].title, "three");

        handle.shutdown().unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_describes_trimmed_clip() {
        let (handle, task) = spawn_editor();
        let spec = clip("cut", 6000.0, 3000.0).trimmed(1000.0, 3000.0);
        handle.send(EditorCommand::AddClip { spec }).unwrap();
        settle().await;

        let snapshot = handle.snapshot();
        let summary = &snapshot.clips[0];
        assert_eq!(summary.trimmed_length, 2000.0);
        assert_eq!(summary.start_time, 3000.0);
        assert_eq!(summary.layout.left, 10.0);
        assert_eq!(summary.layout.width, 20.0);

        handle.shutdown().unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handles_ends_loop() {
        let (handle, task) = spawn_editor();
        handle.send(EditorCommand::Play).unwrap();
        settle().await;
        drop(handle);

        let session = task.await.unwrap();
        assert_eq!(session.playback_state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_command_wire_format() {
        let json = r#"{"command":"pointerDown","target":{"kind":"clipBody","index":2},"input":{"source":"touch","sample":{"clientX":40.0,"targetLeft":10.0,"targetWidth":80.0}}}"#;
        let command: EditorCommand = serde_json::from_str(json).unwrap();
        match command {
            EditorCommand::PointerDown { target, input } => {
                assert_eq!(target, DragTarget::ClipBody(2));
                assert_eq!(input.source, PointerSource::Touch);
                assert_eq!(input.sample.client_x, 40.0);
            }
            other => panic!("unexpected command {other:?}"),
        }

        let seek: EditorCommand = serde_json::from_str(r#"{"command":"seek","time":1200}"#).unwrap();
        assert_eq!(seek, EditorCommand::Seek { time: 1200.0 });
    }
}
