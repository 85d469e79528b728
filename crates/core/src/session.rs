use crate::clock::{Clock, TickSource};
use crate::config::EditorConfig;
use crate::duration::{DurationManager, DurationOption};
use crate::error::TimelineError;
use crate::interaction::{DragController, DragEdit, DragSession, DragTarget, PointerInput};
use crate::registry::TrackRegistry;
use crate::scheduler::TrackScheduler;
use isound_transport::{Clip, ClipSpec, MediaResources, Millis, PlaybackState};

/// One editing session: the clip registry, the clock, and the scheduler that
/// keeps the media collaborator in step with both.
///
/// Every user command, pointer event and timer tick goes through here, and
/// every path that moves the playhead or changes clip geometry ends with a
/// scheduler pass.
pub struct Session<M> {
    registry: TrackRegistry,
    clock: Clock,
    scheduler: TrackScheduler,
    durations: DurationManager,
    drag: DragController,
    speed_presets: Vec<f64>,
    media: M,
}

impl<M: MediaResources> Session<M> {
    /// An invalid `config` is replaced by the defaults.
    pub fn new(config: &EditorConfig, ticker: Box<dyn TickSource>, media: M) -> Self {
        let defaults;
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                log::warn!("{err}, using default engine settings");
                defaults = EditorConfig::default();
                &defaults
            }
        };

        Self {
            registry: TrackRegistry::new(),
            clock: Clock::new(config.initial_duration_ms as Millis, config.tick_interval_ms, ticker),
            scheduler: TrackScheduler::new(),
            durations: DurationManager::from_config(config),
            drag: DragController::new(),
            speed_presets: config.speed_presets.clone(),
            media,
        }
    }

    // -- transport --

    pub fn play(&mut self) {
        self.clock.play();
        self.reconcile();
    }

    pub fn pause(&mut self) {
        self.clock.pause();
        self.reconcile();
    }

    pub fn toggle_playback(&mut self) {
        self.clock.toggle();
        self.reconcile();
    }

    pub fn seek(&mut self, time: Millis) {
        self.clock.seek(time);
        self.reconcile();
    }

    /// Timer callback. Returns whether the playhead moved.
    pub fn on_timer(&mut self, generation: u64) -> bool {
        let advanced = self.clock.on_timer(generation);
        if advanced {
            self.reconcile();
        }
        advanced
    }

    /// Advance by an explicit delta, for hosts that drive time themselves.
    pub fn tick(&mut self, delta: Millis) -> bool {
        let advanced = self.clock.tick(delta);
        if advanced {
            self.reconcile();
        }
        advanced
    }

    pub fn set_speed(&mut self, speed: f64) -> Result<(), TimelineError> {
        self.clock.set_speed(speed)?;
        self.scheduler
            .apply_rate(speed, self.registry.len(), &mut self.media);
        Ok(())
    }

    /// Step to the next configured speed preset.
    pub fn toggle_speed(&mut self) -> Result<(), TimelineError> {
        if self.speed_presets.is_empty() {
            return Ok(());
        }
        let current = self.clock.speed();
        let next = match self.speed_presets.iter().position(|s| *s == current) {
            Some(i) => self.speed_presets[(i + 1) % self.speed_presets.len()],
            None => self.speed_presets[0],
        };
        self.set_speed(next)
    }

    // -- registry --

    pub fn add_clip(&mut self, spec: ClipSpec) -> Result<usize, TimelineError> {
        let added = self
            .registry
            .add_clip(spec, &self.durations, self.clock.timeline_duration())?;
        if let Some(duration) = added.grown_duration {
            log::info!("growing timeline to {duration}ms to fit clip {}", added.index);
            self.clock.set_timeline_duration(duration)?;
        }

        let clip = &self.registry.clips()[added.index];
        self.media.clip_added(added.index, clip);
        self.scheduler.clip_added(added.index);
        self.scheduler
            .apply_rate(self.clock.speed(), self.registry.len(), &mut self.media);
        self.reconcile();
        Ok(added.index)
    }

    pub fn remove_clip(&mut self, index: usize) -> Result<Clip, TimelineError> {
        self.registry.check_index(index)?;

        if let Some(resource) = self.media.resource_mut(index) {
            if let Err(err) = resource.pause() {
                log::warn!("clip {index}: pause before removal failed: {err}");
            }
        }
        let clip = self.registry.remove_clip(index)?;
        self.media.clip_removed(index);
        self.scheduler.clip_removed(index);

        let affected = self
            .drag
            .active()
            .and_then(|session| session.target.clip_index())
            .is_some_and(|dragged| dragged >= index);
        if affected {
            self.drag.end();
        }

        self.scheduler
            .apply_rate(self.clock.speed(), self.registry.len(), &mut self.media);
        self.reconcile();
        Ok(clip)
    }

    /// Re-push the speed and re-run the scheduler, e.g. after the media
    /// side attached resources to empty slots.
    pub fn refresh(&mut self) {
        self.scheduler
            .apply_rate(self.clock.speed(), self.registry.len(), &mut self.media);
        self.reconcile();
    }

    // -- duration --

    pub fn duration_options(&self) -> Vec<DurationOption> {
        self.durations
            .options(self.clock.timeline_duration(), self.registry.clips())
    }

    pub fn select_duration(&mut self, duration: Millis) -> Result<(), TimelineError> {
        self.durations.validate(duration, self.registry.clips())?;
        self.clock.set_timeline_duration(duration)?;
        self.reconcile();
        Ok(())
    }

    // -- pointer --

    pub fn pointer_down(&mut self, target: DragTarget, press: PointerInput) -> Result<(), TimelineError> {
        if let Some(index) = target.clip_index() {
            self.registry.check_index(index)?;
        }
        self.drag.begin(target, &press);
        if target.pauses_clock() {
            self.pause();
        }
        Ok(())
    }

    /// Commit whatever the active drag maps this move to. No-op when idle.
    pub fn pointer_move(&mut self, input: PointerInput) -> Result<Option<DragEdit>, TimelineError> {
        let Some(session) = self.drag.active().copied() else {
            return Ok(None);
        };

        let clip = match session.target.clip_index() {
            Some(index) => match self.registry.get(index) {
                Some(clip) => Some(clip),
                None => {
                    log::debug!("dragged clip {index} no longer exists, ending drag");
                    self.drag.end();
                    return Ok(None);
                }
            },
            None => None,
        };

        let Some(edit) = session.resolve(&input, self.clock.timeline_duration(), clip) else {
            return Ok(None);
        };
        self.commit(edit)?;
        Ok(Some(edit))
    }

    pub fn pointer_up(&mut self) -> Option<DragSession> {
        self.drag.end()
    }

    fn commit(&mut self, edit: DragEdit) -> Result<(), TimelineError> {
        match edit {
            DragEdit::Seek { time } => self.seek(time),
            DragEdit::MoveClip { index, start_time } => {
                let clip = self.registry.set_start_time(index, start_time)?;
                self.scheduler
                    .preview_move(index, clip, self.clock.current_time(), &mut self.media);
                if self.clock.is_playing() {
                    self.reconcile();
                }
            }
            DragEdit::TrimStart { index, start_point } => {
                self.registry.set_start_point(index, start_point)?;
                self.reconcile();
            }
            DragEdit::TrimEnd { index, end_point } => {
                self.registry.set_end_point(index, end_point)?;
                self.reconcile();
            }
        }
        Ok(())
    }

    fn reconcile(&mut self) {
        self.scheduler.reconcile(
            self.registry.clips(),
            self.clock.current_time(),
            self.clock.is_playing(),
            self.clock.speed(),
            &mut self.media,
        );
    }

    // -- accessors --

    pub fn clips(&self) -> &[Clip] {
        self.registry.clips()
    }

    pub fn current_time(&self) -> Millis {
        self.clock.current_time()
    }

    pub fn timeline_duration(&self) -> Millis {
        self.clock.timeline_duration()
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.clock.state()
    }

    pub fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    pub fn speed(&self) -> f64 {
        self.clock.speed()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn active_drag(&self) -> Option<&DragSession> {
        self.drag.active()
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }
}
