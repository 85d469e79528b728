//! Keeps every clip's media phase-locked to the clock.
//!
//! Reconciliation is split into a pure planning pass and an apply pass.
//! The plan holds two phases: offsets and pauses for every clip first, then
//! the start commands for clips that became audible, so tracks that should
//! enter together start back to back instead of racing ahead of one
//! another during setup.

use isound_transport::{Clip, MediaCommand, MediaResources, Millis};

/// What we last successfully commanded for a clip's media.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Slot {
    /// Only meaningful while the media is paused; a sounding resource moves
    /// on its own.
    offset: Option<Millis>,
    rate: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchedulePlan {
    /// Seeks and pauses, in clip order.
    pub prepare: Vec<(usize, MediaCommand)>,
    /// Clips to start once every `prepare` command has been issued.
    pub start: Vec<usize>,
}

impl SchedulePlan {
    pub fn is_empty(&self) -> bool {
        self.prepare.is_empty() && self.start.is_empty()
    }

    pub fn len(&self) -> usize {
        self.prepare.len() + self.start.len()
    }
}

#[derive(Debug, Default)]
pub struct TrackScheduler {
    slots: Vec<Slot>,
}

impl TrackScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clip_added(&mut self, index: usize) {
        let index = index.min(self.slots.len());
        self.slots.insert(index, Slot::default());
    }

    pub fn clip_removed(&mut self, index: usize) {
        if index < self.slots.len() {
            self.slots.remove(index);
        }
    }

    /// Forget what was cached for this clip so the next pass re-issues
    /// both its rate and its offset.
    pub fn invalidate(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Slot::default();
        }
    }

    /// Decide what every clip's media should do at `time`, playing at `speed`.
    pub fn plan(
        &self,
        clips: &[Clip],
        time: Millis,
        playing: bool,
        speed: f64,
        media: &dyn MediaResources,
    ) -> SchedulePlan {
        let mut plan = SchedulePlan::default();

        for (index, clip) in clips.iter().enumerate() {
            let Some(resource) = media.resource(index) else {
                log::debug!("clip {index} has no media attached yet, skipping");
                continue;
            };
            let paused = resource.is_paused();
            let slot = self.slots.get(index).copied().unwrap_or_default();
            let cached = slot.offset;

            if slot.rate != Some(speed) {
                plan.prepare.push((index, MediaCommand::SetRate(speed)));
            }

            if clip.is_audible_at(time) {
                let offset = clip.intrinsic_offset_at(time);
                if paused {
                    if cached != Some(offset) {
                        plan.prepare.push((index, MediaCommand::Seek(offset)));
                    }
                    if playing {
                        plan.start.push(index);
                    }
                } else if !playing {
                    plan.prepare.push((index, MediaCommand::Pause));
                    plan.prepare.push((index, MediaCommand::Seek(offset)));
                }
            } else {
                if !paused {
                    plan.prepare.push((index, MediaCommand::Pause));
                }
                if !paused || cached != Some(clip.start_point) {
                    plan.prepare.push((index, MediaCommand::Seek(clip.start_point)));
                }
            }
        }

        plan
    }

    /// Issue a plan. Returns the number of commands that went through.
    pub fn apply(&mut self, plan: SchedulePlan, media: &mut dyn MediaResources) -> usize {
        let mut issued = 0;

        for (index, command) in plan.prepare {
            if self.issue(index, command, media) {
                issued += 1;
            }
        }
        for index in plan.start {
            if self.issue(index, MediaCommand::Play, media) {
                issued += 1;
            }
        }

        issued
    }

    /// Plan and apply in one go.
    pub fn reconcile(
        &mut self,
        clips: &[Clip],
        time: Millis,
        playing: bool,
        speed: f64,
        media: &mut dyn MediaResources,
    ) -> usize {
        if self.slots.len() != clips.len() {
            self.slots.resize(clips.len(), Slot::default());
        }
        // media may be swapped out between passes; start over once it returns
        for index in 0..clips.len() {
            if media.resource(index).is_none() {
                self.invalidate(index);
            }
        }

        let plan = self.plan(clips, time, playing, speed, media);
        if plan.is_empty() {
            return 0;
        }
        log::debug!(
            "reconcile at {time}ms: {} commands, {} starts",
            plan.len(),
            plan.start.len()
        );
        self.apply(plan, media)
    }

    /// Live update while a clip is being dragged: keep a paused preview
    /// phase-correct, or park the media at zero once the window leaves
    /// the playhead.
    pub fn preview_move(
        &mut self,
        index: usize,
        clip: &Clip,
        time: Millis,
        media: &mut dyn MediaResources,
    ) {
        if clip.is_audible_at(time) {
            self.issue(index, MediaCommand::Seek(clip.intrinsic_offset_at(time)), media);
        } else {
            self.issue(index, MediaCommand::Pause, media);
            self.issue(index, MediaCommand::Seek(0.0), media);
        }
    }

    /// Push `speed` to every attached resource, audible or not.
    pub fn apply_rate(&mut self, speed: f64, count: usize, media: &mut dyn MediaResources) {
        for index in 0..count {
            self.issue(index, MediaCommand::SetRate(speed), media);
        }
    }

    fn issue(&mut self, index: usize, command: MediaCommand, media: &mut dyn MediaResources) -> bool {
        let Some(resource) = media.resource_mut(index) else {
            log::debug!("clip {index} has no media attached, dropping {command:?}");
            self.invalidate(index);
            return false;
        };

        match resource.apply(command) {
            Ok(()) => {
                let paused = resource.is_paused();
                if let Some(slot) = self.slots.get_mut(index) {
                    match command {
                        MediaCommand::Seek(offset) => {
                            slot.offset = if paused { Some(offset) } else { None };
                        }
                        MediaCommand::Play => slot.offset = None,
                        MediaCommand::SetRate(rate) => slot.rate = Some(rate),
                        MediaCommand::Pause => {}
                    }
                }
                true
            }
            Err(err) => {
                log::warn!("clip {index}: {command:?} failed: {err}");
                self.invalidate(index);
                false
            }
        }
    }
}
