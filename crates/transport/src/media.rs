use crate::{Clip, Millis};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MediaError {
    #[error("media resource is not ready")]
    NotReady,

    #[error("media resource rejected command: {0}")]
    Rejected(String),
}

/// A single command the engine can issue to a media resource.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaCommand {
    Play,
    Pause,
    Seek(Millis),
    SetRate(f64),
}

/// Handle to one clip's playable media, owned by the rendering side.
///
/// The engine never decodes or fetches anything; it only issues these
/// commands. Offsets are in milliseconds into the untrimmed resource.
pub trait MediaResource {
    fn play(&mut self) -> Result<(), MediaError>;
    fn pause(&mut self) -> Result<(), MediaError>;
    fn set_intrinsic_offset(&mut self, offset: Millis) -> Result<(), MediaError>;
    fn set_playback_rate(&mut self, rate: f64) -> Result<(), MediaError>;
    fn is_paused(&self) -> bool;

    fn apply(&mut self, command: MediaCommand) -> Result<(), MediaError> {
        match command {
            MediaCommand::Play => self.play(),
            MediaCommand::Pause => self.pause(),
            MediaCommand::Seek(offset) => self.set_intrinsic_offset(offset),
            MediaCommand::SetRate(rate) => self.set_playback_rate(rate),
        }
    }
}

/// Index-addressed set of media resources, one slot per registry clip.
///
/// A slot may be empty while the collaborator is still attaching media;
/// the engine treats that as a stale reference and skips it.
pub trait MediaResources {
    fn resource(&self, index: usize) -> Option<&dyn MediaResource>;

    fn resource_mut(&mut self, index: usize) -> Option<&mut dyn MediaResource>;

    /// Called after the registry inserted `clip` at `index`.
    fn clip_added(&mut self, _index: usize, _clip: &Clip) {}

    /// Called after the registry removed the clip at `index`. Releasing the
    /// underlying media is up to the implementation.
    fn clip_removed(&mut self, _index: usize) {}
}

/// Vec-backed [`MediaResources`] that keeps its slots aligned with the
/// registry and lets the owner attach media whenever it becomes ready.
#[derive(Debug)]
pub struct MediaRack<R> {
    slots: Vec<Option<R>>,
}

impl<R> MediaRack<R> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Attach media to an existing slot. Returns the previous resource, or
    /// gives `resource` back if the slot does not exist.
    pub fn attach(&mut self, index: usize, resource: R) -> Result<Option<R>, R> {
        match self.slots.get_mut(index) {
            Some(slot) => Ok(slot.replace(resource)),
            None => Err(resource),
        }
    }

    pub fn detach(&mut self, index: usize) -> Option<R> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    pub fn get(&self, index: usize) -> Option<&R> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut R> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&R>> + '_ {
        self.slots.iter().map(Option::as_ref)
    }
}

impl<R> Default for MediaRack<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: MediaResource> MediaResources for MediaRack<R> {
    fn resource(&self, index: usize) -> Option<&dyn MediaResource> {
        self.get(index).map(|r| r as &dyn MediaResource)
    }

    fn resource_mut(&mut self, index: usize) -> Option<&mut dyn MediaResource> {
        self.get_mut(index).map(|r| r as &mut dyn MediaResource)
    }

    fn clip_added(&mut self, index: usize, _clip: &Clip) {
        let index = index.min(self.slots.len());
        self.slots.insert(index, None);
    }

    fn clip_removed(&mut self, index: usize) {
        if index < self.slots.len() {
            if self.slots.remove(index).is_some() {
                log::debug!("released media for clip {index}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Dummy {
        paused: bool,
        offset: Millis,
        rate: f64,
    }

    impl MediaResource for Dummy {
        fn play(&mut self) -> Result<(), MediaError> {
            self.paused = false;
            Ok(())
        }

        fn pause(&mut self) -> Result<(), MediaError> {
            self.paused = true;
            Ok(())
        }

        fn set_intrinsic_offset(&mut self, offset: Millis) -> Result<(), MediaError> {
            self.offset = offset;
            Ok(())
        }

        fn set_playback_rate(&mut self, rate: f64) -> Result<(), MediaError> {
            self.rate = rate;
            Ok(())
        }

        fn is_paused(&self) -> bool {
            self.paused
        }
    }

    fn clip() -> Clip {
        Clip {
            color: String::new(),
            title: "c".to_string(),
            source: "c.mp3".to_string(),
            duration: 1000.0,
            start_time: 0.0,
            start_point: 0.0,
            end_point: 1000.0,
        }
    }

    #[test]
    fn test_rack_slots_follow_registry() {
        let mut rack: MediaRack<Dummy> = MediaRack::new();
        rack.clip_added(0, &clip());
        rack.clip_added(1, &clip());
        assert_eq!(rack.len(), 2);
        assert!(rack.resource(0).is_none(), "new slots start empty");

        assert!(rack.attach(1, Dummy::default()).is_ok());
        assert!(rack.attach(5, Dummy::default()).is_err());

        rack.clip_removed(0);
        assert_eq!(rack.len(), 1);
        assert!(rack.get(0).is_some(), "slot 1 shifted down to 0");
    }

    #[test]
    fn test_apply_dispatches_commands() {
        let mut dummy = Dummy::default();
        dummy.apply(MediaCommand::Seek(250.0)).unwrap();
        dummy.apply(MediaCommand::SetRate(2.0)).unwrap();
        dummy.apply(MediaCommand::Pause).unwrap();
        assert_eq!(dummy.offset, 250.0);
        assert_eq!(dummy.rate, 2.0);
        assert!(dummy.is_paused());
        dummy.apply(MediaCommand::Play).unwrap();
        assert!(!dummy.is_paused());
    }

    #[test]
    fn test_resource_mut_through_trait_object() {
        let mut rack: MediaRack<Dummy> = MediaRack::new();
        rack.clip_added(0, &clip());
        rack.attach(0, Dummy::default()).unwrap();

        let media: &mut dyn MediaResources = &mut rack;
        media
            .resource_mut(0)
            .expect("attached")
            .set_intrinsic_offset(42.0)
            .unwrap();
        assert_eq!(rack.get(0).map(|d| d.offset), Some(42.0));
    }
}
