use isound_core::{Clip, MediaError, MediaResource, MediaResources, Millis};

/// Media stand-in for hosts without audio output: remembers what a real
/// element would be doing and logs every command it receives.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedTrack {
    pub title: String,
    pub paused: bool,
    pub offset: Millis,
    pub rate: f64,
}

impl LoggedTrack {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            paused: true,
            offset: 0.0,
            rate: 1.0,
        }
    }
}

impl MediaResource for LoggedTrack {
    fn play(&mut self) -> Result<(), MediaError> {
        log::info!("[{}] play from {:.0}ms", self.title, self.offset);
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), MediaError> {
        log::info!("[{}] pause at {:.0}ms", self.title, self.offset);
        self.paused = true;
        Ok(())
    }

    fn set_intrinsic_offset(&mut self, offset: Millis) -> Result<(), MediaError> {
        log::debug!("[{}] seek {:.0}ms", self.title, offset);
        self.offset = offset;
        Ok(())
    }

    fn set_playback_rate(&mut self, rate: f64) -> Result<(), MediaError> {
        log::debug!("[{}] rate {rate}x", self.title);
        self.rate = rate;
        Ok(())
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}

/// One [`LoggedTrack`] per clip, created as soon as the clip is added.
#[derive(Debug, Default)]
pub struct LoggingMedia {
    tracks: Vec<LoggedTrack>,
}

impl LoggingMedia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracks(&self) -> &[LoggedTrack] {
        &self.tracks
    }
}

impl MediaResources for LoggingMedia {
    fn resource(&self, index: usize) -> Option<&dyn MediaResource> {
        self.tracks.get(index).map(|t| t as &dyn MediaResource)
    }

    fn resource_mut(&mut self, index: usize) -> Option<&mut dyn MediaResource> {
        self.tracks.get_mut(index).map(|t| t as &mut dyn MediaResource)
    }

    fn clip_added(&mut self, index: usize, clip: &Clip) {
        let index = index.min(self.tracks.len());
        self.tracks.insert(index, LoggedTrack::new(clip.title.clone()));
    }

    fn clip_removed(&mut self, index: usize) {
        if index < self.tracks.len() {
            let track = self.tracks.remove(index);
            log::info!("[{}] released", track.title);
        }
    }
}
