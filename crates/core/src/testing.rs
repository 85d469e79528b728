//! Test doubles shared by the unit tests.

use isound_transport::{MediaCommand, MediaError, MediaResource, Millis};

/// Media resource that records every command it accepts.
#[derive(Debug)]
pub struct Recorder {
    pub paused: bool,
    pub offset: Millis,
    pub rate: f64,
    pub ready: bool,
    pub log: Vec<MediaCommand>,
}

impl Recorder {
    pub fn new() -> Self {
        Self {
            paused: true,
            offset: 0.0,
            rate: 1.0,
            ready: true,
            log: Vec::new(),
        }
    }

    pub fn not_ready() -> Self {
        Self {
            ready: false,
            ..Self::new()
        }
    }
}

impl MediaResource for Recorder {
    fn play(&mut self) -> Result<(), MediaError> {
        if !self.ready {
            return Err(MediaError::NotReady);
        }
        self.log.push(MediaCommand::Play);
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), MediaError> {
        self.log.push(MediaCommand::Pause);
        self.paused = true;
        Ok(())
    }

    fn set_intrinsic_offset(&mut self, offset: Millis) -> Result<(), MediaError> {
        if !self.ready {
            return Err(MediaError::NotReady);
        }
        self.log.push(MediaCommand::Seek(offset));
        self.offset = offset;
        Ok(())
    }

    fn set_playback_rate(&mut self, rate: f64) -> Result<(), MediaError> {
        if !self.ready {
            return Err(MediaError::NotReady);
        }
        self.log.push(MediaCommand::SetRate(rate));
        self.rate = rate;
        Ok(())
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}
