/// Why a chime request could not be honored.
#[derive(thiserror::Error, Debug)]
pub enum ChimeError {
    #[error("playback unavailable: {0}")]
    Unavailable(String),
}

/// Audible cue requested once per completed sweep.
///
/// Playback failure never surfaces past a debug log line; use
/// [`ring_quietly`] at call sites.
pub trait SweepChime {
    fn ring(&self) -> Result<(), ChimeError>;
}

/// No-op chime for headless runs and tests.
pub struct SilentChime;

impl SweepChime for SilentChime {
    fn ring(&self) -> Result<(), ChimeError> {
        Ok(())
    }
}

/// Logs the cue instead of playing it.
pub struct LogChime;

impl SweepChime for LogChime {
    fn ring(&self) -> Result<(), ChimeError> {
        log::debug!("sweep complete chime");
        Ok(())
    }
}

/// Request the cue and swallow any failure.
pub fn ring_quietly(chime: &dyn SweepChime) {
    if let Err(err) = chime.ring() {
        log::debug!("sweep chime suppressed: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenChime;

    impl SweepChime for BrokenChime {
        fn ring(&self) -> Result<(), ChimeError> {
            Err(ChimeError::Unavailable("no output device".into()))
        }
    }

    #[test]
    fn failures_are_swallowed() {
        ring_quietly(&BrokenChime);
        ring_quietly(&SilentChime);
    }
}
