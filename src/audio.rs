//! Background music.
//!
//! One looping track plays at a time.  A fade-out detaches the current track
//! and ramps its volume down over a few frames while the next one starts.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::entities::{MusicCue, Track};
use crate::error::Error;

pub const GAMEPLAY_MUSIC_FILE: &str = "Music.ogg";
pub const ENDING_MUSIC_FILE: &str = "final.ogg";

/// Linear volume ramp from 1.0 to 0.0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fade {
    duration: Duration,
    elapsed: Duration,
}

impl Fade {
    pub fn new(ms: u32) -> Self {
        Fade {
            duration: Duration::from_millis(ms as u64),
            elapsed: Duration::ZERO,
        }
    }

    /// Advance by `dt` and return the new volume.
    pub fn step(&mut self, dt: Duration) -> f32 {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.volume()
    }

    pub fn volume(&self) -> f32 {
        if self.duration.is_zero() {
            return 0.0;
        }
        1.0 - self.elapsed.as_secs_f32() / self.duration.as_secs_f32()
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

struct Output {
    // Dropping the stream silences every sink.
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

fn read_track(dir: &Path, file: &str) -> Option<Arc<[u8]>> {
    let path = dir.join(file);
    match std::fs::read(&path) {
        Ok(bytes) => Some(bytes.into()),
        Err(e) => {
            let err = Error::ResourceLoad {
                path,
                reason: e.to_string(),
            };
            log::warn!("{}", err);
            None
        }
    }
}

pub struct MusicPlayer {
    output: Option<Output>,
    gameplay: Option<Arc<[u8]>>,
    ending: Option<Arc<[u8]>>,
    current: Option<Sink>,
    fading: Option<(Sink, Fade)>,
}

impl MusicPlayer {
    /// Player that never makes a sound.
    pub fn silent() -> Self {
        MusicPlayer {
            output: None,
            gameplay: None,
            ending: None,
            current: None,
            fading: None,
        }
    }

    /// Open the default output device and read the music files from `dir`.
    /// Any failure leaves the player silent for the affected part.
    pub fn open(dir: &Path) -> Self {
        let output = match OutputStream::try_default() {
            Ok((stream, handle)) => Some(Output {
                _stream: stream,
                handle,
            }),
            Err(e) => {
                log::warn!(
                    "{}",
                    Error::ResourceLoad {
                        path: "default audio device".into(),
                        reason: e.to_string(),
                    }
                );
                None
            }
        };
        if output.is_none() {
            return Self::silent();
        }
        MusicPlayer {
            output,
            gameplay: read_track(dir, GAMEPLAY_MUSIC_FILE),
            ending: read_track(dir, ENDING_MUSIC_FILE),
            current: None,
            fading: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.output.is_some()
    }

    pub fn apply(&mut self, cue: MusicCue) {
        match cue {
            MusicCue::Stop => {
                if let Some(sink) = self.current.take() {
                    sink.stop();
                }
                if let Some((sink, _)) = self.fading.take() {
                    sink.stop();
                }
            }
            MusicCue::FadeOut { ms } => {
                if let Some(sink) = self.current.take() {
                    if let Some((old, _)) = self.fading.replace((sink, Fade::new(ms))) {
                        old.stop();
                    }
                }
            }
            MusicCue::Play(track) => {
                if let Some(sink) = self.current.take() {
                    sink.stop();
                }
                if let Err(e) = self.play(track) {
                    log::warn!("{}", e);
                }
            }
        }
    }

    fn play(&mut self, track: Track) -> Result<(), Error> {
        let Some(output) = &self.output else {
            return Ok(());
        };
        let (file, bytes) = match track {
            Track::Gameplay => (GAMEPLAY_MUSIC_FILE, &self.gameplay),
            Track::Ending => (ENDING_MUSIC_FILE, &self.ending),
        };
        let Some(bytes) = bytes else {
            return Ok(());
        };
        let load_err = |reason: String| Error::ResourceLoad {
            path: file.into(),
            reason,
        };
        let source =
            Decoder::new(Cursor::new(Arc::clone(bytes))).map_err(|e| load_err(e.to_string()))?;
        let sink = Sink::try_new(&output.handle).map_err(|e| load_err(e.to_string()))?;
        sink.append(source.repeat_infinite());
        log::debug!("playing {}", file);
        self.current = Some(sink);
        Ok(())
    }

    /// Advance any running fade by `dt`.
    pub fn update(&mut self, dt: Duration) {
        let done = match &mut self.fading {
            Some((sink, fade)) => {
                sink.set_volume(fade.step(dt));
                fade.is_done()
            }
            None => false,
        };
        if done {
            if let Some((sink, _)) = self.fading.take() {
                sink.stop();
            }
        }
    }
}
