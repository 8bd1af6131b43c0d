//! Audio backend selection for the terminal front end.
//!
//! With the `audio` feature, tracks play through rodio on a dedicated
//! thread per handle. rodio's output stream is not `Send`, so the stream,
//! decoder and sink all live on that thread and the UI talks to it over a
//! channel. Without the feature every card runs silent.

use keepsake_core::audio::{AudioBackend, NoAudio};

/// Pick the backend for this run.
pub fn backend(no_audio: bool) -> Box<dyn AudioBackend> {
    if no_audio {
        tracing::info!("Audio disabled on the command line");
        return Box::new(NoAudio);
    }
    platform_backend()
}

#[cfg(feature = "audio")]
fn platform_backend() -> Box<dyn AudioBackend> {
    Box::new(rodio_backend::RodioBackend)
}

#[cfg(not(feature = "audio"))]
fn platform_backend() -> Box<dyn AudioBackend> {
    tracing::info!("Built without the audio feature, music disabled");
    Box::new(NoAudio)
}

#[cfg(feature = "audio")]
mod rodio_backend {
    use std::fs::File;
    use std::io::BufReader;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
    use std::sync::Arc;
    use std::thread;

    use keepsake_core::audio::{AudioBackend, AudioHandle, PlayOutcome, Track};
    use keepsake_core::{Error, Result};
    use rodio::{Decoder, OutputStream, Sink, Source};

    enum AudioCommand {
        Play,
        Pause,
        Shutdown,
    }

    /// Opens each track on its own audio thread.
    pub struct RodioBackend;

    impl AudioBackend for RodioBackend {
        fn open(&self, track: &Track) -> Result<Box<dyn AudioHandle>> {
            if !track.source.is_file() {
                return Err(Error::AudioUnavailable(format!(
                    "track not found: {}",
                    track.source.display()
                )));
            }

            let (command_tx, command_rx) = mpsc::channel::<AudioCommand>();
            let (outcome_tx, outcome_rx) = mpsc::channel::<PlayOutcome>();
            let loaded = Arc::new(AtomicBool::new(false));

            let thread_track = track.clone();
            let thread_loaded = Arc::clone(&loaded);
            let thread = thread::Builder::new()
                .name("keepsake-audio".to_string())
                .spawn(move || run(thread_track, thread_loaded, command_rx, outcome_tx))?;

            Ok(Box::new(RodioHandle {
                command_tx,
                outcome_rx,
                loaded,
                thread: Some(thread),
            }))
        }
    }

    struct RodioHandle {
        command_tx: Sender<AudioCommand>,
        outcome_rx: Receiver<PlayOutcome>,
        loaded: Arc<AtomicBool>,
        thread: Option<thread::JoinHandle<()>>,
    }

    impl AudioHandle for RodioHandle {
        fn request_play(&mut self) {
            if self.command_tx.send(AudioCommand::Play).is_err() {
                tracing::warn!("Audio thread is gone, play request dropped");
            }
        }

        fn poll_play(&mut self) -> Option<PlayOutcome> {
            match self.outcome_rx.try_recv() {
                Ok(outcome) => Some(outcome),
                Err(TryRecvError::Empty) => None,
                // The thread exited without answering; treat it as a refusal.
                Err(TryRecvError::Disconnected) => {
                    Some(PlayOutcome::Rejected("audio thread exited".to_string()))
                }
            }
        }

        fn pause(&mut self) {
            let _ = self.command_tx.send(AudioCommand::Pause);
        }

        fn is_loaded(&self) -> bool {
            self.loaded.load(Ordering::Acquire)
        }
    }

    impl Drop for RodioHandle {
        fn drop(&mut self) {
            let _ = self.command_tx.send(AudioCommand::Shutdown);
            if let Some(thread) = self.thread.take() {
                if thread.join().is_err() {
                    tracing::warn!("Audio thread panicked");
                }
            }
        }
    }

    /// Open the output, decode the track into a paused sink, then serve
    /// commands until shutdown.
    fn run(
        track: Track,
        loaded: Arc<AtomicBool>,
        commands: Receiver<AudioCommand>,
        outcomes: Sender<PlayOutcome>,
    ) {
        tracing::debug!(source = %track.source.display(), "Audio thread starting");

        let output = match open_sink(&track) {
            Ok(output) => {
                loaded.store(true, Ordering::Release);
                Some(output)
            }
            Err(reason) => {
                tracing::warn!(reason = %reason, "Could not prepare audio track");
                None
            }
        };

        while let Ok(command) = commands.recv() {
            match command {
                AudioCommand::Play => {
                    let outcome = match &output {
                        Some((_stream, sink)) => {
                            sink.play();
                            PlayOutcome::Started
                        }
                        None => PlayOutcome::Rejected("no audio output".to_string()),
                    };
                    if outcomes.send(outcome).is_err() {
                        break;
                    }
                }
                AudioCommand::Pause => {
                    if let Some((_stream, sink)) = &output {
                        sink.pause();
                    }
                }
                AudioCommand::Shutdown => break,
            }
        }

        if let Some((_stream, sink)) = output {
            sink.stop();
        }
        tracing::debug!("Audio thread exited");
    }

    /// The stream must outlive the sink, so both are kept together.
    fn open_sink(track: &Track) -> std::result::Result<(OutputStream, Sink), String> {
        let (stream, handle) = OutputStream::try_default().map_err(|e| e.to_string())?;
        let sink = Sink::try_new(&handle).map_err(|e| e.to_string())?;
        let file = File::open(&track.source).map_err(|e| e.to_string())?;
        let source = Decoder::new(BufReader::new(file)).map_err(|e| e.to_string())?;

        sink.pause();
        sink.set_volume(track.volume);
        if track.looping {
            sink.append(source.repeat_infinite());
        } else {
            sink.append(source);
        }
        Ok((stream, sink))
    }
}
