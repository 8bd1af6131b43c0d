//! In-memory audio backend with scripted outcomes.
//!
//! Plays nothing. Every clone shares the same state, so a test can keep one
//! clone to steer and inspect the handle the controller owns.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::{AudioBackend, AudioHandle, PlayOutcome, Track};
use crate::error::{Error, Result};

#[derive(Debug)]
struct ScriptState {
    opened: usize,
    play_requests: usize,
    handle_alive: bool,
    loaded: bool,
    paused: bool,
    deferred: bool,
    fail_open: bool,
    outcomes: VecDeque<PlayOutcome>,
    in_flight: Option<PlayOutcome>,
    ready: Option<PlayOutcome>,
}

impl Default for ScriptState {
    fn default() -> Self {
        Self {
            opened: 0,
            play_requests: 0,
            handle_alive: false,
            loaded: true,
            paused: true,
            deferred: false,
            fail_open: false,
            outcomes: VecDeque::new(),
            in_flight: None,
            ready: None,
        }
    }
}

/// Backend whose play requests succeed unless told otherwise.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBackend {
    state: Rc<RefCell<ScriptState>>,
}

impl ScriptedBackend {
    /// Loaded track, immediate `Started` outcomes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold outcomes until [`ScriptedBackend::resolve`] is called.
    pub fn deferred(self) -> Self {
        self.state.borrow_mut().deferred = true;
        self
    }

    /// Report the track as still loading.
    pub fn unloaded(self) -> Self {
        self.state.borrow_mut().loaded = false;
        self
    }

    /// Make `open` fail.
    pub fn failing(self) -> Self {
        self.state.borrow_mut().fail_open = true;
        self
    }

    /// Queue the outcome for the next play request. Unqueued requests start.
    pub fn push_outcome(&self, outcome: PlayOutcome) {
        self.state.borrow_mut().outcomes.push_back(outcome);
    }

    pub fn set_loaded(&self, loaded: bool) {
        self.state.borrow_mut().loaded = loaded;
    }

    /// Deliver the in-flight outcome of a deferred backend.
    pub fn resolve(&self) {
        let mut state = self.state.borrow_mut();
        if let Some(outcome) = state.in_flight.take() {
            if outcome == PlayOutcome::Started {
                state.paused = false;
            }
            state.ready = Some(outcome);
        }
    }

    pub fn opened(&self) -> usize {
        self.state.borrow().opened
    }

    pub fn play_requests(&self) -> usize {
        self.state.borrow().play_requests
    }

    pub fn handle_alive(&self) -> bool {
        self.state.borrow().handle_alive
    }

    pub fn is_paused(&self) -> bool {
        self.state.borrow().paused
    }
}

impl AudioBackend for ScriptedBackend {
    fn open(&self, _track: &Track) -> Result<Box<dyn AudioHandle>> {
        let mut state = self.state.borrow_mut();
        if state.fail_open {
            return Err(Error::AudioUnavailable("scripted open failure".to_string()));
        }
        state.opened += 1;
        state.handle_alive = true;
        Ok(Box::new(ScriptedHandle {
            state: Rc::clone(&self.state),
        }))
    }
}

struct ScriptedHandle {
    state: Rc<RefCell<ScriptState>>,
}

impl AudioHandle for ScriptedHandle {
    fn request_play(&mut self) {
        let mut state = self.state.borrow_mut();
        state.play_requests += 1;
        let outcome = state.outcomes.pop_front().unwrap_or(PlayOutcome::Started);
        if state.deferred {
            state.in_flight = Some(outcome);
            return;
        }
        if outcome == PlayOutcome::Started {
            state.paused = false;
        }
        state.ready = Some(outcome);
    }

    fn poll_play(&mut self) -> Option<PlayOutcome> {
        self.state.borrow_mut().ready.take()
    }

    fn pause(&mut self) {
        self.state.borrow_mut().paused = true;
    }

    fn is_loaded(&self) -> bool {
        self.state.borrow().loaded
    }
}

impl Drop for ScriptedHandle {
    fn drop(&mut self) {
        self.state.borrow_mut().handle_alive = false;
    }
}
