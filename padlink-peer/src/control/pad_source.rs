use padlink_core::{KeyboardSampler, PadState};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A physical controller, or anything that can stand in for one.
pub trait PadSource: Send + Sync {
    /// Current state of the first connected controller, `None` when nothing is connected.
    fn sample(&self) -> Option<PadState>;
}

/// No controller support; every tick falls back to the keyboard.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoController;

impl PadSource for NoController {
    fn sample(&self) -> Option<PadState> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Controller,
    Keyboard,
}

/// Picks exactly one source per sample: the controller when it reports state, otherwise the keyboard.
#[derive(Clone)]
pub struct InputSampler {
    controller: Arc<dyn PadSource>,
    keyboard: KeyboardSampler,
}

impl InputSampler {
    pub fn new(controller: Arc<dyn PadSource>, keyboard: KeyboardSampler) -> Self {
        Self {
            controller,
            keyboard,
        }
    }

    pub fn keyboard_only(keyboard: KeyboardSampler) -> Self {
        Self::new(Arc::new(NoController), keyboard)
    }

    pub fn keyboard(&self) -> &KeyboardSampler {
        &self.keyboard
    }

    pub fn sample(&self) -> (PadState, InputKind) {
        match self.controller.sample() {
            Some(state) => (state, InputKind::Controller),
            None => (self.keyboard.sample(), InputKind::Keyboard),
        }
    }
}

/// User switch for sending control input. Clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct ControlToggle(Arc<AtomicBool>);

impl ControlToggle {
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Relaxed);
    }

    /// Flip the switch and return the new value.
    pub fn toggle(&self) -> bool {
        !self.0.fetch_xor(true, Ordering::Relaxed)
    }
}
