use padlink_core::{AXIS_COUNT, BUTTON_COUNT, ButtonState, PadState};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ActuatorError {
    #[error("no such slot: {0}")]
    NoSuchSlot(usize),

    #[error("actuator unavailable: {0}")]
    Unavailable(String),
}

/// Whatever turns a control sample into input for the host's application.
///
/// Called one field at a time; a failing field does not stop the others.
pub trait Actuator: Send {
    fn apply_axis(&mut self, index: usize, value: f32) -> Result<(), ActuatorError>;

    fn apply_button(&mut self, index: usize, value: f32, pressed: bool) -> Result<(), ActuatorError>;
}

/// Accepts everything and does nothing. Used when no application is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullActuator;

impl Actuator for NullActuator {
    fn apply_axis(&mut self, _index: usize, _value: f32) -> Result<(), ActuatorError> {
        Ok(())
    }

    fn apply_button(&mut self, _index: usize, _value: f32, _pressed: bool) -> Result<(), ActuatorError> {
        Ok(())
    }
}

/// In-memory pad holding the last value applied to each slot.
#[derive(Debug, Clone)]
pub struct VirtualPad {
    axes: [f32; AXIS_COUNT],
    buttons: [ButtonState; BUTTON_COUNT],
}

impl Default for VirtualPad {
    fn default() -> Self {
        Self {
            axes: [0.0; AXIS_COUNT],
            buttons: [ButtonState::RELEASED; BUTTON_COUNT],
        }
    }
}

impl VirtualPad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn axis(&self, index: usize) -> Option<f32> {
        self.axes.get(index).copied()
    }

    pub fn button(&self, index: usize) -> Option<ButtonState> {
        self.buttons.get(index).copied()
    }

    pub fn snapshot(&self) -> PadState {
        PadState::new(self.axes, self.buttons)
    }
}

impl Actuator for VirtualPad {
    fn apply_axis(&mut self, index: usize, value: f32) -> Result<(), ActuatorError> {
        let slot = self.axes.get_mut(index).ok_or(ActuatorError::NoSuchSlot(index))?;
        if *slot != value {
            debug!("axis {} -> {:.3}", index, value);
        }
        *slot = value;
        Ok(())
    }

    fn apply_button(&mut self, index: usize, value: f32, pressed: bool) -> Result<(), ActuatorError> {
        let slot = self
            .buttons
            .get_mut(index)
            .ok_or(ActuatorError::NoSuchSlot(index))?;
        if slot.pressed != pressed {
            debug!("button {} {}", index, if pressed { "down" } else { "up" });
        }
        *slot = ButtonState { pressed, value };
        Ok(())
    }
}
