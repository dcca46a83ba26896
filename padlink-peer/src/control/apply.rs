use crate::control::actuator::{Actuator, ActuatorError};
use padlink_core::{AXIS_COUNT, BUTTON_COUNT, PadState, clamp_axis, clamp_button};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadField {
    Axis(usize),
    Button(usize),
}

impl fmt::Display for PadField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Axis(i) => write!(f, "axis {i}"),
            Self::Button(i) => write!(f, "button {i}"),
        }
    }
}

#[derive(Debug)]
pub struct FieldFailure {
    pub field: PadField,
    pub error: ActuatorError,
}

/// Outcome of applying one sample, field by field.
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub axes_applied: usize,
    pub buttons_applied: usize,
    pub failures: Vec<FieldFailure>,
}

impl ApplyReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Push every listed field of `state` into the actuator.
///
/// Values are clamped again here since the sample came off the wire. Slots the sample does not list
/// are left alone.
pub fn apply_pad_state<A: Actuator + ?Sized>(actuator: &mut A, state: &PadState) -> ApplyReport {
    let mut report = ApplyReport::default();

    for (index, value) in state.axes.iter().take(AXIS_COUNT).enumerate() {
        match actuator.apply_axis(index, clamp_axis(*value)) {
            Ok(()) => report.axes_applied += 1,
            Err(error) => report.failures.push(FieldFailure {
                field: PadField::Axis(index),
                error,
            }),
        }
    }

    for (index, button) in state.buttons.iter().take(BUTTON_COUNT).enumerate() {
        match actuator.apply_button(index, clamp_button(button.value), button.pressed) {
            Ok(()) => report.buttons_applied += 1,
            Err(error) => report.failures.push(FieldFailure {
                field: PadField::Button(index),
                error,
            }),
        }
    }

    report
}
