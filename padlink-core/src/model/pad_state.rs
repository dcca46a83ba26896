use serde::{Deserialize, Serialize};

/// Number of axes in a produced sample.
pub const AXIS_COUNT: usize = 4;

/// Upper bound on buttons in a sample.
pub const BUTTON_COUNT: usize = 16;

/// Clamp an axis value into `[-1, 1]`. NaN collapses to 0.
pub fn clamp_axis(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

/// Clamp an analog button value into `[0, 1]`. NaN collapses to 0.
pub fn clamp_button(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// One button slot of a [`PadState`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireButton")]
pub struct ButtonState {
    pub pressed: bool,
    pub value: f32,
}

impl ButtonState {
    pub const RELEASED: ButtonState = ButtonState {
        pressed: false,
        value: 0.0,
    };

    /// Digital button: the analog value follows the pressed flag.
    pub fn digital(pressed: bool) -> Self {
        Self {
            pressed,
            value: if pressed { 1.0 } else { 0.0 },
        }
    }

    /// Analog button with the value clamped into range.
    pub fn analog(pressed: bool, value: f32) -> Self {
        Self {
            pressed,
            value: clamp_button(value),
        }
    }
}

impl Default for ButtonState {
    fn default() -> Self {
        Self::RELEASED
    }
}

/// Normalized control-input sample shared by every input source.
///
/// Samples built through [`PadState::new`] always carry exactly [`AXIS_COUNT`] axes and at most
/// [`BUTTON_COUNT`] buttons, every value clamped. Decoded samples keep whatever the sender listed so
/// that the receiver only touches those indices.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "WirePad")]
pub struct PadState {
    pub axes: Vec<f32>,
    pub buttons: Vec<ButtonState>,
}

impl PadState {
    pub fn new(axes: impl IntoIterator<Item = f32>, buttons: impl IntoIterator<Item = ButtonState>) -> Self {
        let mut axes: Vec<f32> = axes.into_iter().take(AXIS_COUNT).map(clamp_axis).collect();
        axes.resize(AXIS_COUNT, 0.0);

        let buttons = buttons
            .into_iter()
            .take(BUTTON_COUNT)
            .map(|b| ButtonState::analog(b.pressed, b.value))
            .collect();

        Self { axes, buttons }
    }

    /// Sample with centered sticks and no buttons listed.
    pub fn neutral() -> Self {
        Self::new([], [])
    }

    pub fn axis(&self, index: usize) -> f32 {
        self.axes.get(index).copied().unwrap_or(0.0)
    }

    pub fn button(&self, index: usize) -> ButtonState {
        self.buttons.get(index).copied().unwrap_or_default()
    }
}

// Inbound payloads come from other implementations (browser guests included), so the wire form
// tolerates missing fields and nulls the same way the receiving side always has.

#[derive(Deserialize)]
struct WireButton {
    #[serde(default)]
    pressed: Option<bool>,
    #[serde(default)]
    value: Option<f32>,
}

impl From<WireButton> for ButtonState {
    fn from(wire: WireButton) -> Self {
        let pressed = wire.pressed.unwrap_or(false);
        let value = wire.value.unwrap_or(if pressed { 1.0 } else { 0.0 });
        Self { pressed, value }
    }
}

#[derive(Deserialize)]
struct WirePad {
    #[serde(default)]
    axes: Vec<Option<f32>>,
    #[serde(default)]
    buttons: Vec<Option<WireButton>>,
}

impl From<WirePad> for PadState {
    fn from(wire: WirePad) -> Self {
        Self {
            axes: wire.axes.into_iter().map(|a| a.unwrap_or(0.0)).collect(),
            buttons: wire
                .buttons
                .into_iter()
                .map(|b| b.map(ButtonState::from).unwrap_or_default())
                .collect(),
        }
    }
}
