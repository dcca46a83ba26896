use crate::control::pad_source::PadSource;
use gilrs::{Axis, Button, Gamepad, Gilrs};
use padlink_core::{ButtonState, PadState};
use std::sync::{Arc, Mutex, Weak};
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(8);

// Standard gamepad slot order.
const BUTTON_LAYOUT: [Button; 16] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
];

type Slot = Mutex<Option<PadState>>;

/// First connected gamepad, read through gilrs on a dedicated thread.
///
/// The thread exits once the source is dropped.
pub struct GilrsPadSource {
    latest: Arc<Slot>,
}

impl GilrsPadSource {
    pub fn spawn() -> Self {
        let latest: Arc<Slot> = Arc::new(Mutex::new(None));
        let weak = Arc::downgrade(&latest);

        thread::spawn(move || poll_gamepads(weak));

        Self { latest }
    }
}

impl PadSource for GilrsPadSource {
    fn sample(&self) -> Option<PadState> {
        self.latest
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

fn poll_gamepads(slot: Weak<Slot>) {
    let mut gilrs = match Gilrs::new() {
        Ok(g) => g,
        Err(e) => {
            warn!("gilrs init failed, using keyboard only: {}", e);
            return;
        }
    };

    let mut active: Option<String> = None;

    loop {
        while gilrs.next_event().is_some() {}

        let Some(slot) = slot.upgrade() else {
            return;
        };

        let first = gilrs.gamepads().find(|(_, pad)| pad.is_connected()).map(|(_, pad)| pad);

        let name = first.as_ref().map(|pad| pad.name().to_owned());
        if name != active {
            match &name {
                Some(n) => info!("Using gamepad '{}'", n),
                None => info!("No gamepad connected"),
            }
            active = name;
        }

        let state = first.map(|pad| read_pad(&pad));
        *slot.lock().unwrap_or_else(|e| e.into_inner()) = state;
        drop(slot);

        thread::sleep(POLL_INTERVAL);
    }
}

fn read_pad(pad: &Gamepad<'_>) -> PadState {
    // gilrs reports up as positive; the standard layout has down positive.
    let axes = [
        pad.value(Axis::LeftStickX),
        -pad.value(Axis::LeftStickY),
        pad.value(Axis::RightStickX),
        -pad.value(Axis::RightStickY),
    ];

    let buttons = BUTTON_LAYOUT.map(|button| {
        let pressed = pad.is_pressed(button);
        match pad.button_data(button) {
            Some(data) => ButtonState::analog(pressed, data.value()),
            None => ButtonState::digital(pressed),
        }
    });

    PadState::new(axes, buttons)
}
