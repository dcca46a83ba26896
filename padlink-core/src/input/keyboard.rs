use crate::error::UnknownKey;
use crate::model::{AXIS_COUNT, BUTTON_COUNT, ButtonState, PadState, clamp_axis};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

/// Keys the fallback layout understands. Names follow the DOM `KeyboardEvent.code` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Space,
    F,
    E,
    R,
    Q,
    V,
    Backspace,
    Enter,
}

impl Key {
    pub const ALL: [Key; 12] = [
        Key::W,
        Key::A,
        Key::S,
        Key::D,
        Key::Space,
        Key::F,
        Key::E,
        Key::R,
        Key::Q,
        Key::V,
        Key::Backspace,
        Key::Enter,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Key::W => "KeyW",
            Key::A => "KeyA",
            Key::S => "KeyS",
            Key::D => "KeyD",
            Key::Space => "Space",
            Key::F => "KeyF",
            Key::E => "KeyE",
            Key::R => "KeyR",
            Key::Q => "KeyQ",
            Key::V => "KeyV",
            Key::Backspace => "Backspace",
            Key::Enter => "Enter",
        }
    }

    /// Button slot driven by this key, if any.
    fn button_slot(self) -> Option<usize> {
        match self {
            Key::Space => Some(0),
            Key::F => Some(1),
            Key::E => Some(2),
            Key::R => Some(3),
            Key::Q => Some(4),
            Key::V => Some(5),
            Key::Backspace => Some(8),
            Key::Enter => Some(9),
            Key::W | Key::A | Key::S | Key::D => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Key {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Key::ALL
            .into_iter()
            .find(|k| k.code().eq_ignore_ascii_case(s) || k.code().trim_start_matches("Key").eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownKey(s.to_owned()))
    }
}

/// Set of keys currently held down. Cloning shares the same set.
///
/// The input collaborator reports presses and releases; the sampler only reads.
#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    keys: Arc<RwLock<HashSet<Key>>>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&self, key: Key) {
        self.write().insert(key);
    }

    pub fn release(&self, key: Key) {
        self.write().remove(&key);
    }

    pub fn release_all(&self) {
        self.write().clear();
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.read().contains(&key)
    }

    pub fn snapshot(&self) -> HashSet<Key> {
        self.read().clone()
    }

    // A writer that panicked mid-update leaves a plain set behind; keep using it.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashSet<Key>> {
        self.keys.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashSet<Key>> {
        self.keys.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Builds a [`PadState`] from the held keys: WASD drive the left stick, eight keys map to buttons.
#[derive(Debug, Clone)]
pub struct KeyboardSampler {
    held: HeldKeys,
}

impl KeyboardSampler {
    pub fn new(held: HeldKeys) -> Self {
        Self { held }
    }

    pub fn held_keys(&self) -> &HeldKeys {
        &self.held
    }

    pub fn sample(&self) -> PadState {
        let held = self.held.snapshot();
        let pressed = |k: Key| held.contains(&k);
        let dir = |pos: Key, neg: Key| {
            let v = if pressed(pos) { 1.0 } else { 0.0 } + if pressed(neg) { -1.0 } else { 0.0 };
            clamp_axis(v)
        };

        let mut axes = [0.0_f32; AXIS_COUNT];
        axes[0] = dir(Key::D, Key::A);
        axes[1] = dir(Key::S, Key::W);

        let mut buttons = [ButtonState::RELEASED; BUTTON_COUNT];
        for key in &held {
            if let Some(slot) = key.button_slot() {
                buttons[slot] = ButtonState::digital(true);
            }
        }

        PadState::new(axes, buttons)
    }
}
