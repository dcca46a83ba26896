mod keyboard;

pub use keyboard::{HeldKeys, Key, KeyboardSampler};
