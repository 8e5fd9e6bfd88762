use log::info;
use serde::{Deserialize, Serialize};

use crate::error::FractalError;

/// Range control selecting the subdivision depth, the equivalent of an HTML
/// `<input type="range" min="0" max="...">`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthSlider {
    value: u32,
    max: u32,
}

impl DepthSlider {
    /// Creates a slider; `value` is clamped into `0..=max`.
    pub fn new(value: u32, max: u32) -> Self {
        Self {
            value: value.min(max),
            max,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Sets the depth from a signed value, clamping into range. Returns
    /// whether the depth changed.
    pub fn set(&mut self, value: i64) -> bool {
        let clamped = value.clamp(0, i64::from(self.max)) as u32;
        self.replace(clamped)
    }

    /// Sets the depth from slider text. Fractional values are truncated;
    /// anything that is not a number is rejected and leaves the slider
    /// untouched.
    pub fn set_from_str(&mut self, text: &str) -> Result<bool, FractalError> {
        let trimmed = text.trim();
        let value = match trimmed.parse::<i64>() {
            Ok(value) => value,
            Err(_) => match trimmed.parse::<f64>() {
                Ok(value) if value.is_finite() => value.trunc() as i64,
                _ => return Err(FractalError::InvalidDepth(text.to_string())),
            },
        };
        Ok(self.set(value))
    }

    pub fn increment(&mut self) -> bool {
        self.replace(self.value.saturating_add(1).min(self.max))
    }

    pub fn decrement(&mut self) -> bool {
        self.replace(self.value.saturating_sub(1))
    }

    /// Applies an action and reports whether the depth changed.
    pub fn apply(&mut self, action: SliderAction) -> bool {
        match action {
            SliderAction::Increment => self.increment(),
            SliderAction::Decrement => self.decrement(),
            SliderAction::Set(value) => self.set(i64::from(value)),
            SliderAction::Quit => false,
        }
    }

    fn replace(&mut self, value: u32) -> bool {
        if value == self.value {
            return false;
        }
        info!("depth changed {} -> {value}", self.value);
        self.value = value;
        true
    }
}

/// Identifier for a keyboard key the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Named(NamedKey),
    Digit(u8),
}

impl KeyCode {
    pub fn from_name(name: &str) -> Option<Self> {
        if let Some(key) = parse_named_key(name) {
            return Some(key);
        }
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if ch.is_ascii_digit() => Some(Self::Digit(ch as u8 - b'0')),
            _ => None,
        }
    }
}

fn parse_named_key(name: &str) -> Option<KeyCode> {
    use NamedKey::*;
    let key = match name {
        "Left" | "ArrowLeft" => Left,
        "Right" | "ArrowRight" => Right,
        "Up" | "ArrowUp" => Up,
        "Down" | "ArrowDown" => Down,
        "Plus" | "+" => Plus,
        "Minus" | "-" => Minus,
        "Escape" | "Esc" => Escape,
        _ => return None,
    };
    Some(KeyCode::Named(key))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedKey {
    Left,
    Right,
    Up,
    Down,
    Plus,
    Minus,
    Escape,
}

/// What a key press does to the depth control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderAction {
    Increment,
    Decrement,
    Set(u32),
    Quit,
}

impl SliderAction {
    pub fn from_key(key: KeyCode) -> Self {
        match key {
            KeyCode::Named(NamedKey::Up | NamedKey::Right | NamedKey::Plus) => Self::Increment,
            KeyCode::Named(NamedKey::Down | NamedKey::Left | NamedKey::Minus) => Self::Decrement,
            KeyCode::Named(NamedKey::Escape) => Self::Quit,
            KeyCode::Digit(digit) => Self::Set(u32::from(digit)),
        }
    }
}
