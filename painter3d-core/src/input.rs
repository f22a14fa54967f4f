/// Held-control snapshot sampled once per frame
use std::fmt;

/// A camera control the host can report as held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Up,
    Down,
    Left,
    Right,
    Forward,
    Backward,
    YawLeft,
    YawRight,
}

impl Control {
    pub const ALL: [Control; 8] = [
        Control::Up,
        Control::Down,
        Control::Left,
        Control::Right,
        Control::Forward,
        Control::Backward,
        Control::YawLeft,
        Control::YawRight,
    ];

    /// Map a DOM-style key name (`"ArrowUp"`, `"w"`, ...) to a control
    pub fn from_key_name(name: &str) -> Option<Control> {
        match name {
            "ArrowUp" => Some(Control::Up),
            "ArrowDown" => Some(Control::Down),
            "ArrowLeft" => Some(Control::Left),
            "ArrowRight" => Some(Control::Right),
            "w" | "W" => Some(Control::Forward),
            "s" | "S" => Some(Control::Backward),
            "a" | "A" => Some(Control::YawLeft),
            "d" | "D" => Some(Control::YawRight),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Control::Up => "up",
            Control::Down => "down",
            Control::Left => "left",
            Control::Right => "right",
            Control::Forward => "forward",
            Control::Backward => "backward",
            Control::YawLeft => "yaw-left",
            Control::YawRight => "yaw-right",
        };
        f.write_str(name)
    }
}

/// Which controls are currently held.
///
/// Only the current level is tracked; press/release edges are not observable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    held: [bool; Control::ALL.len()],
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, control: Control, held: bool) {
        self.held[control.index()] = held;
    }

    /// Update from a key name; returns false for keys that map to no control
    pub fn set_key(&mut self, name: &str, held: bool) -> bool {
        match Control::from_key_name(name) {
            Some(control) => {
                self.set(control, held);
                true
            }
            None => false,
        }
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.held[control.index()]
    }

    pub fn release_all(&mut self) {
        self.held = [false; Control::ALL.len()];
    }

    pub fn any_held(&self) -> bool {
        self.held.iter().any(|&h| h)
    }
}
