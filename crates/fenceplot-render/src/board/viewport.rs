use serde::{Deserialize, Serialize};

/// Visible coordinate box of a board, stored `[left, top, right, bottom]` (vertical pair
/// top-first, as board libraries report it). `top > bottom` for an upright board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Viewport {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_array([left, top, right, bottom]: [f64; 4]) -> Self {
        Self::new(left, top, right, bottom)
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.left, self.top, self.right, self.bottom]
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// Shifts the box by `step` of its own extent. Up moves both vertical bounds towards larger
    /// `y` by `step * (top - bottom)`; Right moves both horizontal bounds by
    /// `step * (right - left)`.
    pub fn pan(self, direction: PanDirection, step: f64) -> Self {
        let dx = self.width() * step;
        let dy = self.height() * step;
        match direction {
            PanDirection::Up => Self::new(self.left, self.top + dy, self.right, self.bottom + dy),
            PanDirection::Down => Self::new(self.left, self.top - dy, self.right, self.bottom - dy),
            PanDirection::Left => Self::new(self.left - dx, self.top, self.right - dx, self.bottom),
            PanDirection::Right => {
                Self::new(self.left + dx, self.top, self.right + dx, self.bottom)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanDirection {
    Up,
    Down,
    Left,
    Right,
}

impl PanDirection {
    /// Arrow keys and their vi equivalents; anything else is not a pan key.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "k" => Some(Self::Up),
            "ArrowDown" | "j" => Some(Self::Down),
            "ArrowLeft" | "h" => Some(Self::Left),
            "ArrowRight" | "l" => Some(Self::Right),
            _ => None,
        }
    }
}
