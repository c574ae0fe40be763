use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0, self.1, self.2)
    }
}

pub const DEFAULT_PALETTE: [Rgb; 8] = [
    Rgb(255, 0, 0),
    Rgb(255, 255, 0),
    Rgb(0, 255, 0),
    Rgb(0, 255, 255),
    Rgb(255, 0, 255),
    Rgb(0, 0, 255),
    Rgb(200, 200, 200),
    Rgb(128, 128, 128),
];

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    #[error("palette must contain at least one colour")]
    Empty,
}

/// Round-robin colour assignment. The index only ever moves forward.
#[derive(Debug, Clone)]
pub struct ColorCursor {
    palette: Vec<Rgb>,
    issued: u64,
}

impl ColorCursor {
    pub fn new(palette: Vec<Rgb>) -> Result<Self, PaletteError> {
        if palette.is_empty() {
            return Err(PaletteError::Empty);
        }
        Ok(Self { palette, issued: 0 })
    }

    pub fn palette(&self) -> &[Rgb] {
        &self.palette
    }

    /// Number of colours handed out so far.
    pub fn issued(&self) -> u64 {
        self.issued
    }

    pub fn peek(&self) -> Rgb {
        self.palette[(self.issued % self.palette.len() as u64) as usize]
    }

    pub fn next_color(&mut self) -> Rgb {
        let color = self.peek();
        self.issued = self.issued.saturating_add(1);
        color
    }
}

impl Default for ColorCursor {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE.to_vec(),
            issued: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colours_cycle_through_the_palette() {
        let mut cursor = ColorCursor::new(vec![Rgb(1, 1, 1), Rgb(2, 2, 2)]).unwrap();
        assert_eq!(cursor.next_color(), Rgb(1, 1, 1));
        assert_eq!(cursor.next_color(), Rgb(2, 2, 2));
        assert_eq!(cursor.next_color(), Rgb(1, 1, 1));
        assert_eq!(cursor.issued(), 3);
    }

    #[test]
    fn empty_palette_is_rejected() {
        assert_eq!(ColorCursor::new(Vec::new()).unwrap_err(), PaletteError::Empty);
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(Rgb(255, 0, 128).to_hex(), "#ff0080");
    }
}
