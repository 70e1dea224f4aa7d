//! Playable colors and the palette they are drawn from.
//!
//! Colors are the values 1..=255. Zero never names a color: it is the empty
//! sentinel a cell holds between removal and refill, modelled as `None`.

use std::num::NonZeroU8;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::CoreError;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Color(NonZeroU8);

impl Color {
    /// Returns `None` for the empty sentinel.
    pub const fn new(value: u8) -> Option<Self> {
        match NonZeroU8::new(value) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    #[inline(always)]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Color {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Color::new(value).ok_or(CoreError::ReservedColor(value))
    }
}

impl From<Color> for u8 {
    fn from(color: Color) -> u8 {
        color.get()
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Ordered, non-empty set of playable colors.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Palette of the colors `1..=size`.
    pub fn with_size(size: u8) -> Result<Self, CoreError> {
        if size == 0 {
            return Err(CoreError::EmptyPalette);
        }
        let colors = (1..=size).filter_map(Color::new).collect();
        Ok(Self { colors })
    }

    pub fn from_values(values: &[u8]) -> Result<Self, CoreError> {
        if values.is_empty() {
            return Err(CoreError::EmptyPalette);
        }
        let mut colors: Vec<Color> = Vec::with_capacity(values.len());
        for &value in values {
            let color = Color::try_from(value)?;
            if colors.contains(&color) {
                return Err(CoreError::DuplicateColor(value));
            }
            colors.push(color);
        }
        Ok(Self { colors })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn contains(&self, color: Color) -> bool {
        self.colors.contains(&color)
    }

    /// Uniform draw from the palette.
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        self.colors[rng.random_range(0..self.colors.len())]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: (1..=4).filter_map(Color::new).collect(),
        }
    }
}

impl TryFrom<Vec<u8>> for Palette {
    type Error = CoreError;

    fn try_from(values: Vec<u8>) -> Result<Self, Self::Error> {
        Palette::from_values(&values)
    }
}

impl From<Palette> for Vec<u8> {
    fn from(palette: Palette) -> Vec<u8> {
        palette.colors.into_iter().map(u8::from).collect()
    }
}
