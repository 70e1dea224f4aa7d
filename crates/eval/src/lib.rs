//! Cascade eval crate - shape scoring and formation detection.

mod formation;

pub use formation::{detect_formations, Detection, Formation, L_PATTERNS, T_PATTERN};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Matched shapes, in the order a detection pass claims them.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Shape {
    Line3,
    Line4,
    /// Any straight run of five or more. Only the first five cells are credited.
    Line5,
    T,
    L,
}

impl Shape {
    pub const ALL: [Shape; 5] = [Shape::Line3, Shape::Line4, Shape::Line5, Shape::T, Shape::L];

    /// Line tier for a maximal run, `None` below three.
    #[inline]
    pub fn for_run(len: usize) -> Option<Self> {
        match len {
            0..=2 => None,
            3 => Some(Shape::Line3),
            4 => Some(Shape::Line4),
            _ => Some(Shape::Line5),
        }
    }

    /// Cells a formation of this shape removes.
    pub fn cell_count(self) -> usize {
        match self {
            Shape::Line3 => 3,
            Shape::Line4 => 4,
            Shape::Line5 | Shape::T | Shape::L => 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("score for {shape:?} must be positive")]
    NonPositive { shape: Shape },
}

/// Points credited per formation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTable {
    pub line3: u32,
    pub line4: u32,
    pub line5: u32,
    pub t_shape: u32,
    pub l_shape: u32,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self {
            line3: 5,
            line4: 10,
            line5: 50,
            t_shape: 30,
            l_shape: 20,
        }
    }
}

impl ScoreTable {
    pub fn new(
        line3: u32,
        line4: u32,
        line5: u32,
        t_shape: u32,
        l_shape: u32,
    ) -> Result<Self, ScoreError> {
        let table = Self {
            line3,
            line4,
            line5,
            t_shape,
            l_shape,
        };
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> Result<(), ScoreError> {
        match Shape::ALL.into_iter().find(|&shape| self.points(shape) == 0) {
            Some(shape) => Err(ScoreError::NonPositive { shape }),
            None => Ok(()),
        }
    }

    #[inline(always)]
    pub fn points(&self, shape: Shape) -> u32 {
        match shape {
            Shape::Line3 => self.line3,
            Shape::Line4 => self.line4,
            Shape::Line5 => self.line5,
            Shape::T => self.t_shape,
            Shape::L => self.l_shape,
        }
    }
}
