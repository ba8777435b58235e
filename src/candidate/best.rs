//! Running best over a row-major scan.
//!
//! A candidate replaces the current best only when its score is strictly
//! greater, so among equal scores the first one visited in row-major order
//! (lower `y`, then lower `x`) wins.

/// Scored placement in base coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Peak {
    /// X coordinate (column) of the tile's top-left corner.
    pub(crate) x: usize,
    /// Y coordinate (row) of the tile's top-left corner.
    pub(crate) y: usize,
    /// Match score in `[0, 1]`.
    pub(crate) score: f32,
}

/// Top-1 tracker using strict-greater replacement.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BestPeak {
    best: Option<Peak>,
}

impl BestPeak {
    pub(crate) fn new() -> Self {
        Self { best: None }
    }

    /// Offers a candidate; it is kept only if it beats the current best.
    pub(crate) fn offer(&mut self, candidate: Peak) {
        match self.best {
            Some(best) if candidate.score <= best.score => {}
            _ => self.best = Some(candidate),
        }
    }

    pub(crate) fn get(&self) -> Option<Peak> {
        self.best
    }
}
