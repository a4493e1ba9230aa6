use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// A commanded move in the grid
///
/// One enum serves every surface: solvers order actions by [`index`](Action::index),
/// the estimation and cache boundaries carry the canonical string label
/// (`"Move Up"` etc., via [`Display`](std::fmt::Display) and
/// [`FromStr`](std::str::FromStr)), and the renderer draws the glyph.
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
pub enum Action {
    #[strum(serialize = "Move Up")]
    #[serde(rename = "Move Up")]
    Up = 0,
    #[strum(serialize = "Move Right")]
    #[serde(rename = "Move Right")]
    Right = 1,
    #[strum(serialize = "Move Down")]
    #[serde(rename = "Move Down")]
    Down = 2,
    #[strum(serialize = "Move Left")]
    #[serde(rename = "Move Left")]
    Left = 3,
}

impl Action {
    /// Stable position of this action in every per-action table
    pub fn index(self) -> usize {
        self as usize
    }

    /// The displacement this action is meant to produce
    pub fn intended(self) -> (i32, i32) {
        match self {
            Action::Up => (0, 1),
            Action::Right => (1, 0),
            Action::Down => (0, -1),
            Action::Left => (-1, 0),
        }
    }

    /// The two perpendicular displacements the agent can slip into,
    /// in the fixed order the outcome weights are assigned
    pub fn laterals(self) -> [(i32, i32); 2] {
        match self {
            Action::Up | Action::Down => [(1, 0), (-1, 0)],
            Action::Right | Action::Left => [(0, 1), (0, -1)],
        }
    }

    /// Arrow glyph for policy rendering
    pub fn glyph(self) -> char {
        match self {
            Action::Up => '↑',
            Action::Right => '→',
            Action::Down => '↓',
            Action::Left => '←',
        }
    }
}
