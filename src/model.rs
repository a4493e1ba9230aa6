use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::{
    action::Action,
    grid::{Coord, GridConfig},
    state::GridState,
};

/// A source of transition probabilities `P(s' | s, a)`
///
/// Both solvers are generic over this seam, so the same solver can run on
/// the known grid dynamics or on any supplied probability table.
pub trait TransitionModel {
    fn prob(&self, state: &GridState, action: Action, next: &GridState) -> f64;
}

/// The known dynamics of the grid itself
///
/// Delegates to each state's own outcome triple; terminal states have no
/// outgoing probability mass.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridDynamics;

impl TransitionModel for GridDynamics {
    fn prob(&self, state: &GridState, action: Action, next: &GridState) -> f64 {
        state.next_state_likelihood(action, next.coord())
    }
}

/// An empirically supplied probability table
///
/// Entries absent from the table are zero probability, so sparse or
/// partially observed models degrade gracefully instead of erroring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<TableRecord>", into = "Vec<TableRecord>")]
pub struct TransitionTable {
    probs: HashMap<(Coord, Action), HashMap<Coord, f64>>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, state: Coord, action: Action, next: Coord, prob: f64) {
        self.probs
            .entry((state, action))
            .or_default()
            .insert(next, prob);
    }

    /// Probability of landing on `next`; 0 when the pair or successor is
    /// absent from the table
    pub fn get(&self, state: Coord, action: Action, next: Coord) -> f64 {
        self.probs
            .get(&(state, action))
            .and_then(|outcomes| outcomes.get(&next))
            .copied()
            .unwrap_or(0.0)
    }

    /// The recorded outcome distribution for one state-action pair
    pub fn outcomes(&self, state: Coord, action: Action) -> Option<&HashMap<Coord, f64>> {
        self.probs.get(&(state, action))
    }

    /// The exact table for a grid's true dynamics
    ///
    /// Useful as a noise-free stand-in for an estimated model.
    pub fn from_grid(grid: &GridConfig) -> Self {
        let mut table = Self::new();
        let states = grid.states();
        for state in states.iter().filter(|s| !s.is_terminal()) {
            for action in Action::iter() {
                for target in &states {
                    let p = state.next_state_likelihood(action, target.coord());
                    if p > 0.0 {
                        table.set(state.coord(), action, target.coord(), p);
                    }
                }
            }
        }
        table
    }
}

impl TransitionModel for TransitionTable {
    fn prob(&self, state: &GridState, action: Action, next: &GridState) -> f64 {
        self.get(state.coord(), action, next.coord())
    }
}

/// Wire form of one table entry; the action travels as its canonical label
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TableRecord {
    state: Coord,
    action: Action,
    outcomes: Vec<(Coord, f64)>,
}

impl From<Vec<TableRecord>> for TransitionTable {
    fn from(records: Vec<TableRecord>) -> Self {
        let mut table = Self::new();
        for record in records {
            for (next, prob) in record.outcomes {
                table.set(record.state, record.action, next, prob);
            }
        }
        table
    }
}

impl From<TransitionTable> for Vec<TableRecord> {
    fn from(table: TransitionTable) -> Self {
        let mut records = table
            .probs
            .into_iter()
            .map(|((state, action), outcomes)| {
                let mut outcomes = outcomes.into_iter().collect::<Vec<_>>();
                outcomes.sort_by_key(|(coord, _)| *coord);
                TableRecord {
                    state,
                    action,
                    outcomes,
                }
            })
            .collect::<Vec<_>>();
        // Deterministic record order keeps serialized caches diffable
        records.sort_by_key(|r| (r.state, r.action.index()));
        records
    }
}
