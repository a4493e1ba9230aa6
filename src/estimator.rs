use std::collections::HashMap;

use log::debug;
use rand::Rng;
use strum::IntoEnumIterator;
use thiserror::Error;

use crate::{
    action::Action,
    grid::{Coord, GridConfig},
    model::TransitionTable,
};

/// Errors from empirical model estimation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EstimateError {
    /// An observed move that is neither a single-cell step nor a stay.
    /// The dynamics cannot produce one, so the observation stream is
    /// corrupt and estimation must abort.
    #[error("unclassifiable transition from {from} to {to}")]
    UnclassifiableTransition { from: Coord, to: Coord },
}

/// How one observed transition relates to its origin cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObservedMove {
    Up,
    Down,
    Left,
    Right,
    Stay,
}

fn classify(from: Coord, to: Coord) -> Result<ObservedMove, EstimateError> {
    match (to.x - from.x, to.y - from.y) {
        (1, 0) => Ok(ObservedMove::Right),
        (-1, 0) => Ok(ObservedMove::Left),
        (0, 1) => Ok(ObservedMove::Up),
        (0, -1) => Ok(ObservedMove::Down),
        (0, 0) => Ok(ObservedMove::Stay),
        _ => Err(EstimateError::UnclassifiableTransition { from, to }),
    }
}

/// Empirical estimator of the grid's transition probabilities
///
/// Samples the true dynamics a fixed number of times for every non-terminal
/// state-action pair, validates each observed move against the five
/// recognized directions, and normalizes the successor counts into a
/// probability table of the shape the [`GlieSolver`](crate::solver::GlieSolver)
/// consumes.
#[derive(Debug, Clone)]
pub struct Estimator {
    samples_per_pair: u32,
}

impl Estimator {
    /// **Panics** if `samples_per_pair` is zero
    pub fn new(samples_per_pair: u32) -> Self {
        assert!(samples_per_pair > 0, "`samples_per_pair` must be positive");
        Self { samples_per_pair }
    }

    /// Build a probability table from sampled transitions
    pub fn estimate(
        &self,
        grid: &GridConfig,
        rng: &mut impl Rng,
    ) -> Result<TransitionTable, EstimateError> {
        let mut table = TransitionTable::new();
        for state in grid.states().iter().filter(|s| !s.is_terminal()) {
            for action in Action::iter() {
                let mut counts: HashMap<Coord, u32> = HashMap::new();
                for _ in 0..self.samples_per_pair {
                    let next = state
                        .sample_transition(action, rng)
                        .expect("non-terminal states always have outcomes");
                    classify(state.coord(), next)?;
                    *counts.entry(next).or_insert(0) += 1;
                }
                for (next, count) in counts {
                    let prob = f64::from(count) / f64::from(self.samples_per_pair);
                    table.set(state.coord(), action, next, prob);
                }
            }
            debug!("estimated outcome distributions for {}", state.coord());
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::grid::GridConfig;

    #[test]
    fn classification_covers_the_five_recognized_moves() {
        let from = Coord::new(2, 1);
        assert_eq!(classify(from, Coord::new(3, 1)), Ok(ObservedMove::Right));
        assert_eq!(classify(from, Coord::new(1, 1)), Ok(ObservedMove::Left));
        assert_eq!(classify(from, Coord::new(2, 2)), Ok(ObservedMove::Up));
        assert_eq!(classify(from, Coord::new(2, 0)), Ok(ObservedMove::Down));
        assert_eq!(classify(from, from), Ok(ObservedMove::Stay));
    }

    #[test]
    fn teleports_are_unclassifiable() {
        let from = Coord::new(1, 1);
        let to = Coord::new(3, 3);
        assert_eq!(
            classify(from, to),
            Err(EstimateError::UnclassifiableTransition { from, to }),
        );
        // Diagonals are not single steps either
        assert!(classify(from, Coord::new(2, 2)).is_err());
    }

    #[test]
    fn estimated_distributions_sum_to_one() {
        let grid = GridConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let table = Estimator::new(500).estimate(&grid, &mut rng).unwrap();

        for state in grid.states().iter().filter(|s| !s.is_terminal()) {
            for action in Action::iter() {
                let total: f64 = table
                    .outcomes(state.coord(), action)
                    .expect("every sampled pair is populated")
                    .values()
                    .sum();
                assert!((total - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn estimates_approach_the_true_dynamics() {
        let grid = GridConfig::default();
        let mut rng = StdRng::seed_from_u64(2);
        let table = Estimator::new(5000).estimate(&grid, &mut rng).unwrap();

        let states = grid.states();
        for state in states.iter().filter(|s| !s.is_terminal()) {
            for action in Action::iter() {
                for target in &states {
                    let expected = state.next_state_likelihood(action, target.coord());
                    let observed = table.get(state.coord(), action, target.coord());
                    assert!(
                        (observed - expected).abs() < 0.05,
                        "{} under {} to {}: observed {observed}, expected {expected}",
                        state.coord(),
                        action,
                        target.coord(),
                    );
                }
            }
        }
    }

    #[test]
    fn terminal_states_are_never_sampled() {
        let grid = GridConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let table = Estimator::new(100).estimate(&grid, &mut rng).unwrap();

        for coord in [Coord::new(4, 3), Coord::new(4, 2)] {
            for action in Action::iter() {
                assert!(table.outcomes(coord, action).is_none());
            }
        }
    }
}
