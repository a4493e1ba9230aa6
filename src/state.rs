use std::collections::HashMap;

use rand::{distributions::WeightedIndex, prelude::Distribution, Rng};
use strum::IntoEnumIterator;

use crate::{
    action::Action,
    grid::{Coord, GridConfig},
};

/// Chance that the commanded direction is executed; the remainder splits
/// evenly between the two lateral directions
pub const INTENDED_WEIGHT: f64 = 0.8;
pub const LATERAL_WEIGHT: f64 = 0.1;

/// One reachable grid cell, with its reward and the outcome triple of
/// every action commanded from it
///
/// The triple is ordered (intended, lateral, lateral) and each candidate
/// is collapsed onto the cell itself when the move would leave the grid or
/// enter a blocked cell. Terminal states are absorbing and carry an empty
/// transition map.
#[derive(Debug, Clone)]
pub struct GridState {
    coord: Coord,
    is_terminal: bool,
    reward: f64,
    transitions: HashMap<Action, [Coord; 3]>,
}

impl GridState {
    pub fn new(coord: Coord, grid: &GridConfig) -> Self {
        let is_terminal = grid.terminal_reward(coord).is_some();
        let transitions = if is_terminal {
            HashMap::new()
        } else {
            Action::iter()
                .map(|action| {
                    let [lateral_a, lateral_b] = action.laterals();
                    let outcomes = [
                        grid.resolve(coord, coord.offset(action.intended())),
                        grid.resolve(coord, coord.offset(lateral_a)),
                        grid.resolve(coord, coord.offset(lateral_b)),
                    ];
                    (action, outcomes)
                })
                .collect()
        };

        Self {
            coord,
            is_terminal,
            reward: grid.reward(coord),
            transitions,
        }
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    pub fn reward(&self) -> f64 {
        self.reward
    }

    /// Probability that commanding `action` here lands the agent on `target`
    ///
    /// Outcomes are weighted by position in the triple and *summed* when
    /// several positions collapse onto the same cell, as happens in corners.
    /// Terminal states have no outgoing mass, so this is 0 for them.
    pub fn next_state_likelihood(&self, action: Action, target: Coord) -> f64 {
        let Some(outcomes) = self.transitions.get(&action) else {
            return 0.0;
        };
        outcomes
            .iter()
            .zip([INTENDED_WEIGHT, LATERAL_WEIGHT, LATERAL_WEIGHT])
            .filter(|(outcome, _)| **outcome == target)
            .map(|(_, weight)| weight)
            .sum()
    }

    /// Sample a successor cell from the true dynamics
    ///
    /// `None` for terminal states, which have no successors.
    pub fn sample_transition(&self, action: Action, rng: &mut impl Rng) -> Option<Coord> {
        let outcomes = self.transitions.get(&action)?;
        let dist = WeightedIndex::new([INTENDED_WEIGHT, LATERAL_WEIGHT, LATERAL_WEIGHT])
            .expect("outcome weights are positive");
        Some(outcomes[dist.sample(rng)])
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn state(x: i32, y: i32) -> GridState {
        GridState::new(Coord::new(x, y), &GridConfig::default())
    }

    #[test]
    fn outcome_probabilities_sum_to_one() {
        let grid = GridConfig::default();
        let states = grid.states();
        for s in states.iter().filter(|s| !s.is_terminal()) {
            for action in Action::iter() {
                let total: f64 = states
                    .iter()
                    .map(|target| s.next_state_likelihood(action, target.coord()))
                    .sum();
                assert!(
                    (total - 1.0).abs() < 1e-12,
                    "mass from {} under {} sums to {}",
                    s.coord(),
                    action,
                    total
                );
            }
        }
    }

    #[test]
    fn colliding_outcomes_sum_their_weights() {
        // In the corner, Left bounces both the intended move and one
        // lateral back onto (1,1): 0.8 + 0.1, not an overwrite.
        let corner = state(1, 1);
        assert_eq!(corner.next_state_likelihood(Action::Left, Coord::new(1, 1)), 0.9);
        assert_eq!(corner.next_state_likelihood(Action::Down, Coord::new(1, 1)), 0.9);
        // Right only risks slipping off the bottom edge.
        assert_eq!(corner.next_state_likelihood(Action::Right, Coord::new(1, 1)), 0.1);
        assert_eq!(corner.next_state_likelihood(Action::Right, Coord::new(2, 1)), 0.8);
    }

    #[test]
    fn terminal_states_are_absorbing() {
        for coord in [Coord::new(4, 3), Coord::new(4, 2)] {
            let s = GridState::new(coord, &GridConfig::default());
            assert!(s.is_terminal());
            for action in Action::iter() {
                for target in [coord, Coord::new(3, 3), Coord::new(1, 1)] {
                    assert_eq!(s.next_state_likelihood(action, target), 0.0);
                }
                let mut rng = StdRng::seed_from_u64(7);
                assert_eq!(s.sample_transition(action, &mut rng), None);
            }
        }
        assert_eq!(state(4, 3).reward(), 1.0);
        assert_eq!(state(4, 2).reward(), -1.0);
        assert_eq!(state(3, 3).reward(), -0.04);
    }

    #[test]
    fn blocked_cell_is_never_a_target() {
        let grid = GridConfig::default();
        let blocked = Coord::new(2, 2);
        for s in grid.states() {
            for action in Action::iter() {
                assert_eq!(s.next_state_likelihood(action, blocked), 0.0);
            }
        }
        // Aiming straight at the obstacle keeps the agent in place.
        assert_eq!(state(2, 1).next_state_likelihood(Action::Up, Coord::new(2, 1)), 0.8);
        assert_eq!(state(1, 2).next_state_likelihood(Action::Right, Coord::new(1, 2)), 0.8);
    }

    #[test]
    fn sampling_only_produces_listed_outcomes() {
        let s = state(3, 2);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let next = s.sample_transition(Action::Down, &mut rng).unwrap();
            assert!(s.next_state_likelihood(Action::Down, next) > 0.0);
        }
    }
}
