use log::{debug, info};
use strum::IntoEnumIterator;

use super::{Policy, PolicyDecision, Solution, ValueFunction};
use crate::{action::Action, grid::GridConfig, model::TransitionModel, state::GridState};

/// Configuration for the [`ValueIterationSolver`]
#[derive(Debug, Clone)]
pub struct ValueIterationConfig {
    /// Discount factor - must be in the interval `[0,1]`
    ///
    /// **Default**: `0.9`
    pub gamma: f64,
    /// Convergence threshold on the largest value change in one sweep
    ///
    /// **Default**: `1e-6`
    pub theta: f64,
}

impl Default for ValueIterationConfig {
    fn default() -> Self {
        Self {
            gamma: 0.9,
            theta: 1e-6,
        }
    }
}

/// Model-based dynamic-programming solver
///
/// Sweeps the full state set, backing each state's value up from the
/// transition model, until the largest change in one sweep falls below the
/// configured threshold. Sweeps write into the value table in place, so
/// later states in a sweep read values refreshed earlier in the same sweep;
/// this changes how many sweeps convergence takes but not the fixed point,
/// which is unique for gamma < 1.
pub struct ValueIterationSolver {
    gamma: f64,
    theta: f64,
}

impl ValueIterationSolver {
    /// **Panics** if `gamma` is not in the interval `[0,1]`
    pub fn new(config: ValueIterationConfig) -> Self {
        assert!(
            (0.0..=1.0).contains(&config.gamma),
            "Invalid value for `gamma`. Must be in the interval [0, 1].",
        );
        Self {
            gamma: config.gamma,
            theta: config.theta,
        }
    }

    /// Iterate to convergence, producing state values and a greedy policy
    /// that keeps every action tied for optimal
    pub fn solve(&self, grid: &GridConfig, model: &impl TransitionModel) -> Solution {
        let states = grid.states();
        let mut values: ValueFunction = states.iter().map(|s| (s.coord(), 0.0)).collect();
        let mut policy: Policy = states
            .iter()
            .map(|s| {
                let uniform = PolicyDecision::ActionSet(Action::iter().collect());
                (s.coord(), uniform)
            })
            .collect();

        let mut sweeps = 0u32;
        loop {
            let delta = self.sweep(&states, &mut values, &mut policy, model);
            sweeps += 1;
            debug!("sweep {sweeps}: delta = {delta:e}");
            if delta < self.theta {
                info!("value iteration converged after {sweeps} sweeps");
                break;
            }
        }

        Solution { values, policy }
    }

    /// One in-place backup of every state
    ///
    /// **Returns** the largest absolute value change across the sweep
    fn sweep(
        &self,
        states: &[GridState],
        values: &mut ValueFunction,
        policy: &mut Policy,
        model: &impl TransitionModel,
    ) -> f64 {
        let mut delta = 0.0f64;
        for state in states {
            let old = values[&state.coord()];
            let action_values = self.action_values(state, states, values, model);
            let best = action_values
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);
            let new = state.reward() + best;
            values.insert(state.coord(), new);

            // Action values are rounded, so exact comparison finds every tie
            let ties = Action::iter()
                .zip(&action_values)
                .filter(|(_, &value)| value == best)
                .map(|(action, _)| action)
                .collect();
            policy.insert(state.coord(), PolicyDecision::ActionSet(ties));

            delta = delta.max((old - new).abs());
        }
        delta
    }

    /// One discounted backup per action, rounded to 10 decimal places so
    /// float noise cannot split a genuine tie
    fn action_values(
        &self,
        state: &GridState,
        states: &[GridState],
        values: &ValueFunction,
        model: &impl TransitionModel,
    ) -> Vec<f64> {
        Action::iter()
            .map(|action| {
                let expected: f64 = states
                    .iter()
                    .map(|next| model.prob(state, action, next) * values[&next.coord()])
                    .sum();
                round10(self.gamma * expected)
            })
            .collect()
    }
}

fn round10(x: f64) -> f64 {
    (x * 1e10).round() / 1e10
}
