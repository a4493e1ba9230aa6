use std::collections::HashMap;

use log::info;
use strum::IntoEnumIterator;

use super::{Policy, PolicyDecision, Solution, ValueFunction};
use crate::{
    action::Action,
    grid::{Coord, GridConfig},
    model::TransitionModel,
    state::GridState,
};

/// Configuration for the [`GlieSolver`]
#[derive(Debug, Clone)]
pub struct GlieConfig {
    /// Discount factor - must be in the interval `[0,1]`
    ///
    /// **Default**: `0.9`
    pub gamma: f64,
    /// Number of outer iterations to run; there is no convergence test
    ///
    /// **Default**: `100_000`
    pub iterations: u32,
    /// Optimistic stand-in value for actions still considered under-explored
    ///
    /// **Default**: `2.0`
    pub optimism: f64,
    /// Visit count at or below which an action is still considered
    /// under-explored
    ///
    /// **Default**: `5`
    pub visit_threshold: u32,
    /// When true, every state-action pair's visit count advances on every
    /// state update, so counts track elapsed updates rather than true
    /// per-pair visitation; when false, only the chosen pair is counted
    ///
    /// **Default**: `true`
    pub count_all_pairs: bool,
}

impl Default for GlieConfig {
    fn default() -> Self {
        Self {
            gamma: 0.9,
            iterations: 100_000,
            optimism: 2.0,
            visit_threshold: 5,
            count_all_pairs: true,
        }
    }
}

/// Model-free solver, greedy in the limit with infinite exploration
///
/// Runs a fixed budget of value-update iterations against a supplied
/// transition model, usually an empirically estimated one. Actions whose
/// visit count has not yet passed the threshold are scored with a flat
/// optimistic value so that every action gets tried before the learner
/// settles into exploitation.
pub struct GlieSolver {
    config: GlieConfig,
}

impl GlieSolver {
    /// **Panics** if `gamma` is not in the interval `[0,1]`
    pub fn new(config: GlieConfig) -> Self {
        assert!(
            (0.0..=1.0).contains(&config.gamma),
            "Invalid value for `gamma`. Must be in the interval [0, 1].",
        );
        Self { config }
    }

    /// Run the full iteration budget, producing learned state values and a
    /// single-action-per-state policy
    pub fn learn(&self, grid: &GridConfig, model: &impl TransitionModel) -> Solution {
        let states = grid.states();
        let actions = Action::iter().collect::<Vec<_>>();

        let mut values: ValueFunction = states.iter().map(|s| (s.coord(), 0.0)).collect();
        let mut policy: Policy = states
            .iter()
            .map(|s| (s.coord(), PolicyDecision::ActionSet(actions.clone())))
            .collect();
        let mut visits: HashMap<(Coord, Action), u32> = states
            .iter()
            .flat_map(|s| actions.iter().map(|&a| ((s.coord(), a), 0)))
            .collect();

        let report_every = (self.config.iterations / 10).max(1);
        for iteration in 0..self.config.iterations {
            for state in &states {
                let expected = self.expected_utilities(state, &states, &values, model);
                let f_values = actions
                    .iter()
                    .zip(&expected)
                    .map(|(&action, &utility)| {
                        let n = visits.get(&(state.coord(), action)).copied().unwrap_or(0);
                        if n <= self.config.visit_threshold {
                            self.config.optimism
                        } else {
                            utility
                        }
                    })
                    .collect::<Vec<_>>();

                // First maximum wins ties
                let mut best = 0;
                for (index, &f) in f_values.iter().enumerate() {
                    if f > f_values[best] {
                        best = index;
                    }
                }
                let chosen = actions[best];

                values.insert(
                    state.coord(),
                    state.reward() + self.config.gamma * f_values[best],
                );

                if self.config.count_all_pairs {
                    for count in visits.values_mut() {
                        *count += 1;
                    }
                } else {
                    *visits.entry((state.coord(), chosen)).or_insert(0) += 1;
                }

                policy.insert(state.coord(), PolicyDecision::Deterministic(chosen));
            }

            if (iteration + 1) % report_every == 0 {
                info!(
                    "glie: iteration {}/{}",
                    iteration + 1,
                    self.config.iterations
                );
            }
        }

        Solution { values, policy }
    }

    /// Expected utility of each action under the supplied model
    fn expected_utilities(
        &self,
        state: &GridState,
        states: &[GridState],
        values: &ValueFunction,
        model: &impl TransitionModel,
    ) -> Vec<f64> {
        Action::iter()
            .map(|action| {
                states
                    .iter()
                    .map(|next| model.prob(state, action, next) * values[&next.coord()])
                    .sum()
            })
            .collect()
    }
}
