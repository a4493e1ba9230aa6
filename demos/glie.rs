use std::{error::Error, path::Path};

use rand::thread_rng;

use gridrl::{
    cache,
    estimator::Estimator,
    grid::GridConfig,
    render,
    solver::{GlieConfig, GlieSolver},
};

fn main() -> Result<(), Box<dyn Error>> {
    let grid = GridConfig::default();

    // Estimating is the slow part, so the learned model is cached on disk
    let table = cache::load_or_else(Path::new("transition_model.json"), || {
        Estimator::new(10_000).estimate(&grid, &mut thread_rng())
    })?;

    let solver = GlieSolver::new(GlieConfig::default());
    let solution = solver.learn(&grid, &table);

    println!("Value Function--------------------------");
    println!("{}", render::render_values(&grid, &solution.values));
    println!("Policy--------------------------");
    println!("{}", render::render_policy(&grid, &solution.policy));

    Ok(())
}
