use gridrl::{
    grid::GridConfig,
    model::GridDynamics,
    render,
    solver::{ValueIterationConfig, ValueIterationSolver},
};

fn main() {
    let grid = GridConfig::default();
    let solver = ValueIterationSolver::new(ValueIterationConfig::default());
    let solution = solver.solve(&grid, &GridDynamics);

    println!("Value Function--------------------------");
    println!("{}", render::render_values(&grid, &solution.values));
    println!("Policy--------------------------");
    println!("{}", render::render_policy(&grid, &solution.policy));
}
