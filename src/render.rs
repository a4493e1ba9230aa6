use crate::{
    grid::{Coord, GridConfig},
    solver::{Policy, ValueFunction},
};

/// Render a value function as a grid of scalars, top row first
pub fn render_values(grid: &GridConfig, values: &ValueFunction) -> String {
    let mut out = String::new();
    for y in (1..=grid.height).rev() {
        for x in 1..=grid.width {
            let value = values.get(&Coord::new(x, y)).copied().unwrap_or(0.0);
            out.push_str(&format!("{value:>8.4} "));
        }
        out.pop();
        out.push('\n');
    }
    out
}

/// Render a policy as a grid of directional glyphs, top row first
///
/// Blocked and terminal cells are left blank; tied actions concatenate
/// their glyphs in index order.
pub fn render_policy(grid: &GridConfig, policy: &Policy) -> String {
    let mut out = String::new();
    for y in (1..=grid.height).rev() {
        for x in 1..=grid.width {
            let coord = Coord::new(x, y);
            let cell = if grid.is_blocked(coord) || grid.terminal_reward(coord).is_some() {
                String::new()
            } else {
                policy
                    .get(&coord)
                    .map(|decision| decision.actions().iter().map(|a| a.glyph()).collect())
                    .unwrap_or_default()
            };
            out.push_str(&format!("{cell:>4} "));
        }
        out.pop();
        out.push('\n');
    }
    out
}
