//! Velocity integration and grid moves

use glam::Vec2;

use super::grid::{CellKind, Grid};
use super::state::{Square, SquareId};
use super::surface::DrawSurface;
use crate::settings::Tuning;
use crate::{grid_to_pixel, to_cell};

/// Next velocity from the current one and a force: damp, accelerate,
/// snap to rest, clamp.
pub fn next_velocity(vel: Vec2, force: Vec2, tuning: &Tuning) -> Vec2 {
    let vel = vel * tuning.damping + force;
    let length = vel.length();

    if length < tuning.rest_threshold {
        return Vec2::ZERO;
    }
    if length > tuning.max_speed {
        return vel * (tuning.max_speed / length);
    }
    vel
}

/// Integrate `square.vel` from its pending force
pub fn integrate_velocity(square: &mut Square, tuning: &Tuning) {
    square.vel = next_velocity(square.vel, square.pending_force, tuning);
}

/// Resolve where `step` would take the square.
///
/// If the full step lands on a wall or an occupied cell (its own included),
/// the step is halved once and resolved again. The result is returned
/// whether or not it is free.
pub fn attempt_move(grid: &Grid, square: &Square, step: Vec2) -> CellKind {
    let dest = grid.resolve(to_cell(square.pos + step));
    if !dest.is_blocked() {
        return dest;
    }
    grid.resolve(to_cell(square.pos + step / 2.0))
}

/// Move square `id` from cell `from` to cell `to` and repaint both cells
pub fn commit_move(
    grid: &mut Grid,
    squares: &mut [Square],
    from: usize,
    to: usize,
    id: SquareId,
    cell_size: f32,
    surface: &mut impl DrawSurface,
) {
    debug_assert_eq!(grid.cell(from).occupant, Some(id));
    debug_assert!(!grid.cell(to).is_occupied());

    let occupant = grid.cell(from).occupant;
    grid.set_occupant(to, occupant);
    grid.set_occupant(from, None);
    squares[id.index()].cell = to;

    repaint_cell(grid, squares, to, cell_size, surface);
    repaint_cell(grid, squares, from, cell_size, surface);
}

/// Snap the occupant's marker (if any) onto its cell
fn repaint_cell(
    grid: &Grid,
    squares: &[Square],
    index: usize,
    cell_size: f32,
    surface: &mut impl DrawSurface,
) {
    let cell = grid.cell(index);
    if let Some(id) = cell.occupant {
        let pixel = grid_to_pixel(cell.coords().as_vec2(), cell_size);
        surface.update_marker_position(squares[id.index()].marker, pixel);
    }
}
