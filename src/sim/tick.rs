//! One simulation step over every square
//!
//! Forces are resampled on alternating steps; every step moves each square
//! by a fraction of its velocity. Squares are visited in reverse order and
//! see the moves already made earlier in the same tick.

use glam::Vec2;

use super::force::sample_force;
use super::grid::CellKind;
use super::motion::{attempt_move, commit_move, integrate_velocity};
use super::state::SimulationState;
use super::surface::DrawSurface;
use crate::grid_to_pixel;

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Squares whose force was resampled
    pub sampled: usize,
    /// Squares skipped because their force is zero
    pub resting: usize,
    /// Squares that changed cell
    pub moved: usize,
    /// Squares whose move was refused
    pub blocked: usize,
}

/// Run one tick, resampling forces when `recompute_force` is set
pub fn tick(
    state: &mut SimulationState,
    surface: &mut impl DrawSurface,
    recompute_force: bool,
) -> TickStats {
    let tuning = state.tuning;
    let cell_size = state.cell_size;
    let mut stats = TickStats::default();

    for idx in (0..state.squares.len()).rev() {
        if recompute_force {
            let at = state.grid.cell(state.squares[idx].cell).coords();
            let force = sample_force(&state.grid, at, &tuning);
            let square = &mut state.squares[idx];
            square.pending_force = force;
            stats.sampled += 1;

            if force == Vec2::ZERO {
                stats.resting += 1;
                continue;
            }
            integrate_velocity(square, &tuning);
        } else if state.squares[idx].pending_force == Vec2::ZERO {
            stats.resting += 1;
            continue;
        }

        let square = &state.squares[idx];
        let step = square.vel * tuning.step_fraction;
        let dest = attempt_move(&state.grid, square, step);
        let (id, from) = (square.id, square.cell);

        // The continuous position advances even when the cell change is refused
        state.squares[idx].pos += step;

        match dest {
            CellKind::Real(cell) if !cell.is_occupied() => {
                commit_move(
                    &mut state.grid,
                    &mut state.squares,
                    from,
                    cell.index,
                    id,
                    cell_size,
                    surface,
                );
                let square = &state.squares[idx];
                surface.update_marker_position(square.marker, grid_to_pixel(square.pos, cell_size));
                stats.moved += 1;
            }
            _ => stats.blocked += 1,
        }
    }

    state.time_ticks += 1;
    log::trace!(
        "tick {}: sampled={} resting={} moved={} blocked={}",
        state.time_ticks,
        stats.sampled,
        stats.resting,
        stats.moved,
        stats.blocked
    );
    stats
}

/// Paced step: resample on every other call, starting with a resample
pub fn step(state: &mut SimulationState, surface: &mut impl DrawSurface) -> TickStats {
    let recompute = state.recompute_force;
    let stats = tick(state, surface, recompute);
    state.recompute_force = !recompute;
    stats
}
