//! Grid occupancy and cell resolution
//!
//! Cells are stored flat at `y * width + x`. Lookups outside the grid never
//! fail; they resolve to the `Wall` or `Outside` sentinels.

use glam::IVec2;

use super::state::SquareId;

/// One addressable grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
    pub index: usize,
    pub occupant: Option<SquareId>,
}

impl GridCell {
    pub fn coords(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

/// Result of resolving a coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Blocks movement and repels: exclusion window and the outer halo
    Wall,
    /// Void just outside the grid; empty, but cannot hold a square
    Outside,
    /// A cell inside the grid (a copy; mutate through `Grid`)
    Real(GridCell),
}

impl CellKind {
    pub fn is_wall(&self) -> bool {
        matches!(self, CellKind::Wall)
    }

    pub fn occupant(&self) -> Option<SquareId> {
        match self {
            CellKind::Real(cell) => cell.occupant,
            _ => None,
        }
    }

    /// Walls and occupied cells repel and block
    pub fn is_blocked(&self) -> bool {
        self.is_wall() || self.occupant().is_some()
    }

    pub fn as_real(&self) -> Option<&GridCell> {
        match self {
            CellKind::Real(cell) => Some(cell),
            _ => None,
        }
    }
}

/// Flat grid of cells plus the pointer-driven exclusion window
#[derive(Debug, Clone)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<GridCell>,
    exclusion_center: IVec2,
    exclusion_half_extent: i32,
}

impl Grid {
    /// Create an empty grid. The exclusion window starts at the grid center.
    pub fn new(width: i32, height: i32, exclusion_half_extent: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let mut cells = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push(GridCell {
                    x,
                    y,
                    index: (y * width + x) as usize,
                    occupant: None,
                });
            }
        }

        Self {
            width,
            height,
            cells,
            exclusion_center: IVec2::new(width / 2, height / 2),
            exclusion_half_extent,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn exclusion_center(&self) -> IVec2 {
        self.exclusion_center
    }

    pub fn exclusion_half_extent(&self) -> i32 {
        self.exclusion_half_extent
    }

    pub fn set_exclusion_center(&mut self, center: IVec2) {
        self.exclusion_center = center;
    }

    /// True inside the exclusion window (exclusive bounds)
    pub fn in_exclusion(&self, x: i32, y: i32) -> bool {
        let c = self.exclusion_center;
        let e = self.exclusion_half_extent;
        x > c.x - e && x < c.x + e && y > c.y - e && y < c.y + e
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Resolve a coordinate to a real cell or a sentinel
    pub fn resolve_cell(&self, x: i32, y: i32) -> CellKind {
        if self.in_exclusion(x, y) {
            return CellKind::Wall;
        }

        // The wall band sits one cell further out than the grid edge
        if x < -1 || x > self.width + 1 || y < -1 || y > self.height + 1 {
            return CellKind::Wall;
        }

        if !self.contains(x, y) {
            return CellKind::Outside;
        }

        CellKind::Real(self.cells[(y * self.width + x) as usize])
    }

    pub fn resolve(&self, at: IVec2) -> CellKind {
        self.resolve_cell(at.x, at.y)
    }

    pub fn cell(&self, index: usize) -> &GridCell {
        &self.cells[index]
    }

    pub fn set_occupant(&mut self, index: usize, occupant: Option<SquareId>) {
        self.cells[index].occupant = occupant;
    }

    pub fn cells(&self) -> impl Iterator<Item = &GridCell> + '_ {
        self.cells.iter()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_occupied()).count()
    }
}
