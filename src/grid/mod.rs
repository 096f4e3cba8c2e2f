//! Grid-based inverse lookup for ground-track projections
//!
//! Ground-track projections have no closed-form inverse. Instead an external
//! data source (typically built from spacecraft ephemeris) supplies a grid of
//! direction vectors over the world plane. This module defines that
//! collaborator's interface, [`GridInterpolator`], and the interpolation that
//! turns one grid cell plus an in-cell offset into a direction.
//!
//! # Interpolation
//!
//! Cells are interpolated by rotating great-circle normals, not by blending
//! longitude and latitude. Each cell edge defines a great circle through two
//! corners. The south and north edge normals are rotated toward each other by
//! the fraction `v`, the west and east normals by `u`, and the query direction
//! is the intersection of the two resulting great circles. This follows the
//! curvature of the sphere inside the cell, so neighbouring cells meet without
//! seams.

use thiserror::Error;

use crate::coordinates::{Cartesian3, WorldPoint};

/// Error type for grid lookups
#[derive(Debug, Error)]
pub enum GridError {
    #[error("No grid cell covers world point ({x}, {y})")]
    CellNotFound { x: f64, y: f64 },

    #[error("Degenerate grid cell: {0}")]
    DegenerateCell(String),

    #[error("Grid source error: {0}")]
    Source(String),
}

/// Row/column address of a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellIndex {
    pub row: usize,
    pub col: usize,
}

/// Direction vectors at the four corners of a cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellCorners {
    pub sw: Cartesian3,
    pub se: Cartesian3,
    pub ne: Cartesian3,
    pub nw: Cartesian3,
}

/// Where a world point falls in the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLocation {
    pub index: CellIndex,
    /// Fractional offset from the west edge, in `[0, 1]`
    pub u: f64,
    /// Fractional offset from the south edge, in `[0, 1]`
    pub v: f64,
}

/// A cell together with the query offset inside it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    pub corners: CellCorners,
    pub u: f64,
    pub v: f64,
}

/// Supplier of grid cells for ground-track inverse lookups
///
/// Implementations are treated as read-only by this crate. Any caching or
/// synchronization is the implementation's own business.
pub trait GridInterpolator {
    /// Resolve the cell and in-cell offset for a world point
    fn locate(&self, world: WorldPoint) -> Result<GridLocation, GridError>;

    /// Corner directions of a cell
    fn corners(&self, index: CellIndex) -> Result<CellCorners, GridError>;

    /// Cell and offset for a world point
    fn cell_at(&self, world: WorldPoint) -> Result<GridCell, GridError> {
        let location = self.locate(world)?;
        let corners = self.corners(location.index)?;
        Ok(GridCell {
            corners,
            u: location.u,
            v: location.v,
        })
    }
}

fn edge_normal(a: &Cartesian3, b: &Cartesian3, edge: &str) -> Result<Cartesian3, GridError> {
    a.cross(b)
        .unit()
        .ok_or_else(|| GridError::DegenerateCell(format!("{} edge has coincident corners", edge)))
}

/// Rotate `from` toward `to` by `fraction` of the angle between them
fn rotate_toward(from: &Cartesian3, to: &Cartesian3, fraction: f64) -> Result<Cartesian3, GridError> {
    let span = from.separation(to);
    if span == 0.0 {
        return Ok(*from);
    }
    let axis = from.cross(to).unit().ok_or_else(|| {
        GridError::DegenerateCell("opposite edges have antiparallel normals".to_string())
    })?;
    Ok(from.rotate(&axis, span * fraction))
}

impl GridCell {
    /// Direction of the query point inside this cell
    pub fn interpolate(&self) -> Result<Cartesian3, GridError> {
        let CellCorners { sw, se, ne, nw } = self.corners;

        let s_normal = edge_normal(&sw, &se, "south")?;
        let n_normal = edge_normal(&nw, &ne, "north")?;
        let e_normal = edge_normal(&ne, &se, "east")?;
        let w_normal = edge_normal(&nw, &sw, "west")?;

        let ns_interp = rotate_toward(&s_normal, &n_normal, self.v)?;
        let ew_interp = rotate_toward(&w_normal, &e_normal, self.u)?;

        let direction = ew_interp.cross(&ns_interp).unit().ok_or_else(|| {
            GridError::DegenerateCell("interpolated great circles coincide".to_string())
        })?;

        // The cross product picks one of two antipodes; keep the one near the cell
        if direction.dot(&nw) < 0.0 {
            Ok(direction.negate())
        } else {
            Ok(direction)
        }
    }
}

/// Regular in-memory grid of direction vectors
///
/// Nodes sit at `origin + (col * spacing_x, row * spacing_y)` for
/// `0 <= col <= cols` and `0 <= row <= rows`. Rows grow northward (increasing
/// world `y`) and columns grow westward (increasing world `x`).
#[derive(Debug, Clone)]
pub struct VectorGrid {
    origin: WorldPoint,
    spacing_x: f64,
    spacing_y: f64,
    cols: usize,
    rows: usize,
    nodes: Vec<Cartesian3>,
}

impl VectorGrid {
    /// Build a grid from explicit node vectors, stored row-major from the south-west
    pub fn new(
        origin: WorldPoint,
        spacing_x: f64,
        spacing_y: f64,
        cols: usize,
        rows: usize,
        nodes: Vec<Cartesian3>,
    ) -> Result<Self, GridError> {
        if cols == 0 || rows == 0 {
            return Err(GridError::Source("grid needs at least one cell".to_string()));
        }
        if !(spacing_x > 0.0 && spacing_y > 0.0) {
            return Err(GridError::Source(format!(
                "grid spacing must be positive, got ({}, {})",
                spacing_x, spacing_y
            )));
        }
        let expected = (cols + 1) * (rows + 1);
        if nodes.len() != expected {
            return Err(GridError::Source(format!(
                "expected {} grid nodes, got {}",
                expected,
                nodes.len()
            )));
        }
        Ok(VectorGrid {
            origin,
            spacing_x,
            spacing_y,
            cols,
            rows,
            nodes,
        })
    }

    /// Build a grid by sampling `direction_at` at every node position
    pub fn from_fn<F>(
        origin: WorldPoint,
        spacing_x: f64,
        spacing_y: f64,
        cols: usize,
        rows: usize,
        direction_at: F,
    ) -> Result<Self, GridError>
    where
        F: Fn(WorldPoint) -> Cartesian3,
    {
        let mut nodes = Vec::with_capacity((cols + 1) * (rows + 1));
        for row in 0..=rows {
            for col in 0..=cols {
                nodes.push(direction_at(WorldPoint::new(
                    origin.x + col as f64 * spacing_x,
                    origin.y + row as f64 * spacing_y,
                )));
            }
        }
        Self::new(origin, spacing_x, spacing_y, cols, rows, nodes)
    }

    fn node(&self, row: usize, col: usize) -> Cartesian3 {
        self.nodes[row * (self.cols + 1) + col]
    }

    /// Split a coordinate into a cell index and fraction, keeping the far edge in the last cell
    fn axis_position(value: f64, origin: f64, spacing: f64, count: usize) -> Option<(usize, f64)> {
        let t = (value - origin) / spacing;
        if !t.is_finite() || t < 0.0 || t > count as f64 {
            return None;
        }
        let cell = (t.floor() as usize).min(count - 1);
        Some((cell, t - cell as f64))
    }
}

impl GridInterpolator for VectorGrid {
    fn locate(&self, world: WorldPoint) -> Result<GridLocation, GridError> {
        let not_found = || GridError::CellNotFound {
            x: world.x,
            y: world.y,
        };
        let (col, u) = Self::axis_position(world.x, self.origin.x, self.spacing_x, self.cols)
            .ok_or_else(not_found)?;
        let (row, v) = Self::axis_position(world.y, self.origin.y, self.spacing_y, self.rows)
            .ok_or_else(not_found)?;
        Ok(GridLocation {
            index: CellIndex { row, col },
            u,
            v,
        })
    }

    fn corners(&self, index: CellIndex) -> Result<CellCorners, GridError> {
        if index.row >= self.rows || index.col >= self.cols {
            return Err(GridError::Source(format!(
                "cell ({}, {}) outside {}x{} grid",
                index.row, index.col, self.rows, self.cols
            )));
        }
        let CellIndex { row, col } = index;
        Ok(CellCorners {
            sw: self.node(row, col),
            se: self.node(row, col + 1),
            ne: self.node(row + 1, col + 1),
            nw: self.node(row + 1, col),
        })
    }
}
