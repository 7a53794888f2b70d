//! Uniform spatial hash over a bounded region
//!
//! The region is split into `cols × rows` equal cells. Each cell keeps the
//! ids of the collidables whose (grid-clamped) bounding box overlaps the
//! cell rectangle. Positions outside the region land in the edge cells.

use crate::foundation::collections::CollidableId;
use crate::foundation::math::{Vec2, EPSILON};
use crate::physics::collision::Rect;
use crate::physics::CollisionError;
use crate::foundation::logging::{debug, warn};
use std::collections::HashSet;

/// Snapshot of one cell for debug drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellView {
    /// Linear id (`col + row * cols`)
    pub id: usize,
    /// Column
    pub col: usize,
    /// Row
    pub row: usize,
    /// World rectangle of the cell
    pub rect: Rect,
    /// Whether any collidable is registered in the cell
    pub occupied: bool,
}

/// Fixed-resolution grid mapping cells to collidable ids
#[derive(Debug, Clone)]
pub struct SpatialHash {
    bounds: Rect,
    cols: usize,
    rows: usize,
    cell_size: Vec2,
    cells: Vec<Vec<CollidableId>>,
}

impl SpatialHash {
    /// Creates a grid of `cols × rows` cells over `bounds`
    ///
    /// Fails for zero columns or rows and for a non-finite or non-positive
    /// region size.
    pub fn new(bounds: Rect, cols: usize, rows: usize) -> Result<Self, CollisionError> {
        validate(&bounds, cols, rows)?;
        let cell_size = Vec2::new(bounds.width / cols as f32, bounds.height / rows as f32);
        if cell_size.x < EPSILON || cell_size.y < EPSILON {
            warn!(
                "Spatial hash cells are degenerate ({} x {}); expect every object in one cell",
                cell_size.x, cell_size.y
            );
        }
        debug!(
            "Created spatial hash {}x{} over ({}, {}, {}, {})",
            cols, rows, bounds.x, bounds.y, bounds.width, bounds.height
        );
        Ok(Self {
            bounds,
            cols,
            rows,
            cell_size,
            cells: vec![Vec::new(); cols * rows],
        })
    }

    /// Region covered by the grid
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Width and height of one cell
    pub fn cell_size(&self) -> Vec2 {
        self.cell_size
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        self.cols * self.rows
    }

    /// Linear id of a cell; coordinates are clamped into the grid
    pub fn cell_id(&self, col: usize, row: usize) -> usize {
        col.min(self.cols - 1) + row.min(self.rows - 1) * self.cols
    }

    /// `(col, row)` of a linear id
    pub fn cell_coords(&self, id: usize) -> (usize, usize) {
        (id % self.cols, id / self.cols)
    }

    /// World rectangle of a cell
    pub fn cell_rect(&self, col: usize, row: usize) -> Rect {
        Rect::new(
            self.bounds.x + col as f32 * self.cell_size.x,
            self.bounds.y + row as f32 * self.cell_size.y,
            self.cell_size.x,
            self.cell_size.y,
        )
    }

    /// Cell containing `p`, clamped into the grid
    pub fn cell_at(&self, p: &Vec2) -> (usize, usize) {
        let axis = |value: f32, origin: f32, size: f32, count: usize| -> usize {
            if size <= 0.0 {
                return 0;
            }
            // NaN and negatives land in the first cell, overflow saturates.
            let index = ((value - origin) / size).floor().max(0.0) as usize;
            index.min(count - 1)
        };
        (
            axis(p.x, self.bounds.x, self.cell_size.x, self.cols),
            axis(p.y, self.bounds.y, self.cell_size.y, self.rows),
        )
    }

    /// Ids of the cells a bounding box maps to
    ///
    /// The box is clamped into the grid first. Every cell in the covered
    /// `(col, row)` range whose rectangle overlaps the clamped box is
    /// returned; the result is never empty.
    pub fn cell_ids_for(&self, bbox: &Rect) -> Vec<usize> {
        let clamped = bbox.clamped_to(&self.bounds);
        let (min_col, min_row) = self.cell_at(&clamped.min());
        let (max_col, max_row) = self.cell_at(&clamped.max());
        // A min edge sitting on a cell boundary also touches the cell before it.
        let (min_col, min_row) = (min_col.saturating_sub(1), min_row.saturating_sub(1));

        let mut ids = Vec::with_capacity((max_col - min_col + 1) * (max_row - min_row + 1));
        for row in min_row..=max_row {
            for col in min_col..=max_col {
                if self.cell_rect(col, row).overlaps_rect(&clamped) {
                    ids.push(self.cell_id(col, row));
                }
            }
        }
        if ids.is_empty() {
            ids.push(self.cell_id(min_col, min_row));
        }
        ids
    }

    fn ensure_cells(&mut self) {
        if self.cells.is_empty() {
            self.cells = vec![Vec::new(); self.cell_count()];
        }
    }

    /// Register `id` in every cell its bounding box maps to
    ///
    /// Adding the same id again is a no-op per cell.
    pub fn add(&mut self, id: CollidableId, bbox: &Rect) {
        self.ensure_cells();
        for cell_id in self.cell_ids_for(bbox) {
            let cell = &mut self.cells[cell_id];
            if !cell.contains(&id) {
                cell.push(id);
            }
        }
    }

    /// Remove `id` from the cells its bounding box maps to
    pub fn remove(&mut self, id: CollidableId, bbox: &Rect) {
        if self.cells.is_empty() {
            return;
        }
        for cell_id in self.cell_ids_for(bbox) {
            self.cells[cell_id].retain(|other| *other != id);
        }
    }

    /// Empty every cell, keeping the allocation
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    /// Drop the cell storage; the next `add` allocates it again
    pub fn release(&mut self) {
        self.cells = Vec::new();
    }

    /// Same rows and columns over a new region
    ///
    /// Membership is dropped; callers re-add everything.
    pub fn resize(&mut self, bounds: Rect) -> Result<(), CollisionError> {
        *self = Self::new(bounds, self.cols, self.rows)?;
        Ok(())
    }

    /// Ids registered in one cell
    pub fn objects_in_cell(&self, cell_id: usize) -> &[CollidableId] {
        self.cells.get(cell_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// De-duplicated ids from every cell `bbox` maps to, in first-seen
    /// order, without `exclude`
    pub fn get_objects(&self, bbox: &Rect, exclude: Option<CollidableId>) -> Vec<CollidableId> {
        let mut seen = HashSet::new();
        let mut objects = Vec::new();
        for cell_id in self.cell_ids_for(bbox) {
            for &id in self.objects_in_cell(cell_id) {
                if Some(id) != exclude && seen.insert(id) {
                    objects.push(id);
                }
            }
        }
        objects
    }

    /// Per-cell view for debug drawing
    pub fn cell_views(&self) -> impl Iterator<Item = CellView> + '_ {
        (0..self.cell_count()).map(move |id| {
            let (col, row) = self.cell_coords(id);
            CellView {
                id,
                col,
                row,
                rect: self.cell_rect(col, row),
                occupied: !self.objects_in_cell(id).is_empty(),
            }
        })
    }
}

fn validate(bounds: &Rect, cols: usize, rows: usize) -> Result<(), CollisionError> {
    let finite = bounds.x.is_finite() && bounds.y.is_finite() && bounds.width.is_finite() && bounds.height.is_finite();
    if cols == 0 || rows == 0 || !finite || bounds.width <= 0.0 || bounds.height <= 0.0 {
        return Err(CollisionError::InvalidGrid {
            cols,
            rows,
            width: bounds.width,
            height: bounds.height,
        });
    }
    Ok(())
}
