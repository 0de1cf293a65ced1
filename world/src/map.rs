//! Map layouts, the occupancy grid, and waypoint derivation.

use std::collections::VecDeque;

use rampart_core::{CellCoord, CellPoint, Difficulty};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Declarative description of a playable map.
///
/// A layout supplies the grid dimensions, a name, a difficulty tag, and the
/// ordered list of path cells. The first path cell is the entrance and the
/// last is the exit; the waypoint sequence itself is recomputed from the grid
/// so a hand-ordered list cannot smuggle in an invalid route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapLayout {
    /// Display name of the layout.
    pub name: String,
    /// Declared difficulty tag.
    pub difficulty: Difficulty,
    /// Number of grid columns.
    pub columns: u32,
    /// Number of grid rows.
    pub rows: u32,
    /// Cells that compose the enemy path, entrance first.
    pub path: Vec<CellCoord>,
}

impl MapLayout {
    /// The reference corridor map shipped with the game.
    #[must_use]
    pub fn classic() -> Self {
        let mut path = Vec::new();
        for column in 0..=6 {
            path.push(CellCoord::new(column, 7));
        }
        for row in 8..=10 {
            path.push(CellCoord::new(6, row));
        }
        for column in 7..=12 {
            path.push(CellCoord::new(column, 10));
        }
        for row in (3..=9).rev() {
            path.push(CellCoord::new(12, row));
        }
        for column in 13..=17 {
            path.push(CellCoord::new(column, 3));
        }
        for row in 4..=14 {
            path.push(CellCoord::new(17, row));
        }

        Self {
            name: "classic".to_owned(),
            difficulty: Difficulty::Normal,
            columns: 20,
            rows: 15,
            path,
        }
    }

    /// A long serpentine map that stretches tower coverage thin.
    #[must_use]
    pub fn gauntlet() -> Self {
        let mut path = Vec::new();
        for column in 0..=18 {
            path.push(CellCoord::new(column, 1));
        }
        for row in 2..=4 {
            path.push(CellCoord::new(18, row));
        }
        for column in (1..=18).rev() {
            path.push(CellCoord::new(column, 5));
        }
        for row in 6..=8 {
            path.push(CellCoord::new(1, row));
        }
        for column in 1..=18 {
            path.push(CellCoord::new(column, 9));
        }
        for row in 10..=12 {
            path.push(CellCoord::new(18, row));
        }
        for column in (0..=18).rev() {
            path.push(CellCoord::new(column, 13));
        }

        Self {
            name: "gauntlet".to_owned(),
            difficulty: Difficulty::Hard,
            columns: 20,
            rows: 15,
            path,
        }
    }

    /// Looks up a built-in layout by name.
    #[must_use]
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "classic" => Some(Self::classic()),
            "gauntlet" => Some(Self::gauntlet()),
            _ => None,
        }
    }

    /// Entrance cell, when the layout declares at least one path cell.
    #[must_use]
    pub fn entrance(&self) -> Option<CellCoord> {
        self.path.first().copied()
    }

    /// Exit cell, when the layout declares at least one path cell.
    #[must_use]
    pub fn exit(&self) -> Option<CellCoord> {
        self.path.last().copied()
    }
}

/// Reasons a map layout is rejected at load time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    /// The layout declared a grid without area.
    #[error("map grid must have positive dimensions (got {columns}x{rows})")]
    EmptyGrid {
        /// Declared column count.
        columns: u32,
        /// Declared row count.
        rows: u32,
    },
    /// The layout declared no path cells.
    #[error("map layout declares no path cells")]
    EmptyPath,
    /// A declared path cell lies outside the grid.
    #[error("path cell ({column}, {row}) lies outside the {columns}x{rows} grid")]
    PathCellOutOfBounds {
        /// Column of the offending cell.
        column: u32,
        /// Row of the offending cell.
        row: u32,
        /// Declared column count.
        columns: u32,
        /// Declared row count.
        rows: u32,
    },
    /// The same cell appears twice in the path list.
    #[error("path cell ({column}, {row}) is declared more than once")]
    DuplicatePathCell {
        /// Column of the repeated cell.
        column: u32,
        /// Row of the repeated cell.
        row: u32,
    },
    /// No 4-connected route exists from the entrance to the exit.
    #[error("path cells do not connect the entrance to the exit")]
    DisconnectedPath,
}

/// Validated occupancy grid plus the derived waypoint spine.
#[derive(Clone, Debug)]
pub(crate) struct MapModel {
    columns: u32,
    rows: u32,
    path_cells: Vec<bool>,
    waypoints: Vec<CellCoord>,
    centers: Vec<CellPoint>,
    cumulative: Vec<f32>,
    total_length: f32,
}

impl MapModel {
    /// Validates the layout and derives the waypoint sequence.
    ///
    /// Waypoints come from a breadth-first distance field seeded at the exit
    /// and restricted to path cells; following the gradient from the entrance
    /// recovers the unique shortest corridor. A layout whose path list does
    /// not connect entrance to exit is rejected rather than producing enemies
    /// that can never arrive.
    pub(crate) fn from_layout(layout: &MapLayout) -> Result<Self, MapError> {
        if layout.columns == 0 || layout.rows == 0 {
            return Err(MapError::EmptyGrid {
                columns: layout.columns,
                rows: layout.rows,
            });
        }
        if layout.path.is_empty() {
            return Err(MapError::EmptyPath);
        }

        let columns = layout.columns;
        let rows = layout.rows;
        let cell_count = columns as usize * rows as usize;
        let mut path_cells = vec![false; cell_count];

        for cell in &layout.path {
            if cell.column() >= columns || cell.row() >= rows {
                return Err(MapError::PathCellOutOfBounds {
                    column: cell.column(),
                    row: cell.row(),
                    columns,
                    rows,
                });
            }
            let index = cell_index(columns, *cell);
            if path_cells[index] {
                return Err(MapError::DuplicatePathCell {
                    column: cell.column(),
                    row: cell.row(),
                });
            }
            path_cells[index] = true;
        }

        let entrance = layout.path[0];
        let exit = layout.path[layout.path.len() - 1];
        let distances = distance_field(columns, rows, &path_cells, exit);
        let waypoints = trace_gradient(columns, rows, &distances, entrance)
            .ok_or(MapError::DisconnectedPath)?;

        let centers: Vec<CellPoint> = waypoints.iter().map(|cell| cell.center()).collect();
        let mut cumulative = Vec::with_capacity(centers.len());
        let mut total_length = 0.0;
        for (index, center) in centers.iter().enumerate() {
            if index > 0 {
                total_length += centers[index - 1].distance(*center);
            }
            cumulative.push(total_length);
        }

        Ok(Self {
            columns,
            rows,
            path_cells,
            waypoints,
            centers,
            cumulative,
            total_length,
        })
    }

    /// Number of columns in the grid.
    pub(crate) fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    pub(crate) fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the cell lies inside the grid.
    pub(crate) fn in_bounds(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Reports whether the cell is part of the enemy path.
    pub(crate) fn is_path(&self, cell: CellCoord) -> bool {
        self.in_bounds(cell) && self.path_cells[cell_index(self.columns, cell)]
    }

    /// Reports whether a tower may occupy the cell.
    ///
    /// Out-of-bounds and path cells are never buildable; occupancy by another
    /// tower is checked separately by the placement path.
    pub(crate) fn is_buildable(&self, cell: CellCoord) -> bool {
        self.in_bounds(cell) && !self.path_cells[cell_index(self.columns, cell)]
    }

    /// Ordered waypoint spine from entrance to exit.
    pub(crate) fn waypoints(&self) -> &[CellCoord] {
        &self.waypoints
    }

    /// Entrance cell of the derived route.
    pub(crate) fn entrance(&self) -> CellCoord {
        self.waypoints[0]
    }

    /// Exit cell of the derived route.
    pub(crate) fn exit(&self) -> CellCoord {
        self.waypoints[self.waypoints.len() - 1]
    }

    /// Total route length in cell units.
    pub(crate) fn total_length(&self) -> f32 {
        self.total_length
    }

    /// Interpolated position for a scalar distance travelled along the route.
    pub(crate) fn position_at(&self, travelled: f32) -> CellPoint {
        if travelled <= 0.0 || self.centers.len() == 1 {
            return self.centers[0];
        }
        if travelled >= self.total_length {
            return self.centers[self.centers.len() - 1];
        }

        let segment = self
            .cumulative
            .partition_point(|&length| length <= travelled)
            .saturating_sub(1);
        let segment_start = self.cumulative[segment];
        let segment_length = self.cumulative[segment + 1] - segment_start;
        let t = if segment_length > 0.0 {
            (travelled - segment_start) / segment_length
        } else {
            0.0
        };
        self.centers[segment].lerp(self.centers[segment + 1], t)
    }
}

fn cell_index(columns: u32, cell: CellCoord) -> usize {
    cell.row() as usize * columns as usize + cell.column() as usize
}

/// Breadth-first distances to the exit, restricted to path cells.
///
/// Unreachable cells keep `u16::MAX` so callers can tell walls apart from
/// traversable path.
fn distance_field(columns: u32, rows: u32, path_cells: &[bool], exit: CellCoord) -> Vec<u16> {
    let mut distances = vec![u16::MAX; path_cells.len()];
    let mut frontier = VecDeque::new();

    let exit_index = cell_index(columns, exit);
    if !path_cells[exit_index] {
        return distances;
    }
    distances[exit_index] = 0;
    frontier.push_back(exit);

    while let Some(cell) = frontier.pop_front() {
        let current = distances[cell_index(columns, cell)];
        if current >= u16::MAX - 1 {
            continue;
        }
        let next = current + 1;

        for neighbor in cardinal_neighbors(cell, columns, rows) {
            let index = cell_index(columns, neighbor);
            if !path_cells[index] || distances[index] <= next {
                continue;
            }
            distances[index] = next;
            frontier.push_back(neighbor);
        }
    }

    distances
}

/// Recovers the ordered route by following the distance gradient downhill.
fn trace_gradient(
    columns: u32,
    rows: u32,
    distances: &[u16],
    entrance: CellCoord,
) -> Option<Vec<CellCoord>> {
    let mut current = entrance;
    let mut current_distance = *distances.get(cell_index(columns, entrance))?;
    if current_distance == u16::MAX {
        return None;
    }

    let mut route = Vec::with_capacity(current_distance as usize + 1);
    loop {
        route.push(current);
        if current_distance == 0 {
            return Some(route);
        }

        let mut next_cell = None;
        let mut best_distance = current_distance;
        for neighbor in cardinal_neighbors(current, columns, rows) {
            let distance = distances[cell_index(columns, neighbor)];
            if distance < best_distance {
                best_distance = distance;
                next_cell = Some(neighbor);
            }
        }

        current = next_cell?;
        current_distance = best_distance;
    }
}

fn cardinal_neighbors(cell: CellCoord, columns: u32, rows: u32) -> impl Iterator<Item = CellCoord> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if let Some(row) = cell.row().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(cell.column(), row));
        count += 1;
    }
    if cell.column() + 1 < columns {
        candidates[count] = Some(CellCoord::new(cell.column() + 1, cell.row()));
        count += 1;
    }
    if cell.row() + 1 < rows {
        candidates[count] = Some(CellCoord::new(cell.column(), cell.row() + 1));
        count += 1;
    }
    if let Some(column) = cell.column().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(column, cell.row()));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_adjacent_sequence(waypoints: &[CellCoord]) {
        for pair in waypoints.windows(2) {
            assert_eq!(
                pair[0].manhattan_distance(pair[1]),
                1,
                "waypoints {:?} and {:?} are not grid-adjacent",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn classic_waypoints_run_entrance_to_exit() {
        let layout = MapLayout::classic();
        let model = MapModel::from_layout(&layout).expect("classic layout is valid");

        assert_eq!(model.waypoints()[0], layout.entrance().unwrap());
        assert_eq!(
            model.waypoints()[model.waypoints().len() - 1],
            layout.exit().unwrap()
        );
        assert_eq!(model.waypoints().len(), layout.path.len());
        assert_adjacent_sequence(model.waypoints());
        assert_eq!(model.total_length(), (layout.path.len() - 1) as f32);
    }

    #[test]
    fn gauntlet_waypoints_are_connected() {
        let layout = MapLayout::gauntlet();
        let model = MapModel::from_layout(&layout).expect("gauntlet layout is valid");
        assert_adjacent_sequence(model.waypoints());
        assert_eq!(model.entrance(), CellCoord::new(0, 1));
        assert_eq!(model.exit(), CellCoord::new(0, 13));
    }

    #[test]
    fn path_cells_are_not_buildable() {
        let layout = MapLayout::classic();
        let model = MapModel::from_layout(&layout).expect("classic layout is valid");

        for cell in &layout.path {
            assert!(!model.is_buildable(*cell));
            assert!(model.is_path(*cell));
        }
        assert!(model.is_buildable(CellCoord::new(0, 0)));
        assert!(!model.is_buildable(CellCoord::new(20, 0)), "out of bounds");
        assert!(!model.is_buildable(CellCoord::new(0, 15)), "out of bounds");
    }

    #[test]
    fn disconnected_path_is_rejected() {
        let layout = MapLayout {
            name: "broken".to_owned(),
            difficulty: Difficulty::Easy,
            columns: 5,
            rows: 3,
            path: vec![
                CellCoord::new(0, 1),
                CellCoord::new(1, 1),
                // gap at column 2
                CellCoord::new(3, 1),
                CellCoord::new(4, 1),
            ],
        };

        assert_eq!(
            MapModel::from_layout(&layout).unwrap_err(),
            MapError::DisconnectedPath
        );
    }

    #[test]
    fn out_of_bounds_path_cell_is_rejected() {
        let layout = MapLayout {
            name: "oob".to_owned(),
            difficulty: Difficulty::Easy,
            columns: 3,
            rows: 3,
            path: vec![CellCoord::new(0, 0), CellCoord::new(3, 0)],
        };

        assert!(matches!(
            MapModel::from_layout(&layout).unwrap_err(),
            MapError::PathCellOutOfBounds { column: 3, row: 0, .. }
        ));
    }

    #[test]
    fn duplicate_path_cell_is_rejected() {
        let layout = MapLayout {
            name: "dup".to_owned(),
            difficulty: Difficulty::Easy,
            columns: 3,
            rows: 1,
            path: vec![
                CellCoord::new(0, 0),
                CellCoord::new(1, 0),
                CellCoord::new(1, 0),
            ],
        };

        assert_eq!(
            MapModel::from_layout(&layout).unwrap_err(),
            MapError::DuplicatePathCell { column: 1, row: 0 }
        );
    }

    #[test]
    fn empty_path_is_rejected() {
        let layout = MapLayout {
            name: "empty".to_owned(),
            difficulty: Difficulty::Easy,
            columns: 3,
            rows: 3,
            path: Vec::new(),
        };

        assert_eq!(
            MapModel::from_layout(&layout).unwrap_err(),
            MapError::EmptyPath
        );
    }

    #[test]
    fn position_interpolates_between_waypoint_centers() {
        let layout = MapLayout {
            name: "line".to_owned(),
            difficulty: Difficulty::Easy,
            columns: 4,
            rows: 1,
            path: vec![
                CellCoord::new(0, 0),
                CellCoord::new(1, 0),
                CellCoord::new(2, 0),
                CellCoord::new(3, 0),
            ],
        };
        let model = MapModel::from_layout(&layout).expect("line layout is valid");

        assert_eq!(model.total_length(), 3.0);
        assert_eq!(model.position_at(0.0), CellPoint::new(0.5, 0.5));
        assert_eq!(model.position_at(1.5), CellPoint::new(2.0, 0.5));
        assert_eq!(model.position_at(99.0), CellPoint::new(3.5, 0.5));
    }

    #[test]
    fn builtin_lookup_knows_both_maps() {
        assert!(MapLayout::builtin("classic").is_some());
        assert!(MapLayout::builtin("gauntlet").is_some());
        assert!(MapLayout::builtin("unknown").is_none());
    }
}
