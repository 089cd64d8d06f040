// Tile map port consumed by collision, plus an in-memory grid implementation.

use super::geometry::{Range, Vector2D};
use thiserror::Error;

/// Read-only view of the level geometry.
pub trait TileMap: Send + Sync {
    /// True when `area` touches a blocked tile or leaves the map.
    fn is_obstructed(&self, area: &Range) -> bool;

    fn bounds(&self) -> Range;

    fn tile_size(&self) -> f64;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("map has no tiles")]
    Empty,
    #[error("row {row} has {found} tiles, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown tile {tile:?} at row {row}, column {column}")]
    UnknownTile { tile: char, row: usize, column: usize },
}

/// Rectangular grid of floor/wall tiles anchored at the origin.
#[derive(Debug, Clone)]
pub struct GridMap {
    columns: usize,
    rows: usize,
    tile_size: f64,
    walls: Vec<bool>,
}

impl GridMap {
    /// An open grid with no walls.
    pub fn new(columns: usize, rows: usize, tile_size: f64) -> Self {
        Self {
            columns,
            rows,
            tile_size,
            walls: vec![false; columns * rows],
        }
    }

    /// Builds a grid from text rows where `#` is a wall and `.` is floor.
    pub fn from_rows<S: AsRef<str>>(rows: &[S], tile_size: f64) -> Result<Self, MapError> {
        let columns = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        if columns == 0 {
            return Err(MapError::Empty);
        }

        let mut map = Self::new(columns, rows.len(), tile_size);
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != columns {
                return Err(MapError::Ragged {
                    row,
                    expected: columns,
                    found,
                });
            }
            for (column, tile) in line.chars().enumerate() {
                match tile {
                    '#' => map.set_wall(column, row, true),
                    '.' => {}
                    other => {
                        return Err(MapError::UnknownTile {
                            tile: other,
                            row,
                            column,
                        });
                    }
                }
            }
        }
        Ok(map)
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn set_wall(&mut self, column: usize, row: usize, wall: bool) {
        if column < self.columns && row < self.rows {
            self.walls[row * self.columns + column] = wall;
        }
    }

    /// Tiles outside the grid count as walls.
    pub fn is_wall(&self, column: i64, row: i64) -> bool {
        if column < 0 || row < 0 {
            return true;
        }
        let (column, row) = (column as usize, row as usize);
        if column >= self.columns || row >= self.rows {
            return true;
        }
        self.walls[row * self.columns + column]
    }

    /// World-space rectangle of one tile.
    pub fn tile_range(&self, column: usize, row: usize) -> Range {
        Range::from_origin(
            Vector2D::new(column as f64 * self.tile_size, row as f64 * self.tile_size),
            self.tile_size,
            self.tile_size,
        )
    }
}

impl TileMap for GridMap {
    fn is_obstructed(&self, area: &Range) -> bool {
        if !self.bounds().contains_range(area) {
            return true;
        }

        // Tiles the area strictly overlaps; shared edges do not count.
        let first_column = (area.min.x / self.tile_size).floor() as i64;
        let last_column = (area.max.x / self.tile_size).ceil() as i64 - 1;
        let first_row = (area.min.y / self.tile_size).floor() as i64;
        let last_row = (area.max.y / self.tile_size).ceil() as i64 - 1;

        (first_row..=last_row).any(|row| {
            (first_column..=last_column).any(|column| self.is_wall(column, row))
        })
    }

    fn bounds(&self) -> Range {
        Range::from_origin(
            Vector2D::ZERO,
            self.columns as f64 * self.tile_size,
            self.rows as f64 * self.tile_size,
        )
    }

    fn tile_size(&self) -> f64 {
        self.tile_size
    }
}
