//! Immutable decoded level snapshots.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{reference::ObjectTable, LevelId, WorldPoint};

/// Sub-region of a level grid that is actually rendered, in level-grid cells.
///
/// The rectangle is half-open: `[x0, x1) × [y0, y1)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CropRect {
    /// Left edge, inclusive.
    pub x0: u32,
    /// Top edge, inclusive.
    pub y0: u32,
    /// Right edge, exclusive.
    pub x1: u32,
    /// Bottom edge, exclusive.
    pub y1: u32,
}

impl CropRect {
    /// Creates a crop rectangle from its edges.
    #[must_use]
    pub const fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the crop in cells; zero when the edges are inverted.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    /// Height of the crop in cells; zero when the edges are inverted.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    /// Reports whether the crop covers no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Half of the crop extent, used to center crop-relative coordinates.
    #[must_use]
    pub fn half_extent(&self) -> Vec2 {
        Vec2::new(self.width() as f32 * 0.5, self.height() as f32 * 0.5)
    }
}

/// Connection from a level to one of its neighbors.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacentLevel {
    /// Exit points in world coordinates, in the order the decoder reported them.
    #[serde(default)]
    pub exits: Vec<WorldPoint>,
}

/// Raw decoded parts of a level prior to invariant validation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelData {
    /// Rendered sub-region of the grid.
    pub crop: CropRect,
    /// Number of cells per grid row.
    pub total_width: u32,
    /// Offset converting world coordinates into level-local coordinates.
    pub origin: WorldPoint,
    /// Row-major walkability grid; the low bit of each cell marks it as blocked.
    pub grid: Vec<u16>,
    /// Neighboring levels keyed by their identifier.
    pub adjacent_levels: BTreeMap<LevelId, AdjacentLevel>,
    /// Object occurrences keyed by reference object identifier.
    pub objects: BTreeMap<u32, Vec<WorldPoint>>,
    /// NPC occurrences keyed by reference npc identifier.
    pub npcs: BTreeMap<u32, Vec<WorldPoint>>,
}

/// Invariant violations detected while constructing a [`Level`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LevelError {
    /// The crop edges are inverted.
    #[error("crop edges are inverted ({x0},{y0})-({x1},{y1})")]
    CropInverted {
        /// Left edge.
        x0: u32,
        /// Top edge.
        y0: u32,
        /// Right edge.
        x1: u32,
        /// Bottom edge.
        y1: u32,
    },
    /// The crop extends past the grid stride.
    #[error("crop right edge {x1} exceeds grid width {total_width}")]
    CropExceedsStride {
        /// Right edge of the crop.
        x1: u32,
        /// Number of cells per row.
        total_width: u32,
    },
    /// The grid holds fewer cells than the crop requires.
    #[error("grid holds {actual} cells but the crop requires {required}")]
    GridTooShort {
        /// Minimum number of cells required by the crop.
        required: usize,
        /// Number of cells supplied.
        actual: usize,
    },
    /// A point of interest lies outside the full grid.
    #[error("{table:?} entry {id} at ({}, {}) lies outside the level grid", .point.x, .point.y)]
    PointOutsideGrid {
        /// Collection the point belongs to.
        table: ObjectTable,
        /// Reference identifier of the point.
        id: u32,
        /// Offending world coordinate.
        point: WorldPoint,
    },
}

/// Immutable decoded snapshot of one game level.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "LevelData")]
pub struct Level {
    data: LevelData,
    rows: u32,
}

impl Level {
    /// Validates the decoded parts and wraps them into an immutable level.
    pub fn new(data: LevelData) -> Result<Self, LevelError> {
        let crop = data.crop;
        if crop.x0 > crop.x1 || crop.y0 > crop.y1 {
            return Err(LevelError::CropInverted {
                x0: crop.x0,
                y0: crop.y0,
                x1: crop.x1,
                y1: crop.y1,
            });
        }
        if crop.x1 > data.total_width {
            return Err(LevelError::CropExceedsStride {
                x1: crop.x1,
                total_width: data.total_width,
            });
        }

        let required = crop.y1 as usize * data.total_width as usize;
        if data.grid.len() < required {
            return Err(LevelError::GridTooShort {
                required,
                actual: data.grid.len(),
            });
        }

        let rows = if data.total_width == 0 {
            0
        } else {
            u32::try_from(data.grid.len() / data.total_width as usize).unwrap_or(u32::MAX)
        };

        let level = Self { data, rows };
        for table in [ObjectTable::Objects, ObjectTable::Npcs] {
            for (&id, points) in level.points(table) {
                if let Some(&point) = points.iter().find(|point| !level.contains(**point)) {
                    return Err(LevelError::PointOutsideGrid { table, id, point });
                }
            }
        }

        Ok(level)
    }

    /// Rendered sub-region of the grid.
    #[must_use]
    pub const fn crop(&self) -> CropRect {
        self.data.crop
    }

    /// Number of cells per grid row.
    #[must_use]
    pub const fn total_width(&self) -> u32 {
        self.data.total_width
    }

    /// Number of complete rows stored in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Offset converting world coordinates into level-local coordinates.
    #[must_use]
    pub const fn origin(&self) -> WorldPoint {
        self.data.origin
    }

    /// Raw walkability grid.
    #[must_use]
    pub fn grid(&self) -> &[u16] {
        &self.data.grid
    }

    /// Raw grid value at the level-local cell, if it exists.
    #[must_use]
    pub fn cell(&self, x: u32, y: u32) -> Option<u16> {
        if x >= self.data.total_width || y >= self.rows {
            return None;
        }
        let index = y as usize * self.data.total_width as usize + x as usize;
        self.data.grid.get(index).copied()
    }

    /// Neighboring levels keyed by identifier, in ascending order.
    #[must_use]
    pub fn adjacent_levels(&self) -> &BTreeMap<LevelId, AdjacentLevel> {
        &self.data.adjacent_levels
    }

    /// Occurrences stored in the requested collection, keyed by reference identifier.
    #[must_use]
    pub fn points(&self, table: ObjectTable) -> &BTreeMap<u32, Vec<WorldPoint>> {
        match table {
            ObjectTable::Objects => &self.data.objects,
            ObjectTable::Npcs => &self.data.npcs,
        }
    }

    /// Reports whether the level contains at least one object with the identifier.
    #[must_use]
    pub fn has_object(&self, id: u32) -> bool {
        self.data.objects.contains_key(&id)
    }

    /// Converts a world point into crop-local coordinates (crop top-left at zero).
    #[must_use]
    pub fn to_crop_local(&self, point: WorldPoint) -> Vec2 {
        let origin = self.data.origin;
        let crop = self.data.crop;
        let x = i64::from(point.x) - i64::from(origin.x) - i64::from(crop.x0);
        let y = i64::from(point.y) - i64::from(origin.y) - i64::from(crop.y0);
        Vec2::new(x as f32, y as f32)
    }

    /// Converts a world point into crop-relative coordinates centered on the crop midpoint.
    #[must_use]
    pub fn to_centered(&self, point: WorldPoint) -> Vec2 {
        self.to_crop_local(point) - self.data.crop.half_extent()
    }

    fn contains(&self, point: WorldPoint) -> bool {
        let x = i64::from(point.x) - i64::from(self.data.origin.x);
        let y = i64::from(point.y) - i64::from(self.data.origin.y);
        (0..i64::from(self.data.total_width)).contains(&x) && (0..i64::from(self.rows)).contains(&y)
    }
}

impl TryFrom<LevelData> for Level {
    type Error = LevelError;

    fn try_from(data: LevelData) -> Result<Self, Self::Error> {
        Self::new(data)
    }
}
