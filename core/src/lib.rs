#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the minimap overlay.
//!
//! This crate defines the values that flow between the process reader, the
//! session cache, the pure systems, and the rendering adapters. A
//! [`ProcessSnapshot`] is copied in at the start of every frame, decoded
//! [`Level`] values are shared immutably, and the [`ReferenceData`] tables are
//! consulted to turn raw level contents into labeled points of interest.
//! Configuration travels as an explicit, immutable [`Config`] value.

mod config;
mod level;
mod reference;

use serde::{Deserialize, Serialize};

pub use config::{
    Color, Config, ConfigError, DisplayMode, Language, LineMode, Palette, WindowPlacement,
};
pub use level::{AdjacentLevel, CropRect, Level, LevelData, LevelError};
pub use reference::{
    GuideKey, LocalizedText, ObjectInfo, ObjectKind, ObjectTable, PoiCategory, ReferenceData,
    ReferenceLevel,
};

/// Identifier of a single game level.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LevelId(u32);

impl LevelId {
    /// Creates a new level identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identity of one game-world instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId {
    seed: u32,
    difficulty: u8,
}

impl SessionId {
    /// Creates a new session identity.
    #[must_use]
    pub const fn new(seed: u32, difficulty: u8) -> Self {
        Self { seed, difficulty }
    }

    /// Map seed of the session.
    #[must_use]
    pub const fn seed(&self) -> u32 {
        self.seed
    }

    /// Difficulty tier of the session.
    #[must_use]
    pub const fn difficulty(&self) -> u8 {
        self.difficulty
    }
}

/// Location expressed in world-grid coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldPoint {
    /// Horizontal world coordinate.
    pub x: i32,
    /// Vertical world coordinate.
    pub y: i32,
}

impl WorldPoint {
    /// Creates a new world point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Screen rectangle of the game window as reported by the process reader.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    /// Left edge in screen pixels.
    pub left: i32,
    /// Top edge in screen pixels.
    pub top: i32,
    /// Right edge in screen pixels.
    pub right: i32,
    /// Bottom edge in screen pixels.
    pub bottom: i32,
}

impl WindowRect {
    /// Creates a new window rectangle from its edges.
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Horizontal extent of the rectangle.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Vertical extent of the rectangle.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Values published by the process reader, copied in once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessSnapshot {
    /// Whether the target process is attached and readable.
    pub available: bool,
    /// Whether the in-game map is currently open.
    pub map_open: bool,
    /// Map seed of the running session.
    pub seed: u32,
    /// Difficulty tier of the running session.
    pub difficulty: u8,
    /// Level the player currently stands in.
    pub level_id: LevelId,
    /// Player position in world coordinates.
    pub player: WorldPoint,
}

impl ProcessSnapshot {
    /// Session identity carried by the snapshot.
    #[must_use]
    pub const fn session(&self) -> SessionId {
        SessionId::new(self.seed, self.difficulty)
    }
}

/// Producer of process snapshots polled by frame drivers.
pub trait ProcessSource {
    /// Returns the latest published snapshot, or `None` once the source is exhausted.
    fn poll(&mut self) -> Option<ProcessSnapshot>;

    /// Returns the game window rectangle if it changed since the previous call,
    /// clearing the latch so each change is delivered once.
    fn take_window_change(&mut self) -> Option<WindowRect>;
}

#[cfg(test)]
mod tests {
    use super::{LevelId, ProcessSnapshot, SessionId, WindowRect, WorldPoint};

    #[test]
    fn snapshot_reports_session_identity() {
        let snapshot = ProcessSnapshot {
            seed: 0xdead_beef,
            difficulty: 2,
            ..ProcessSnapshot::default()
        };

        assert_eq!(snapshot.session(), SessionId::new(0xdead_beef, 2));
    }

    #[test]
    fn window_rect_extents_follow_edges() {
        let rect = WindowRect::new(100, 50, 1380, 770);
        assert_eq!(rect.width(), 1280);
        assert_eq!(rect.height(), 720);
    }

    #[test]
    fn snapshot_deserializes_with_defaults() {
        let snapshot: ProcessSnapshot =
            serde_json::from_str(r#"{ "available": true, "level_id": 4, "player": { "x": 3, "y": -2 } }"#)
                .expect("snapshot parses");

        assert!(snapshot.available);
        assert!(!snapshot.map_open);
        assert_eq!(snapshot.level_id, LevelId::new(4));
        assert_eq!(snapshot.player, WorldPoint::new(3, -2));
    }
}
