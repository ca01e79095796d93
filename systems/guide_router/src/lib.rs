#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that places the player marker and routes guide lines.
//!
//! Everything is computed in centered crop coordinates; the isometric
//! player transform produced here maps those coordinates onto the overlay
//! for both the map layer and the marker layer.

use glam::{Mat4, Vec2, Vec3};
use log::debug;
use minimap_core::{Config, Level, LineMode, WorldPoint};
use minimap_rendering::{ColoredQuad, FrameGeometry, GuideAnchor, Quad, Segment};

/// Distance kept free between the player and the start of every guide line.
pub const PLAYER_CLEARANCE: f32 = 8.0;

/// Full-mode targets closer than this collapse to a zero-length line.
pub const FULL_LINE_MIN_DISTANCE: f32 = 17.0;

/// Longest stretch a segmented guide covers measured from the player.
pub const SEGMENT_MAX_LENGTH: f32 = 78.0;

/// Space between the end of a segmented line and its target or diamond.
pub const SEGMENT_GAP: f32 = 12.0;

/// Stroke width of guide lines.
pub const LINE_WIDTH: f32 = 1.5;

/// Half extent of the outer player square.
pub const PLAYER_OUTER_HALF_EXTENT: f32 = 4.0;

/// Half extent of the inner player square.
pub const PLAYER_INNER_HALF_EXTENT: f32 = 2.0;

const DIAMOND_CORNERS: [Vec2; 4] = [
    Vec2::new(-3.0, -3.0),
    Vec2::new(1.5, -1.5),
    Vec2::new(3.0, 3.0),
    Vec2::new(-1.5, 1.5),
];

/// Guide line from the player toward a single anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuideRoute {
    /// Start of the line.
    pub from: Vec2,
    /// End of the line; equal to `from` when the line collapsed.
    pub to: Vec2,
    /// Direction marker drawn past the end of a segmented line.
    pub diamond: Option<Quad>,
}

/// Routes a line spanning the whole distance, inset at both ends.
///
/// Returns `None` when the target coincides with the player.
#[must_use]
pub fn route_full(player: Vec2, target: Vec2) -> Option<GuideRoute> {
    let (direction, distance) = direction(player, target)?;
    let from = player + direction * PLAYER_CLEARANCE;
    let to = if distance < FULL_LINE_MIN_DISTANCE {
        from
    } else {
        target - direction * PLAYER_CLEARANCE
    };

    Some(GuideRoute {
        from,
        to,
        diamond: None,
    })
}

/// Routes a capped line followed by a diamond pointing toward the target.
///
/// Returns `None` when the target coincides with the player.
#[must_use]
pub fn route_segmented(player: Vec2, target: Vec2) -> Option<GuideRoute> {
    let (direction, distance) = direction(player, target)?;
    let from = player + direction * PLAYER_CLEARANCE;
    let to = if distance > SEGMENT_MAX_LENGTH {
        player + direction * (SEGMENT_MAX_LENGTH - SEGMENT_GAP)
    } else if distance > SEGMENT_GAP {
        target - direction * SEGMENT_GAP
    } else {
        return Some(GuideRoute {
            from,
            to: from,
            diamond: None,
        });
    };

    let center = to + direction * SEGMENT_GAP;
    Some(GuideRoute {
        from,
        to,
        diamond: Some(Quad::new(DIAMOND_CORNERS.map(|corner| center + corner))),
    })
}

/// Routes a guide line using the configured policy.
#[must_use]
pub fn route(mode: LineMode, player: Vec2, target: Vec2) -> Option<GuideRoute> {
    match mode {
        LineMode::Full => route_full(player, target),
        LineMode::Segmented => route_segmented(player, target),
    }
}

fn direction(from: Vec2, to: Vec2) -> Option<(Vec2, f32)> {
    let delta = to - from;
    let distance = delta.length();
    if distance <= f32::EPSILON {
        return None;
    }
    Some((delta / distance, distance))
}

/// Converts the player's world position into centered crop coordinates.
#[must_use]
pub fn player_anchor(level: &Level, player: WorldPoint) -> Vec2 {
    level.to_centered(player)
}

/// Isometric transform shared by the map and marker layers.
///
/// Translates the anchor to the origin when `centered` is set, zooms, rotates
/// by 45 degrees and halves the vertical axis.
#[must_use]
pub fn player_transform(anchor: Vec2, zoom: f32, centered: bool) -> Mat4 {
    let projection = Mat4::from_scale(Vec3::new(1.0, 0.5, 1.0))
        * Mat4::from_rotation_z(45.0_f32.to_radians())
        * Mat4::from_scale(Vec3::new(zoom, zoom, 1.0));
    if centered {
        projection * Mat4::from_translation((-anchor).extend(0.0))
    } else {
        projection
    }
}

/// Player-dependent part of the render model.
#[derive(Clone, Debug, PartialEq)]
pub struct RoutedFrame {
    anchor: Vec2,
    transform: Mat4,
    geometry: FrameGeometry,
}

impl RoutedFrame {
    /// Player position in centered crop coordinates.
    #[must_use]
    pub const fn anchor(&self) -> Vec2 {
        self.anchor
    }

    /// Transform applied to the map and marker layers.
    #[must_use]
    pub const fn transform(&self) -> Mat4 {
        self.transform
    }

    /// Player marker, guide lines and diamonds.
    #[must_use]
    pub const fn geometry(&self) -> &FrameGeometry {
        &self.geometry
    }
}

impl Default for RoutedFrame {
    fn default() -> Self {
        Self {
            anchor: Vec2::ZERO,
            transform: Mat4::IDENTITY,
            geometry: FrameGeometry::default(),
        }
    }
}

/// Router that rebuilds the player-dependent geometry when the player moves.
#[derive(Debug, Default)]
pub struct GuideRouter {
    last_player: Option<WorldPoint>,
    frame: RoutedFrame,
}

impl GuideRouter {
    /// Creates a router that will run on its first update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces the next update to recompute regardless of the player position.
    pub fn invalidate(&mut self) {
        self.last_player = None;
    }

    /// Recomputes the frame when the player moved since the last update.
    ///
    /// Returns the refreshed frame, or `None` when the previous one is still
    /// current. The geometry buffers are reused between runs.
    pub fn update(
        &mut self,
        level: &Level,
        player: WorldPoint,
        guides: &[GuideAnchor],
        config: &Config,
    ) -> Option<&RoutedFrame> {
        if self.last_player == Some(player) {
            return None;
        }
        self.last_player = Some(player);

        let anchor = player_anchor(level, player);
        let colors = &config.colors;
        let frame = &mut self.frame;
        frame.anchor = anchor;
        frame.transform = player_transform(anchor, config.scale, config.map_centered);
        frame.geometry.clear();
        frame.geometry.quads.push(ColoredQuad::new(
            Quad::square(anchor, PLAYER_OUTER_HALF_EXTENT),
            colors.player_outer,
        ));
        frame.geometry.quads.push(ColoredQuad::new(
            Quad::square(anchor, PLAYER_INNER_HALF_EXTENT),
            colors.player_inner,
        ));

        for guide in guides {
            let Some(guide_route) = route(config.line_mode, anchor, guide.position) else {
                continue;
            };
            frame.geometry.lines.push(Segment::new(
                guide_route.from,
                guide_route.to,
                LINE_WIDTH,
                colors.line,
            ));
            if let Some(diamond) = guide_route.diamond {
                frame
                    .geometry
                    .quads
                    .push(ColoredQuad::new(diamond, colors.line));
            }
        }

        debug!(
            "routed player at ({}, {}) to {} guides",
            player.x,
            player.y,
            frame.geometry.lines.len()
        );
        Some(&self.frame)
    }

    /// Most recently computed frame.
    #[must_use]
    pub const fn frame(&self) -> &RoutedFrame {
        &self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coincident_target_has_no_direction() {
        assert!(direction(Vec2::new(3.0, 4.0), Vec2::new(3.0, 4.0)).is_none());
    }

    #[test]
    fn direction_is_normalized() {
        let (unit, distance) =
            direction(Vec2::ZERO, Vec2::new(3.0, 4.0)).expect("distinct points have a direction");

        assert_eq!(distance, 5.0);
        assert_eq!(unit, Vec2::new(0.6, 0.8));
    }

    #[test]
    fn route_dispatches_on_line_mode() {
        let target = Vec2::new(100.0, 0.0);

        let full = route(LineMode::Full, Vec2::ZERO, target).expect("full route exists");
        let segmented =
            route(LineMode::Segmented, Vec2::ZERO, target).expect("segmented route exists");

        assert_eq!(full.to, Vec2::new(92.0, 0.0));
        assert_eq!(segmented.to, Vec2::new(66.0, 0.0));
    }
}
