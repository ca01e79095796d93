//! Placement of the overlay window relative to the game window.

use glam::Vec2;
use minimap_core::{CropRect, WindowPlacement, WindowRect};
use minimap_rendering::{Ortho, ScreenRect};

/// Gap kept between the overlay and the edges of the game window.
pub const WINDOW_MARGIN: i32 = 16;

const SIZE_PADDING: i32 = 8;

/// Overlay window rectangle and the logical view size it projects.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WindowLayout {
    window: ScreenRect,
    view: Vec2,
}

impl WindowLayout {
    /// Screen rectangle of the overlay window.
    #[must_use]
    pub const fn window(&self) -> ScreenRect {
        self.window
    }

    /// Logical size of the drawing area.
    #[must_use]
    pub const fn view(&self) -> Vec2 {
        self.view
    }

    /// Projection shared by the map, marker and text layers.
    #[must_use]
    pub fn projection(&self) -> Ortho {
        Ortho::centered(self.view)
    }
}

/// Computes where the overlay window goes for a crop drawn at `zoom`.
///
/// Docked placements use a square-ish window twice as wide as it is tall,
/// shrunk to fit inside the game window; the fullscreen placement covers the
/// game window minus the margin. Sizes never go negative.
#[must_use]
pub fn layout(
    crop: CropRect,
    zoom: f32,
    game: WindowRect,
    placement: WindowPlacement,
) -> WindowLayout {
    let margins = i64::from(WINDOW_MARGIN) * 2;
    let game_width = i64::from(game.right) - i64::from(game.left);
    let game_height = i64::from(game.bottom) - i64::from(game.top);

    // Float to int casts saturate, so the wanted size stays finite for any zoom.
    let extent = f64::from(crop.width()) + f64::from(crop.height());
    let mut size = ((f64::from(zoom) * extent * 0.75).round() as i64)
        .saturating_add(i64::from(SIZE_PADDING));
    if size.saturating_add(margins) > game_width {
        size = game_width - margins;
    }
    if size / 2 + margins > game_height {
        size = (game_height - margins) * 2;
    }
    let size = to_pixels(size);

    let docked = |x: i32| WindowLayout {
        window: ScreenRect::new(x, game.top.saturating_add(WINDOW_MARGIN), size, size / 2),
        view: Vec2::new(size as f32, size as f32 * 0.5),
    };

    match placement {
        WindowPlacement::Left => docked(game.left.saturating_add(WINDOW_MARGIN)),
        WindowPlacement::Right => docked(
            game.right
                .saturating_sub(size)
                .saturating_sub(WINDOW_MARGIN),
        ),
        WindowPlacement::Fullscreen => {
            let width = to_pixels(game_width - margins);
            let height = to_pixels(game_height - margins);
            WindowLayout {
                window: ScreenRect::new(
                    game.left.saturating_add(WINDOW_MARGIN),
                    game.top.saturating_add(WINDOW_MARGIN),
                    width,
                    height,
                ),
                view: Vec2::new(width as f32, height as f32),
            }
        }
    }
}

/// Clamps a pixel length into `0..=i32::MAX`.
fn to_pixels(length: i64) -> i32 {
    i32::try_from(length.max(0)).unwrap_or(i32::MAX)
}
