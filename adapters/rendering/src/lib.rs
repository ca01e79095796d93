#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for minimap adapters.
//!
//! Systems describe what should be drawn using the declarative values in this
//! crate; backends implement [`RenderingBackend`] to turn a [`Frame`] into
//! pixels. Coordinates named "centered" are crop-relative with the crop
//! midpoint at the origin, which is the space the player transform expects.

use anyhow::Result as AnyResult;
use glam::{Mat4, Vec2};
use minimap_core::PoiCategory;
use std::{error::Error, fmt};

pub use minimap_core::Color;

/// Cropped walkability bitmap uploaded to the map texture as a single replace.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MapTexture {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl MapTexture {
    /// Wraps a row-major pixel buffer.
    ///
    /// Returns an error when the buffer does not hold exactly `width * height` pixels.
    pub fn new(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self, RenderingError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(RenderingError::PixelCountMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width of the texture in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the texture in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Row-major packed RGBA pixels.
    #[must_use]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Pixel at the provided texel, if it lies inside the texture.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Determines whether the texture holds any pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// Arbitrary quadrilateral described by its corners in drawing order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    /// Corners in drawing order.
    pub corners: [Vec2; 4],
}

impl Quad {
    /// Creates a quad from explicit corners.
    #[must_use]
    pub const fn new(corners: [Vec2; 4]) -> Self {
        Self { corners }
    }

    /// Axis-aligned rectangle spanning `min` to `max`.
    #[must_use]
    pub fn rect(min: Vec2, max: Vec2) -> Self {
        Self::new([
            min,
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
        ])
    }

    /// Axis-aligned square centered on `center` extending `half_extent` in every direction.
    #[must_use]
    pub fn square(center: Vec2, half_extent: f32) -> Self {
        Self::rect(center - Vec2::splat(half_extent), center + Vec2::splat(half_extent))
    }

    /// Average of the four corners.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.corners.iter().copied().sum::<Vec2>() * 0.25
    }
}

/// Quad filled with a flat color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColoredQuad {
    /// Geometry of the quad.
    pub quad: Quad,
    /// Fill color.
    pub color: Color,
}

impl ColoredQuad {
    /// Creates a new colored quad.
    #[must_use]
    pub const fn new(quad: Quad, color: Color) -> Self {
        Self { quad, color }
    }
}

/// Line segment drawn with a width and color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    /// Start point.
    pub from: Vec2,
    /// End point.
    pub to: Vec2,
    /// Stroke width.
    pub width: f32,
    /// Stroke color.
    pub color: Color,
}

impl Segment {
    /// Creates a new segment.
    #[must_use]
    pub const fn new(from: Vec2, to: Vec2, width: f32, color: Color) -> Self {
        Self {
            from,
            to,
            width,
            color,
        }
    }

    /// Euclidean length of the segment.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.from.distance(self.to)
    }
}

/// Point of interest drawn with a text label.
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledPoint {
    /// Centered crop-relative position.
    pub position: Vec2,
    /// Display text; empty when no localized string exists.
    pub text: String,
    /// Half of the rendered text width, used for centering.
    pub half_width: f32,
    /// Category of the point.
    pub category: PoiCategory,
}

/// Centered crop-relative position that receives a routing line from the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuideAnchor {
    /// Centered crop-relative position.
    pub position: Vec2,
}

impl GuideAnchor {
    /// Creates a new guide anchor.
    #[must_use]
    pub const fn new(position: Vec2) -> Self {
        Self { position }
    }
}

/// Geometry drawn on the player-relative layer above the map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameGeometry {
    /// Flat quads (player marker, guide diamonds).
    pub quads: Vec<ColoredQuad>,
    /// Guide lines.
    pub lines: Vec<Segment>,
}

impl FrameGeometry {
    /// Removes every primitive while keeping allocations.
    pub fn clear(&mut self) {
        self.quads.clear();
        self.lines.clear();
    }

    /// Determines whether nothing would be drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty() && self.lines.is_empty()
    }
}

/// Text string positioned in screen space.
#[derive(Clone, Debug, PartialEq)]
pub struct ScreenLabel {
    /// Text to render.
    pub text: String,
    /// Top-left position of the text.
    pub position: Vec2,
    /// Point size.
    pub size: f32,
}

/// Orthographic projection bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ortho {
    /// Left edge.
    pub left: f32,
    /// Right edge.
    pub right: f32,
    /// Bottom edge.
    pub bottom: f32,
    /// Top edge.
    pub top: f32,
}

impl Ortho {
    /// Projection of a `view` sized viewport with the origin at its center and y pointing down.
    #[must_use]
    pub fn centered(view: Vec2) -> Self {
        let half = view * 0.5;
        Self {
            left: -half.x,
            right: half.x,
            bottom: half.y,
            top: -half.y,
        }
    }

    /// Projection matrix mapping the bounds onto clip space.
    #[must_use]
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::orthographic_rh_gl(self.left, self.right, self.bottom, self.top, -1.0, 1.0)
    }
}

/// Overlay window rectangle in screen pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ScreenRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

impl ScreenRect {
    /// Creates a new screen rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Everything a backend needs to draw one overlay frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame<'a> {
    /// Projection shared by every layer.
    pub projection: Ortho,
    /// Player-relative transform shared by the map and overlay layers.
    pub transform: Mat4,
    /// Quad the map texture is stretched over, in centered coordinates.
    pub map_quad: Quad,
    /// Point-of-interest markers drawn on the map layer.
    pub map_markers: &'a [ColoredQuad],
    /// Player marker, guide lines and diamonds.
    pub overlay: &'a FrameGeometry,
    /// Labels already projected to screen space.
    pub labels: Vec<ScreenLabel>,
    /// Color used for every label.
    pub text_color: Color,
}

/// Measures rendered text so labels can be centered.
pub trait TextMeasure {
    /// Width of `text` rendered at the provided point size.
    fn string_width(&self, text: &str, size: f32) -> f32;
}

/// Fixed-advance text measurement used by headless backends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceMeasure {
    advance: f32,
}

impl MonospaceMeasure {
    /// Creates a measure where every character advances `advance` times the point size.
    #[must_use]
    pub const fn new(advance: f32) -> Self {
        Self { advance }
    }
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl TextMeasure for MonospaceMeasure {
    fn string_width(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * self.advance
    }
}

/// Rendering backend capable of presenting minimap frames.
pub trait RenderingBackend: TextMeasure {
    /// Replaces the map texture contents.
    fn upload_map(&mut self, texture: &MapTexture) -> AnyResult<()>;

    /// Moves and resizes the overlay window.
    fn place_window(&mut self, window: ScreenRect) -> AnyResult<()>;

    /// Draws one frame.
    fn present(&mut self, frame: &Frame<'_>) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The pixel buffer size does not match the texture dimensions.
    PixelCountMismatch {
        /// Pixel count implied by the dimensions.
        expected: usize,
        /// Pixel count supplied.
        actual: usize,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PixelCountMismatch { expected, actual } => {
                write!(
                    f,
                    "texture requires {expected} pixels (received {actual})"
                )
            }
        }
    }
}

impl Error for RenderingError {}
