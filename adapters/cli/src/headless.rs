use std::fmt;

use anyhow::Result;
use log::debug;
use minimap_rendering::{
    Frame, MapTexture, MonospaceMeasure, RenderingBackend, ScreenRect, TextMeasure,
};

/// Totals accumulated by the headless backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct RenderStats {
    /// Map textures uploaded.
    pub(crate) uploads: usize,
    /// Pixels across every uploaded texture.
    pub(crate) uploaded_pixels: usize,
    /// Window placements requested.
    pub(crate) placements: usize,
    /// Most recent window placement.
    pub(crate) window: Option<ScreenRect>,
    /// Frames presented.
    pub(crate) frames: usize,
    /// Labels drawn across every frame.
    pub(crate) labels: usize,
    /// Guide lines drawn across every frame.
    pub(crate) lines: usize,
}

impl fmt::Display for RenderStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} frames presented, {} labels, {} guide lines, {} uploads ({} pixels), {} window placements",
            self.frames, self.labels, self.lines, self.uploads, self.uploaded_pixels, self.placements
        )?;
        if let Some(window) = self.window {
            write!(
                f,
                ", window {}x{} at ({}, {})",
                window.width, window.height, window.x, window.y
            )?;
        }
        Ok(())
    }
}

/// Backend that measures text with a fixed advance and only records what it is asked to draw.
#[derive(Debug, Default)]
pub(crate) struct HeadlessBackend {
    measure: MonospaceMeasure,
    stats: RenderStats,
}

impl HeadlessBackend {
    /// Totals recorded so far.
    pub(crate) const fn stats(&self) -> RenderStats {
        self.stats
    }
}

impl TextMeasure for HeadlessBackend {
    fn string_width(&self, text: &str, size: f32) -> f32 {
        self.measure.string_width(text, size)
    }
}

impl RenderingBackend for HeadlessBackend {
    fn upload_map(&mut self, texture: &MapTexture) -> Result<()> {
        debug!("upload {}x{} map", texture.width(), texture.height());
        self.stats.uploads += 1;
        self.stats.uploaded_pixels += texture.pixels().len();
        Ok(())
    }

    fn place_window(&mut self, window: ScreenRect) -> Result<()> {
        debug!(
            "place window {}x{} at ({}, {})",
            window.width, window.height, window.x, window.y
        );
        self.stats.placements += 1;
        self.stats.window = Some(window);
        Ok(())
    }

    fn present(&mut self, frame: &Frame<'_>) -> Result<()> {
        self.stats.frames += 1;
        self.stats.labels += frame.labels.len();
        self.stats.lines += frame.overlay.lines.len();
        Ok(())
    }
}
