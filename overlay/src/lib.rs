#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame loop tying the minimap systems together.
//!
//! [`MapOverlay`] owns the render model. Each tick the driver calls
//! [`MapOverlay::update`] with a fresh process snapshot and then
//! [`MapOverlay::render`]. Visibility gates everything; a session or level
//! change rebuilds the level view and re-places the window; the guide router
//! refreshes the player-dependent geometry whenever the player moves.

pub mod placement;

use std::sync::Arc;

use anyhow::{Context, Result};
use glam::{Vec2, Vec4};
use log::{info, warn};
use minimap_core::{Config, ConfigError, Level, LevelId, ProcessSnapshot, ReferenceData, WindowRect};
use minimap_rendering::{Frame, Quad, RenderingBackend, ScreenLabel};
use minimap_session::{LevelSource, SessionCache};
use minimap_system_guide_router::{GuideRouter, RoutedFrame};
use minimap_system_level_view::{LevelView, MARKER_HALF_EXTENT};
use minimap_system_visibility::{Visibility, VisibilityChange};

use crate::placement::WindowLayout;

/// Everything drawn for the current level.
#[derive(Debug, Default)]
pub struct RenderModel {
    level: Option<Arc<Level>>,
    view: LevelView,
    layout: WindowLayout,
    router: GuideRouter,
}

impl RenderModel {
    /// Level currently drawn, or `None` while no level is available.
    #[must_use]
    pub fn level(&self) -> Option<&Arc<Level>> {
        self.level.as_ref()
    }

    /// Cached view of the current level.
    #[must_use]
    pub const fn view(&self) -> &LevelView {
        &self.view
    }

    /// Placement of the overlay window.
    #[must_use]
    pub const fn layout(&self) -> WindowLayout {
        self.layout
    }

    /// Player-dependent transform and geometry.
    #[must_use]
    pub const fn frame(&self) -> &RoutedFrame {
        self.router.frame()
    }

    fn reset(&mut self) {
        self.level = None;
        self.view = LevelView::default();
        self.router.invalidate();
    }
}

/// Minimap overlay driving the visibility, level view and routing systems.
#[derive(Debug)]
pub struct MapOverlay<S> {
    config: Config,
    reference: Arc<ReferenceData>,
    session: SessionCache<S>,
    visibility: Visibility,
    game_window: WindowRect,
    current_level: Option<LevelId>,
    model: RenderModel,
}

impl<S: LevelSource> MapOverlay<S> {
    /// Creates an overlay after validating the configuration.
    pub fn new(
        config: Config,
        reference: Arc<ReferenceData>,
        source: S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            reference,
            session: SessionCache::new(source),
            visibility: Visibility::new(),
            game_window: WindowRect::default(),
            current_level: None,
            model: RenderModel::default(),
        })
    }

    /// Processes one process snapshot.
    ///
    /// Hidden frames leave the model untouched. A new session or level id
    /// rebuilds the level view, uploads the texture and re-places the window;
    /// a level that cannot be decoded keeps the overlay dark until the level
    /// id or the session changes again.
    pub fn update<B>(&mut self, snapshot: &ProcessSnapshot, backend: &mut B) -> Result<()>
    where
        B: RenderingBackend + ?Sized,
    {
        match self
            .visibility
            .update(self.config.show, snapshot.available, snapshot.map_open)
        {
            VisibilityChange::Shown => info!("minimap shown"),
            VisibilityChange::Hidden => info!("minimap hidden"),
            VisibilityChange::Unchanged => {}
        }
        if !self.visibility.is_enabled() {
            return Ok(());
        }

        let session_changed = self.session.update(snapshot.seed, snapshot.difficulty);
        if session_changed || self.current_level != Some(snapshot.level_id) {
            self.current_level = Some(snapshot.level_id);
            self.rebuild(snapshot.level_id, backend)?;
        }

        let model = &mut self.model;
        if let Some(level) = &model.level {
            let _ = model
                .router
                .update(level, snapshot.player, &model.view.guides, &self.config);
        }
        Ok(())
    }

    /// Records a new game window rectangle and re-places the overlay window.
    pub fn window_moved<B>(&mut self, rect: WindowRect, backend: &mut B) -> Result<()>
    where
        B: RenderingBackend + ?Sized,
    {
        self.game_window = rect;
        self.place_window(backend)
    }

    /// Presents the current model.
    ///
    /// Returns `false` without touching the backend when nothing is drawn.
    pub fn render<B>(&self, backend: &mut B) -> Result<bool>
    where
        B: RenderingBackend + ?Sized,
    {
        if !self.visibility.is_enabled() {
            return Ok(false);
        }
        let Some(level) = &self.model.level else {
            return Ok(false);
        };

        let routed = self.model.router.frame();
        let transform = routed.transform();
        let font_size = self.config.font_size;
        let labels = self
            .model
            .view
            .labels
            .iter()
            .filter(|label| !label.text.is_empty())
            .map(|label| {
                let corner = label.position - Vec2::splat(MARKER_HALF_EXTENT);
                let anchor = transform * Vec4::new(corner.x, corner.y, 0.0, 1.0);
                ScreenLabel {
                    text: label.text.clone(),
                    position: Vec2::new(anchor.x - label.half_width, anchor.y - font_size),
                    size: font_size,
                }
            })
            .collect();

        let half = level.crop().half_extent();
        let frame = Frame {
            projection: self.model.layout.projection(),
            transform,
            map_quad: Quad::rect(-half, half),
            map_markers: &self.model.view.markers,
            overlay: routed.geometry(),
            labels,
            text_color: self.config.colors.text,
        };
        backend.present(&frame).context("failed to present minimap frame")?;
        Ok(true)
    }

    /// Whether the most recent update left the overlay visible.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visibility.is_enabled()
    }

    /// Current render model.
    #[must_use]
    pub const fn model(&self) -> &RenderModel {
        &self.model
    }

    /// Session cache backing level lookups.
    #[must_use]
    pub const fn session(&self) -> &SessionCache<S> {
        &self.session
    }

    /// Configuration the overlay was created with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    fn rebuild<B>(&mut self, id: LevelId, backend: &mut B) -> Result<()>
    where
        B: RenderingBackend + ?Sized,
    {
        self.model.reset();
        let Some(level) = self.session.level(id) else {
            warn!("level {} is unavailable; minimap disabled", id.get());
            return Ok(());
        };

        let reference = &self.reference;
        let session = &mut self.session;
        let view = minimap_system_level_view::build(
            &level,
            reference,
            reference.guide_targets(id),
            &self.config,
            |neighbor| session.level(neighbor),
            &*backend,
        );
        backend
            .upload_map(&view.texture)
            .with_context(|| format!("failed to upload map texture for level {}", id.get()))?;

        self.model.view = view;
        self.model.level = Some(level);
        self.place_window(backend)
    }

    fn place_window<B>(&mut self, backend: &mut B) -> Result<()>
    where
        B: RenderingBackend + ?Sized,
    {
        let Some(level) = &self.model.level else {
            return Ok(());
        };

        let layout = placement::layout(
            level.crop(),
            self.config.scale,
            self.game_window,
            self.config.position,
        );
        backend
            .place_window(layout.window())
            .context("failed to place minimap window")?;
        self.model.layout = layout;
        Ok(())
    }
}
