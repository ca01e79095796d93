#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns a decoded level into its cached minimap view.
//!
//! The view consists of the cropped walkability texture, one marker and one
//! label per point of interest, and the guide anchors that receive routing
//! lines from the player. Building is proportional to the crop area plus the
//! number of points, so callers run it only when the level or the session
//! changes; everything it produces is reused frame after frame.

use std::{collections::HashSet, sync::Arc};

use glam::Vec2;
use log::debug;
use minimap_core::{
    Color, Config, GuideKey, Level, LevelId, ObjectTable, PoiCategory, ReferenceData, WorldPoint,
};
use minimap_rendering::{
    ColoredQuad, GuideAnchor, LabeledPoint, MapTexture, Quad, TextMeasure,
};

/// Half of the side length of a point-of-interest marker.
pub const MARKER_HALF_EXTENT: f32 = 4.0;

/// Level-design rule highlighting the one optional-area variant that holds a marker object.
///
/// Exits toward neighbors inside the id window are checked for the marker
/// object; a match decorates the exit label and always routes a guide line to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrueTombRule {
    first: LevelId,
    last: LevelId,
    marker_object: u32,
}

impl TrueTombRule {
    /// Creates a rule covering the inclusive neighbor id window.
    #[must_use]
    pub const fn new(first: LevelId, last: LevelId, marker_object: u32) -> Self {
        Self {
            first,
            last,
            marker_object,
        }
    }

    /// Reports whether the neighbor id falls inside the rule's window.
    #[must_use]
    pub const fn applies_to(&self, level: LevelId) -> bool {
        level.get() >= self.first.get() && level.get() <= self.last.get()
    }

    /// Reports whether the neighbor level holds the marker object.
    #[must_use]
    pub fn is_marked(&self, neighbor: &Level) -> bool {
        neighbor.has_object(self.marker_object)
    }

    /// Decorates an exit label that satisfies the rule.
    #[must_use]
    pub fn decorate(&self, name: &str) -> String {
        format!(">>> {name} <<<")
    }
}

/// Tomb entrances `66..=72`; the real one contains object `152`.
pub const TRUE_TOMB_RULE: TrueTombRule = TrueTombRule::new(LevelId::new(66), LevelId::new(72), 152);

/// Cached render content derived from one level.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LevelView {
    /// Cropped walkability bitmap.
    pub texture: MapTexture,
    /// Point-of-interest markers in centered coordinates.
    pub markers: Vec<ColoredQuad>,
    /// Labeled points of interest.
    pub labels: Vec<LabeledPoint>,
    /// Positions that receive routing lines from the player.
    pub guides: Vec<GuideAnchor>,
}

/// Builds the view of `level`.
///
/// `neighbors` resolves adjacent levels for the true-tomb rule and `measure`
/// precomputes label widths. Missing reference entries skip their points,
/// missing strings produce empty labels, and a zero-area crop produces an
/// empty view. The result depends only on the inputs.
pub fn build<N, M>(
    level: &Level,
    reference: &ReferenceData,
    guide_targets: Option<&HashSet<GuideKey>>,
    config: &Config,
    mut neighbors: N,
    measure: &M,
) -> LevelView
where
    N: FnMut(LevelId) -> Option<Arc<Level>>,
    M: TextMeasure + ?Sized,
{
    let texture = crop_texture(level, config.colors.walkable);
    if level.crop().is_empty() {
        return LevelView {
            texture,
            ..LevelView::default()
        };
    }

    let is_guide = |key: GuideKey| guide_targets.is_some_and(|targets| targets.contains(&key));
    let mut layout = Layout {
        level,
        config,
        measure,
        view: LevelView {
            texture,
            ..LevelView::default()
        },
    };

    for (&id, adjacent) in level.adjacent_levels() {
        let Some(info) = reference.level(id) else {
            continue;
        };
        let Some(&exit) = adjacent.exits.first() else {
            continue;
        };

        let mut name = reference.localized(&info.name, config.language).to_owned();
        let mut guided = is_guide(GuideKey::Level(id));
        if TRUE_TOMB_RULE.applies_to(id)
            && neighbors(id).is_some_and(|neighbor| TRUE_TOMB_RULE.is_marked(&neighbor))
        {
            name = TRUE_TOMB_RULE.decorate(&name);
            guided = true;
        }
        layout.push(exit, PoiCategory::Portal, name, guided);
    }

    for table in [ObjectTable::Objects, ObjectTable::Npcs] {
        for (&id, points) in level.points(table) {
            let Some(info) = reference.object(table, id) else {
                continue;
            };
            let Some(category) = info.kind.category() else {
                continue;
            };

            let name = reference.localized(&info.name, config.language);
            let guided = is_guide(table.guide_key(id));
            for &point in points {
                layout.push(point, category, name.to_owned(), guided);
            }
        }
    }

    let view = layout.view;
    debug!(
        "built level view: {}x{} texture, {} labels, {} guides",
        view.texture.width(),
        view.texture.height(),
        view.labels.len(),
        view.guides.len()
    );
    view
}

/// Extracts the crop of the walkability grid as a packed RGBA bitmap.
///
/// Blocked cells (low bit set) become transparent; every other cell takes the
/// walkable color.
#[must_use]
pub fn crop_texture(level: &Level, walkable: Color) -> MapTexture {
    let crop = level.crop();
    let stride = level.total_width() as usize;
    let walkable = walkable.to_packed();
    let blocked = Color::TRANSPARENT.to_packed();

    let mut pixels = Vec::with_capacity(crop.width() as usize * crop.height() as usize);
    for y in crop.y0..crop.y1 {
        let start = y as usize * stride + crop.x0 as usize;
        let end = y as usize * stride + crop.x1 as usize;
        let row = level.grid().get(start..end).unwrap_or(&[]);
        pixels.extend(
            row.iter()
                .map(|&cell| if cell & 1 == 1 { blocked } else { walkable }),
        );
    }

    MapTexture::new(crop.width(), crop.height(), pixels).unwrap_or_default()
}

struct Layout<'a, M: ?Sized> {
    level: &'a Level,
    config: &'a Config,
    measure: &'a M,
    view: LevelView,
}

impl<M: TextMeasure + ?Sized> Layout<'_, M> {
    fn push(&mut self, point: WorldPoint, category: PoiCategory, text: String, guided: bool) {
        let position: Vec2 = self.level.to_centered(point);
        let color = self.config.colors.color_for(category);
        self.view.markers.push(ColoredQuad::new(
            Quad::square(position, MARKER_HALF_EXTENT),
            color,
        ));

        let half_width = self.measure.string_width(&text, self.config.font_size) * 0.5;
        self.view.labels.push(LabeledPoint {
            position,
            text,
            half_width,
            category,
        });

        if guided {
            self.view.guides.push(GuideAnchor::new(position));
        }
    }
}
