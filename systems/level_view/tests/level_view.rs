use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use approx::assert_relative_eq;
use glam::Vec2;
use minimap_core::{
    AdjacentLevel, Color, Config, CropRect, GuideKey, Language, Level, LevelData, LevelId,
    LocalizedText, ObjectInfo, ObjectKind, PoiCategory, ReferenceData, ReferenceLevel,
    WorldPoint,
};
use minimap_rendering::{MonospaceMeasure, Quad};
use minimap_system_level_view::{build, LevelView, MARKER_HALF_EXTENT};

const WAYPOINT: u32 = 119;
const CHEST: u32 = 5;
const TORCH: u32 = 12;
const QUEST_NPC: u32 = 250;
const UNKNOWN: u32 = 999;

fn open_level(width: u32, height: u32) -> LevelData {
    LevelData {
        crop: CropRect::new(0, 0, width, height),
        total_width: width,
        grid: vec![0; (width * height) as usize],
        ..LevelData::default()
    }
}

fn text(english: &str) -> LocalizedText {
    LocalizedText::new([(Language::EnUs, english.to_owned())])
}

fn reference() -> ReferenceData {
    let mut reference = ReferenceData::default();
    let _ = reference.objects.insert(
        WAYPOINT,
        ObjectInfo {
            kind: ObjectKind::Waypoint,
            name: "Waypoint".to_owned(),
        },
    );
    let _ = reference.objects.insert(
        CHEST,
        ObjectInfo {
            kind: ObjectKind::Chest,
            name: "NoSuchString".to_owned(),
        },
    );
    let _ = reference.objects.insert(
        TORCH,
        ObjectInfo {
            kind: ObjectKind::Other,
            name: "Torch".to_owned(),
        },
    );
    let _ = reference.npcs.insert(
        QUEST_NPC,
        ObjectInfo {
            kind: ObjectKind::Quest,
            name: "Corpsefire".to_owned(),
        },
    );
    for (id, name) in [(3, "ColdPlains"), (66, "TalTomb1"), (67, "TalTomb2")] {
        let _ = reference.levels.insert(
            LevelId::new(id),
            ReferenceLevel {
                name: name.to_owned(),
            },
        );
    }
    for (key, english) in [
        ("Waypoint", "Waypoint"),
        ("Torch", "Torch"),
        ("Corpsefire", "Corpsefire"),
        ("ColdPlains", "Cold Plains"),
        ("TalTomb1", "Tal Rasha's Tomb"),
        ("TalTomb2", "Tal Rasha's Tomb"),
    ] {
        let _ = reference.strings.insert(key.to_owned(), text(english));
    }
    reference
}

fn build_view(
    level: &Level,
    reference: &ReferenceData,
    guides: Option<&HashSet<GuideKey>>,
    neighbors: &HashMap<LevelId, Arc<Level>>,
) -> LevelView {
    build(
        level,
        reference,
        guides,
        &Config::default(),
        |id| neighbors.get(&id).cloned(),
        &MonospaceMeasure::default(),
    )
}

#[test]
fn waypoint_lands_at_centered_crop_position() {
    let mut data = open_level(100, 50);
    let _ = data.objects.insert(WAYPOINT, vec![WorldPoint::new(10, 5)]);
    let level = Level::new(data).expect("valid level");

    let view = build_view(&level, &reference(), None, &HashMap::new());

    assert_eq!(view.labels.len(), 1);
    let label = &view.labels[0];
    assert_eq!(label.position, Vec2::new(-40.0, -20.0));
    assert_eq!(label.category, PoiCategory::Waypoint);
    assert_eq!(label.text, "Waypoint");
    assert!(view.guides.is_empty());
    assert_eq!(
        view.markers[0].quad,
        Quad::square(Vec2::new(-40.0, -20.0), MARKER_HALF_EXTENT)
    );
    assert_eq!(
        view.markers[0].color,
        Config::default().colors.waypoint
    );
}

#[test]
fn blocked_cells_are_transparent_regardless_of_crop_offset() {
    let width = 9;
    let height = 7;
    let mut data = open_level(width, height);
    for (index, cell) in data.grid.iter_mut().enumerate() {
        *cell = (index as u16 * 7) % 5;
    }
    data.crop = CropRect::new(2, 3, 8, 7);
    data.origin = WorldPoint::new(-300, 1200);
    let level = Level::new(data).expect("valid level");
    let config = Config::default();
    let walkable = config.colors.walkable.to_packed();

    let view = build_view(&level, &reference(), None, &HashMap::new());

    assert_eq!(view.texture.width(), 6);
    assert_eq!(view.texture.height(), 4);
    for y in 0..view.texture.height() {
        for x in 0..view.texture.width() {
            let cell = level.cell(x + 2, y + 3).expect("cell inside grid");
            let pixel = view.texture.pixel(x, y).expect("pixel inside texture");
            if cell & 1 == 1 {
                assert_eq!(pixel, Color::TRANSPARENT.to_packed(), "cell ({x}, {y})");
            } else {
                assert_eq!(pixel, walkable, "cell ({x}, {y})");
            }
        }
    }
}

#[test]
fn points_are_offset_by_origin_and_crop() {
    let mut data = open_level(64, 64);
    data.origin = WorldPoint::new(5000, 7000);
    data.crop = CropRect::new(10, 20, 50, 40);
    let _ = data
        .npcs
        .insert(QUEST_NPC, vec![WorldPoint::new(5000 + 30, 7000 + 30)]);
    let level = Level::new(data).expect("valid level");

    let view = build_view(&level, &reference(), None, &HashMap::new());

    assert_eq!(view.labels.len(), 1);
    assert_eq!(view.labels[0].position, Vec2::new(0.0, 0.0));
    assert_eq!(view.labels[0].category, PoiCategory::Quest);
}

#[test]
fn unknown_and_non_rendered_entries_are_skipped() {
    let mut data = open_level(20, 20);
    let _ = data.objects.insert(UNKNOWN, vec![WorldPoint::new(1, 1)]);
    let _ = data.objects.insert(TORCH, vec![WorldPoint::new(2, 2)]);
    let _ = data.npcs.insert(WAYPOINT, vec![WorldPoint::new(3, 3)]);
    let level = Level::new(data).expect("valid level");

    let view = build_view(&level, &reference(), None, &HashMap::new());

    assert!(view.labels.is_empty(), "no renderable entries exist");
    assert!(view.markers.is_empty());
}

#[test]
fn missing_string_keeps_marker_with_empty_label() {
    let mut data = open_level(20, 20);
    let _ = data.objects.insert(CHEST, vec![WorldPoint::new(4, 4)]);
    let level = Level::new(data).expect("valid level");

    let view = build_view(&level, &reference(), None, &HashMap::new());

    assert_eq!(view.markers.len(), 1, "marker is still drawn");
    assert_eq!(view.labels.len(), 1);
    assert!(view.labels[0].text.is_empty());
    assert_relative_eq!(view.labels[0].half_width, 0.0);
}

#[test]
fn every_occurrence_gets_a_label() {
    let mut data = open_level(20, 20);
    let _ = data.objects.insert(
        WAYPOINT,
        vec![
            WorldPoint::new(1, 1),
            WorldPoint::new(2, 2),
            WorldPoint::new(3, 3),
        ],
    );
    let level = Level::new(data).expect("valid level");

    let view = build_view(&level, &reference(), None, &HashMap::new());

    assert_eq!(view.labels.len(), 3);
    assert_eq!(view.markers.len(), 3);
}

#[test]
fn label_half_width_uses_configured_font_size() {
    let mut data = open_level(20, 20);
    let _ = data.objects.insert(WAYPOINT, vec![WorldPoint::new(1, 1)]);
    let level = Level::new(data).expect("valid level");

    let view = build_view(&level, &reference(), None, &HashMap::new());

    let expected = "Waypoint".len() as f32 * Config::default().font_size * 0.5 * 0.5;
    assert_relative_eq!(view.labels[0].half_width, expected);
}

#[test]
fn guide_keys_are_scoped_by_collection() {
    let mut data = open_level(20, 20);
    let _ = data.objects.insert(WAYPOINT, vec![WorldPoint::new(10, 10)]);
    let _ = data.npcs.insert(QUEST_NPC, vec![WorldPoint::new(12, 10)]);
    let level = Level::new(data).expect("valid level");
    let guides: HashSet<GuideKey> = [GuideKey::Npc(WAYPOINT), GuideKey::Npc(QUEST_NPC)]
        .into_iter()
        .collect();

    let view = build_view(&level, &reference(), Some(&guides), &HashMap::new());

    assert_eq!(view.guides.len(), 1, "only the npc key matches");
    assert_eq!(view.guides[0].position, Vec2::new(2.0, 0.0));
}

#[test]
fn exits_use_first_point_of_known_neighbors() {
    let mut data = open_level(40, 40);
    let _ = data.adjacent_levels.insert(
        LevelId::new(3),
        AdjacentLevel {
            exits: vec![WorldPoint::new(30, 20), WorldPoint::new(0, 0)],
        },
    );
    let _ = data
        .adjacent_levels
        .insert(LevelId::new(4), AdjacentLevel { exits: vec![WorldPoint::new(5, 5)] });
    let _ = data
        .adjacent_levels
        .insert(LevelId::new(67), AdjacentLevel { exits: Vec::new() });
    let level = Level::new(data).expect("valid level");
    let guides: HashSet<GuideKey> = [GuideKey::Level(LevelId::new(3))].into_iter().collect();

    let view = build_view(&level, &reference(), Some(&guides), &HashMap::new());

    assert_eq!(view.labels.len(), 1, "unknown and exit-less neighbors are skipped");
    assert_eq!(view.labels[0].text, "Cold Plains");
    assert_eq!(view.labels[0].category, PoiCategory::Portal);
    assert_eq!(view.labels[0].position, Vec2::new(10.0, 0.0));
    assert_eq!(view.guides.len(), 1);
    assert_eq!(view.guides[0].position, Vec2::new(10.0, 0.0));
    assert_eq!(view.markers[0].color, Config::default().colors.portal);
}

#[test]
fn true_tomb_exit_is_decorated_and_guided() {
    let mut data = open_level(40, 40);
    let _ = data
        .adjacent_levels
        .insert(LevelId::new(66), AdjacentLevel { exits: vec![WorldPoint::new(10, 10)] });
    let _ = data
        .adjacent_levels
        .insert(LevelId::new(67), AdjacentLevel { exits: vec![WorldPoint::new(30, 30)] });
    let level = Level::new(data).expect("valid level");

    let mut true_tomb = open_level(8, 8);
    let _ = true_tomb.objects.insert(152, vec![WorldPoint::new(4, 4)]);
    let mut neighbors = HashMap::new();
    let _ = neighbors.insert(
        LevelId::new(66),
        Arc::new(Level::new(true_tomb).expect("valid level")),
    );
    let _ = neighbors.insert(
        LevelId::new(67),
        Arc::new(Level::new(open_level(8, 8)).expect("valid level")),
    );

    let view = build_view(&level, &reference(), None, &neighbors);

    assert_eq!(view.labels.len(), 2);
    assert_eq!(view.labels[0].text, ">>> Tal Rasha's Tomb <<<");
    assert_eq!(view.labels[1].text, "Tal Rasha's Tomb");
    assert_eq!(
        view.guides.len(),
        1,
        "the marked tomb is guided without any curated target"
    );
    assert_eq!(view.guides[0].position, Vec2::new(-10.0, -10.0));
}

#[test]
fn true_tomb_in_guide_set_receives_a_single_anchor() {
    let mut data = open_level(40, 40);
    let _ = data
        .adjacent_levels
        .insert(LevelId::new(66), AdjacentLevel { exits: vec![WorldPoint::new(10, 10)] });
    let level = Level::new(data).expect("valid level");
    let mut true_tomb = open_level(8, 8);
    let _ = true_tomb.objects.insert(152, vec![WorldPoint::new(4, 4)]);
    let mut neighbors = HashMap::new();
    let _ = neighbors.insert(
        LevelId::new(66),
        Arc::new(Level::new(true_tomb).expect("valid level")),
    );
    let guides: HashSet<GuideKey> = [GuideKey::Level(LevelId::new(66))].into_iter().collect();

    let view = build_view(&level, &reference(), Some(&guides), &neighbors);

    assert_eq!(view.guides.len(), 1);
}

#[test]
fn zero_area_crop_builds_an_empty_view() {
    let mut data = open_level(10, 10);
    data.crop = CropRect::new(4, 2, 4, 9);
    let _ = data.objects.insert(WAYPOINT, vec![WorldPoint::new(4, 4)]);
    let level = Level::new(data).expect("degenerate crop is valid");

    let view = build_view(&level, &reference(), None, &HashMap::new());

    assert!(view.texture.is_empty());
    assert!(view.labels.is_empty());
    assert!(view.markers.is_empty());
    assert!(view.guides.is_empty());
}

#[test]
fn configured_language_selects_label_text() {
    let mut reference = reference();
    let _ = reference.strings.insert(
        "Waypoint".to_owned(),
        LocalizedText::new([
            (Language::EnUs, "Waypoint".to_owned()),
            (Language::DeDe, "Wegpunkt".to_owned()),
        ]),
    );
    let mut data = open_level(20, 20);
    let _ = data.objects.insert(WAYPOINT, vec![WorldPoint::new(1, 1)]);
    let level = Level::new(data).expect("valid level");
    let config = Config {
        language: Language::DeDe,
        ..Config::default()
    };

    let view = build(
        &level,
        &reference,
        None,
        &config,
        |_| None,
        &MonospaceMeasure::default(),
    );

    assert_eq!(view.labels[0].text, "Wegpunkt");
}

#[test]
fn building_twice_yields_identical_views() {
    let mut data = open_level(40, 30);
    data.grid[17] = 1;
    data.crop = CropRect::new(3, 2, 37, 28);
    let _ = data
        .objects
        .insert(WAYPOINT, vec![WorldPoint::new(7, 9), WorldPoint::new(20, 20)]);
    let _ = data.npcs.insert(QUEST_NPC, vec![WorldPoint::new(11, 4)]);
    let _ = data
        .adjacent_levels
        .insert(LevelId::new(3), AdjacentLevel { exits: vec![WorldPoint::new(35, 27)] });
    let level = Level::new(data).expect("valid level");
    let reference = reference();
    let guides: HashSet<GuideKey> = [GuideKey::Object(WAYPOINT), GuideKey::Level(LevelId::new(3))]
        .into_iter()
        .collect();

    let first = build_view(&level, &reference, Some(&guides), &HashMap::new());
    let second = build_view(&level, &reference, Some(&guides), &HashMap::new());

    assert_eq!(first, second);
    assert_eq!(first.guides.len(), 3);
}
