//! Static reference tables describing levels, objects, strings and guides.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{config::Language, LevelId};

/// Point-of-interest categories rendered on the minimap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoiCategory {
    /// Fast-travel waypoint.
    Waypoint,
    /// Portal or inter-level exit.
    Portal,
    /// Treasure chest.
    Chest,
    /// Quest-related object or npc.
    Quest,
    /// Shrine.
    Shrine,
    /// Well.
    Well,
}

/// Kind of an entry in the reference object tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Fast-travel waypoint.
    Waypoint,
    /// Quest-related object or npc.
    Quest,
    /// Portal.
    Portal,
    /// Treasure chest.
    Chest,
    /// Shrine.
    Shrine,
    /// Well.
    Well,
    /// Anything the minimap does not draw.
    #[serde(other)]
    Other,
}

impl ObjectKind {
    /// Category drawn for this kind, or `None` when the kind is not rendered.
    #[must_use]
    pub const fn category(self) -> Option<PoiCategory> {
        match self {
            Self::Waypoint => Some(PoiCategory::Waypoint),
            Self::Quest => Some(PoiCategory::Quest),
            Self::Portal => Some(PoiCategory::Portal),
            Self::Chest => Some(PoiCategory::Chest),
            Self::Shrine => Some(PoiCategory::Shrine),
            Self::Well => Some(PoiCategory::Well),
            Self::Other => None,
        }
    }
}

/// Selects one of the two point collections carried by a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectTable {
    /// Static world objects.
    Objects,
    /// Non-player characters.
    Npcs,
}

impl ObjectTable {
    /// Guide key identifying the entry within this collection.
    #[must_use]
    pub const fn guide_key(self, id: u32) -> GuideKey {
        match self {
            Self::Objects => GuideKey::Object(id),
            Self::Npcs => GuideKey::Npc(id),
        }
    }
}

/// Category-scoped identifier used as the element type of guide-target sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuideKey {
    /// Exit toward the neighbor level with this identifier.
    Level(LevelId),
    /// Object with this reference identifier.
    Object(u32),
    /// NPC with this reference identifier.
    Npc(u32),
}

/// Reference entry for a level.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceLevel {
    /// String-table key of the level name.
    pub name: String,
}

/// Reference entry for an object or npc.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    /// Kind of the entry.
    pub kind: ObjectKind,
    /// String-table key of the display name.
    pub name: String,
}

/// Localized variants of a single string-table entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(HashMap<Language, String>);

impl LocalizedText {
    /// Creates a localized entry from language/text pairs.
    #[must_use]
    pub fn new(entries: impl IntoIterator<Item = (Language, String)>) -> Self {
        Self(entries.into_iter().collect())
    }

    /// Text for the requested language, if the entry carries it.
    #[must_use]
    pub fn get(&self, language: Language) -> Option<&str> {
        self.0.get(&language).map(String::as_str)
    }
}

/// Static reference dataset consulted when building level views.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceData {
    /// Known levels keyed by identifier.
    pub levels: HashMap<LevelId, ReferenceLevel>,
    /// Object reference table.
    pub objects: HashMap<u32, ObjectInfo>,
    /// NPC reference table.
    pub npcs: HashMap<u32, ObjectInfo>,
    /// Localized string table.
    pub strings: HashMap<String, LocalizedText>,
    /// Curated guide targets per level.
    pub guides: HashMap<LevelId, HashSet<GuideKey>>,
}

impl ReferenceData {
    /// Reference entry for the level, if it is known.
    #[must_use]
    pub fn level(&self, id: LevelId) -> Option<&ReferenceLevel> {
        self.levels.get(&id)
    }

    /// Reference entry for an object or npc, if it is known.
    #[must_use]
    pub fn object(&self, table: ObjectTable, id: u32) -> Option<&ObjectInfo> {
        match table {
            ObjectTable::Objects => self.objects.get(&id),
            ObjectTable::Npcs => self.npcs.get(&id),
        }
    }

    /// Localized text for the string key; empty when the key or language is missing.
    #[must_use]
    pub fn localized(&self, key: &str, language: Language) -> &str {
        self.strings
            .get(key)
            .and_then(|text| text.get(language))
            .unwrap_or("")
    }

    /// Guide targets curated for the level, if any.
    #[must_use]
    pub fn guide_targets(&self, level: LevelId) -> Option<&HashSet<GuideKey>> {
        self.guides.get(&level)
    }
}
