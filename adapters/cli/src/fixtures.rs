//! File-backed stand-ins for the game process and the map decoder.

use std::{
    collections::{HashMap, VecDeque},
    fs,
    path::Path,
};

use anyhow::{Context, Result};
use log::debug;
use minimap_core::{
    Level, LevelId, ProcessSnapshot, ProcessSource, ReferenceData, SessionId, WindowRect,
};
use minimap_session::LevelSource;
use serde::{de::DeserializeOwned, Deserialize};

fn load_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {what} {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {what} {}", path.display()))
}

/// Loads the reference dataset.
pub(crate) fn load_reference(path: &Path) -> Result<ReferenceData> {
    load_json(path, "reference data")
}

/// Loads pre-decoded levels keyed by level id.
pub(crate) fn load_levels(path: &Path) -> Result<FixtureLevels> {
    load_json(path, "level fixtures").map(FixtureLevels::new)
}

/// Loads a scripted sequence of process frames.
pub(crate) fn load_script(path: &Path) -> Result<ScriptedProcess> {
    load_json::<Script>(path, "process script").map(ScriptedProcess::new)
}

/// Level decoder serving the same pre-decoded levels for every session.
#[derive(Debug, Default)]
pub(crate) struct FixtureLevels {
    levels: HashMap<LevelId, Level>,
    decodes: usize,
}

impl FixtureLevels {
    pub(crate) fn new(levels: HashMap<LevelId, Level>) -> Self {
        Self { levels, decodes: 0 }
    }

    /// Number of successful decode requests served so far.
    pub(crate) const fn decodes(&self) -> usize {
        self.decodes
    }
}

impl LevelSource for FixtureLevels {
    fn decode(&mut self, session: SessionId, level: LevelId) -> Option<Level> {
        let decoded = self.levels.get(&level).cloned();
        if decoded.is_some() {
            self.decodes += 1;
            debug!(
                "served level {} for seed {:#010x} difficulty {}",
                level.get(),
                session.seed(),
                session.difficulty()
            );
        }
        decoded
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Script {
    frames: Vec<ScriptFrame>,
}

#[derive(Debug, Deserialize)]
struct ScriptFrame {
    #[serde(default)]
    window: Option<WindowRect>,
    #[serde(default)]
    snapshot: ProcessSnapshot,
}

/// Process source replaying recorded frames in order.
#[derive(Debug)]
pub(crate) struct ScriptedProcess {
    frames: VecDeque<ScriptFrame>,
    window_change: Option<WindowRect>,
}

impl ScriptedProcess {
    fn new(script: Script) -> Self {
        Self {
            frames: script.frames.into(),
            window_change: None,
        }
    }
}

impl ProcessSource for ScriptedProcess {
    fn poll(&mut self) -> Option<ProcessSnapshot> {
        let frame = self.frames.pop_front()?;
        if frame.window.is_some() {
            self.window_change = frame.window;
        }
        Some(frame.snapshot)
    }

    fn take_window_change(&mut self) -> Option<WindowRect> {
        self.window_change.take()
    }
}
