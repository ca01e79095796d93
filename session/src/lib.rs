#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session-scoped cache of decoded levels.
//!
//! A session is identified by its `(seed, difficulty)` pair. Levels are decoded
//! lazily through a [`LevelSource`] the first time they are requested and stay
//! cached until the session identity changes, at which point every cached
//! level is dropped so stale data can never leak into the new session.

use std::{collections::HashMap, sync::Arc};

use log::{debug, info};
use minimap_core::{Level, LevelId, SessionId};

/// External decoder that produces levels for a session.
pub trait LevelSource {
    /// Decodes the level for the session, or returns `None` when the id is unknown.
    fn decode(&mut self, session: SessionId, level: LevelId) -> Option<Level>;
}

impl<F> LevelSource for F
where
    F: FnMut(SessionId, LevelId) -> Option<Level>,
{
    fn decode(&mut self, session: SessionId, level: LevelId) -> Option<Level> {
        self(session, level)
    }
}

/// Cache of levels decoded for the current session.
#[derive(Debug)]
pub struct SessionCache<S> {
    source: S,
    session: Option<SessionId>,
    levels: HashMap<LevelId, Arc<Level>>,
}

impl<S: LevelSource> SessionCache<S> {
    /// Creates an empty cache backed by the provided decoder.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            session: None,
            levels: HashMap::new(),
        }
    }

    /// Records the current session identity.
    ///
    /// Returns `true` when the identity differs from the previous call (the first
    /// call always reports a change), in which case every cached level is dropped.
    pub fn update(&mut self, seed: u32, difficulty: u8) -> bool {
        let session = SessionId::new(seed, difficulty);
        if self.session == Some(session) {
            return false;
        }

        info!(
            "session changed to seed {:#010x} difficulty {}, dropping {} cached levels",
            seed,
            difficulty,
            self.levels.len()
        );
        self.session = Some(session);
        self.levels.clear();
        true
    }

    /// Returns the level for the current session, decoding and caching it on first use.
    ///
    /// Unknown ids, and lookups made before any session was established, yield
    /// `None`. Misses are not cached so a later lookup may still succeed.
    pub fn level(&mut self, id: LevelId) -> Option<Arc<Level>> {
        let session = self.session?;
        if let Some(level) = self.levels.get(&id) {
            return Some(Arc::clone(level));
        }

        let level = Arc::new(self.source.decode(session, id)?);
        debug!("decoded level {} for seed {:#010x}", id.get(), session.seed());
        let _ = self.levels.insert(id, Arc::clone(&level));
        Some(level)
    }

    /// Current session identity, if one was established.
    #[must_use]
    pub const fn session(&self) -> Option<SessionId> {
        self.session
    }

    /// Decoder backing the cache.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Number of levels decoded for the current session.
    #[must_use]
    pub fn cached_levels(&self) -> usize {
        self.levels.len()
    }
}
