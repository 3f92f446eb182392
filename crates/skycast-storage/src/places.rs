//! Favorites and recent searches.
//!
//! Both are bounded, name-unique lists of [`Place`] stored as JSON arrays,
//! most recent first. They differ only in what happens when a name is
//! already present.

use std::sync::Arc;

use skycast_weather::Place;

use crate::error::StorageError;
use crate::kv::KeyValueStore;

/// Name-only favorites written by older releases
pub const LEGACY_FAVORITES_KEY: &str = "favoriteCitiesV1";

/// How `add` treats a name that is already in the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPolicy {
    /// Leave the list untouched
    DedupNoMove,
    /// Move the entry to the front
    DedupPromoteToFront,
}

/// Storage key, capacity and insertion policy of one list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceList {
    pub key: &'static str,
    pub capacity: usize,
    pub policy: InsertPolicy,
}

pub const FAVORITES: PlaceList = PlaceList {
    key: "favoriteCitiesV2",
    capacity: 8,
    policy: InsertPolicy::DedupNoMove,
};

pub const RECENTS: PlaceList = PlaceList {
    key: "recentCitiesV1",
    capacity: 6,
    policy: InsertPolicy::DedupPromoteToFront,
};

/// Insert `place` into `list` under `policy`, keeping at most `capacity` entries.
pub fn insert_place(
    mut list: Vec<Place>,
    place: &Place,
    capacity: usize,
    policy: InsertPolicy,
) -> Vec<Place> {
    let existing = list.iter().position(|p| p.name == place.name);

    match (policy, existing) {
        (InsertPolicy::DedupNoMove, Some(_)) => {}
        (InsertPolicy::DedupPromoteToFront, Some(idx)) => {
            list.remove(idx);
            list.insert(0, place.clone());
        }
        (_, None) => list.insert(0, place.clone()),
    }

    list.truncate(capacity);
    list
}

/// What `migrate_legacy` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// A previous run already handled the legacy data
    AlreadyDone,
    /// No legacy data to import
    NothingToMigrate,
    /// The current list was non-empty and was left alone
    KeptExisting,
    /// This many legacy names were imported
    Migrated(usize),
}

type ChangeListener = Box<dyn Fn(&str, &[Place]) + Send + Sync>;

/// Reads and writes place lists in a [`KeyValueStore`].
///
/// Every mutation persists the whole list, then notifies the change
/// listener if one is set.
pub struct PlaceStore {
    kv: Arc<dyn KeyValueStore>,
    listener: Option<ChangeListener>,
}

impl PlaceStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv, listener: None }
    }

    /// Call `listener(key, list)` after each persisted change
    pub fn with_listener(
        mut self,
        listener: impl Fn(&str, &[Place]) + Send + Sync + 'static,
    ) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    /// The list stored under `key`; empty when absent, unreadable or malformed.
    ///
    /// Reading the favorites key imports legacy favorites first.
    pub fn load(&self, key: &str) -> Vec<Place> {
        if key == FAVORITES.key {
            if let Err(e) =
                self.migrate_legacy(FAVORITES.key, LEGACY_FAVORITES_KEY, FAVORITES.capacity)
            {
                tracing::warn!("Legacy favorites migration failed: {}", e);
            }
        }
        self.read(key)
    }

    fn read(&self, key: &str) -> Vec<Place> {
        let raw = match self.kv.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", key, e);
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed {}: {}", key, e);
            Vec::new()
        })
    }

    /// Add `place` under `policy`. Places without a name are ignored.
    pub fn add(
        &self,
        key: &str,
        place: &Place,
        capacity: usize,
        policy: InsertPolicy,
    ) -> Result<Vec<Place>, StorageError> {
        let mut list = self.load(key);
        if place.name.is_empty() {
            list.truncate(capacity);
            return Ok(list);
        }

        if policy == InsertPolicy::DedupNoMove && list.iter().any(|p| p.name == place.name) {
            tracing::debug!("{} already in {}", place.name, key);
            list.truncate(capacity);
            return Ok(list);
        }

        let next = insert_place(list, place, capacity, policy);
        self.persist(key, &next)?;
        Ok(next)
    }

    /// Drop every entry named `name`
    pub fn remove(&self, key: &str, name: &str) -> Result<Vec<Place>, StorageError> {
        let next: Vec<Place> = self
            .load(key)
            .into_iter()
            .filter(|p| p.name != name)
            .collect();
        self.persist(key, &next)?;
        Ok(next)
    }

    pub fn clear(&self, key: &str) -> Result<(), StorageError> {
        // Settle legacy data first so an empty list never re-imports it
        if key == FAVORITES.key {
            self.migrate_legacy(FAVORITES.key, LEGACY_FAVORITES_KEY, FAVORITES.capacity)?;
        }
        self.persist(key, &[])
    }

    /// Import name-only entries from `legacy_key` into `key`, at most once.
    ///
    /// Runs only while `key` is empty; a non-empty current list is never
    /// overwritten. A marker key records that the legacy data was handled,
    /// so clearing the list later does not bring the old names back.
    pub fn migrate_legacy(
        &self,
        key: &str,
        legacy_key: &str,
        capacity: usize,
    ) -> Result<MigrationOutcome, StorageError> {
        let marker = format!("{}.migrated", legacy_key);
        if self.kv.get(&marker)?.is_some() {
            return Ok(MigrationOutcome::AlreadyDone);
        }

        let legacy: Vec<String> = match self.kv.get(legacy_key)? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed {}: {}", legacy_key, e);
                Vec::new()
            }),
            None => Vec::new(),
        };
        if legacy.is_empty() {
            return Ok(MigrationOutcome::NothingToMigrate);
        }

        if !self.read(key).is_empty() {
            self.kv.set(&marker, "1")?;
            tracing::info!("Kept existing {}; legacy {} not imported", key, legacy_key);
            return Ok(MigrationOutcome::KeptExisting);
        }

        let mut migrated: Vec<Place> = Vec::new();
        for name in legacy.into_iter().filter(|n| !n.is_empty()) {
            if !migrated.iter().any(|p| p.name == name) {
                migrated.push(Place::named(name));
            }
        }
        migrated.truncate(capacity);

        self.persist(key, &migrated)?;
        self.kv.set(&marker, "1")?;

        tracing::info!("Migrated {} legacy favorites", migrated.len());
        Ok(MigrationOutcome::Migrated(migrated.len()))
    }

    pub fn load_list(&self, list: &PlaceList) -> Vec<Place> {
        self.load(list.key)
    }

    pub fn add_to(&self, list: &PlaceList, place: &Place) -> Result<Vec<Place>, StorageError> {
        self.add(list.key, place, list.capacity, list.policy)
    }

    /// Favorites, importing legacy entries first if they were never migrated.
    pub fn favorites(&self) -> Vec<Place> {
        self.load(FAVORITES.key)
    }

    fn persist(&self, key: &str, list: &[Place]) -> Result<(), StorageError> {
        let json = serde_json::to_string(list)?;
        self.kv.set(key, &json)?;

        if let Some(listener) = &self.listener {
            listener(key, list);
        }
        Ok(())
    }
}
