//! Local persistence for SkyCast: a flat key-value table holding favorites,
//! recents and preferences.

pub mod error;
pub mod kv;
pub mod places;
pub mod preferences;

pub use error::StorageError;
pub use kv::{KeyValueStore, MemoryKvStore, SqliteKvStore};
pub use places::{
    insert_place, InsertPolicy, PlaceList, MigrationOutcome, PlaceStore, FAVORITES,
    LEGACY_FAVORITES_KEY, RECENTS,
};
pub use preferences::{Preferences, Theme};
