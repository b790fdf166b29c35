use log::warn;
use std::path::PathBuf;

/// Where the key-value documents live
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StorageBackend {
    /// Single SQLite database file
    Sqlite,
    /// One JSON file per document inside a directory
    Files,
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub path: PathBuf,
    /// Upper bound on stored bytes across all documents
    pub capacity_bytes: usize,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            path: PathBuf::from("game_zone.db"),
            capacity_bytes: 5 * 1024 * 1024,
        }
    }
}

impl StorageSettings {
    /// Default location for a backend when no path was given
    pub fn default_path(backend: StorageBackend) -> PathBuf {
        match backend {
            StorageBackend::Sqlite => PathBuf::from("game_zone.db"),
            StorageBackend::Files => PathBuf::from("game_zone_data"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub storage: StorageSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `GAME_ZONE_STORAGE`, `GAME_ZONE_PATH` and
    /// `GAME_ZONE_CAPACITY`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new();

        if let Some(raw) = lookup("GAME_ZONE_STORAGE") {
            match <StorageBackend as clap::ValueEnum>::from_str(&raw, true) {
                Ok(backend) => config.with_backend(backend),
                Err(_) => warn!("Ignoring unknown GAME_ZONE_STORAGE value: {}", raw),
            }
        }

        if let Some(path) = lookup("GAME_ZONE_PATH") {
            config.storage.path = PathBuf::from(path);
        }

        if let Some(raw) = lookup("GAME_ZONE_CAPACITY") {
            match raw.parse() {
                Ok(capacity) => config.storage.capacity_bytes = capacity,
                Err(_) => warn!("Ignoring invalid GAME_ZONE_CAPACITY value: {}", raw),
            }
        }

        config
    }

    /// Switch backend, moving the path to that backend's default
    pub fn with_backend(&mut self, backend: StorageBackend) {
        self.storage.backend = backend;
        self.storage.path = StorageSettings::default_path(backend);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[]));

        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.storage.path, PathBuf::from("game_zone.db"));
        assert_eq!(config.storage.capacity_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn test_environment_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("GAME_ZONE_STORAGE", "files"),
            ("GAME_ZONE_CAPACITY", "2048"),
        ]));

        assert_eq!(config.storage.backend, StorageBackend::Files);
        assert_eq!(config.storage.path, PathBuf::from("game_zone_data"));
        assert_eq!(config.storage.capacity_bytes, 2048);
    }

    #[test]
    fn test_explicit_path_wins_over_backend_default() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("GAME_ZONE_STORAGE", "FILES"),
            ("GAME_ZONE_PATH", "/tmp/zone"),
        ]));

        assert_eq!(config.storage.path, PathBuf::from("/tmp/zone"));
    }

    #[test]
    fn test_invalid_values_are_ignored() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("GAME_ZONE_STORAGE", "floppy"),
            ("GAME_ZONE_CAPACITY", "lots"),
        ]));

        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.storage.capacity_bytes, 5 * 1024 * 1024);
    }
}
