use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::cache_context;

/// File-based memoization of whole crawl passes
pub struct Cache {
    cache_dir: PathBuf,
}

impl Cache {
    /// Create a new cache instance
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Result<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();
        fs::create_dir_all(&cache_dir).context("Failed to create cache directory")?;
        Ok(Self { cache_dir })
    }

    /// Key of a pass for one crawl mode, e.g. `player_pass_full`
    pub fn pass_key(pass: &str, mode: &str) -> String {
        format!("{}_pass_{}", pass, mode)
    }

    pub fn save_pass<T: Serialize>(&self, key: &str, data: &T) -> Result<()> {
        let file_path = self.build_path(key);
        let json = serde_json::to_string(data).with_context(|| cache_context("serialize", key))?;
        fs::write(&file_path, json).with_context(|| cache_context("write", key))?;

        info!("Saved pass to cache: {}", file_path.display());
        Ok(())
    }

    /// Load a memoized pass; `None` when absent or unreadable
    pub fn load_pass<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let file_path = self.build_path(key);
        if !file_path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&file_path).with_context(|| cache_context("read", key))?;
        match serde_json::from_str(&json) {
            Ok(data) => {
                info!("Loaded pass from cache: {}", file_path.display());
                Ok(Some(data))
            }
            Err(e) => {
                warn!("Ignoring unreadable cache entry {}: {}", file_path.display(), e);
                Ok(None)
            }
        }
    }

    fn build_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Snapshot {
        matches: usize,
        players: Vec<i64>,
    }

    fn temp_cache(name: &str) -> (PathBuf, Cache) {
        let dir = std::env::temp_dir().join(format!("location_outcomes_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        let cache = Cache::new(&dir).unwrap();
        (dir, cache)
    }

    #[test]
    fn pass_survives_save_and_load() {
        let (dir, cache) = temp_cache("roundtrip");
        let key = Cache::pass_key("match", "sample");
        assert_eq!(key, "match_pass_sample");
        assert_eq!(cache.load_pass::<Snapshot>(&key).unwrap(), None);

        let snapshot = Snapshot { matches: 3, players: vec![1, 2] };
        cache.save_pass(&key, &snapshot).unwrap();

        assert!(dir.join("match_pass_sample.json").exists());
        assert_eq!(cache.load_pass::<Snapshot>(&key).unwrap(), Some(snapshot));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn corrupt_entry_is_treated_as_missing() {
        let (dir, cache) = temp_cache("corrupt");
        fs::write(dir.join("player_pass_full.json"), "{not json").unwrap();

        assert_eq!(cache.load_pass::<Snapshot>("player_pass_full").unwrap(), None);
        fs::remove_dir_all(dir).unwrap();
    }
}
