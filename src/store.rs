//! Durable documents: the per-user config file, an optional project-local
//! override file, and the favorites list.
//!
//! Malformed persisted data is never fatal: a document that fails to parse
//! reads as empty and is overwritten wholesale on the next save.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::model::{FavoriteProjectRecord, GitlabCliConfig};

const CONFIG_FILE: &str = "config.json";
const FAVORITES_FILE: &str = "favorites.json";
const LOCAL_CONFIG_FILE: &str = ".mrq.json";

#[derive(Clone)]
pub struct ConfigStore {
    global_dir: PathBuf,
    local_path: PathBuf,
}

impl ConfigStore {
    /// Per-user directory under `$XDG_CONFIG_HOME` (or `~/.config`), local
    /// override file in the current directory.
    pub fn open() -> Result<Self> {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .filter(|p| !p.as_os_str().is_empty())
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .context("cannot determine config directory (set XDG_CONFIG_HOME or HOME)")?;
        let cwd = std::env::current_dir().context("get current dir")?;
        Ok(Self::at(base.join("mrq"), cwd.join(LOCAL_CONFIG_FILE)))
    }

    pub fn at(global_dir: PathBuf, local_path: PathBuf) -> Self {
        Self {
            global_dir,
            local_path,
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.global_dir.join(CONFIG_FILE)
    }

    fn favorites_path(&self) -> PathBuf {
        self.global_dir.join(FAVORITES_FILE)
    }

    /// The merged view commands resolve against: global document with the
    /// local file's fields overlaid on top.
    pub fn read_config(&self) -> GitlabCliConfig {
        let global = read_config_doc(&self.config_path());
        let local = read_config_doc(&self.local_path);
        global.merged_with(local)
    }

    /// The global document alone, for read-modify-write mutations. The
    /// local overlay is never baked into what gets written back.
    pub fn read_global_config(&self) -> GitlabCliConfig {
        read_config_doc(&self.config_path())
    }

    /// Apply a mutation to the global document and persist it. Reading the
    /// full typed document first keeps profile entries for other names
    /// intact.
    pub fn update_config(&self, mutate: impl FnOnce(&mut GitlabCliConfig)) -> Result<()> {
        let mut cfg = self.read_global_config();
        mutate(&mut cfg);
        let bytes = serde_json::to_vec_pretty(&cfg).context("serialize config")?;
        write_atomic(&self.config_path(), &bytes).context("write config.json")?;
        Ok(())
    }

    /// Favorites list. Malformed entries are dropped; a malformed top-level
    /// value reads as empty.
    pub fn read_favorites(&self) -> Vec<FavoriteProjectRecord> {
        let Ok(bytes) = fs::read(self.favorites_path()) else {
            return Vec::new();
        };
        let Ok(serde_json::Value::Array(items)) = serde_json::from_slice(&bytes) else {
            return Vec::new();
        };
        items
            .into_iter()
            .filter_map(|v| serde_json::from_value::<FavoriteProjectRecord>(v).ok())
            .filter(FavoriteProjectRecord::is_valid)
            .collect()
    }

    pub fn write_favorites(&self, favorites: &[FavoriteProjectRecord]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(favorites).context("serialize favorites")?;
        write_atomic(&self.favorites_path(), &bytes).context("write favorites.json")?;
        Ok(())
    }

    /// Flip favorite membership for one record. Load, filter the key out,
    /// re-add when it was absent, save; external edits are overwritten, not
    /// merged. Returns whether the project is a favorite afterwards.
    pub fn toggle_favorite(&self, record: &FavoriteProjectRecord) -> Result<bool> {
        let key = record.key();
        let before = self.read_favorites();
        let before_len = before.len();
        let mut after: Vec<FavoriteProjectRecord> =
            before.into_iter().filter(|f| f.key() != key).collect();
        // Nothing removed means it was not a favorite yet.
        let now_favorite = after.len() == before_len;
        if now_favorite {
            after.push(record.clone());
        }
        self.write_favorites(&after)?;
        Ok(now_favorite)
    }
}

fn read_config_doc(path: &Path) -> GitlabCliConfig {
    let Ok(bytes) = fs::read(path) else {
        return GitlabCliConfig::default();
    };
    serde_json::from_slice(&bytes).unwrap_or_default()
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create parent directories")?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    fs::write(&tmp, bytes).with_context(|| format!("write temp file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}
