//! Draft persistence
//!
//! One `autosave.json` per drafts directory, fully overwritten on every
//! state change. A missing or unreadable draft yields the default session.

use crate::error::Result;
use monitoring_report_common::snapshot::{decode_json, Snapshot};
use monitoring_report_common::ApplicationState;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

pub const DRAFT_FILE_NAME: &str = "autosave.json";

#[derive(Debug, Clone)]
pub struct DraftStore {
    dir: PathBuf,
}

impl DraftStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(DRAFT_FILE_NAME)
    }

    pub fn exists(&self) -> bool {
        self.path().exists()
    }

    /// `Ok(None)` when no draft has been saved yet
    pub fn load(&self) -> Result<Option<ApplicationState>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        let state = decode_json(&content)?;
        tracing::debug!(path = %path.display(), "draft restored");
        Ok(Some(state))
    }

    /// Restore the draft, falling back to defaults on absence or failure
    pub fn load_or_default(&self) -> ApplicationState {
        match self.load() {
            Ok(Some(state)) => state,
            Ok(None) => ApplicationState::default(),
            Err(e) => {
                tracing::warn!(path = %self.path().display(), error = %e, "draft unreadable, starting from defaults");
                ApplicationState::default()
            }
        }
    }

    /// Overwrite the draft (temp file + rename)
    pub fn save(&self, state: &ApplicationState) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path();
        let tmp_path = self.dir.join(format!("{}.tmp", DRAFT_FILE_NAME));

        let snapshot = Snapshot::encode(state);
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &snapshot)?;
            writer.flush()?;
        }
        std::fs::rename(&tmp_path, &path)?;

        tracing::debug!(path = %path.display(), "draft saved");
        Ok(path)
    }

    /// Delete the draft; `Ok(false)` if there was none
    pub fn clear(&self) -> Result<bool> {
        let path = self.path();
        if path.exists() {
            std::fs::remove_file(path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
