//! Project file handling.
//!
//! A project is a single JSON file holding the knowledge base. Loaded at the
//! start of a command, saved after every mutation.

use std::path::{Path, PathBuf};

use storyloom_core::KnowledgeBase;

pub struct Project {
    path: PathBuf,
    pub kb: KnowledgeBase,
}

impl Project {
    /// Load the project at `path`. Fails if the file does not exist; `init`
    /// creates it.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let path = PathBuf::from(path);
        if !path.exists() {
            return Err(format!(
                "No project file at {} — run `storyloom init` first",
                path.display()
            )
            .into());
        }
        let content = std::fs::read_to_string(&path)?;
        let kb = serde_json::from_str(&content)
            .map_err(|e| format!("Project file {} is corrupt: {e}", path.display()))?;
        Ok(Self { path, kb })
    }

    /// Create a fresh project file at `path`. Fails if one already exists.
    pub fn create(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let path = PathBuf::from(path);
        if path.exists() {
            return Err(format!("Project file {} already exists", path.display()).into());
        }
        let project = Self {
            path,
            kb: KnowledgeBase::new(),
        };
        project.save()?;
        Ok(project)
    }

    /// Write the knowledge base back to disk.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(&self.kb)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storyloom.json");
        let path_str = path.to_str().unwrap();

        let mut project = Project::create(path_str).unwrap();
        project.kb.push_summary("One", "The hero departs.", vec![]);
        project.save().unwrap();

        let restored = Project::load(path_str).unwrap();
        assert_eq!(restored.kb.chapter_summaries.len(), 1);
        assert_eq!(restored.kb.next_chapter_index(), 1);
    }

    #[test]
    fn create_refuses_to_clobber() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storyloom.json");
        let path_str = path.to_str().unwrap();

        Project::create(path_str).unwrap();
        assert!(Project::create(path_str).is_err());
    }

    #[test]
    fn load_missing_file_is_an_error() {
        assert!(Project::load("/nonexistent/storyloom.json").is_err());
    }
}
