//! Durable profile storage
//!
//! Maps profile names to files in a single directory, one
//! `<name>.ini` per profile. Saves are whole-file atomic replaces;
//! concurrent writers to the same name are last-writer-wins.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

use crate::constants::profiles;
use crate::error::StoreError;
use crate::profile::Profile;

pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Default storage location under the platform config dir
    /// (`<config>/zrpc/profiles`).
    pub fn default_dir() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(profiles::APP_DIR);
        path.push(profiles::SUBDIR);
        path
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All persisted profile names, in filesystem enumeration order.
    ///
    /// The order is not stable across platforms; callers use it for
    /// display only. Creates the storage directory if absent.
    pub fn list_names(&self) -> Result<Vec<String>, StoreError> {
        self.ensure_dir()?;

        let entries = fs::read_dir(&self.dir).map_err(|e| io_err("read", &self.dir, e))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_err("read", &self.dir, e))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(profiles::FILE_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        Ok(names)
    }

    /// Load the profile persisted under `name`.
    pub fn load(&self, name: &str) -> Result<Profile, StoreError> {
        validate_name(name)?;

        let path = self.profile_path(name);
        if !path.exists() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        let text = fs::read_to_string(&path).map_err(|e| io_err("read", &path, e))?;
        Ok(Profile::parse(&text))
    }

    /// Persist `profile` under `name`, replacing any existing record.
    ///
    /// The file is written to a temporary sibling and renamed over the
    /// target, so a failed save leaves the previous record intact.
    pub fn save(&self, name: &str, profile: &Profile) -> Result<(), StoreError> {
        validate_name(name)?;
        profile.validate()?;
        self.ensure_dir()?;

        let path = self.profile_path(name);
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|e| io_err("write", &path, e))?;
        tmp.write_all(profile.render().as_bytes())
            .map_err(|e| io_err("write", &path, e))?;
        tmp.persist(&path).map_err(|e| io_err("replace", &path, e.error))?;

        info!(profile = %name, path = %path.display(), "saved profile");
        Ok(())
    }

    fn profile_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{}", profiles::FILE_EXT))
    }

    fn ensure_dir(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| io_err("create", &self.dir, e))
    }
}

fn io_err(op: &'static str, path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        op,
        path: path.to_path_buf(),
        source,
    }
}

fn validate_name(name: &str) -> Result<(), StoreError> {
    let invalid = |reason| StoreError::InvalidName {
        name: name.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if name == "." || name == ".." {
        return Err(invalid("name is a reserved path component"));
    }
    if name
        .chars()
        .any(|c| profiles::UNSAFE_NAME_CHARS.contains(&c) || c.is_control())
    {
        return Err(invalid("name contains filesystem-unsafe characters"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Profile {
        Profile {
            client_id: "123456789".to_string(),
            details: "Editing main.rs".to_string(),
            large_image: "ferris".to_string(),
            ..Profile::default()
        }
    }

    fn store_in(dir: &TempDir) -> ProfileStore {
        ProfileStore::new(dir.path().join("profiles"))
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let profile = sample();
        store.save("coding", &profile).unwrap();
        assert_eq!(store.load("coding").unwrap(), profile);
    }

    #[test]
    fn test_list_names_creates_missing_dir() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(!store.dir().exists());
        assert!(store.list_names().unwrap().is_empty());
        assert!(store.dir().exists());
    }

    #[test]
    fn test_list_names_after_save() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save("coding", &sample()).unwrap();
        store.save("gaming", &sample()).unwrap();

        let mut names = store.list_names().unwrap();
        names.sort();
        assert_eq!(names, ["coding", "gaming"]);
    }

    #[test]
    fn test_list_names_skips_other_extensions() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save("coding", &sample()).unwrap();
        fs::write(store.dir().join("notes.txt"), "not a profile").unwrap();

        assert_eq!(store.list_names().unwrap(), ["coding"]);
    }

    #[test]
    fn test_load_unknown_name_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.ensure_dir().unwrap();

        assert!(matches!(
            store.load("missing"),
            Err(StoreError::NotFound(name)) if name == "missing"
        ));
    }

    #[test]
    fn test_save_invalid_profile_leaves_existing_file_untouched() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save("coding", &sample()).unwrap();

        let mut bad = sample();
        bad.client_id = String::new();
        assert!(matches!(
            store.save("coding", &bad),
            Err(StoreError::InvalidProfile(_))
        ));

        assert_eq!(store.load("coding").unwrap(), sample());
    }

    #[test]
    fn test_save_overwrites_existing_record() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save("coding", &sample()).unwrap();

        let mut updated = sample();
        updated.details = "Reviewing".to_string();
        store.save("coding", &updated).unwrap();

        assert_eq!(store.load("coding").unwrap(), updated);
        assert_eq!(store.list_names().unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        for name in ["", ".", "..", "a/b", "a\\b", "a:b", "a\nb"] {
            assert!(
                matches!(
                    store.save(name, &sample()),
                    Err(StoreError::InvalidName { .. })
                ),
                "expected InvalidName for {name:?}"
            );
        }
    }
}
