use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::Joke;
use crate::errors::{JokeError, JokeResult};
use crate::storage::traits::FavouritesRepository;

/// Favourites kept as a pretty-printed JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileFavouritesRepository {
    path: PathBuf,
}

impl JsonFileFavouritesRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling(".tmp")
    }

    /// First `<file>.bak`, `<file>.bak.1`, ... that does not exist yet
    fn backup_path(&self) -> PathBuf {
        let mut candidate = self.sibling(".bak");
        let mut n = 1;
        while candidate.exists() {
            candidate = self.sibling(&format!(".bak.{}", n));
            n += 1;
        }
        candidate
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "favourites.json".into());
        name.push(suffix);
        self.path.with_file_name(name)
    }
}

impl FavouritesRepository for JsonFileFavouritesRepository {
    fn load(&self) -> JokeResult<Vec<Joke>> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(JokeError::Persistence(format!(
                    "reading {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        serde_json::from_slice(&data).map_err(|e| {
            JokeError::Persistence(format!("decoding {}: {}", self.path.display(), e))
        })
    }

    fn save(&self, jokes: &[Joke]) -> JokeResult<()> {
        let data = serde_json::to_vec_pretty(jokes)
            .map_err(|e| JokeError::Persistence(format!("encoding favourites: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                JokeError::Persistence(format!("creating {}: {}", parent.display(), e))
            })?;
        }

        // Write beside the target then rename, so readers never see a partial file
        let temp = self.temp_path();
        fs::write(&temp, &data)
            .and_then(|_| fs::rename(&temp, &self.path))
            .map_err(|e| {
                fs::remove_file(&temp).ok();
                JokeError::Persistence(format!("writing {}: {}", self.path.display(), e))
            })?;

        tracing::debug!(path = %self.path.display(), count = jokes.len(), "favourites written");
        Ok(())
    }

    fn set_aside(&self) -> JokeResult<Option<PathBuf>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let backup = self.backup_path();
        fs::rename(&self.path, &backup).map_err(|e| {
            JokeError::Persistence(format!(
                "moving {} to {}: {}",
                self.path.display(),
                backup.display(),
                e
            ))
        })?;
        Ok(Some(backup))
    }
}
