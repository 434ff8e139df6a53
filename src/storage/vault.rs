use crate::error::{BotError, Result};
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// File operations over a vault of Markdown notes.
///
/// No locking is performed: two requests editing the same file at once race
/// and the last write wins.
pub trait Vault: Send + Sync {
    /// Open a file for line-by-line reading.
    fn open(&self, path: &Path) -> Result<Box<dyn BufRead + Send>>;

    /// Create a new file with `content`. Fails if the file already exists or
    /// its directory is missing.
    fn create(&self, path: &Path, content: &str) -> Result<()>;

    /// True if `path` exists and is a regular file.
    fn exists(&self, path: &Path) -> Result<bool>;

    fn read(&self, path: &Path) -> Result<String>;

    /// Append `text` to the end of a file, creating it when absent.
    fn append(&self, path: &Path, text: &str) -> Result<()>;

    /// Replace the whole content of a file.
    fn write(&self, path: &Path, text: &str) -> Result<()>;

    /// Call `visit` with the vault-relative path of every file under `root`,
    /// in file name order.
    fn walk(&self, root: &Path, visit: &mut dyn FnMut(&Path) -> Result<()>) -> Result<()>;
}

pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join a vault-relative path onto the root, refusing anything that could
    /// escape it.
    fn resolve(&self, path: &Path) -> Result<PathBuf> {
        for component in path.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir => {
                    return Err(BotError::InvalidPath(format!(
                        "{} (cannot contain '..')",
                        path.display()
                    )));
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(BotError::InvalidPath(format!(
                        "{} (must be relative to the vault)",
                        path.display()
                    )));
                }
            }
        }
        Ok(self.root.join(path))
    }

    fn ensure_parent(&self, full_path: &Path) -> Result<()> {
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_error("create dir", parent, e))?;
        }
        Ok(())
    }

    /// Atomically write content to a file using temp file + rename
    fn atomic_write(&self, target_path: &Path, content: &str) -> Result<()> {
        let target_dir = target_path
            .parent()
            .ok_or_else(|| BotError::Storage("Target path has no parent directory".to_string()))?;

        // Same directory as the target, so the rename cannot cross file systems
        let mut temp_file = NamedTempFile::new_in(target_dir)
            .map_err(|e| BotError::Storage(format!("Failed to create temp file: {}", e)))?;

        temp_file
            .write_all(content.as_bytes())
            .map_err(|e| BotError::Storage(format!("Failed to write to temp file: {}", e)))?;

        temp_file
            .as_file()
            .sync_all()
            .map_err(|e| BotError::Storage(format!("Failed to sync temp file: {}", e)))?;

        temp_file
            .persist(target_path)
            .map_err(|e| BotError::Storage(format!("Failed to persist temp file: {}", e)))?;

        Ok(())
    }
}

fn io_error(action: &str, path: &Path, err: std::io::Error) -> BotError {
    BotError::Storage(format!("{} [path = {:?}]: {}", action, path.display(), err))
}

impl Vault for FsVault {
    fn open(&self, path: &Path) -> Result<Box<dyn BufRead + Send>> {
        let full_path = self.resolve(path)?;
        let file = std::fs::File::open(&full_path).map_err(|e| io_error("open file", path, e))?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn create(&self, path: &Path, content: &str) -> Result<()> {
        let full_path = self.resolve(path)?;

        tracing::debug!(path = %path.display(), "Creating vault file");
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full_path)
            .map_err(|e| io_error("create file", path, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| io_error("write file", path, e))?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> Result<bool> {
        let full_path = self.resolve(path)?;
        match std::fs::metadata(&full_path) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_error("stat file", path, e)),
        }
    }

    fn read(&self, path: &Path) -> Result<String> {
        let full_path = self.resolve(path)?;
        std::fs::read_to_string(&full_path).map_err(|e| io_error("read file", path, e))
    }

    fn append(&self, path: &Path, text: &str) -> Result<()> {
        let full_path = self.resolve(path)?;
        self.ensure_parent(&full_path)?;

        tracing::debug!(path = %path.display(), bytes = text.len(), "Appending to vault file");
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&full_path)
            .map_err(|e| io_error("open file", path, e))?;
        file.write_all(text.as_bytes())
            .map_err(|e| io_error("write string", path, e))?;
        Ok(())
    }

    fn write(&self, path: &Path, text: &str) -> Result<()> {
        let full_path = self.resolve(path)?;
        self.ensure_parent(&full_path)?;

        tracing::debug!(path = %path.display(), bytes = text.len(), "Writing vault file");
        self.atomic_write(&full_path, text)
    }

    fn walk(&self, root: &Path, visit: &mut dyn FnMut(&Path) -> Result<()>) -> Result<()> {
        let full_root = self.resolve(root)?;

        for entry in WalkDir::new(&full_root).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                BotError::Storage(format!("walk [path = {:?}]: {}", root.display(), e))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .map_err(|e| BotError::Storage(format!("walk outside of vault: {}", e)))?;
            visit(relative)?;
        }

        Ok(())
    }
}
