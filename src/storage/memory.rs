use super::Vault;
use crate::error::{BotError, Result};
use std::collections::BTreeMap;
use std::io::{BufRead, Cursor};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory vault that counts mutating calls.
#[derive(Default)]
pub(crate) struct MemoryVault {
    files: Mutex<BTreeMap<PathBuf, String>>,
    writes: AtomicUsize,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), content.to_string());
        self
    }

    pub fn content(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(Path::new(path)).cloned()
    }

    /// Number of create, append and write calls that changed a file.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn not_found(path: &Path) -> BotError {
        BotError::Storage(format!("read file [path = {:?}]: not found", path.display()))
    }
}

impl Vault for MemoryVault {
    fn open(&self, path: &Path) -> Result<Box<dyn BufRead + Send>> {
        let content = self.read(path)?;
        Ok(Box::new(Cursor::new(content.into_bytes())))
    }

    fn create(&self, path: &Path, content: &str) -> Result<()> {
        let mut files = self.files.lock().unwrap();
        if files.contains_key(path) {
            return Err(BotError::Storage(format!(
                "create file [path = {:?}]: already exists",
                path.display()
            )));
        }
        files.insert(path.to_path_buf(), content.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn exists(&self, path: &Path) -> Result<bool> {
        Ok(self.files.lock().unwrap().contains_key(path))
    }

    fn read(&self, path: &Path) -> Result<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| Self::not_found(path))
    }

    fn append(&self, path: &Path, text: &str) -> Result<()> {
        let mut files = self.files.lock().unwrap();
        files.entry(path.to_path_buf()).or_default().push_str(text);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn write(&self, path: &Path, text: &str) -> Result<()> {
        let mut files = self.files.lock().unwrap();
        files.insert(path.to_path_buf(), text.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn walk(&self, root: &Path, visit: &mut dyn FnMut(&Path) -> Result<()>) -> Result<()> {
        let paths: Vec<PathBuf> = self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter(|p| p.starts_with(root))
            .cloned()
            .collect();

        if paths.is_empty() {
            return Err(BotError::Storage(format!(
                "walk [path = {:?}]: not found",
                root.display()
            )));
        }

        for path in paths {
            visit(&path)?;
        }
        Ok(())
    }
}
