use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use once_cell::sync::Lazy;

use crate::config::SourceOptions;
use crate::error::LoadError;

use super::loader;
use super::model::Table;

// ---------------------------------------------------------------------------
// Process-wide table cache
// ---------------------------------------------------------------------------
//
// Lifecycle: an entry is populated by the first successful `load_cached` for
// its key and then lives until `invalidate` is called for its path. Nothing
// refreshes entries automatically; the source is assumed static while the
// process runs. Failed loads are never cached.

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    path: PathBuf,
    options: String,
}

impl CacheKey {
    fn new(path: &Path, options: &SourceOptions) -> Self {
        // Same file read with other options is a different table.
        let options = serde_json::to_string(options).unwrap_or_default();
        CacheKey {
            path: path.to_path_buf(),
            options,
        }
    }
}

static TABLES: Lazy<Mutex<HashMap<CacheKey, Arc<Table>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn tables() -> std::sync::MutexGuard<'static, HashMap<CacheKey, Arc<Table>>> {
    // The map is only touched by insert/remove/clone, so a poisoned lock
    // still holds consistent data.
    TABLES.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Load `path`, reusing the table from an earlier successful load.
pub fn load_cached(path: &Path, options: &SourceOptions) -> Result<Arc<Table>, LoadError> {
    let key = CacheKey::new(path, options);
    if let Some(table) = tables().get(&key) {
        log::debug!("Cache hit for {}", path.display());
        return Ok(Arc::clone(table));
    }

    log::debug!("Cache miss for {}", path.display());
    // Load outside the lock; a racing loader produces an equal table.
    let table = Arc::new(loader::load(path, options)?);
    let cached = tables().entry(key).or_insert(table).clone();
    Ok(cached)
}

/// Drop every cached table for `path`, whatever options it was read with.
/// Returns whether anything was removed.
pub fn invalidate(path: &Path) -> bool {
    let mut map = tables();
    let before = map.len();
    map.retain(|key, _| key.path != path);
    let removed = map.len() != before;
    if removed {
        log::debug!("Invalidated cached table for {}", path.display());
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "Ano;Curso;Posição\n2018;Civil;3\n2019;Civil;2\n";

    fn options() -> SourceOptions {
        SourceOptions {
            required_columns: vec!["Posição".to_string()],
            ..SourceOptions::default()
        }
    }

    fn temp_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn second_load_returns_same_table() {
        let file = temp_csv(CSV);
        let a = load_cached(file.path(), &options()).unwrap();
        let b = load_cached(file.path(), &options()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn cached_table_survives_source_change_until_invalidated() {
        let file = temp_csv(CSV);
        let before = load_cached(file.path(), &options()).unwrap();
        assert_eq!(before.len(), 2);

        std::fs::write(file.path(), "Ano;Curso;Posição\n2018;Civil;3\n").unwrap();
        assert_eq!(load_cached(file.path(), &options()).unwrap().len(), 2);

        assert!(invalidate(file.path()));
        assert!(!invalidate(file.path()));
        assert_eq!(load_cached(file.path(), &options()).unwrap().len(), 1);
    }

    #[test]
    fn failures_are_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cursos.csv");
        assert!(matches!(
            load_cached(&path, &options()),
            Err(LoadError::DataUnavailable { .. })
        ));

        std::fs::write(&path, CSV).unwrap();
        assert_eq!(load_cached(&path, &options()).unwrap().len(), 2);
    }

    #[test]
    fn options_are_part_of_the_key() {
        let file = temp_csv(CSV);
        let semicolon = load_cached(file.path(), &options()).unwrap();
        let comma = SourceOptions {
            delimiter: ',',
            ..options()
        };
        assert!(load_cached(file.path(), &comma).is_err());
        assert_eq!(semicolon.len(), 2);
    }
}
