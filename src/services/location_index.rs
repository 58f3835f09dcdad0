//! Flattened, in-memory location search index built from the
//! country/state/city tree on disk. Loaded lazily on first use and rebuilt
//! whenever the number of countries in the tree changes; readers in flight
//! during a rebuild keep using the snapshot they already hold.

use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};

use crate::error::{AppError, Result};
use crate::models::location::{CountryNode, LocationEntry, LocationEntryType};

pub struct LocationIndex {
    inner: RwLock<Option<Snapshot>>,
    tree_path: String,
}

struct Snapshot {
    entries: Arc<Vec<LocationEntry>>,
    country_count: usize,
}

impl LocationIndex {
    pub fn new(tree_path: impl Into<String>) -> Self {
        LocationIndex {
            inner: RwLock::new(None),
            tree_path: tree_path.into(),
        }
    }

    /// Returns the current flattened entry set, loading it from disk on
    /// first call and rebuilding it whenever the tree's country count no
    /// longer matches the cached snapshot.
    pub fn entries(&self) -> Result<Arc<Vec<LocationEntry>>> {
        let countries = load_tree(&self.tree_path)?;

        {
            let guard = self.inner.read().expect("location index lock poisoned");
            if let Some(snapshot) = guard.as_ref() {
                if snapshot.country_count == countries.len() {
                    return Ok(snapshot.entries.clone());
                }
            }
        }

        let entries = Arc::new(flatten(&countries));
        let mut guard = self.inner.write().expect("location index lock poisoned");
        *guard = Some(Snapshot {
            entries: entries.clone(),
            country_count: countries.len(),
        });
        Ok(entries)
    }
}

fn load_tree(path: &str) -> Result<Vec<CountryNode>> {
    let raw = fs::read_to_string(Path::new(path))
        .map_err(|e| AppError::Internal(format!("failed to read location tree at {path}: {e}")))?;
    serde_json::from_str(&raw).map_err(|e| AppError::Internal(format!("failed to parse location tree: {e}")))
}

fn flatten(countries: &[CountryNode]) -> Vec<LocationEntry> {
    let mut entries = Vec::new();

    for country in countries {
        entries.push(LocationEntry::new(LocationEntryType::Country, country.name.clone(), None, None));

        for state in &country.states {
            entries.push(LocationEntry::new(
                LocationEntryType::State,
                state.name.clone(),
                Some(country.name.clone()),
                None,
            ));

            for city in &state.cities {
                entries.push(LocationEntry::new(
                    LocationEntryType::City,
                    city.clone(),
                    Some(country.name.clone()),
                    Some(state.name.clone()),
                ));
            }
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tree(dir: &std::path::Path, json: &str) -> String {
        let path = dir.join("locations.json");
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(json.as_bytes()).unwrap();
        path.to_string_lossy().to_string()
    }

    #[test]
    fn flattens_country_state_city_tree() {
        let dir = tempfile_dir();
        let path = write_tree(
            &dir,
            r#"[{"name":"Mexico","states":[{"name":"Coahuila","cities":["Torreon"]}]}]"#,
        );

        let index = LocationIndex::new(path);
        let entries = index.entries().unwrap();

        assert_eq!(entries.len(), 3);
        assert!(entries.iter().any(|e| e.entry_type == LocationEntryType::Country && e.main == "Mexico"));
        assert!(entries.iter().any(|e| e.entry_type == LocationEntryType::State && e.main == "Coahuila"));
        assert!(entries
            .iter()
            .any(|e| e.entry_type == LocationEntryType::City && e.main == "Torreon" && e.full_norm == "mexico coahuila torreon"));
    }

    #[test]
    fn rebuilds_when_country_count_changes() {
        let dir = tempfile_dir();
        let path = write_tree(&dir, r#"[{"name":"Chile","states":[]}]"#);

        let index = LocationIndex::new(path.clone());
        assert_eq!(index.entries().unwrap().len(), 1);

        write_tree(&dir, r#"[{"name":"Chile","states":[]},{"name":"Peru","states":[]}]"#);
        assert_eq!(index.entries().unwrap().len(), 2);
    }

    fn tempfile_dir() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("location_index_test_{:?}", std::thread::current().id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }
}
