use serde::{Deserialize, Serialize};

use crate::query::text;

/// Shape of the JSON file at `LOCATION_TREE_PATH`: a flat list of countries,
/// each nesting its states, each nesting its cities.
#[derive(Debug, Clone, Deserialize)]
pub struct CountryNode {
    pub name: String,
    #[serde(default)]
    pub states: Vec<StateNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StateNode {
    pub name: String,
    #[serde(default)]
    pub cities: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationEntryType {
    Country,
    State,
    City,
}

/// A single flattened, searchable node: a city carries its state and
/// country, a state carries its country, a country carries neither.
///
/// `main` is the entry's own name (city/state/country name); `full` is the
/// whole `country state city` path. Both are kept alongside their
/// normalized forms and token lists so the ranker never re-derives them
/// per candidate per query.
#[derive(Debug, Clone)]
pub struct LocationEntry {
    pub entry_type: LocationEntryType,
    pub main: String,
    pub main_norm: String,
    pub full_norm: String,
    pub tokens_main: Vec<String>,
    pub tokens_all: Vec<String>,
    pub country: Option<String>,
    pub state: Option<String>,
}

impl LocationEntry {
    pub fn new(entry_type: LocationEntryType, main: String, country: Option<String>, state: Option<String>) -> Self {
        let full = [country.as_deref(), state.as_deref(), Some(main.as_str())]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");

        let main_norm = text::normalize(&main);
        let full_norm = text::normalize(&full);
        let tokens_main = text::tokenize(&main);
        let tokens_all = text::tokenize(&full);

        LocationEntry {
            entry_type,
            main,
            main_norm,
            full_norm,
            tokens_main,
            tokens_all,
            country,
            state,
        }
    }

    /// Back-compat accessor: the entry's own display name.
    pub fn name(&self) -> &str {
        &self.main
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationSuggestion {
    #[serde(rename = "type")]
    pub entry_type: LocationEntryType,
    pub name: String,
    pub country: Option<String>,
    pub state: Option<String>,
}

impl From<&LocationEntry> for LocationSuggestion {
    fn from(entry: &LocationEntry) -> Self {
        LocationSuggestion {
            entry_type: entry.entry_type,
            name: entry.main.clone(),
            country: entry.country.clone(),
            state: entry.state.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LocationSuggestQuery {
    pub q: String,
    pub limit: Option<usize>,
}
