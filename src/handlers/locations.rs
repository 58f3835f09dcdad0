use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::Result,
    models::location::{LocationEntryType, LocationSuggestQuery, LocationSuggestion},
    services::location_search,
    AppState,
};

/// `GET /api/locations/countries`
pub async fn list_countries(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    let entries = state.location_index.entries()?;
    let mut countries: Vec<String> = entries
        .iter()
        .filter(|e| e.entry_type == LocationEntryType::Country)
        .map(|e| e.name().to_string())
        .collect();
    countries.sort();
    countries.dedup();
    Ok(Json(countries))
}

/// `GET /api/locations/:country/states`
pub async fn list_states(State(state): State<AppState>, Path(country): Path<String>) -> Result<Json<Vec<String>>> {
    let entries = state.location_index.entries()?;
    let mut states: Vec<String> = entries
        .iter()
        .filter(|e| e.entry_type == LocationEntryType::State && e.country.as_deref() == Some(country.as_str()))
        .map(|e| e.name().to_string())
        .collect();
    states.sort();
    states.dedup();
    Ok(Json(states))
}

/// `GET /api/locations/:country/:state/cities`
pub async fn list_cities(State(state): State<AppState>, Path((country, state_name)): Path<(String, String)>) -> Result<Json<Vec<String>>> {
    let entries = state.location_index.entries()?;
    let mut cities: Vec<String> = entries
        .iter()
        .filter(|e| {
            e.entry_type == LocationEntryType::City && e.country.as_deref() == Some(country.as_str()) && e.state.as_deref() == Some(state_name.as_str())
        })
        .map(|e| e.name().to_string())
        .collect();
    cities.sort();
    cities.dedup();
    Ok(Json(cities))
}

/// `GET /api/locations/search?q&k`
pub async fn search_locations(State(state): State<AppState>, Query(params): Query<LocationSuggestQuery>) -> Result<Json<Vec<LocationSuggestion>>> {
    let entries = state.location_index.entries()?;
    let matches = location_search::suggest(&entries, &params.q, params.limit);
    Ok(Json(matches.into_iter().map(LocationSuggestion::from).collect()))
}
