use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Deserialize;

/// Location assigned when nothing usable can be read from the profile
pub const OTHER_LOCATION: &str = "OTHER";

/// Canonicalizes free-text player locations into state/region codes.
///
/// The listing shows locations like `"San Jose, CA"`, `"CA"`, `"toronto"`
/// or nothing at all. The last comma-separated part wins when present;
/// otherwise the first part is looked up in the city table.
#[derive(Debug, Clone, Default)]
pub struct LocationNormalizer {
    cities: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct CityRow {
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "State short")]
    state: String,
    #[serde(rename = "City alias", default)]
    alias: Option<String>,
}

impl LocationNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, C, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, S)>,
        C: Into<String>,
        S: Into<String>,
    {
        let cities = pairs
            .into_iter()
            .map(|(city, state)| (city.into(), state.into()))
            .collect();
        Self { cities }
    }

    /// Load a pipe-separated city table (`City|State short|...|City alias`).
    ///
    /// A missing file yields an empty table: explicit state codes still
    /// normalize, bare city names fall back to [`OTHER_LOCATION`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(
                "City table {} not found, bare city names will map to {}",
                path.display(),
                OTHER_LOCATION
            );
            return Ok(Self::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'|')
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Failed to open city table {}", path.display()))?;

        let mut cities = HashMap::new();
        for row in reader.deserialize::<CityRow>() {
            let row = row.with_context(|| format!("Failed to read city table {}", path.display()))?;
            if let Some(alias) = row.alias.filter(|a| !a.is_empty()) {
                cities.insert(alias, row.state.clone());
            }
            cities.insert(row.city, row.state);
        }

        info!("Loaded {} city names from {}", cities.len(), path.display());
        Ok(Self { cities })
    }

    pub fn state_for_city(&self, city: &str) -> Option<&str> {
        self.cities.get(city).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn normalize(&self, raw: &str) -> String {
        let parts: Vec<&str> = raw.split(',').collect();
        let main = reformat(parts.last().copied().unwrap_or_default());
        if !main.is_empty() {
            return main;
        }

        let backup = reformat(parts.first().copied().unwrap_or_default());
        self.state_for_city(&backup)
            .unwrap_or(OTHER_LOCATION)
            .to_string()
    }
}

/// Two- and three-letter codes are upper-cased, anything else title-cased.
fn reformat(part: &str) -> String {
    let part = part.trim();
    match part.chars().count() {
        2 | 3 => part.to_uppercase(),
        _ => capitalize_words(part),
    }
}

fn capitalize_words(text: &str) -> String {
    text.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
