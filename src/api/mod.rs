//! PokeAPI response models and client
//!
//! This module contains the response types returned by the PokeAPI location
//! and Pokemon endpoints, plus the caching client that fetches them.
//! Unknown fields are ignored and missing lists default to empty, so the
//! models only describe what the REPL actually reads.

pub mod client;

pub use client::{ApiError, ClientConfig, PokeApiClient, DEFAULT_BASE_URL};

use serde::Deserialize;

/// A named link to another PokeAPI resource
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// One page of the `location-area` listing
#[derive(Debug, Clone, Deserialize)]
pub struct LocationAreaPage {
    /// Total number of location areas across all pages
    #[serde(default)]
    pub count: u32,
    /// URL of the next page, if any
    pub next: Option<String>,
    /// URL of the previous page, if any
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<NamedResource>,
}

/// A single location area, including which Pokemon can be encountered there
#[derive(Debug, Clone, Deserialize)]
pub struct LocationArea {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub game_index: u32,
    #[serde(default)]
    pub encounter_method_rates: Vec<EncounterMethodRate>,
    /// The region location this area belongs to
    pub location: Option<NamedResource>,
    #[serde(default)]
    pub pokemon_encounters: Vec<PokemonEncounter>,
}

/// How often an encounter method occurs in an area
#[derive(Debug, Clone, Deserialize)]
pub struct EncounterMethodRate {
    pub encounter_method: NamedResource,
    #[serde(default)]
    pub version_details: Vec<VersionDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionDetail {
    pub rate: u32,
    pub version: NamedResource,
}

/// A Pokemon that can be found in a location area
#[derive(Debug, Clone, Deserialize)]
pub struct PokemonEncounter {
    pub pokemon: NamedResource,
    #[serde(default)]
    pub version_details: Vec<VersionEncounter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionEncounter {
    pub version: NamedResource,
    #[serde(default)]
    pub max_chance: u32,
    #[serde(default)]
    pub encounter_details: Vec<EncounterDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EncounterDetail {
    pub min_level: u32,
    pub max_level: u32,
    #[serde(default)]
    pub condition_values: Vec<NamedResource>,
    pub chance: u32,
    pub method: NamedResource,
}

/// A Pokemon species as returned by the `pokemon` endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    /// Experience gained for defeating this Pokemon; drives the catch chance.
    /// PokeAPI returns `null` for a few forms.
    #[serde(default)]
    pub base_experience: Option<i32>,
    /// Height in decimetres
    #[serde(default)]
    pub height: u32,
    /// Weight in hectograms
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub stats: Vec<PokemonStat>,
    #[serde(default)]
    pub types: Vec<PokemonType>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokemonStat {
    pub stat: NamedResource,
    #[serde(default)]
    pub effort: u32,
    pub base_stat: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokemonType {
    pub slot: u32,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}
