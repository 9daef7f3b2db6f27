//! Per-run REPL state
//!
//! A `Session` owns everything the command handlers mutate: the API client,
//! the location pagination cursors, the caught-Pokemon collection, and the
//! random source for catch rolls.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::api::{LocationAreaPage, PokeApiClient};
use crate::pokedex::Pokedex;

/// State shared by all commands during one interactive run
#[derive(Debug)]
pub struct Session {
    /// PokeAPI client (owns the response cache)
    pub client: PokeApiClient,
    /// URL of the next page of location areas, if known
    pub next_locations_url: Option<String>,
    /// URL of the previous page of location areas, if any
    pub prev_locations_url: Option<String>,
    /// Whether any page of the listing has been fetched yet
    pub locations_fetched: bool,
    /// Pokemon caught so far
    pub pokedex: Pokedex,
    /// Random source for Pokeball throws
    pub(crate) rng: StdRng,
}

impl Session {
    /// Creates a new session with an empty Pokedex and an OS-seeded RNG
    pub fn new(client: PokeApiClient) -> Self {
        Self::with_rng(client, StdRng::from_os_rng())
    }

    /// Creates a new session with a specific RNG (for deterministic catches)
    pub fn with_rng(client: PokeApiClient, rng: StdRng) -> Self {
        Self {
            client,
            next_locations_url: None,
            prev_locations_url: None,
            locations_fetched: false,
            pokedex: Pokedex::new(),
            rng,
        }
    }

    /// Moves the pagination cursors to the page just fetched
    pub(crate) fn set_cursors(&mut self, page: &LocationAreaPage) {
        self.next_locations_url = page.next.clone();
        self.prev_locations_url = page.previous.clone();
        self.locations_fetched = true;
    }

    /// Consumes the session, stopping the client's cache reaper
    pub async fn close(self) {
        self.client.shutdown().await;
    }
}
