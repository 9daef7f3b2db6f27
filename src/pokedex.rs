//! Caught-Pokemon collection and catch odds
//!
//! The collection is owned by the REPL session rather than living in a
//! global, so each session (and each test) starts with an empty Pokedex.

use std::collections::BTreeMap;

use rand::Rng;

use crate::api::Pokemon;

/// Highest roll a Pokeball throw can produce; rolls start at 1
pub const MAX_ROLL: i32 = 100;

/// Percentage chance (may fall outside 0..=100) of catching a Pokemon
///
/// Higher base experience means a harder catch:
/// `(1000 - base_experience) / 10 - 10`, using integer division.
pub fn capture_chance(base_experience: i32) -> i32 {
    (1000 - base_experience) / 10 - 10
}

/// Whether a roll in `1..=MAX_ROLL` beats the given capture chance
pub fn is_caught(roll: i32, chance: i32) -> bool {
    roll <= chance
}

/// Rolls a Pokeball throw at `pokemon` using `rng`
///
/// A missing base experience is treated as zero, which gives the best odds.
pub fn throw_pokeball<R: Rng>(pokemon: &Pokemon, rng: &mut R) -> bool {
    let chance = capture_chance(pokemon.base_experience.unwrap_or(0));
    let roll = rng.random_range(1..=MAX_ROLL);
    tracing::debug!(pokemon = %pokemon.name, roll, chance, "pokeball thrown");
    is_caught(roll, chance)
}

/// The Pokemon a player has caught, keyed and listed by name
#[derive(Debug, Default)]
pub struct Pokedex {
    caught: BTreeMap<String, Pokemon>,
}

impl Pokedex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a caught Pokemon
    ///
    /// Returns `false` if one with the same name was already caught; the
    /// first record is kept.
    pub fn insert(&mut self, pokemon: Pokemon) -> bool {
        if self.caught.contains_key(&pokemon.name) {
            return false;
        }
        self.caught.insert(pokemon.name.clone(), pokemon);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Pokemon> {
        self.caught.get(name)
    }

    /// Caught Pokemon in name order
    pub fn iter(&self) -> impl Iterator<Item = &Pokemon> {
        self.caught.values()
    }

    pub fn len(&self) -> usize {
        self.caught.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caught.is_empty()
    }
}
