//! Command table and handlers for the Pokedex REPL
//!
//! Commands are registered in a static table so `help` and the dispatcher
//! always agree. Handlers write to any `Write` sink, which keeps them
//! testable without a terminal.

use std::io::Write;

use thiserror::Error;

use super::Session;
use crate::api::ApiError;
use crate::pokedex::throw_pokeball;

/// Errors a command handler can report back to the REPL loop
#[derive(Debug, Error)]
pub enum CommandError {
    /// A PokeAPI request failed
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Writing command output failed
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

/// What the REPL loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Identifies which handler a table entry runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Exit,
    Help,
    Map,
    MapBack,
    Explore,
    Catch,
    Inspect,
    Pokedex,
}

/// A REPL command as listed by `help`
#[derive(Debug)]
pub struct Command {
    pub name: &'static str,
    /// Argument placeholder shown in help, empty if none
    pub usage: &'static str,
    pub description: &'static str,
    pub kind: CommandKind,
}

/// Every command the REPL understands, in help order
pub const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usage: "",
        description: "Displays a help message",
        kind: CommandKind::Help,
    },
    Command {
        name: "map",
        usage: "",
        description: "Get the next page of locations",
        kind: CommandKind::Map,
    },
    Command {
        name: "mapb",
        usage: "",
        description: "Get the previous page of locations",
        kind: CommandKind::MapBack,
    },
    Command {
        name: "explore",
        usage: "<location_area>",
        description: "List the Pokemon found in a location area",
        kind: CommandKind::Explore,
    },
    Command {
        name: "catch",
        usage: "<pokemon>",
        description: "Attempt to catch a Pokemon",
        kind: CommandKind::Catch,
    },
    Command {
        name: "inspect",
        usage: "<pokemon>",
        description: "Show details of a Pokemon you have caught",
        kind: CommandKind::Inspect,
    },
    Command {
        name: "pokedex",
        usage: "",
        description: "List the Pokemon you have caught",
        kind: CommandKind::Pokedex,
    },
    Command {
        name: "exit",
        usage: "",
        description: "Exit the Pokedex",
        kind: CommandKind::Exit,
    },
];

/// Looks up a command by its exact name
pub fn find_command(name: &str) -> Option<&'static Command> {
    COMMANDS.iter().find(|command| command.name == name)
}

impl Session {
    /// Runs `command` with `args`, writing its output to `out`
    pub async fn execute<W: Write>(
        &mut self,
        command: &Command,
        args: &[String],
        out: &mut W,
    ) -> Result<Flow, CommandError> {
        let arg = args.first().map(String::as_str);
        tracing::debug!(command = command.name, ?args, "executing command");

        match command.kind {
            CommandKind::Exit => {
                writeln!(out, "Closing the Pokedex... Goodbye!")?;
                return Ok(Flow::Exit);
            }
            CommandKind::Help => self.help(out)?,
            CommandKind::Map => self.map_forward(out).await?,
            CommandKind::MapBack => self.map_back(out).await?,
            CommandKind::Explore => self.explore(arg, out).await?,
            CommandKind::Catch => self.catch(arg, out).await?,
            CommandKind::Inspect => self.inspect(arg, out)?,
            CommandKind::Pokedex => self.list_pokedex(out)?,
        }

        Ok(Flow::Continue)
    }

    fn help<W: Write>(&self, out: &mut W) -> Result<(), CommandError> {
        writeln!(out, "Welcome to the Pokedex!")?;
        writeln!(out, "Usage:")?;
        writeln!(out)?;
        for command in COMMANDS {
            if command.usage.is_empty() {
                writeln!(out, "{}: {}", command.name, command.description)?;
            } else {
                writeln!(
                    out,
                    "{} {}: {}",
                    command.name, command.usage, command.description
                )?;
            }
        }
        Ok(())
    }

    async fn map_forward<W: Write>(&mut self, out: &mut W) -> Result<(), CommandError> {
        let page_url = self.next_locations_url.clone();
        if page_url.is_none() && self.locations_fetched {
            writeln!(out, "you're on the last page")?;
            return Ok(());
        }

        let page = self.client.list_locations(page_url.as_deref()).await?;
        self.set_cursors(&page);
        for location in &page.results {
            writeln!(out, "{}", location.name)?;
        }
        Ok(())
    }

    async fn map_back<W: Write>(&mut self, out: &mut W) -> Result<(), CommandError> {
        let Some(page_url) = self.prev_locations_url.clone() else {
            writeln!(out, "you're on the first page")?;
            return Ok(());
        };

        let page = self.client.list_locations(Some(&page_url)).await?;
        self.set_cursors(&page);
        for location in &page.results {
            writeln!(out, "{}", location.name)?;
        }
        Ok(())
    }

    async fn explore<W: Write>(
        &mut self,
        area: Option<&str>,
        out: &mut W,
    ) -> Result<(), CommandError> {
        let Some(area) = area else {
            writeln!(out, "Please provide a location area to explore.")?;
            return Ok(());
        };

        let location = self.client.location_area(area).await?;
        writeln!(out, "Exploring {}...", location.name)?;
        writeln!(out, "Found Pokemon:")?;
        for encounter in &location.pokemon_encounters {
            writeln!(out, " - {}", encounter.pokemon.name)?;
        }
        Ok(())
    }

    async fn catch<W: Write>(
        &mut self,
        name: Option<&str>,
        out: &mut W,
    ) -> Result<(), CommandError> {
        let Some(name) = name else {
            writeln!(out, "Pick a Pokemon to catch!")?;
            return Ok(());
        };

        writeln!(out, "Throwing a Pokeball at {}...", name)?;
        let pokemon = self.client.pokemon(name).await?;

        if throw_pokeball(&pokemon, &mut self.rng) {
            writeln!(out, "{} was caught!", pokemon.name)?;
            let name = pokemon.name.clone();
            if self.pokedex.insert(pokemon) {
                writeln!(out, "You may now inspect it with the inspect command.")?;
            } else {
                tracing::debug!(pokemon = %name, "already in pokedex");
            }
        } else {
            writeln!(out, "{} escaped!", pokemon.name)?;
        }
        Ok(())
    }

    fn inspect<W: Write>(&self, name: Option<&str>, out: &mut W) -> Result<(), CommandError> {
        let Some(name) = name else {
            writeln!(out, "Pick a Pokemon to inspect!")?;
            return Ok(());
        };

        let Some(pokemon) = self.pokedex.get(name) else {
            writeln!(out, "you have not caught that pokemon")?;
            return Ok(());
        };

        writeln!(out, "Name: {}", pokemon.name)?;
        writeln!(out, "Height: {}", pokemon.height)?;
        writeln!(out, "Weight: {}", pokemon.weight)?;
        writeln!(out, "Stats:")?;
        for stat in &pokemon.stats {
            writeln!(out, "  -{}: {}", stat.stat.name, stat.base_stat)?;
        }
        writeln!(out, "Types:")?;
        for kind in &pokemon.types {
            writeln!(out, "  - {}", kind.kind.name)?;
        }
        Ok(())
    }

    fn list_pokedex<W: Write>(&self, out: &mut W) -> Result<(), CommandError> {
        if self.pokedex.is_empty() {
            writeln!(out, "You haven't caught any Pokemon yet!")?;
            return Ok(());
        }

        writeln!(out, "Your Pokedex:")?;
        for pokemon in self.pokedex.iter() {
            writeln!(out, " - {}", pokemon.name)?;
        }
        Ok(())
    }
}
