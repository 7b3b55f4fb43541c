// SPDX-License-Identifier: AGPL-3.0-or-later

mod config;
mod store;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use dashpager::{Connection, FilterInput, ListView, QueryVariables, VariableStore};
use log::info;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::config::{load_config, Cli, Command};
use crate::store::RecordingStore;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let (config_file_path, config) = load_config(&cli)?;
    if let Some(path) = &config_file_path {
        info!("Loaded configuration from '{}'", path.display());
    }

    let view = ListView::new(config)?;
    let output = run(&view, &cli)?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

/// Evaluates the requested command against the given variables and connection.
fn run(view: &ListView, cli: &Cli) -> Result<Value> {
    let variables = match &cli.variables {
        Some(path) => read_json::<QueryVariables>(path)?,
        None => view.initial_variables(),
    };
    let mut store = RecordingStore::new(variables);

    match &cli.command {
        Command::Init => return Ok(serde_json::to_value(view.initial_variables())?),
        Command::Buttons => {
            let connection = read_connection(&cli.connection)?;
            let buttons = view.button_state(store.current(), &connection);
            return Ok(serde_json::to_value(buttons)?);
        }
        Command::State => {
            let state = view.state(store.current());
            let filter = view.filter_input(store.current());
            return Ok(json!({
                "page": state.page,
                "rowsPerPage": state.rows_per_page().get(),
                "direction": state.direction(),
                "filter": filter,
            }));
        }
        Command::Next | Command::Previous | Command::Page { .. } => {
            let connection = read_connection(&cli.connection)?;
            let page = view.state(store.current()).page;
            let new_page = match &cli.command {
                Command::Next => page.saturating_add(1),
                Command::Previous => page.saturating_sub(1),
                Command::Page { page } => *page,
                _ => page,
            };

            view.change_page(&mut store, &connection, new_page);
        }
        Command::Rows { rows } => view.change_rows_per_page(&mut store, *rows),
        Command::Filter {
            refs,
            statuses,
            types,
        } => {
            let input = FilterInput {
                refs: refs.clone(),
                statuses: statuses.clone(),
                types: types.clone(),
            };

            view.submit_filter(&mut store, &input);
        }
        Command::Reset => view.reset_filter(&mut store),
    }

    if cli.merged {
        return Ok(serde_json::to_value(store.current())?);
    }

    // Nothing changed, for example when paginating on an empty page
    match store.last_patch() {
        Some(patch) => Ok(serde_json::to_value(patch)?),
        None => Ok(Value::Null),
    }
}

fn read_connection(path: &Option<PathBuf>) -> Result<Connection<Value>> {
    let path = path
        .as_ref()
        .context("This command needs the latest connection result, set it with '--connection'")?;

    read_json(path)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file =
        File::open(path).with_context(|| format!("Could not open file '{}'", path.display()))?;
    let value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Could not parse JSON in '{}'", path.display()))?;

    Ok(value)
}
