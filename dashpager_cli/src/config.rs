// SPDX-License-Identifier: AGPL-3.0-or-later

use std::num::NonZeroU64;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use dashpager::Configuration;
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Serialize, Serializer};

const CONFIG_FILE_NAME: &str = "dashpager.toml";

const ENV_PREFIX: &str = "DASHPAGER_";

/// Evaluate one interaction with a paginated list view and print the resulting variable patch.
#[derive(Parser, Debug)]
#[command(name = "dashpager", long_about = None, version)]
pub struct Cli {
    /// Path to an optional "dashpager.toml" file for further configuration.
    ///
    /// When not set the program will try to find a `dashpager.toml` file in the same folder the
    /// program is executed in and otherwise in the regarding operation systems XDG config
    /// directory ("$HOME/.config/dashpager/dashpager.toml" on Linux).
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Path to a JSON file holding the current query variables of the view. Defaults to the
    /// variables of a freshly loaded view.
    #[arg(short = 'v', long, value_name = "PATH")]
    pub variables: Option<PathBuf>,

    /// Path to a JSON file holding the latest connection result with `edges` and `pageInfo`.
    /// Required for commands which depend on the current page.
    #[arg(short = 'n', long, value_name = "PATH")]
    pub connection: Option<PathBuf>,

    /// Print all variables after merging the patch instead of only the patch.
    #[arg(short = 'm', long)]
    pub merged: bool,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Command,
}

/// Configuration values set on the command line.
///
/// All arguments are optional and don't get serialized to Figment when they're None. This is to
/// assure that default values do not overwrite all previous settings, especially when they haven't
/// been set.
#[derive(Args, Serialize, Debug, Default)]
pub struct Overrides {
    /// Number of rows per page when the variables do not hold one yet. Defaults to 10.
    #[arg(short = 'r', long, value_name = "ROWS")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_per_page: Option<u64>,

    /// Prefix of the connection variables, "orders" turns "first" into "orders_first".
    #[arg(short = 'p', long, value_name = "PREFIX")]
    #[serde(
        rename = "variables",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_prefix"
    )]
    pub prefix: Option<String>,

    /// Mirror variable changes into the URL of the view. Defaults to false.
    #[arg(
        short = 'u',
        long,
        value_name = "BOOL",
        default_missing_value = "true",
        num_args = 0..=1,
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_to_url: Option<bool>,
}

/// Interaction to evaluate.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the variables of a freshly loaded view.
    Init,

    /// Print which page buttons are enabled for the given connection.
    Buttons,

    /// Print the current page, page size, direction and active filters.
    State,

    /// Move one page forward.
    Next,

    /// Move one page back.
    Previous,

    /// Move towards the given page number, one page at a time.
    Page {
        /// Page number reported by the pagination widget.
        page: u64,
    },

    /// Change the number of rows per page. Restarts at the first page.
    Rows {
        /// New page size.
        rows: NonZeroU64,
    },

    /// Apply filter predicates. Restarts at the first page.
    Filter {
        /// Whitespace separated references.
        #[arg(long, default_value = "")]
        refs: String,

        /// Status to filter by, repeat for multiple values.
        #[arg(long = "status", value_name = "STATUS")]
        statuses: Vec<String>,

        /// Type to filter by, repeat for multiple values.
        #[arg(long = "type", value_name = "TYPE")]
        types: Vec<String>,
    },

    /// Clear all filter predicates. Restarts at the first page.
    Reset,
}

/// Get configuration from 1. defaults, 2. .toml file, 3. environment variables and 4. command line
/// arguments (in that order, meaning that later configuration sources take precedence over the
/// earlier ones).
pub fn load_config(cli: &Cli) -> Result<(Option<PathBuf>, Configuration)> {
    // Determine if a config file path was provided or if we should look for it in common locations
    let config_file_path = match &cli.config {
        Some(path) => {
            if !path.exists() {
                bail!("Config file '{}' does not exist", path.display());
            }

            Some(path.clone())
        }
        None => try_determine_config_file_path(),
    };

    let mut figment = Figment::from(Serialized::defaults(Configuration::default()));
    if let Some(path) = &config_file_path {
        figment = figment.merge(Toml::file(path));
    }

    let config: Configuration = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .merge(Serialized::defaults(&cli.overrides))
        .extract()?;

    config.validate()?;

    Ok((config_file_path, config))
}

fn try_determine_config_file_path() -> Option<PathBuf> {
    // Find config file in current folder
    let mut current_dir = std::env::current_dir().ok()?;
    current_dir.push(CONFIG_FILE_NAME);

    // Find config file in XDG config folder
    let mut xdg_config_dir: PathBuf = ProjectDirs::from("", "", "dashpager")?
        .config_dir()
        .to_path_buf();
    xdg_config_dir.push(CONFIG_FILE_NAME);

    [current_dir, xdg_config_dir]
        .iter()
        .find(|path| path.exists())
        .cloned()
}

fn serialize_prefix<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    #[derive(Serialize)]
    struct Prefix<'a> {
        prefix: &'a str,
    }

    match value {
        Some(prefix) => Prefix { prefix }.serialize(serializer),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::Parser;
    use dashpager::VariableNames;
    use tempfile::NamedTempFile;

    use super::{load_config, Cli, Command};

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn file_values_are_overwritten_by_arguments() {
        let file = config_file(
            r#"
            rows_per_page = 25
            add_to_url = true

            [variables]
            prefix = "products"

            [filters]
            statuses = "state"
            "#,
        );
        let path = file.path().to_str().unwrap();

        let cli = Cli::parse_from(["dashpager", "--config", path, "--prefix", "orders", "init"]);
        let (config_file_path, config) = load_config(&cli).unwrap();

        assert_eq!(config_file_path.as_deref(), Some(file.path()));
        assert_eq!(config.rows_per_page, 25);
        assert!(config.add_to_url);
        assert_eq!(config.variables, VariableNames::with_prefix("orders"));
        assert_eq!(config.filters.statuses, "state");
        assert_eq!(config.filters.refs, "ref");
    }

    #[test]
    fn reject_invalid_configuration() {
        let file = config_file("rows_per_page = 30");
        let path = file.path().to_str().unwrap();

        let cli = Cli::parse_from(["dashpager", "-c", path, "init"]);
        assert!(load_config(&cli).is_err());

        let cli = Cli::parse_from(["dashpager", "-c", path, "-r", "25", "init"]);
        assert_eq!(load_config(&cli).unwrap().1.rows_per_page, 25);
    }

    #[test]
    fn missing_config_file() {
        let cli = Cli::parse_from(["dashpager", "-c", "/does/not/exist.toml", "init"]);
        assert!(load_config(&cli).is_err());
    }

    #[test]
    fn parse_filter_command() {
        let cli = Cli::parse_from([
            "dashpager", "filter", "--refs", "A B", "--status", "CREATED", "--status", "ACTIVE",
        ]);

        match cli.command {
            Command::Filter {
                refs,
                statuses,
                types,
            } => {
                assert_eq!(refs, "A B");
                assert_eq!(statuses, vec!["CREATED", "ACTIVE"]);
                assert!(types.is_empty());
            }
            command => panic!("Unexpected command {:?}", command),
        }
    }
}
