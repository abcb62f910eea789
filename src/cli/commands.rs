use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::clock::{self, TimeZoneSetting};
use crate::conditions::{self, day_name, Clocks, ConditionError};
use crate::config::{self, Config};
use crate::template;

use super::exit_codes;
use super::output::{self, CacheAgeData, EvalData, OutputMode, RenderData};

/// fallback date for scripted runs when no --date is given
const TEST_DATE_ENV_VAR: &str = "IFDAY_TEST_DATE";

#[derive(Parser)]
#[command(name = "ifday")]
#[command(about = "Evaluate calendar conditions and render <ifday> blocks")]
#[command(version)]
pub struct Cli {
    /// Path to config file (overrides IFDAY_CONFIG env var and default location)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (auto-enabled when stdout is piped)
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Force text output even when stdout is piped
    #[arg(long, global = true, conflicts_with = "json")]
    pub no_json: bool,

    /// Suppress all output on success (errors still go to stderr)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log each evaluation step to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate a condition for one date
    Eval {
        /// Condition, e.g. "day in [mon..fri] AND NOT month == dec"
        condition: String,

        /// Date to evaluate on (YYYY-MM-DD [HH:MM[:SS]]), defaults to IFDAY_TEST_DATE or today
        #[arg(short, long)]
        date: Option<String>,

        /// Exit with code 3 when the condition is false
        #[arg(long)]
        check: bool,
    },

    /// Show on which days of the past week a condition holds
    Table {
        /// Condition to evaluate once per weekday
        condition: String,

        /// Base date; each row is the last matching weekday before it
        #[arg(short, long)]
        date: Option<String>,

        /// Keep month, year and weekday/weekend on the base date for every row
        #[arg(long)]
        anchored: bool,
    },

    /// Render the <ifday> blocks of a page
    Render {
        /// Page file, or - for stdin
        file: Option<PathBuf>,

        /// Date to render for, defaults to IFDAY_TEST_DATE or today
        #[arg(short, long)]
        date: Option<String>,

        /// Replace failing blocks with an error banner
        #[arg(long, conflicts_with = "hide_errors")]
        show_errors: bool,

        /// Drop failing blocks silently
        #[arg(long, conflicts_with = "show_errors")]
        hide_errors: bool,
    },

    /// Seconds a rendered page stays valid ("none" when it has no <ifday> blocks)
    CacheAge {
        /// Page file, or - for stdin
        file: Option<PathBuf>,

        /// Current time (YYYY-MM-DD [HH:MM[:SS]]), defaults to IFDAY_TEST_DATE or now
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Show config file path
    Path,
    /// Set a configuration value
    Set {
        /// Key, e.g. settings.show_errors
        key: String,
        /// Value to set
        value: String,
    },
    /// Reset configuration to defaults
    Reset,
    /// Verify configuration file for errors
    Verify,
}

pub fn execute(cli: Cli) -> Result<()> {
    let config_path = config::get_config_path_with_override(cli.config.as_deref());
    let output_mode = OutputMode::from_flags(cli.json, cli.no_json, cli.quiet);

    match cli.command {
        Commands::Eval {
            condition,
            date,
            check,
        } => {
            let config = load_config(&config_path, output_mode);
            let now = resolve_now(date.as_deref(), &config.settings.timezone(), output_mode);
            let clocks = Clocks::fixed(now.date());

            let value = match conditions::evaluate_with(&condition, &clocks) {
                Ok(value) => value,
                Err(err) => condition_failed(output_mode, &err, &config),
            };

            match output_mode {
                OutputMode::Json => output::print_json(&EvalData {
                    condition,
                    date: clocks.row.to_string(),
                    value,
                }),
                OutputMode::Text => println!("{}", value),
                OutputMode::Quiet => {}
            }

            if check && !value {
                std::process::exit(exit_codes::CONDITION_FALSE);
            }
            Ok(())
        }

        Commands::Table {
            condition,
            date,
            anchored,
        } => {
            let config = load_config(&config_path, output_mode);
            let base = resolve_now(date.as_deref(), &config.settings.timezone(), output_mode);
            let table = conditions::truth_table(&condition, base.date(), anchored);

            // invalid conditions fail the same way on every row
            if let Some(err) = table.error() {
                condition_failed(output_mode, err, &config);
            }

            match output_mode {
                OutputMode::Json => output::print_json(&table.to_json()),
                OutputMode::Text => {
                    for row in &table.rows {
                        let value = matches!(row.result, Ok(true));
                        println!("{:<10} {}  {}", day_name(row.weekday), row.clocks.row, value);
                    }
                }
                OutputMode::Quiet => {}
            }
            Ok(())
        }

        Commands::Render {
            file,
            date,
            show_errors,
            hide_errors,
        } => {
            let config = load_config(&config_path, output_mode);
            let now = resolve_now(date.as_deref(), &config.settings.timezone(), output_mode);
            let text = read_input(file.as_deref())?;

            let mut options = config.settings.render_options();
            if show_errors {
                options.show_errors = true;
            } else if hide_errors {
                options.show_errors = false;
            }

            let clocks = Clocks::fixed(now.date());
            let rendered = template::render(&text, &clocks, &options);

            match output_mode {
                OutputMode::Json => output::print_json(&RenderData {
                    date: clocks.row.to_string(),
                    blocks: template::extract_blocks(&text).len(),
                    output: rendered,
                }),
                OutputMode::Text => print!("{}", rendered),
                OutputMode::Quiet => {}
            }
            Ok(())
        }

        Commands::CacheAge { file, date } => {
            let config = load_config(&config_path, output_mode);
            let now = resolve_now(date.as_deref(), &config.settings.timezone(), output_mode);
            let text = read_input(file.as_deref())?;
            let age = template::cache_age(&text, now);

            match output_mode {
                OutputMode::Json => output::print_json(&CacheAgeData { age }),
                OutputMode::Text => match age {
                    Some(seconds) => println!("{}", seconds),
                    None => println!("none"),
                },
                OutputMode::Quiet => {}
            }
            Ok(())
        }

        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                let config = load_config(&config_path, output_mode);
                let json =
                    serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
                println!("{}", json);
                Ok(())
            }
            ConfigCommands::Path => {
                println!("{}", config_path.display());
                Ok(())
            }
            ConfigCommands::Set { key, value } => {
                let mut config = load_config(&config_path, output_mode);
                if let Err(e) = config::set_value(&mut config, &key, &value) {
                    fail(output_mode, exit_codes::INVALID_ARGS, &format!("{:#}", e));
                }
                if let Err(e) = config::save_to(&config, &config_path) {
                    fail(output_mode, exit_codes::CONFIG_ERROR, &format!("{:#}", e));
                }
                if !output_mode.is_quiet() {
                    println!("Set {} = {}", key, value);
                }
                Ok(())
            }
            ConfigCommands::Reset => {
                let config = Config::default();
                if let Err(e) = config::save_to(&config, &config_path) {
                    fail(output_mode, exit_codes::CONFIG_ERROR, &format!("{:#}", e));
                }
                if !output_mode.is_quiet() {
                    println!("Configuration reset to defaults");
                }
                Ok(())
            }
            ConfigCommands::Verify => {
                let errors = match config::verify(&config_path) {
                    Ok(errors) => errors,
                    Err(e) => fail(output_mode, exit_codes::CONFIG_ERROR, &format!("{:#}", e)),
                };

                if errors.is_empty() {
                    println!("✓ Configuration is valid: {}", config_path.display());
                    Ok(())
                } else {
                    println!(
                        "✗ Configuration has {} error(s): {}",
                        errors.len(),
                        config_path.display()
                    );
                    println!();
                    for error in &errors {
                        println!("  - {}", error);
                    }
                    std::process::exit(exit_codes::CONFIG_ERROR);
                }
            }
        },
    }
}

/// report an error and exit with `code`
fn fail(output_mode: OutputMode, code: i32, message: &str) -> ! {
    if output_mode.is_json() {
        output::print_json_error(code, message);
    } else {
        eprintln!("Error: {}", message);
    }
    std::process::exit(code);
}

/// report a condition that could not be evaluated and exit
fn condition_failed(output_mode: OutputMode, err: &ConditionError, config: &Config) -> ! {
    let suggestions = err.suggestions(config.settings.fuzzy_threshold);

    if output_mode.is_json() {
        output::print_json_condition_error(
            exit_codes::INVALID_CONDITION,
            &err.message,
            err.kind,
            suggestions,
        );
    } else {
        eprintln!("Error: {}", err.message);
        if !suggestions.is_empty() {
            eprintln!("Did you mean: {}?", suggestions.join(", "));
        }
    }
    std::process::exit(exit_codes::INVALID_CONDITION);
}

fn load_config(path: &Path, output_mode: OutputMode) -> Config {
    match config::load_from(path) {
        Ok(config) => config,
        Err(e) => fail(output_mode, exit_codes::CONFIG_ERROR, &format!("{:#}", e)),
    }
}

/// explicit --date, then IFDAY_TEST_DATE, then the current time in `tz`
fn resolve_now(date: Option<&str>, tz: &TimeZoneSetting, output_mode: OutputMode) -> NaiveDateTime {
    let parsed = match date {
        Some(date) => clock::parse_datetime(date),
        None => match std::env::var(TEST_DATE_ENV_VAR) {
            Ok(value) if !value.trim().is_empty() => clock::parse_datetime(&value)
                .with_context(|| format!("invalid {}", TEST_DATE_ENV_VAR)),
            _ => Ok(tz.now()),
        },
    };

    match parsed {
        Ok(now) => now,
        Err(e) => fail(output_mode, exit_codes::INVALID_ARGS, &format!("{:#}", e)),
    }
}

/// read a page from a file, or stdin for `-` / no file
fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read page: {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read page from stdin")?;
            Ok(text)
        }
    }
}
