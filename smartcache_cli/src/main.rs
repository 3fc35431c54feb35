use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;
use smartcache_cli::config::{AppConfig, ConfigManager, get_config};
use smartcache_cli::error::{CliError, ExitCode};
use smartcache_cli::orchestrators::{CacheOrchestrator, DemoOptions, DemoOrchestrator};
use smartcache_cli::output::{OutputFormat, StatsReport, create_formatter};
use smartcache_cli::{paths, terminal};
use smartcache_core::{CacheType, SetOutcome};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "smartcache")]
#[command(author, version, about = "SmartCache - inspect and maintain the result cache", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Snapshot file to operate on (overrides storage.snapshot_path)
    #[arg(short, long, global = true, value_name = "PATH")]
    snapshot: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show cache statistics
    Stats {
        /// Output format (defaults to output.default_format)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Print a cached value
    Get {
        /// Cache type (cv, job, template, semantic, general)
        cache_type: String,

        /// Key within the type
        key: String,
    },

    /// Store a JSON value
    Set {
        /// Cache type (cv, job, template, semantic, general)
        cache_type: String,

        /// Key within the type
        key: String,

        /// JSON document to store
        value: String,
    },

    /// Remove expired entries
    Cleanup,

    /// Evict the oldest quarter of entries
    Evict,

    /// Remove every entry
    Clear,

    /// Run the cached operations twice to show misses turning into hits
    Demo {
        /// Simulated latency of each operation in milliseconds
        #[arg(long, default_value_t = 300)]
        latency_ms: u64,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Get a configuration value
    Get {
        /// Configuration key (e.g., cache.max_size_bytes)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., cache.max_size_bytes)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration values
    List,

    /// Print the configuration file path
    Path,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging based on debug flag
    if cli.debug {
        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_level(log::LevelFilter::Debug)
            .filter_module("smartcache_core", log::LevelFilter::Debug)
            .filter_module("smartcache_cli", log::LevelFilter::Debug)
            .format_timestamp_millis()
            .init();
        eprintln!("Debug logging enabled");
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let debug = cli.debug;
    if let Err(error) = run(cli).await {
        let cli_error = CliError::from(error);
        eprint!("{}", cli_error.format_for_user(debug));
        std::process::exit(cli_error.exit_code().code());
    }
    std::process::exit(ExitCode::Success.code());
}

async fn run(cli: Cli) -> Result<()> {
    // Commands that never touch the cache
    let command = match cli.command {
        Commands::Config { command } => return config_command(command),
        Commands::Completions { shell } => {
            generate_completions(shell);
            return Ok(());
        }
        command => command,
    };

    let config = get_config().context("Failed to load configuration")?;
    let snapshot = paths::resolve_snapshot_path(
        cli.snapshot.as_deref(),
        config.storage.snapshot_path.as_deref(),
    );
    let orchestrator = CacheOrchestrator::open(&config.cache, snapshot).await?;

    match command {
        Commands::Stats { format } => {
            let format = match format {
                Some(format) => format,
                None => OutputFormat::from_string(&config.output.default_format)?,
            };
            print_stats(&config, format, &orchestrator.stats().await)?;
        }
        Commands::Get { cache_type, key } => {
            let cache_type = parse_cache_type(&cache_type)?;
            match orchestrator.get(cache_type, &key).await? {
                Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                None => eprintln!("{}", format!("Cache miss: {cache_type}/{key}").yellow()),
            }
        }
        Commands::Set {
            cache_type,
            key,
            value,
        } => {
            let cache_type = parse_cache_type(&cache_type)?;
            match orchestrator.set(cache_type, &key, &value).await? {
                SetOutcome::Stored {
                    size_bytes,
                    evicted,
                } => {
                    eprintln!("{}", format!("Stored {cache_type}/{key} ({size_bytes} bytes)").green());
                    if evicted > 0 {
                        eprintln!("Evicted {evicted} old entries to make room");
                    }
                }
                SetOutcome::Rejected {
                    size_bytes,
                    max_size_bytes,
                } => {
                    return Err(CliError::misuse(&format!(
                        "Value of {size_bytes} bytes exceeds the cache capacity of {max_size_bytes} bytes"
                    ))
                    .into());
                }
            }
        }
        Commands::Cleanup => {
            let removed = orchestrator.cleanup().await?;
            println!("Removed {removed} expired entries");
        }
        Commands::Evict => {
            let removed = orchestrator.evict().await?;
            println!("Evicted {removed} entries");
        }
        Commands::Clear => {
            let removed = orchestrator.clear().await?;
            println!("Cleared {removed} entries");
        }
        Commands::Demo { latency_ms } => {
            let options = DemoOptions {
                latency: Duration::from_millis(latency_ms),
                ..DemoOptions::default()
            };
            let demo = DemoOrchestrator::new(orchestrator.cache().clone(), options);
            for step in demo.run().await? {
                let source = if step.from_cache {
                    "cache hit".green()
                } else {
                    "computed".yellow()
                };
                println!(
                    "round {}: {:<14} {} in {:.2}s",
                    step.round,
                    step.operation,
                    source,
                    step.elapsed.as_secs_f64()
                );
            }
            orchestrator.persist().await?;
            println!();
            print_stats(&config, OutputFormat::Text, &orchestrator.stats().await)?;
        }
        Commands::Config { .. } | Commands::Completions { .. } => {}
    }

    Ok(())
}

fn parse_cache_type(name: &str) -> Result<CacheType> {
    name.parse::<CacheType>()
        .map_err(smartcache_core::Error::from)
        .with_context(|| format!("Invalid cache type '{name}'"))
}

fn print_stats(config: &AppConfig, format: OutputFormat, report: &StatsReport) -> Result<()> {
    let use_color = terminal::should_use_color(config.output.color_enabled);
    let formatter = create_formatter(format, use_color);
    println!("{}", formatter.format_stats(report)?.trim_end());
    Ok(())
}

fn config_command(command: ConfigCommand) -> Result<()> {
    let mut manager = ConfigManager::new();

    match command {
        ConfigCommand::Get { key } => {
            println!("{}", manager.get(&key)?);
        }
        ConfigCommand::Set { key, value } => {
            manager.set(&key, &value)?;
            eprintln!("{}", format!("Set {key} = {value}").green());
            eprintln!(
                "Configuration saved to: {}",
                manager.get_config_path().display()
            );
        }
        ConfigCommand::List => {
            let items = manager.list()?;
            eprintln!("{}", "Configuration:".bold().blue());
            eprintln!("Config file: {}", manager.get_config_path().display());
            eprintln!();

            let mut current_section = None;
            for (key, value) in items {
                let (section, rest) = key.split_once('.').unwrap_or(("general", key.as_str()));
                if current_section != Some(section.to_string()) {
                    println!("[{}]", section.yellow());
                    current_section = Some(section.to_string());
                }
                println!("  {} = {}", rest.cyan(), value);
            }
        }
        ConfigCommand::Path => {
            println!("{}", manager.get_config_path().display());
        }
    }

    Ok(())
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
