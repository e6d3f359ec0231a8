//! Binary entrypoint for the shopkeep CLI.
//!
//! Commands:
//! - `init` - create a starter `config.toml` and the data directory layout
//! - `refresh` - run one curation run and print the new session specials
//! - `specials` - print the current session specials
//! - `pricing [--samples <n>]` - print the rarity price tables
//! - `party` - list characters, their parsed levels and the eligible pool
//!
//! See the library crate docs for module-level details: `shopkeep::`.
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{error, info, warn};

use shopkeep::config::Config;
use shopkeep::curation::level::{filter_by_level, parse_level, party_level};
use shopkeep::curation::pricing::{
    format_gold, format_pricing_table, CONSUMABLE_PRICING_TABLE, PRICING_TABLE,
};
use shopkeep::storage::{format_item_list, Storage};

#[derive(Parser)]
#[command(name = "shopkeep")]
#[command(about = "Curates personalized magic item specials for a tabletop party")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a default configuration and data layout
    Init,
    /// Ask the curator for new session specials
    Refresh,
    /// Show the current session specials
    Specials,
    /// Show the rarity price tables
    Pricing {
        /// Sample rolls to show per tier
        #[arg(short, long, default_value_t = 0)]
        samples: usize,
    },
    /// Show characters, party level and eligible item count
    Party,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            init_logging(&None, cli.verbose);
            info!("Initializing new shopkeep configuration");
            let cfg = Config::default();
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);

            tokio::fs::create_dir_all(cfg.storage.characters_path()).await?;
            for path in cfg.storage.magic_item_paths() {
                if let Some(parent) = path.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                if tokio::fs::metadata(&path).await.is_err() {
                    tokio::fs::write(&path, "{\n  \"items\": []\n}\n").await?;
                }
            }
            info!("Initialized data layout under {}", cfg.storage.data_dir);
        }
        Commands::Refresh => {
            let config = Config::load(&cli.config).await?;
            init_logging(&Some(config.clone()), cli.verbose);
            info!("Starting shopkeep v{}", env!("CARGO_PKG_VERSION"));
            refresh(config).await?;
        }
        Commands::Specials => {
            let config = Config::load(&cli.config).await?;
            init_logging(&Some(config.clone()), cli.verbose);
            let storage = Storage::new(&config.storage);
            let entries = storage.load_session_specials().await?;
            println!("{} - Session Specials\n", config.shop.name);
            print!("{}", format_item_list(&entries));
            println!();
        }
        Commands::Pricing { samples } => {
            init_logging(&None, cli.verbose);
            println!("{}", format_pricing_table());
            if samples > 0 {
                let mut rng = rand::thread_rng();
                for (title, table) in [
                    ("Standard", &PRICING_TABLE[..]),
                    ("Consumable", &CONSUMABLE_PRICING_TABLE[..]),
                ] {
                    println!("{} sample rolls:", title);
                    for tier in table {
                        let rolls: Vec<String> = (0..samples)
                            .map(|_| format_gold(tier.roll_price(&mut rng)))
                            .collect();
                        println!("  {:<10} {}", tier.label, rolls.join(", "));
                    }
                }
            }
        }
        Commands::Party => {
            let config = Config::load(&cli.config).await?;
            init_logging(&Some(config.clone()), cli.verbose);
            let storage = Storage::new(&config.storage);
            let characters = storage.load_characters().await?;
            if characters.is_empty() {
                println!("No characters found in {}", storage.characters_dir().display());
                return Ok(());
            }
            for c in &characters {
                println!(
                    "{:<24} {:<28} level {}",
                    c.name,
                    c.class_level,
                    parse_level(&c.class_level)
                );
            }
            let level = party_level(&characters);
            let pool = storage.load_magic_items().await?;
            let eligible = filter_by_level(&pool, level);
            println!(
                "\nParty level {} - {} of {} items eligible",
                level,
                eligible.len(),
                pool.len()
            );
        }
    }

    Ok(())
}

#[cfg(feature = "ollama")]
async fn refresh(config: Config) -> Result<()> {
    use shopkeep::curation::Curator;
    use shopkeep::model::ollama::OllamaClient;

    let model = OllamaClient::from_config(&config.curator);
    info!("Using curator model {} at {}", model.model(), model.chat_url());
    let curator = Curator::new(model, Storage::new(&config.storage), config.curator.clone());

    match curator.refresh_session_specials().await {
        Ok(outcome) => {
            for warning in &outcome.warnings {
                warn!("{}", warning);
            }
            println!(
                "{} presents {} session specials (party level {}, {} items eligible)\n",
                config.shop.shopkeeper,
                outcome.entries.len(),
                outcome.party_level,
                outcome.eligible_items
            );
            print!("{}", format_item_list(&outcome.entries));
            println!();
            Ok(())
        }
        Err(e) => {
            if let Some(raw) = e.raw_response() {
                error!("Curator response was: {}", shopkeep::logutil::escape_log(raw));
            }
            Err(e.into())
        }
    }
}

#[cfg(not(feature = "ollama"))]
async fn refresh(_config: Config) -> Result<()> {
    error!("refresh requires the 'ollama' feature");
    eprintln!("Compile with: cargo build --features ollama");
    std::process::exit(2);
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .map(|c| c.logging.level_filter())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config
        .as_ref()
        .and_then(|c| c.logging.file.as_ref())
        .and_then(|file| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
                .ok()
        });

    if let Some(f) = log_file {
        let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        // Console output only when attached to a terminal
        let is_tty = atty::is(atty::Stream::Stdout);
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = write_mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }
    let _ = builder.try_init();
}
