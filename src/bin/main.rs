#![forbid(unsafe_code)]
//! SuiRandom command line interface

use clap::{Parser, Subcommand};
use colored::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use suirandom::address::SuiAddress;
use suirandom::config::{Config, DEFAULT_CONFIG_FILE};
use suirandom::crypto::KeyPair;
use suirandom::draw::{DrawOutcome, Drawer};
use suirandom::error::DrawError;
use suirandom::keystore::Keystore;
use suirandom::processing::{process_addresses, AddressReport};
use suirandom::render::{render_outcome, render_report, spinner};
use suirandom::resolver::SuiNsResolver;
use suirandom::rpc::RpcClient;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Pick random winners on Sui", long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Override the full node RPC URL
    #[arg(long, global = true)]
    rpc: Option<String>,
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and resolve an address list without drawing
    Check {
        /// Addresses and SuiNS names: `-` for stdin, `@file`, or literal text
        input: String,
        #[arg(long)]
        json: bool,
    },
    /// Simulate a draw without committing a transaction
    DryRun {
        input: String,
        /// Number of winners to select
        #[arg(short = 'n', long, default_value_t = 1)]
        num_winners: u64,
        #[arg(long)]
        json: bool,
    },
    /// Sign and execute a draw on-chain
    Draw {
        input: String,
        #[arg(short = 'n', long, default_value_t = 1)]
        num_winners: u64,
        #[arg(long)]
        json: bool,
        /// Keystore file to sign with
        #[arg(long)]
        keystore: Option<PathBuf>,
        /// Signing address, defaults to the first key in the keystore
        #[arg(long)]
        address: Option<String>,
    },
    /// Generate a new ed25519 key and add it to the keystore
    Keygen {
        #[arg(long)]
        keystore: Option<PathBuf>,
    },
    /// List keystore addresses
    Address {
        #[arg(long)]
        keystore: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "suirandom=debug"
    } else {
        "suirandom=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load(&cli.config)?;
    if let Some(rpc) = &cli.rpc {
        config.override_rpc_url(rpc)?;
    }

    match cli.command {
        Commands::Check { input, json } => {
            let report = check(&config, &input).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_report(&report));
            }
        }
        Commands::DryRun {
            input,
            num_winners,
            json,
        } => {
            let report = check(&config, &input).await?;
            if !json {
                print!("{}", render_report(&report));
            }

            let drawer = drawer(&config)?;
            drawer.validate(&report, num_winners)?;
            let pb = spinner("Simulating draw...");
            let outcome = drawer.dry_run(&report, num_winners).await;
            pb.finish_and_clear();
            print_outcome(&config, &outcome?, json)?;
        }
        Commands::Draw {
            input,
            num_winners,
            json,
            keystore,
            address,
        } => {
            let path = keystore.unwrap_or_else(|| config.keystore.path());
            let store = Keystore::load(&path)?;
            let wanted = address
                .or_else(|| config.keystore.address.clone())
                .map(|a| SuiAddress::from_str(&a))
                .transpose()?;
            let keypair = store.select(wanted.as_ref())?;

            let report = check(&config, &input).await?;
            if !json {
                print!("{}", render_report(&report));
                println!("Signing as {}", keypair.address().to_string().bright_yellow());
            }

            let drawer = drawer(&config)?;
            drawer.validate(&report, num_winners)?;
            let pb = spinner("Executing draw on-chain...");
            let outcome = drawer.draw(&report, num_winners, keypair).await;
            pb.finish_and_clear();
            print_outcome(&config, &outcome?, json)?;
        }
        Commands::Keygen { keystore } => {
            let path = keystore.unwrap_or_else(|| config.keystore.path());
            let mut store = Keystore::load(&path)?;
            let address = store.add(KeyPair::generate());
            store.save(&path)?;

            println!("{}", "🔑 New key generated".bright_green().bold());
            println!("Address:  {}", address.to_string().bright_white());
            println!("Keystore: {}", path.display());
        }
        Commands::Address { keystore } => {
            let path = keystore.unwrap_or_else(|| config.keystore.path());
            list_addresses(&path)?;
        }
    }

    Ok(())
}

fn read_input(input: &str) -> Result<String, DrawError> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else if let Some(path) = input.strip_prefix('@') {
        Ok(std::fs::read_to_string(path)?)
    } else {
        Ok(input.to_string())
    }
}

async fn check(config: &Config, input: &str) -> Result<AddressReport, DrawError> {
    let text = read_input(input)?;
    let client = Arc::new(RpcClient::new(
        config.network.resolver_url.clone(),
        config.network.request_timeout(),
    )?);
    let resolver = SuiNsResolver::new(client);

    let pb = spinner("Processing addresses...");
    let report = process_addresses(&text, &resolver, config.draw.resolve_concurrency).await;
    pb.finish_and_clear();
    Ok(report)
}

fn drawer(config: &Config) -> Result<Drawer, DrawError> {
    let client = Arc::new(RpcClient::new(
        config.network.rpc_url.clone(),
        config.network.request_timeout(),
    )?);
    Ok(Drawer::new(client, config))
}

fn print_outcome(
    config: &Config,
    outcome: &DrawOutcome,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    } else {
        println!();
        print!("{}", render_outcome(outcome, &config.network.explorer_url));
    }
    Ok(())
}

fn list_addresses(path: &Path) -> Result<(), DrawError> {
    let store = Keystore::load(path)?;
    if store.is_empty() {
        println!("{}", "No ed25519 keys found.".yellow());
        println!("Run `suirandom keygen` to create one.");
        return Ok(());
    }

    println!("{} ({})", "Keystore addresses".bright_cyan().bold(), path.display());
    for (i, address) in store.addresses().iter().enumerate() {
        println!("  {}. {}", i + 1, address.to_string().bright_white());
    }
    Ok(())
}
