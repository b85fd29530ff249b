//! `geo-vault`: command-line front end for the mining-rights exchange.
//!
//! ```text
//! geo-vault sites [--show-encrypted]
//! geo-vault rights <id>
//! geo-vault create --location .. --geological-data .. --area-size .. \
//!                  --estimated-value .. --duration-secs .. [--wait]
//! geo-vault bid <rights-id> <amount> [--anonymous] [--wait]
//! geo-vault status <tx-hash>
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use alloy::primitives::{Address, TxHash, U256};
use clap::{Parser, Subcommand};

use geo_vault_trade::blockchain::{BlockchainClient, TransactionHandle, TransactionTracker, TxStatus};
use geo_vault_trade::config::{self, AppConfig, ConfigError};
use geo_vault_trade::contract::{ContractGateway, CreateRightsRequest};
use geo_vault_trade::notifications::{Notification, Notifier, TracingNotifier};
use geo_vault_trade::observability::{logging, metrics};
use geo_vault_trade::survey;
use geo_vault_trade::wallet::{provider_for, WalletSession};

#[derive(Parser)]
#[command(name = "geo-vault")]
#[command(about = "Confidential RWA Rights Exchange client", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the contract address.
    #[arg(long)]
    contract: Option<String>,

    /// Override the primary RPC URL.
    #[arg(long)]
    rpc_url: Option<String>,

    /// Send notifications to the log instead of the terminal.
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the geological survey sites
    Sites {
        #[arg(long)]
        show_encrypted: bool,
    },
    /// Read a mining-rights record
    Rights { id: u64 },
    /// List new mining rights for auction
    Create {
        #[arg(long)]
        location: String,
        #[arg(long)]
        geological_data: String,
        #[arg(long)]
        area_size: u32,
        #[arg(long)]
        estimated_value: u32,
        #[arg(long)]
        duration_secs: u64,
        /// Wait for confirmation
        #[arg(long)]
        wait: bool,
    },
    /// Bid on a mining-rights auction (amount in wei)
    Bid {
        rights_id: u64,
        amount: u32,
        #[arg(long)]
        anonymous: bool,
        /// Wait for confirmation
        #[arg(long)]
        wait: bool,
    },
    /// Wait for a submitted transaction to confirm
    Status { tx_hash: TxHash },
}

/// Prints notifications for the person at the terminal.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        if notification.is_error() {
            eprintln!("✗ {}", notification);
        } else {
            eprintln!("✓ {}", notification);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Commands::Sites { show_encrypted } = cli.command {
        let views: Vec<_> = survey::sites().iter().map(|s| s.view(show_encrypted)).collect();
        let output = serde_json::json!({
            "sites": views,
            "activeTrades": survey::active_trades(show_encrypted),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let config = load(&cli)?;
    logging::init_logging(&config.observability);
    tracing::info!(
        rpc_url = %config.blockchain.rpc_url,
        chain_id = config.blockchain.chain_id,
        contract = %config.contract.address,
        wallet = %config.wallet.provider,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let contract: Address = config.contract.address.parse()?;
    let notifier: Arc<dyn Notifier> = if cli.quiet {
        Arc::new(TracingNotifier)
    } else {
        Arc::new(ConsoleNotifier)
    };
    let client = Arc::new(BlockchainClient::new(config.blockchain.clone()).await?);
    let gateway = ContractGateway::new(client.clone(), contract, notifier.clone());
    let tracker =
        TransactionTracker::new(client.clone(), &config.tracker, client.confirmation_blocks());

    match cli.command {
        Commands::Sites { .. } => {}
        Commands::Rights { id } => match gateway.read_rights_info(Some(id)).await? {
            Some(record) if record.exists() => {
                println!("{}", serde_json::to_string_pretty(&record)?);
            }
            _ => return Err(format!("Mining rights {} do not exist", id).into()),
        },
        Commands::Create {
            location,
            geological_data,
            area_size,
            estimated_value,
            duration_secs,
            wait,
        } => {
            let mut session = connect_wallet(&config, notifier.clone())?;

            let request = CreateRightsRequest {
                location,
                geological_data,
                area_size,
                estimated_value,
                auction_duration_secs: U256::from(duration_secs),
            };
            let handle = gateway.create_rights(&session, request).await?;
            print_handle(&handle);

            if wait {
                let status = tracker.wait_for_confirmation(&handle).await?;
                report_status(&status)?;
                if let Some(id) = handle.rights_id() {
                    let id = rights_key(id)?;
                    if let Some(record) = gateway.read_rights_info(Some(id)).await? {
                        println!("{}", serde_json::to_string_pretty(&record)?);
                    }
                }
            }
            session.disconnect();
        }
        Commands::Bid {
            rights_id,
            amount,
            anonymous,
            wait,
        } => {
            let mut session = connect_wallet(&config, notifier.clone())?;

            let handle = gateway.place_bid(&session, rights_id, amount, anonymous).await?;
            print_handle(&handle);

            if wait {
                let status = tracker.wait_for_confirmation(&handle).await?;
                report_status(&status)?;
            }
            session.disconnect();
        }
        Commands::Status { tx_hash } => {
            let handle = TransactionHandle::external(tx_hash);
            let status = tracker.wait_for_confirmation(&handle).await?;
            report_status(&status)?;
        }
    }

    Ok(())
}

fn load(cli: &Cli) -> Result<AppConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => config::read_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(address) = &cli.contract {
        config.contract.address = address.clone();
    }
    if let Some(url) = &cli.rpc_url {
        config.blockchain.rpc_url = url.clone();
    }
    config::validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn connect_wallet(
    config: &AppConfig,
    notifier: Arc<dyn Notifier>,
) -> Result<WalletSession, Box<dyn std::error::Error>> {
    let mut session = WalletSession::new(provider_for(config.wallet.provider)?, notifier);
    session.connect()?;
    if let Some(address) = session.state().short_address() {
        println!("wallet: {}", address);
    }
    Ok(session)
}

/// Rights ids are read back as `u64`; larger minted ids are reported, not clamped.
fn rights_key(id: U256) -> Result<u64, String> {
    u64::try_from(id).map_err(|_| format!("Rights id {} does not fit in 64 bits", id))
}

fn print_handle(handle: &TransactionHandle) {
    println!("tx_hash: {}", handle.hash());
    if let Some(id) = handle.rights_id() {
        println!("rights_id: {}", id);
    }
}

fn report_status(status: &TxStatus) -> Result<(), Box<dyn std::error::Error>> {
    println!("status: {}", status);
    match status {
        TxStatus::Confirmed { .. } => Ok(()),
        other => Err(format!("Transaction {}", other).into()),
    }
}
