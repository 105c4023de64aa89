use clap::{Parser, Subcommand};

pub mod config;
pub mod create;
pub mod list;
pub mod show;
pub mod sign;
pub mod verify;
pub mod wallet;

use config::AppConfig;

#[derive(Parser)]
#[command(name = "countersign")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Wallet-based document co-signing", long_about = None)]
pub struct Cli {
    /// Path to config file (default: platform data dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage the wallet connection
    Wallet {
        #[command(subcommand)]
        command: WalletCommands,
    },

    /// Create a new document
    Create {
        /// Document name
        #[arg(long)]
        name: String,

        /// Read document content from a file
        #[arg(long, conflicts_with = "text")]
        file: Option<String>,

        /// Inline document content
        #[arg(long)]
        text: Option<String>,
    },

    /// Sign a document with the connected wallet
    Sign {
        /// Document id
        id: i64,
    },

    /// Verify stored signatures against document content
    Verify {
        /// Document id
        id: i64,

        /// Verify a single signature by id (default: all)
        #[arg(long)]
        signature: Option<i64>,

        /// Wallet kind used for recovery
        #[arg(long, default_value = "metamask")]
        kind: String,
    },

    /// Show a document by id or shareable link
    Show {
        /// Document id
        #[arg(conflicts_with = "link")]
        id: Option<i64>,

        /// Shareable link token
        #[arg(long)]
        link: Option<String>,
    },

    /// List documents created by the connected wallet
    List,
}

#[derive(Subcommand)]
pub enum WalletCommands {
    /// Connect a wallet and persist the session
    Connect {
        /// Wallet kind (metamask, walletconnect, coinbase)
        #[arg(long, default_value = "metamask")]
        kind: String,
    },

    /// Disconnect and forget the persisted session
    Disconnect,

    /// Show the current session
    Status,
}

/// Initialize tracing from the configured level; `RUST_LOG` wins when set.
fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub async fn execute(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load_or_create(cli.config)?;
    init_tracing(&config);

    match cli.command {
        Commands::Wallet { command } => match command {
            WalletCommands::Connect { kind } => wallet::connect(&config, &kind).await,
            WalletCommands::Disconnect => wallet::disconnect(&config),
            WalletCommands::Status => wallet::status(&config),
        },
        Commands::Create { name, file, text } => create::execute(&config, name, file, text).await,
        Commands::Sign { id } => sign::execute(&config, id).await,
        Commands::Verify {
            id,
            signature,
            kind,
        } => verify::execute(&config, id, signature, &kind).await,
        Commands::Show { id, link } => show::execute(&config, id, link).await,
        Commands::List => list::execute(&config).await,
    }
}

/// Open the signing service over the configured SQLite database.
pub(crate) async fn open_service(
    config: &AppConfig,
) -> Result<crate::ledger::SigningService<crate::storage::SqliteStore>, Box<dyn std::error::Error>>
{
    if let Some(parent) = config.storage.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = crate::storage::SqliteStore::open(&config.storage.database_path).await?;
    Ok(crate::ledger::SigningService::new(store))
}

/// Shorten a wallet address for display: 0x1234…abcd.
pub(crate) fn short_address(address: &str) -> String {
    if address.len() > 10 {
        format!("{}…{}", &address[..6], &address[address.len() - 4..])
    } else {
        address.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_wallet_connect_defaults_to_metamask() {
        let cli = Cli::parse_from(["countersign", "wallet", "connect"]);
        match cli.command {
            Commands::Wallet {
                command: WalletCommands::Connect { kind },
            } => assert_eq!(kind, "metamask"),
            _ => panic!("Expected wallet connect"),
        }
    }

    #[test]
    fn cli_parse_create_with_text() {
        let cli = Cli::parse_from([
            "countersign",
            "create",
            "--name",
            "Agreement",
            "--text",
            "Hello",
        ]);
        match cli.command {
            Commands::Create { name, file, text } => {
                assert_eq!(name, "Agreement");
                assert_eq!(file, None);
                assert_eq!(text, Some("Hello".to_string()));
            }
            _ => panic!("Expected create"),
        }
    }

    #[test]
    fn cli_parse_sign_and_verify() {
        let cli = Cli::parse_from(["countersign", "sign", "3"]);
        match cli.command {
            Commands::Sign { id } => assert_eq!(id, 3),
            _ => panic!("Expected sign"),
        }

        let cli = Cli::parse_from(["countersign", "verify", "3", "--signature", "1"]);
        match cli.command {
            Commands::Verify {
                id,
                signature,
                kind,
            } => {
                assert_eq!(id, 3);
                assert_eq!(signature, Some(1));
                assert_eq!(kind, "metamask");
            }
            _ => panic!("Expected verify"),
        }
    }

    #[test]
    fn cli_parse_show_by_link() {
        let cli = Cli::parse_from(["countersign", "show", "--link", "abc123"]);
        match cli.command {
            Commands::Show { id, link } => {
                assert_eq!(id, None);
                assert_eq!(link, Some("abc123".to_string()));
            }
            _ => panic!("Expected show"),
        }
    }

    #[test]
    fn short_address_elides_the_middle() {
        assert_eq!(
            short_address("0x1234567890abcdef1234567890abcdef12345678"),
            "0x1234…5678"
        );
        assert_eq!(short_address("0xabc"), "0xabc");
    }
}
