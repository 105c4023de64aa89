//! Sign a document with the connected wallet.

use super::config::AppConfig;
use super::{open_service, short_address, wallet::require_session};
use crate::wallet::{EthereumKeyWallet, UnsupportedWallet, WalletKind, WalletProvider};

pub async fn execute(config: &AppConfig, id: i64) -> Result<(), Box<dyn std::error::Error>> {
    let session = require_session(config)?;
    let service = open_service(config).await?;

    // Resolve the provider for the session's wallet kind.
    let metamask;
    let unsupported;
    let provider: &dyn WalletProvider = match session.kind {
        WalletKind::MetaMask => {
            metamask = EthereumKeyWallet::load_or_generate(&config.wallet.keyfile)?;
            &metamask
        }
        other => {
            unsupported = UnsupportedWallet::new(other);
            &unsupported
        }
    };

    match service.sign_document(id, &session, provider).await? {
        Some(record) => {
            println!(
                "✍️  Signed document {} as {}",
                id,
                short_address(&record.signer_address)
            );
            println!("   Signature id: {}", record.id);
            println!(
                "   Timestamp:    {}",
                record.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
            );
        }
        None => println!("Signing cancelled. Document unchanged."),
    }
    Ok(())
}
