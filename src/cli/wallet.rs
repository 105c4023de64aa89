//! Wallet connection commands
//!
//! `connect` asks the provider for an account and persists the session;
//! `disconnect` forgets it; `status` rehydrates and prints it. A declined
//! connection is a notice, not an error: nothing is persisted and nothing
//! is retried.

use super::config::AppConfig;
use super::short_address;
use crate::wallet::{
    EthereumKeyWallet, SessionStore, UnsupportedWallet, WalletKind, WalletProvider, WalletSession,
};

pub async fn connect(config: &AppConfig, kind: &str) -> Result<(), Box<dyn std::error::Error>> {
    let kind: WalletKind = kind.parse()?;

    let address = match kind {
        WalletKind::MetaMask => {
            let wallet = EthereumKeyWallet::load_or_generate(&config.wallet.keyfile)?;
            wallet.connect().await?
        }
        other => UnsupportedWallet::new(other).connect().await?,
    };

    let Some(address) = address else {
        println!("Connection declined. No session saved.");
        return Ok(());
    };

    let session = WalletSession::new(address, kind);
    SessionStore::new(&config.wallet.session_file).save(&session)?;

    println!("🔗 Connected {} ({})", short_address(&session.address), kind);
    println!("   Address: {}", session.address);
    Ok(())
}

pub fn disconnect(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = SessionStore::new(&config.wallet.session_file);
    match store.load()? {
        Some(session) => {
            store.clear()?;
            println!("Disconnected {}", short_address(&session.address));
        }
        None => println!("No wallet connected."),
    }
    Ok(())
}

pub fn status(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    match SessionStore::new(&config.wallet.session_file).load()? {
        Some(session) => {
            println!("Connected: {}", session.address);
            println!("Kind:      {}", session.kind);
            println!("Since:     {}", session.connected_at.format("%Y-%m-%d %H:%M:%S UTC"));
        }
        None => println!("No wallet connected."),
    }
    Ok(())
}

/// Rehydrate the persisted session, or explain how to connect.
pub(crate) fn require_session(
    config: &AppConfig,
) -> Result<WalletSession, Box<dyn std::error::Error>> {
    SessionStore::new(&config.wallet.session_file)
        .load()?
        .ok_or_else(|| "no wallet connected; run `countersign wallet connect` first".into())
}
