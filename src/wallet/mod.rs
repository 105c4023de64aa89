//! Wallet provider abstraction
//!
//! Every wallet interaction goes through the [`WalletProvider`] trait:
//! `connect`, `sign`, and `recover_signer`, dispatched by [`WalletKind`].
//! One kind (MetaMask-style Ethereum `personal_sign`) is fully implemented;
//! the other kinds are explicit [`UnsupportedWallet`] providers that report
//! "not implemented" rather than failing silently as valid or invalid.
//!
//! `connect` and `sign` are user-in-the-loop operations: a declined or
//! cancelled request yields `Ok(None)`, never an error, and is never retried
//! automatically.

pub mod ethereum;
pub mod mock;
pub mod session;

pub use ethereum::{recover_personal_signer, EthereumKeyWallet};
pub use mock::MockWallet;
pub use session::{SessionStore, WalletSession};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Supported wallet kinds. Only `MetaMask` has a complete provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletKind {
    MetaMask,
    WalletConnect,
    Coinbase,
}

impl WalletKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MetaMask => "metamask",
            Self::WalletConnect => "walletconnect",
            Self::Coinbase => "coinbase",
        }
    }
}

impl std::fmt::Display for WalletKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WalletKind {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "metamask" => Ok(Self::MetaMask),
            "walletconnect" => Ok(Self::WalletConnect),
            "coinbase" => Ok(Self::Coinbase),
            other => Err(WalletError::UnknownKind(other.to_string())),
        }
    }
}

/// Wallet operation errors.
#[derive(Debug, Error)]
pub enum WalletError {
    /// The wallet kind exists but its provider is not implemented.
    #[error("{0} wallet support is not implemented")]
    Unsupported(WalletKind),

    /// Unrecognized wallet kind string.
    #[error("unknown wallet kind: {0}")]
    UnknownKind(String),

    /// Signature value could not be decoded or has the wrong shape.
    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    /// Cryptographic recovery failed (garbage signature over this message).
    #[error("signer recovery failed: {0}")]
    Recovery(String),

    /// The requested signing address is not held by this provider.
    #[error("address {0} is not available in this wallet")]
    UnknownAddress(String),

    /// Keyfile could not be read or written.
    #[error("keyfile error: {0}")]
    Keyfile(#[from] std::io::Error),

    /// Keyfile contents are not a valid secp256k1 secret key.
    #[error("invalid key material: {0}")]
    InvalidKey(String),
}

/// Capability set exposed by a wallet of a given kind.
///
/// `connect` and `sign` may block on the user and return `Ok(None)` on
/// decline; `recover_signer` is pure CPU work and stays synchronous.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// The kind this provider implements.
    fn kind(&self) -> WalletKind;

    /// Ask the wallet for an account address. `None` means the user declined.
    async fn connect(&self) -> Result<Option<String>, WalletError>;

    /// Ask the wallet to sign `message` with `address`. `None` means the user
    /// declined or cancelled.
    async fn sign(&self, message: &str, address: &str) -> Result<Option<String>, WalletError>;

    /// Recover the address that produced `signature` over `message`.
    fn recover_signer(&self, message: &str, signature: &str) -> Result<String, WalletError> {
        recover_signer(self.kind(), message, signature)
    }
}

/// Kind-dispatched signer recovery. The single source of truth for which
/// kinds have a working recovery path.
pub fn recover_signer(
    kind: WalletKind,
    message: &str,
    signature: &str,
) -> Result<String, WalletError> {
    match kind {
        WalletKind::MetaMask => ethereum::recover_personal_signer(message, signature),
        other => Err(WalletError::Unsupported(other)),
    }
}

/// Provider for wallet kinds without an implementation. Every operation
/// reports [`WalletError::Unsupported`].
#[derive(Debug, Clone, Copy)]
pub struct UnsupportedWallet {
    kind: WalletKind,
}

impl UnsupportedWallet {
    pub fn new(kind: WalletKind) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl WalletProvider for UnsupportedWallet {
    fn kind(&self) -> WalletKind {
        self.kind
    }

    async fn connect(&self) -> Result<Option<String>, WalletError> {
        Err(WalletError::Unsupported(self.kind))
    }

    async fn sign(&self, _message: &str, _address: &str) -> Result<Option<String>, WalletError> {
        Err(WalletError::Unsupported(self.kind))
    }
}

/// Compare two wallet addresses case-insensitively.
///
/// Ethereum addresses are hex strings whose letter casing carries only an
/// optional checksum, so equality ignores case.
pub fn addresses_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}
