//! Mock wallet provider for testing
//!
//! Models the user-in-the-loop behavior that real providers cannot exercise
//! deterministically: declining a connection, cancelling a signing prompt.
//! Recovery goes through the normal kind dispatch, so a mock of a supported
//! kind still performs real recovery.

use async_trait::async_trait;

use super::{WalletError, WalletKind, WalletProvider};

/// Scriptable wallet provider.
#[derive(Debug, Clone)]
pub struct MockWallet {
    kind: WalletKind,
    address: String,
    decline_connect: bool,
    decline_sign: bool,
}

impl MockWallet {
    pub fn new(kind: WalletKind, address: impl Into<String>) -> Self {
        Self {
            kind,
            address: address.into(),
            decline_connect: false,
            decline_sign: false,
        }
    }

    /// The user will decline the connection prompt.
    pub fn declining_connect(mut self) -> Self {
        self.decline_connect = true;
        self
    }

    /// The user will cancel every signing prompt.
    pub fn declining_sign(mut self) -> Self {
        self.decline_sign = true;
        self
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    fn kind(&self) -> WalletKind {
        self.kind
    }

    async fn connect(&self) -> Result<Option<String>, WalletError> {
        if self.decline_connect {
            return Ok(None);
        }
        Ok(Some(self.address.clone()))
    }

    async fn sign(&self, _message: &str, _address: &str) -> Result<Option<String>, WalletError> {
        if self.decline_sign {
            return Ok(None);
        }
        // A mock cannot produce a real signature; tests that need one use
        // EthereumKeyWallet instead.
        Ok(Some("0xmock-signature".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn declined_connect_yields_none_not_error() {
        let wallet = MockWallet::new(WalletKind::MetaMask, "0xabc").declining_connect();
        assert_eq!(wallet.connect().await.unwrap(), None);
    }

    #[tokio::test]
    async fn cancelled_sign_yields_none_not_error() {
        let wallet = MockWallet::new(WalletKind::MetaMask, "0xabc").declining_sign();
        assert_eq!(wallet.sign("m", "0xabc").await.unwrap(), None);
    }
}
