//! Ethereum `personal_sign` provider (the MetaMask wallet kind)
//!
//! Implements the one fully-supported wallet kind: secp256k1 recoverable
//! ECDSA over the EIP-191 personal-message envelope. Signatures are the
//! 65-byte `r‖s‖v` form MetaMask returns from `personal_sign`, 0x-hex
//! encoded, with `v ∈ {27, 28}` (legacy) or `{0, 1}`.
//!
//! The envelope (`"\x19Ethereum Signed Message:\n" + len + message`) is
//! applied here, at hash time, on both the signing and the recovery path.
//! Callers hand over the raw canonical payload; the envelope never appears
//! in stored state, so signing and verification cannot drift apart.

use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use sha3::{Digest, Keccak256};
use std::path::Path;
use zeroize::Zeroize;

use super::{addresses_match, WalletError, WalletKind, WalletProvider};
use async_trait::async_trait;

/// Keccak-256 digest of the EIP-191 personal-message envelope.
fn personal_message_hash(message: &str) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(format!("\x19Ethereum Signed Message:\n{}", message.len()));
    hasher.update(message.as_bytes());
    hasher.finalize().into()
}

/// Derive the 0x-hex account address from a public key: last 20 bytes of
/// Keccak-256 over the uncompressed point (tag byte stripped).
fn address_from_key(key: &VerifyingKey) -> String {
    let point = key.to_encoded_point(false);
    let digest = Keccak256::digest(&point.as_bytes()[1..]);
    format!("0x{}", hex::encode(&digest[12..]))
}

/// Decode a 0x-hex `r‖s‖v` signature into its parts.
fn decode_signature(signature: &str) -> Result<(Signature, RecoveryId), WalletError> {
    let raw = signature.strip_prefix("0x").unwrap_or(signature);
    let bytes = hex::decode(raw)
        .map_err(|e| WalletError::MalformedSignature(format!("invalid hex: {e}")))?;

    if bytes.len() != 65 {
        return Err(WalletError::MalformedSignature(format!(
            "expected 65 bytes, got {}",
            bytes.len()
        )));
    }

    let sig = Signature::from_slice(&bytes[..64])
        .map_err(|e| WalletError::MalformedSignature(e.to_string()))?;

    // Legacy encodings use v = 27/28.
    let v = match bytes[64] {
        v @ 27..=28 => v - 27,
        v @ 0..=1 => v,
        v => {
            return Err(WalletError::MalformedSignature(format!(
                "recovery byte out of range: {v}"
            )))
        }
    };
    let recovery_id = RecoveryId::from_byte(v)
        .ok_or_else(|| WalletError::MalformedSignature(format!("recovery byte {v}")))?;

    Ok((sig, recovery_id))
}

/// Recover the address that produced a `personal_sign` signature over
/// `message`.
pub fn recover_personal_signer(message: &str, signature: &str) -> Result<String, WalletError> {
    let (sig, recovery_id) = decode_signature(signature)?;
    let digest = personal_message_hash(message);

    let key = VerifyingKey::recover_from_prehash(&digest, &sig, recovery_id)
        .map_err(|e| WalletError::Recovery(e.to_string()))?;

    Ok(address_from_key(&key))
}

/// Wallet backed by a locally-held secp256k1 keypair.
///
/// Stands in for the browser extension so the full connect/sign/verify flow
/// runs end to end. The secret key lives in a keyfile as 64 hex characters;
/// intermediate buffers holding key material are zeroized after use.
pub struct EthereumKeyWallet {
    signing_key: SigningKey,
    address: String,
}

impl EthereumKeyWallet {
    /// Generate a fresh random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::rngs::OsRng);
        let address = address_from_key(signing_key.verifying_key());
        Self {
            signing_key,
            address,
        }
    }

    /// Build a wallet from a 64-character hex secret.
    pub fn from_secret_hex(secret: &str) -> Result<Self, WalletError> {
        let mut bytes = hex::decode(secret.trim())
            .map_err(|e| WalletError::InvalidKey(format!("invalid hex: {e}")))?;

        let result = SigningKey::from_slice(&bytes)
            .map_err(|e| WalletError::InvalidKey(e.to_string()));
        bytes.zeroize();

        let signing_key = result?;
        let address = address_from_key(signing_key.verifying_key());
        Ok(Self {
            signing_key,
            address,
        })
    }

    /// Load the wallet from `path`, generating and persisting a new key on
    /// first use.
    pub fn load_or_generate(path: &Path) -> Result<Self, WalletError> {
        if path.exists() {
            let mut contents = std::fs::read_to_string(path)?;
            let wallet = Self::from_secret_hex(&contents);
            contents.zeroize();
            return wallet;
        }

        let wallet = Self::generate();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut secret = hex::encode(wallet.signing_key.to_bytes());
        let written = std::fs::write(path, &secret);
        secret.zeroize();
        written?;

        Ok(wallet)
    }

    /// The account address held by this wallet.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Produce a `personal_sign` signature over `message`: 65-byte `r‖s‖v`
    /// with legacy `v = 27 + parity`, 0x-hex encoded.
    pub fn sign_personal(&self, message: &str) -> Result<String, WalletError> {
        let digest = personal_message_hash(message);
        let (sig, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(&digest)
            .map_err(|e| WalletError::Recovery(e.to_string()))?;

        let mut out = [0u8; 65];
        out[..64].copy_from_slice(sig.to_bytes().as_slice());
        out[64] = 27 + recovery_id.to_byte();
        Ok(format!("0x{}", hex::encode(out)))
    }
}

impl std::fmt::Debug for EthereumKeyWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.debug_struct("EthereumKeyWallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl WalletProvider for EthereumKeyWallet {
    fn kind(&self) -> WalletKind {
        WalletKind::MetaMask
    }

    async fn connect(&self) -> Result<Option<String>, WalletError> {
        Ok(Some(self.address.clone()))
    }

    async fn sign(&self, message: &str, address: &str) -> Result<Option<String>, WalletError> {
        if !addresses_match(address, &self.address) {
            return Err(WalletError::UnknownAddress(address.to_string()));
        }
        self.sign_personal(message).map(Some)
    }
}
