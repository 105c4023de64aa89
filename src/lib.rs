//! Countersign - Wallet-Based Document Co-Signing
//!
//! Documents carry their own audit trail: every signature is appended into
//! the document content as a rendered block, and the signable payload is
//! re-derived from that content whenever another party signs or verifies.
//!
//! Key principles:
//! - The canonical payload is derived, never stored
//! - The signature section is fully regenerated on every append
//! - Verification recovers the signer address from the stored value
//! - Wallet prompts are user-in-the-loop; a decline is "no result"

pub mod cli;
pub mod content;
pub mod document;
pub mod ledger;
pub mod storage;
pub mod wallet;

pub use content::{append_signatures, extract_payload, SIGNATURE_DELIMITER};
pub use document::{Document, DocumentStatus, NewDocument, NewSignature, SignatureRecord};
pub use ledger::{verify, LedgerError, SigningService};
pub use storage::{DocumentStore, MemStore, SqliteStore, StoreError};
pub use wallet::{WalletError, WalletKind, WalletProvider, WalletSession};
