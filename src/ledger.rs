//! Signature ledger and verifier
//!
//! Orchestrates the signature-over-content protocol against the storage
//! collaborator and a wallet provider:
//!
//! 1. signing extracts the canonical payload from current content and asks
//!    the wallet to sign exactly that string;
//! 2. the signature record is stored (flipping the document to `signed`);
//! 3. content is re-rendered from the payload plus the *full* signature
//!    list, and persisted;
//! 4. verification re-derives the payload from whatever the content has
//!    become and recovers the signer address from the stored value.
//!
//! Concurrent appends to the same document race on the content regeneration
//! (append-then-overwrite); single-request-at-a-time per document is
//! assumed. Verification is read-only and safe to run concurrently.

use thiserror::Error;
use tracing::{debug, info};

use crate::content::{append_signatures, extract_payload};
use crate::document::{
    Document, NewDocument, NewSignature, SignatureRecord, ValidationError,
};
use crate::storage::{DocumentStore, StoreError};
use crate::wallet::{
    addresses_match, recover_signer, WalletError, WalletKind, WalletProvider, WalletSession,
};

/// Ledger operation errors.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("document {0} not found")]
    DocumentNotFound(i64),

    #[error("no document for link {0}")]
    LinkNotFound(String),

    #[error("document {document_id} has no signature {signature_id}")]
    SignatureNotFound { document_id: i64, signature_id: i64 },

    #[error(transparent)]
    Store(StoreError),

    #[error(transparent)]
    Wallet(#[from] WalletError),
}

// Surface the store's own not-found as the ledger's, so callers see one
// error shape regardless of which layer noticed first.
impl From<StoreError> for LedgerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DocumentNotFound(id) => Self::DocumentNotFound(id),
            other => Self::Store(other),
        }
    }
}

/// Check a stored signature against the canonical payload.
///
/// Reconstructs the signed message (the payload itself; the provider applies
/// its own envelope), recovers the producing address, and compares it
/// case-insensitively to the claimed signer. Unsupported wallet kinds error
/// with "not implemented" — distinct from `Ok(false)`, which means the
/// recovery worked and the address does not match.
///
/// Pure given its inputs; performs no storage access.
pub fn verify(
    payload: &str,
    signer_address: &str,
    signature_value: &str,
    kind: WalletKind,
) -> Result<bool, WalletError> {
    let recovered = recover_signer(kind, payload, signature_value)?;
    Ok(addresses_match(&recovered, signer_address))
}

/// Document signing service over a storage backend.
pub struct SigningService<S> {
    store: S,
}

impl<S: DocumentStore> SigningService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a document after validating the request.
    pub async fn create_document(&self, new: NewDocument) -> Result<Document, LedgerError> {
        new.validate()?;
        let document = self.store.create_document(new).await?;
        info!(id = document.id, link = %document.shareable_link, "document created");
        Ok(document)
    }

    /// Fetch a document by id; unknown ids are an explicit not-found.
    pub async fn document(&self, id: i64) -> Result<Document, LedgerError> {
        self.store
            .get_document(id)
            .await?
            .ok_or(LedgerError::DocumentNotFound(id))
    }

    /// Resolve a document by its shareable link.
    pub async fn document_by_link(&self, link: &str) -> Result<Document, LedgerError> {
        self.store
            .get_document_by_link(link)
            .await?
            .ok_or_else(|| LedgerError::LinkNotFound(link.to_string()))
    }

    pub async fn documents_by_creator(&self, address: &str) -> Result<Vec<Document>, LedgerError> {
        Ok(self.store.documents_by_creator(address).await?)
    }

    pub async fn signatures(&self, document_id: i64) -> Result<Vec<SignatureRecord>, LedgerError> {
        Ok(self.store.signatures(document_id).await?)
    }

    /// Full signing flow for the connected wallet.
    ///
    /// Extracts the canonical payload, asks the wallet to sign it, records
    /// the signature, and re-renders content. Returns `Ok(None)` when the
    /// user declines or cancels the wallet prompt: the operation aborts with
    /// no partial state and is never retried automatically.
    pub async fn sign_document(
        &self,
        document_id: i64,
        session: &WalletSession,
        provider: &dyn WalletProvider,
    ) -> Result<Option<SignatureRecord>, LedgerError> {
        let document = self.document(document_id).await?;
        let payload = extract_payload(&document.content).to_string();

        debug!(id = document_id, signer = %session.address, "requesting wallet signature");
        let Some(signature) = provider.sign(&payload, &session.address).await? else {
            info!(id = document_id, "signing declined by user");
            return Ok(None);
        };

        let record = self
            .record_signature(NewSignature {
                document_id,
                signer_address: session.address.clone(),
                signature,
                timestamp: chrono::Utc::now(),
            })
            .await?;
        Ok(Some(record))
    }

    /// Record an externally-produced signature and regenerate content.
    ///
    /// The signature section is rebuilt from the complete list including the
    /// new record, so the canonical payload survives unchanged (round-trip
    /// invariant) no matter how many signatures have accumulated.
    pub async fn record_signature(
        &self,
        new: NewSignature,
    ) -> Result<SignatureRecord, LedgerError> {
        new.validate()?;

        let document = self.document(new.document_id).await?;
        let payload = extract_payload(&document.content).to_string();

        let record = self.store.add_signature(new).await?;

        let all = self.store.signatures(document.id).await?;
        let content = append_signatures(&payload, &all);
        self.store
            .update_document_content(document.id, &content)
            .await?;

        info!(
            id = document.id,
            signer = %record.signer_address,
            total = all.len(),
            "signature recorded"
        );
        Ok(record)
    }

    /// Replace a document's content wholesale.
    ///
    /// The next signing or verification re-derives the canonical payload
    /// from whatever this writes; signatures made over an older payload will
    /// no longer verify against the new one.
    pub async fn update_content(&self, id: i64, content: &str) -> Result<Document, LedgerError> {
        if content.is_empty() {
            return Err(ValidationError::EmptyContent.into());
        }
        Ok(self.store.update_document_content(id, content).await?)
    }

    /// Verify one stored signature against the document's canonical payload.
    pub async fn verify_signature(
        &self,
        document_id: i64,
        signature_id: i64,
        kind: WalletKind,
    ) -> Result<bool, LedgerError> {
        let document = self.document(document_id).await?;
        let record = self
            .store
            .signatures(document_id)
            .await?
            .into_iter()
            .find(|sig| sig.id == signature_id)
            .ok_or(LedgerError::SignatureNotFound {
                document_id,
                signature_id,
            })?;

        let payload = extract_payload(&document.content);
        Ok(verify(
            payload,
            &record.signer_address,
            &record.signature,
            kind,
        )?)
    }
}
