//! Storage collaborator for documents and signatures
//!
//! Trait abstraction over the two relations
//! `documents(id, name, content, created_by, shareable_link, status)` and
//! `signatures(id, document_id, signer_address, signature, timestamp)`.
//! Enables the in-memory implementation for tests and zero-setup use, and
//! the SQLite implementation for real deployments.
//!
//! `add_signature` also flips the owning document's status to `signed`;
//! the status never reverts afterwards.

pub mod memory;
pub mod sqlite;

pub use memory::MemStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::document::{Document, NewDocument, NewSignature, SignatureRecord};

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Referenced document does not exist.
    #[error("document {0} not found")]
    DocumentNotFound(i64),

    /// Database fault.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A persisted row could not be decoded into the model.
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

/// Capability set of the document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist a new document: assigns an id, generates a unique shareable
    /// link, sets status to `pending`.
    async fn create_document(&self, new: NewDocument) -> Result<Document, StoreError>;

    /// Fetch a document by id.
    async fn get_document(&self, id: i64) -> Result<Option<Document>, StoreError>;

    /// Resolve a document by its shareable link token.
    async fn get_document_by_link(&self, link: &str) -> Result<Option<Document>, StoreError>;

    /// All documents created by the given wallet address.
    async fn documents_by_creator(&self, address: &str) -> Result<Vec<Document>, StoreError>;

    /// All signatures for a document, in insertion order.
    async fn signatures(&self, document_id: i64) -> Result<Vec<SignatureRecord>, StoreError>;

    /// Persist a signature record and flip the document's status to `signed`.
    async fn add_signature(&self, new: NewSignature) -> Result<SignatureRecord, StoreError>;

    /// Replace a document's content (the re-rendered payload + signature
    /// section).
    async fn update_document_content(
        &self,
        id: i64,
        content: &str,
    ) -> Result<Document, StoreError>;
}
