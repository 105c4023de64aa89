//! In-memory document store
//!
//! Mirrors the SQLite implementation's semantics exactly (id assignment,
//! link generation, status flip on first signature) so tests and zero-setup
//! runs observe the same behavior as a real deployment.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{DocumentStore, StoreError};
use crate::document::{
    generate_shareable_link, Document, DocumentStatus, NewDocument, NewSignature, SignatureRecord,
};

/// In-memory store behind a mutex.
#[derive(Clone)]
pub struct MemStore {
    state: Arc<Mutex<State>>,
}

struct State {
    documents: HashMap<i64, Document>,
    signatures: Vec<SignatureRecord>,
    next_document_id: i64,
    next_signature_id: i64,
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                documents: HashMap::new(),
                signatures: Vec::new(),
                next_document_id: 1,
                next_signature_id: 1,
            })),
        }
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemStore {
    async fn create_document(&self, new: NewDocument) -> Result<Document, StoreError> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_document_id;
        state.next_document_id += 1;

        let document = Document {
            id,
            name: new.name,
            content: new.content,
            created_by: new.created_by,
            shareable_link: generate_shareable_link(),
            status: DocumentStatus::Pending,
        };
        state.documents.insert(id, document.clone());
        Ok(document)
    }

    async fn get_document(&self, id: i64) -> Result<Option<Document>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.documents.get(&id).cloned())
    }

    async fn get_document_by_link(&self, link: &str) -> Result<Option<Document>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .documents
            .values()
            .find(|doc| doc.shareable_link == link)
            .cloned())
    }

    async fn documents_by_creator(&self, address: &str) -> Result<Vec<Document>, StoreError> {
        let state = self.state.lock().unwrap();
        let mut docs: Vec<_> = state
            .documents
            .values()
            .filter(|doc| doc.created_by == address)
            .cloned()
            .collect();
        docs.sort_by_key(|doc| doc.id);
        Ok(docs)
    }

    async fn signatures(&self, document_id: i64) -> Result<Vec<SignatureRecord>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .signatures
            .iter()
            .filter(|sig| sig.document_id == document_id)
            .cloned()
            .collect())
    }

    async fn add_signature(&self, new: NewSignature) -> Result<SignatureRecord, StoreError> {
        let mut state = self.state.lock().unwrap();

        if !state.documents.contains_key(&new.document_id) {
            return Err(StoreError::DocumentNotFound(new.document_id));
        }

        let id = state.next_signature_id;
        state.next_signature_id += 1;

        let record = SignatureRecord {
            id,
            document_id: new.document_id,
            signer_address: new.signer_address,
            signature: new.signature,
            timestamp: new.timestamp,
        };
        state.signatures.push(record.clone());

        // First signature flips the status; it never reverts.
        if let Some(doc) = state.documents.get_mut(&new.document_id) {
            doc.status = DocumentStatus::Signed;
        }

        Ok(record)
    }

    async fn update_document_content(
        &self,
        id: i64,
        content: &str,
    ) -> Result<Document, StoreError> {
        let mut state = self.state.lock().unwrap();
        let doc = state
            .documents
            .get_mut(&id)
            .ok_or(StoreError::DocumentNotFound(id))?;
        doc.content = content.to_string();
        Ok(doc.clone())
    }
}
