//! SQLite document store
//!
//! Two relations mirroring the model:
//!
//! ```sql
//! documents(id, name, content, created_by, shareable_link UNIQUE, status)
//! signatures(id, document_id, signer_address, signature, timestamp)
//! ```
//!
//! Timestamps are stored as RFC 3339 text, status as its lowercase label.
//! The schema is created on open. Signature insertion order is ascending id
//! (AUTOINCREMENT), which is also the re-render order.

use std::path::Path;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use super::{DocumentStore, StoreError};
use crate::document::{
    generate_shareable_link, Document, DocumentStatus, NewDocument, NewSignature, SignatureRecord,
};
use async_trait::async_trait;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS documents (
        id             INTEGER PRIMARY KEY AUTOINCREMENT,
        name           TEXT NOT NULL,
        content        TEXT NOT NULL,
        created_by     TEXT NOT NULL,
        shareable_link TEXT NOT NULL UNIQUE,
        status         TEXT NOT NULL DEFAULT 'pending'
    )",
    "CREATE TABLE IF NOT EXISTS signatures (
        id             INTEGER PRIMARY KEY AUTOINCREMENT,
        document_id    INTEGER NOT NULL REFERENCES documents(id),
        signer_address TEXT NOT NULL,
        signature      TEXT NOT NULL,
        timestamp      TEXT NOT NULL
    )",
];

/// SQLite-backed document store.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

fn document_from_row(row: &SqliteRow) -> Result<Document, StoreError> {
    let status: String = row.get("status");
    let status = DocumentStatus::parse(&status)
        .ok_or_else(|| StoreError::Corrupt(format!("unknown document status: {status}")))?;

    Ok(Document {
        id: row.get("id"),
        name: row.get("name"),
        content: row.get("content"),
        created_by: row.get("created_by"),
        shareable_link: row.get("shareable_link"),
        status,
    })
}

fn signature_from_row(row: &SqliteRow) -> Result<SignatureRecord, StoreError> {
    let timestamp: String = row.get("timestamp");
    let timestamp = DateTime::parse_from_rfc3339(&timestamp)
        .map_err(|e| StoreError::Corrupt(format!("bad signature timestamp: {e}")))?
        .with_timezone(&Utc);

    Ok(SignatureRecord {
        id: row.get("id"),
        document_id: row.get("document_id"),
        signer_address: row.get("signer_address"),
        signature: row.get("signature"),
        timestamp,
    })
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn create_document(&self, new: NewDocument) -> Result<Document, StoreError> {
        let shareable_link = generate_shareable_link();

        let result = sqlx::query(
            "INSERT INTO documents (name, content, created_by, shareable_link, status) \
             VALUES (?, ?, ?, ?, 'pending')",
        )
        .bind(&new.name)
        .bind(&new.content)
        .bind(&new.created_by)
        .bind(&shareable_link)
        .execute(&self.pool)
        .await?;

        Ok(Document {
            id: result.last_insert_rowid(),
            name: new.name,
            content: new.content,
            created_by: new.created_by,
            shareable_link,
            status: DocumentStatus::Pending,
        })
    }

    async fn get_document(&self, id: i64) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query("SELECT * FROM documents WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(document_from_row).transpose()
    }

    async fn get_document_by_link(&self, link: &str) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query("SELECT * FROM documents WHERE shareable_link = ?")
            .bind(link)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(document_from_row).transpose()
    }

    async fn documents_by_creator(&self, address: &str) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query("SELECT * FROM documents WHERE created_by = ? ORDER BY id")
            .bind(address)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(document_from_row).collect()
    }

    async fn signatures(&self, document_id: i64) -> Result<Vec<SignatureRecord>, StoreError> {
        let rows = sqlx::query("SELECT * FROM signatures WHERE document_id = ? ORDER BY id")
            .bind(document_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(signature_from_row).collect()
    }

    async fn add_signature(&self, new: NewSignature) -> Result<SignatureRecord, StoreError> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query("SELECT id FROM documents WHERE id = ?")
            .bind(new.document_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(StoreError::DocumentNotFound(new.document_id));
        }

        let result = sqlx::query(
            "INSERT INTO signatures (document_id, signer_address, signature, timestamp) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(new.document_id)
        .bind(&new.signer_address)
        .bind(&new.signature)
        .bind(new.timestamp.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE documents SET status = 'signed' WHERE id = ?")
            .bind(new.document_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(SignatureRecord {
            id: result.last_insert_rowid(),
            document_id: new.document_id,
            signer_address: new.signer_address,
            signature: new.signature,
            timestamp: new.timestamp,
        })
    }

    async fn update_document_content(
        &self,
        id: i64,
        content: &str,
    ) -> Result<Document, StoreError> {
        let result = sqlx::query("UPDATE documents SET content = ? WHERE id = ?")
            .bind(content)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::DocumentNotFound(id));
        }

        self.get_document(id)
            .await?
            .ok_or(StoreError::DocumentNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("countersign.db"))
            .await
            .unwrap();
        (dir, store)
    }

    fn new_doc(name: &str) -> NewDocument {
        NewDocument {
            name: name.to_string(),
            content: "Hello".to_string(),
            created_by: "0xabc".to_string(),
        }
    }

    fn new_sig(document_id: i64, signer: &str) -> NewSignature {
        NewSignature {
            document_id,
            signer_address: signer.to_string(),
            signature: "0xsig".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_and_fetch_round_trip() {
        let (_dir, store) = open_store().await;
        let doc = store.create_document(new_doc("a")).await.unwrap();

        assert_eq!(doc.status, DocumentStatus::Pending);
        let fetched = store.get_document(doc.id).await.unwrap().unwrap();
        assert_eq!(fetched, doc);

        let by_link = store
            .get_document_by_link(&doc.shareable_link)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_link, doc);
    }

    #[tokio::test]
    async fn missing_document_is_none_not_error() {
        let (_dir, store) = open_store().await;
        assert_eq!(store.get_document(99).await.unwrap(), None);
        assert_eq!(store.get_document_by_link("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn signatures_persist_with_timestamps_and_order() {
        let (_dir, store) = open_store().await;
        let doc = store.create_document(new_doc("a")).await.unwrap();

        let first = store.add_signature(new_sig(doc.id, "0xAAA")).await.unwrap();
        let second = store.add_signature(new_sig(doc.id, "0xBBB")).await.unwrap();
        assert!(first.id < second.id);

        let sigs = store.signatures(doc.id).await.unwrap();
        assert_eq!(sigs.len(), 2);
        assert_eq!(sigs[0].signer_address, "0xAAA");
        assert_eq!(sigs[1].signer_address, "0xBBB");

        // RFC 3339 round-trip preserves the instant to the second.
        assert_eq!(
            sigs[0].timestamp.timestamp(),
            first.timestamp.timestamp()
        );
    }

    #[tokio::test]
    async fn first_signature_flips_status_permanently() {
        let (_dir, store) = open_store().await;
        let doc = store.create_document(new_doc("a")).await.unwrap();

        store.add_signature(new_sig(doc.id, "0xAAA")).await.unwrap();
        store.add_signature(new_sig(doc.id, "0xBBB")).await.unwrap();

        let doc = store.get_document(doc.id).await.unwrap().unwrap();
        assert_eq!(doc.status, DocumentStatus::Signed);
    }

    #[tokio::test]
    async fn add_signature_to_missing_document_is_rejected() {
        let (_dir, store) = open_store().await;
        let err = store.add_signature(new_sig(7, "0xAAA")).await.unwrap_err();
        assert!(matches!(err, StoreError::DocumentNotFound(7)));
    }

    #[tokio::test]
    async fn update_content_and_creator_listing() {
        let (_dir, store) = open_store().await;
        let doc = store.create_document(new_doc("a")).await.unwrap();
        store.create_document(new_doc("b")).await.unwrap();

        let updated = store
            .update_document_content(doc.id, "Hello\n\nsigned")
            .await
            .unwrap();
        assert_eq!(updated.content, "Hello\n\nsigned");

        let docs = store.documents_by_creator("0xabc").await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, doc.id);

        assert!(store.documents_by_creator("0xnone").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("countersign.db");

        let doc = {
            let store = SqliteStore::open(&path).await.unwrap();
            store.create_document(new_doc("a")).await.unwrap()
        };

        let store = SqliteStore::open(&path).await.unwrap();
        let fetched = store.get_document(doc.id).await.unwrap().unwrap();
        assert_eq!(fetched, doc);
    }
}
