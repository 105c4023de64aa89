//! Document and signature data model
//!
//! Two relations, mirrored by the storage layer:
//! `documents(id, name, content, created_by, shareable_link, status)` and
//! `signatures(id, document_id, signer_address, signature, timestamp)`.
//!
//! A document's status moves `pending -> signed` when its first signature
//! lands and never reverts; further signatures are accepted while `signed`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Length of the generated shareable link token (URL-safe alphanumerics).
pub const SHAREABLE_LINK_LEN: usize = 21;

/// Validation failures for incoming create/sign payloads.
///
/// Reported to the caller before any mutation happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("document name must not be empty")]
    EmptyName,

    #[error("document content must not be empty")]
    EmptyContent,

    #[error("creator address must not be empty")]
    EmptyCreator,

    #[error("signer address must not be empty")]
    EmptySigner,

    #[error("signature value must not be empty")]
    EmptySignature,
}

/// Document lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// No signatures yet.
    Pending,
    /// At least one signature recorded. Terminal: never reverts to pending.
    Signed,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Signed => "signed",
        }
    }

    /// Parse the persisted status column.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "signed" => Some(Self::Signed),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Store-assigned identifier.
    pub id: i64,
    pub name: String,
    /// Base payload plus, once signed, the appended signature section.
    pub content: String,
    /// Wallet address of the creator.
    pub created_by: String,
    /// Unique opaque token for link-based sharing.
    pub shareable_link: String,
    pub status: DocumentStatus,
}

/// A stored signature record. Insertion order (ascending id) defines display
/// and re-render order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    pub id: i64,
    pub document_id: i64,
    pub signer_address: String,
    /// Opaque 0x-hex signature value produced by the wallet.
    pub signature: String,
    /// Instant of signing; persisted as an RFC 3339 string.
    pub timestamp: DateTime<Utc>,
}

/// Create-document request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDocument {
    pub name: String,
    pub content: String,
    pub created_by: String,
}

impl NewDocument {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.content.is_empty() {
            return Err(ValidationError::EmptyContent);
        }
        if self.created_by.trim().is_empty() {
            return Err(ValidationError::EmptyCreator);
        }
        Ok(())
    }
}

/// Add-signature request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSignature {
    pub document_id: i64,
    pub signer_address: String,
    pub signature: String,
    pub timestamp: DateTime<Utc>,
}

impl NewSignature {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.signer_address.trim().is_empty() {
            return Err(ValidationError::EmptySigner);
        }
        if self.signature.trim().is_empty() {
            return Err(ValidationError::EmptySignature);
        }
        Ok(())
    }
}

/// Generate a shareable link token: 21 URL-safe random alphanumerics.
pub fn generate_shareable_link() -> String {
    use rand::distributions::Alphanumeric;
    use rand::Rng;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SHAREABLE_LINK_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_column_text() {
        for status in [DocumentStatus::Pending, DocumentStatus::Signed] {
            assert_eq!(DocumentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(DocumentStatus::parse("revoked"), None);
    }

    #[test]
    fn new_document_validation() {
        let valid = NewDocument {
            name: "Agreement".to_string(),
            content: "Hello".to_string(),
            created_by: "0xabc".to_string(),
        };
        assert!(valid.validate().is_ok());

        let mut doc = valid.clone();
        doc.name = "  ".to_string();
        assert_eq!(doc.validate(), Err(ValidationError::EmptyName));

        let mut doc = valid.clone();
        doc.content = String::new();
        assert_eq!(doc.validate(), Err(ValidationError::EmptyContent));

        let mut doc = valid;
        doc.created_by = String::new();
        assert_eq!(doc.validate(), Err(ValidationError::EmptyCreator));
    }

    #[test]
    fn new_signature_validation() {
        let valid = NewSignature {
            document_id: 1,
            signer_address: "0xabc".to_string(),
            signature: "0xdeadbeef".to_string(),
            timestamp: Utc::now(),
        };
        assert!(valid.validate().is_ok());

        let mut sig = valid.clone();
        sig.signer_address = String::new();
        assert_eq!(sig.validate(), Err(ValidationError::EmptySigner));

        let mut sig = valid;
        sig.signature = " ".to_string();
        assert_eq!(sig.validate(), Err(ValidationError::EmptySignature));
    }

    #[test]
    fn shareable_links_are_unique_enough() {
        let a = generate_shareable_link();
        let b = generate_shareable_link();
        assert_eq!(a.len(), SHAREABLE_LINK_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }
}
