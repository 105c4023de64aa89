//! Canonical content extraction and signature section rendering
//!
//! Document content is a single mutable string: the original signable payload
//! followed (once signed) by a rendered signature section. Signing and
//! verification both operate on the *canonical payload*, which is derived
//! from content rather than stored, so the two views can never drift apart.
//!
//! # Invariants
//!
//! - `extract_payload` is idempotent: extracting twice equals extracting once
//! - Round-trip: for any payload without the delimiter and any non-empty
//!   signature list, `extract_payload(&append_signatures(p, sigs)) == p`
//! - Rendering is deterministic: the same list always produces the same
//!   section, in insertion order
//!
//! The signature section is fully regenerated on every append. Callers must
//! pass the complete current signature list, never just the newest record.

use crate::document::SignatureRecord;

/// Literal sequence separating the signable payload from the signature log.
pub const SIGNATURE_DELIMITER: &str = "\n\n=== SIGNATURES ===\n\n";

/// Separator line between rendered signature blocks.
const BLOCK_SEPARATOR: &str = "\n-----\n";

/// Recover the canonical signable payload from document content.
///
/// Returns the portion of `content` before the first occurrence of the
/// signature delimiter, or the whole string if the delimiter is absent
/// (unsigned document).
pub fn extract_payload(content: &str) -> &str {
    match content.find(SIGNATURE_DELIMITER) {
        Some(idx) => &content[..idx],
        None => content,
    }
}

/// Render one signature record as a fixed-format block.
///
/// The timestamp is shown in human-readable UTC; the stored record keeps the
/// full RFC 3339 instant.
fn render_block(record: &SignatureRecord) -> String {
    format!(
        "Signed by {}\nDate: {}\nSignature: {}",
        record.signer_address,
        record.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        record.signature,
    )
}

/// Reassemble full document content from a payload and its signature list.
///
/// Renders every record in insertion order and joins the blocks with a
/// separator line. With an empty list the payload is returned unchanged, so
/// an unsigned document never carries an empty signature section.
pub fn append_signatures(payload: &str, signatures: &[SignatureRecord]) -> String {
    if signatures.is_empty() {
        return payload.to_string();
    }

    let blocks = signatures
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR);

    format!("{}{}{}", payload, SIGNATURE_DELIMITER, blocks)
}
