//! Verify stored signatures against document content.

use super::config::AppConfig;
use super::{open_service, short_address};
use crate::wallet::{WalletError, WalletKind};

pub async fn execute(
    config: &AppConfig,
    id: i64,
    signature: Option<i64>,
    kind: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let kind: WalletKind = kind.parse()?;
    let service = open_service(config).await?;

    let document = service.document(id).await?;
    let records = service.signatures(document.id).await?;
    if records.is_empty() {
        println!("Document {} has no signatures.", id);
        return Ok(());
    }

    let selected: Vec<_> = match signature {
        Some(sig_id) => records.into_iter().filter(|r| r.id == sig_id).collect(),
        None => records,
    };
    if selected.is_empty() {
        return Err(format!("document {} has no such signature", id).into());
    }

    for record in selected {
        let result = service.verify_signature(id, record.id, kind).await;
        let label = match result {
            Ok(true) => "✅ valid".to_string(),
            Ok(false) => "❌ INVALID".to_string(),
            Err(crate::ledger::LedgerError::Wallet(WalletError::Unsupported(k))) => {
                format!("⚠️  not supported ({k})")
            }
            Err(e) => return Err(e.into()),
        };
        println!(
            "Signature {} by {}: {}",
            record.id,
            short_address(&record.signer_address),
            label
        );
    }
    Ok(())
}
