//! List documents created by the connected wallet.

use super::config::AppConfig;
use super::{open_service, wallet::require_session};

pub async fn execute(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let session = require_session(config)?;
    let service = open_service(config).await?;

    let documents = service.documents_by_creator(&session.address).await?;
    if documents.is_empty() {
        println!("No documents yet. Create one with `countersign create`.");
        return Ok(());
    }

    for doc in documents {
        println!(
            "{:>4}  {:<8}  {:<24}  {}",
            doc.id,
            doc.status.as_str(),
            doc.name,
            doc.shareable_link
        );
    }
    Ok(())
}
