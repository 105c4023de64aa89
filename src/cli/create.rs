//! Create a document owned by the connected wallet.

use super::config::AppConfig;
use super::{open_service, wallet::require_session};
use crate::document::NewDocument;

pub async fn execute(
    config: &AppConfig,
    name: String,
    file: Option<String>,
    text: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = require_session(config)?;

    let content = match (file, text) {
        (Some(path), None) => std::fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read '{}': {}", path, e))?,
        (None, Some(text)) => text,
        _ => return Err("provide document content via --file or --text".into()),
    };

    let service = open_service(config).await?;
    let document = service
        .create_document(NewDocument {
            name,
            content,
            created_by: session.address,
        })
        .await?;

    println!("📄 Created document {}", document.id);
    println!("   Name:   {}", document.name);
    println!("   Status: {}", document.status);
    println!("   Link:   {}", document.shareable_link);
    Ok(())
}
