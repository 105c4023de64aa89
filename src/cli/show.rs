//! Show a document by id or shareable link.

use super::config::AppConfig;
use super::{open_service, short_address};

pub async fn execute(
    config: &AppConfig,
    id: Option<i64>,
    link: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let service = open_service(config).await?;

    let document = match (id, link) {
        (Some(id), None) => service.document(id).await?,
        (None, Some(link)) => service.document_by_link(&link).await?,
        _ => return Err("provide a document id or --link".into()),
    };

    println!("📄 Document {}: {}", document.id, document.name);
    println!("   Created by: {}", short_address(&document.created_by));
    println!("   Status:     {}", document.status);
    println!("   Link:       {}", document.shareable_link);

    let signatures = service.signatures(document.id).await?;
    if !signatures.is_empty() {
        println!("   Signatures:");
        for sig in &signatures {
            println!(
                "     {} — {} at {}",
                sig.id,
                short_address(&sig.signer_address),
                sig.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
            );
        }
    }

    println!();
    println!("{}", document.content);
    Ok(())
}
