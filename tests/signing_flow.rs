// End-to-end signing flow: connect a wallet, create a document, collect
// signatures, share by link, and re-verify every stored signature against
// the content that keeps changing underneath them.

use countersign::wallet::EthereumKeyWallet;
use countersign::{
    extract_payload, DocumentStatus, DocumentStore, MemStore, NewDocument, SigningService,
    SqliteStore, WalletKind, WalletProvider, WalletSession,
};

async fn connect(wallet: &EthereumKeyWallet) -> WalletSession {
    let address = wallet
        .connect()
        .await
        .expect("local wallet always connects")
        .expect("local wallet never declines");
    WalletSession::new(address, WalletKind::MetaMask)
}

fn agreement(creator: &str) -> NewDocument {
    NewDocument {
        name: "Service Agreement".to_string(),
        content: "Hello".to_string(),
        created_by: creator.to_string(),
    }
}

#[tokio::test]
async fn two_party_signing_over_memory_store() {
    let service = SigningService::new(MemStore::new());

    let alice = EthereumKeyWallet::generate();
    let bob = EthereumKeyWallet::generate();
    let alice_session = connect(&alice).await;
    let bob_session = connect(&bob).await;

    // Alice creates and signs.
    let doc = service
        .create_document(agreement(&alice_session.address))
        .await
        .unwrap();
    assert_eq!(doc.status, DocumentStatus::Pending);

    service
        .sign_document(doc.id, &alice_session, &alice)
        .await
        .unwrap()
        .expect("alice signs");

    // Bob opens the document through the share link, like a counterparty
    // following an emailed URL, and co-signs.
    let shared = service.document_by_link(&doc.shareable_link).await.unwrap();
    assert_eq!(shared.id, doc.id);
    assert_eq!(shared.status, DocumentStatus::Signed);
    assert_eq!(extract_payload(&shared.content), "Hello");

    service
        .sign_document(shared.id, &bob_session, &bob)
        .await
        .unwrap()
        .expect("bob signs");

    // Both signatures verify against the final content, even though Bob's
    // append changed the content Alice signed over.
    let signatures = service.signatures(doc.id).await.unwrap();
    assert_eq!(signatures.len(), 2);
    assert_eq!(signatures[0].signer_address, alice_session.address);
    assert_eq!(signatures[1].signer_address, bob_session.address);

    for record in &signatures {
        let ok = service
            .verify_signature(doc.id, record.id, WalletKind::MetaMask)
            .await
            .unwrap();
        assert!(ok, "signature {} must verify", record.id);
    }

    // The canonical payload survived both appends.
    let doc = service.document(doc.id).await.unwrap();
    assert_eq!(extract_payload(&doc.content), "Hello");

    // Swapping in a stranger's address must fail verification, not error.
    let stranger = countersign::verify(
        "Hello",
        "0x1111111111111111111111111111111111111111",
        &signatures[0].signature,
        WalletKind::MetaMask,
    )
    .unwrap();
    assert!(!stranger);
}

#[tokio::test]
async fn signatures_survive_a_process_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("countersign.db");

    let wallet = EthereumKeyWallet::generate();
    let session = connect(&wallet).await;

    let doc_id = {
        let service = SigningService::new(SqliteStore::open(&db_path).await.unwrap());
        let doc = service
            .create_document(agreement(&session.address))
            .await
            .unwrap();
        service
            .sign_document(doc.id, &session, &wallet)
            .await
            .unwrap()
            .expect("wallet signs");
        doc.id
    };

    // Fresh pool over the same file: everything must still verify.
    let service = SigningService::new(SqliteStore::open(&db_path).await.unwrap());
    let doc = service.document(doc_id).await.unwrap();
    assert_eq!(doc.status, DocumentStatus::Signed);
    assert_eq!(extract_payload(&doc.content), "Hello");

    let signatures = service.signatures(doc_id).await.unwrap();
    assert_eq!(signatures.len(), 1);
    let ok = service
        .verify_signature(doc_id, signatures[0].id, WalletKind::MetaMask)
        .await
        .unwrap();
    assert!(ok);
}

#[tokio::test]
async fn listing_by_creator_sees_only_their_documents() {
    let store = MemStore::new();
    let service = SigningService::new(store.clone());

    let alice = EthereumKeyWallet::generate();
    let bob = EthereumKeyWallet::generate();
    let alice_session = connect(&alice).await;
    let bob_session = connect(&bob).await;

    service
        .create_document(agreement(&alice_session.address))
        .await
        .unwrap();
    service
        .create_document(agreement(&bob_session.address))
        .await
        .unwrap();
    service
        .create_document(agreement(&alice_session.address))
        .await
        .unwrap();

    let alices = store
        .documents_by_creator(&alice_session.address)
        .await
        .unwrap();
    assert_eq!(alices.len(), 2);

    let bobs = store
        .documents_by_creator(&bob_session.address)
        .await
        .unwrap();
    assert_eq!(bobs.len(), 1);
}
