//! End-to-end walkthrough: build a document, edit it, reject a line break,
//! export the diff.
//!
//! Run with: `cargo run --example track_edits`

use editor::{EditorSession, Key, KeyEvent, KeyOutcome};

#[tokio::main]
async fn main() -> editor::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // A small translated document: two tracked paragraphs
    let document = dom::Document::from_json(&serde_json::json!({
        "nodeType": 9,
        "nodeName": "#document",
        "children": [{
            "nodeType": 1,
            "nodeName": "body",
            "children": [
                {
                    "nodeType": 1,
                    "nodeName": "p",
                    "attributes": { "data-odr-path": "1/0" },
                    "children": [{ "nodeType": 3, "nodeName": "#text", "nodeValue": "Hello" }]
                },
                {
                    "nodeType": 1,
                    "nodeName": "p",
                    "attributes": { "data-odr-path": "1/1" },
                    "children": [{ "nodeType": 3, "nodeName": "#text", "nodeValue": "Second paragraph" }]
                }
            ]
        }]
    }))?;

    let session = EditorSession::attach(document);

    // The user types into the first paragraph
    let para = session.find_by_path("1/0").await.ok_or_else(|| {
        editor::EditorError::Dom(dom::DomError::MalformedSnapshot(
            "tracked paragraph missing".to_string(),
        ))
    })?;
    let text = {
        let doc = session.document();
        let doc = doc.read().await;
        doc.arena().get(para)?.children_ids[0]
    };
    session.edit_text(text, "Hello world").await?;

    // The user hits Enter - not representable in this document format
    let outcome = session.handle_key(KeyEvent::plain(Key::Enter)).await?;
    println!("Enter key: {:?}", outcome);

    // The user saves
    if let KeyOutcome::Export(payload) = session
        .handle_key(KeyEvent::with_ctrl(Key::Char('s')))
        .await?
    {
        println!("payload: {}", payload);
    }

    let path = session.export_diff().await?;
    println!("diff written to {}", path.display());

    Ok(())
}
