/*
[INPUT]:  Zep server URL and optional api key (ZEP_API_URL, ZEP_API_KEY)
[OUTPUT]: Session, memory and search results printed to stdout
[POS]:    Examples - end-to-end memory workflow
[UPDATE]: When memory endpoints change
*/

use tracing_subscriber::EnvFilter;
use zep_client::*;

/// Example: create a session, add memory, read it back and search it
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Zep Memory Example ===\n");

    let mut config = ClientConfig::new(
        std::env::var("ZEP_API_URL").unwrap_or_else(|_| "http://localhost:8000".to_string()),
    );
    if let Ok(key) = std::env::var("ZEP_API_KEY") {
        config = config.with_api_key(key);
    }

    let client = match ZepClient::with_config(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };
    let memory = client.memory();
    let options = RequestOptions::default();
    let session_id = uuid::Uuid::new_v4().to_string();

    println!("Creating session {}...", session_id);
    match memory.add_session(&Session::new(&session_id), &options).await {
        Ok(session) => println!("✓ Session: {:?}", session.uuid),
        Err(e) => {
            println!("✗ Error: {}", e);
            return;
        }
    }

    let history = Memory::from_messages(vec![
        Message::new("human", "Who was Octavia Butler?"),
        Message::new("ai", "An American science fiction author."),
        Message::new("human", "Which of her books were adapted?"),
    ]);

    println!("\nAdding {} messages...", history.messages.len());
    match memory.add_memory(&session_id, &history, &options).await {
        Ok(reply) => println!("✓ Server replied: {}", reply),
        Err(e) => println!("✗ Error: {}", e),
    }

    println!("\nReading memory back...");
    match memory.get_memory(&session_id, None, &options).await {
        Ok(stored) => {
            for message in stored.messages {
                println!("  {}: {}", message.role, message.content);
            }
        }
        Err(e) => println!("✗ Error: {}", e),
    }

    println!("\nSearching memory...");
    let payload = MemorySearchPayload::text("science fiction adaptations");
    match memory.search_memory(&session_id, &payload, Some(3), &options).await {
        Ok(results) => {
            for result in results {
                if let Some(message) = result.message {
                    println!("  {:?} {}", result.score, message.content);
                }
            }
        }
        Err(e) => println!("✗ Error: {}", e),
    }

    println!("\n✓ Memory example complete");
}
