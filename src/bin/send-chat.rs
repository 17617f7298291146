//! Dhonk Craft chat client utility
//!
//! Posts one message to a running chat backend and prints the answer.
//! Handy for smoke-testing a deployment without the website frontend.
//!
//! ## Usage
//!
//! ```bash
//! # Ask the local server a question
//! send-chat --message "Where can I buy a tote bag?"
//!
//! # Target a deployed server
//! send-chat --server https://dhonkcraft.example.com --message "नमस्ते"
//! ```

use clap::Parser;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(
    name = "send-chat",
    about = "Send a message to a running Dhonk Craft chat backend"
)]
struct Args {
    /// Message to send
    #[arg(long, required = true)]
    message: String,

    /// Server base URL
    #[arg(long, default_value = "http://localhost:5000")]
    server: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let url = format!("{}/chat", args.server.trim_end_matches('/'));
    println!("📤 Sending message to {url}");
    println!("   Message: {}", args.message);

    let client = reqwest::Client::new();
    let response = client
        .post(&url)
        .json(&json!({"message": args.message}))
        .send()
        .await?;

    let status = response.status();
    let body: Value = response.json().await?;
    let answer = body["answer"].as_str().unwrap_or_default();

    if status.is_success() {
        println!("\n✓ {answer}");
    } else {
        eprintln!("\n✗ Server returned {status}: {answer}");
        std::process::exit(1);
    }

    Ok(())
}
