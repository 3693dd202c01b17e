use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use client_core::{config::load_settings, HttpSessionApi, SessionStore, UserPrompt, WalletController};

#[derive(Parser, Debug)]
struct Args {
    /// Backend API base URL; falls back to client.toml / defaults.
    #[arg(long)]
    api_url: Option<String>,
    /// Kilo-cycles to mint; omit to only re-check the open invoice.
    #[arg(long)]
    mint: Option<String>,
}

struct StdioPrompt;

impl UserPrompt for StdioPrompt {
    fn confirm(&self, message: &str) -> bool {
        println!("{message} [y/N]");
        let mut line = String::new();
        if std::io::stdin().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim(), "y" | "Y" | "yes")
    }

    fn alert(&self, message: &str) {
        eprintln!("ALERT: {message}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();
    let settings = load_settings();
    let api_url = args.api_url.unwrap_or_else(|| settings.api_url.clone());
    println!(
        "{} wallet (token: {})",
        settings.platform_name, settings.token_symbol
    );

    let api = Arc::new(HttpSessionApi::new(api_url));
    let store = Arc::new(SessionStore::new());
    store.reload(api.as_ref()).await?;

    let mut wallet = WalletController::new(api, store, Arc::new(StdioPrompt));
    wallet.mount().await?;

    match args.mint {
        Some(input) => wallet.mint(&input).await?,
        None => wallet.check_payment().await?,
    }

    if let Some(instructions) = wallet.deposit_instructions() {
        println!("{instructions}");
    }
    if wallet.awaiting_user_creation() {
        println!("Invoice paid; proceed to user creation.");
    }
    if let Some(status) = wallet.status() {
        println!("{status}");
    }
    for record in wallet.transactions() {
        println!(
            "#{} {} {} -> {} {} ICP",
            record.id, record.timestamp, record.from, record.to, record.e8s
        );
    }

    Ok(())
}
