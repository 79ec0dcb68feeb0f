//! Manual smoke test for the Google Sheets and Evolution API backends.
//!
//! Exercises the effect interpreters against the real spreadsheet and
//! messaging instance configured in the environment (or `.env`).
//!
//! # Usage
//!
//! 1. Set `SPREADSHEET_ID` and `GOOGLE_CREDENTIALS_JSON` as for the server.
//!
//! 2. Optionally set `EVOLUTION_API_URL` and `EVOLUTION_API_KEY` to probe the
//!    messaging endpoint.
//!
//! 3. Optionally set `SMOKE_SEND_TO` to a phone number to send one test
//!    message to it.
//!
//! 4. Run: `cargo run --example backend_smoke`
//!
//! # Note
//!
//! By default nothing is written: the roster and the stored position are only
//! read. Set `SMOKE_WRITE_POSITION=1` to write the stored position back
//! unchanged, which also creates the `Config` worksheet if it is missing.

use std::env;

use broker_queue::config::Config;
use broker_queue::effects::{
    NotifyEffect, NotifyInterpreter, NotifyResponse, RosterEffect, RosterInterpreter,
    RosterResponse,
};
use broker_queue::queue::{current_broker, lineup, reconcile};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,broker_queue=debug".into()),
        )
        .init();

    let config = Config::from_env()?;
    let sheets = config.sheets_client()?;

    println!("\n=== Backend Smoke Test ===\n");
    println!("Spreadsheet: {}", sheets.spreadsheet_id());

    // Test 1: read the roster
    println!("\n--- ListBrokers ---");
    let roster = match sheets.interpret(RosterEffect::ListBrokers).await? {
        RosterResponse::Brokers(roster) => roster,
        other => anyhow::bail!("unexpected response: {other:?}"),
    };
    println!("  {} brokers, fingerprint {}", roster.len(), roster.fingerprint());
    for broker in &roster {
        println!("  - {} <{}> {}", broker.name, broker.contact_email, broker.phone_number);
    }

    // Test 2: read the stored position
    println!("\n--- GetStoredPosition ---");
    let stored = match sheets.interpret(RosterEffect::GetStoredPosition).await? {
        RosterResponse::Position(position) => position,
        other => anyhow::bail!("unexpected response: {other:?}"),
    };
    println!("  stored position: {stored}");

    match reconcile(stored, &roster) {
        Ok(reconciled) => {
            let current = current_broker(&roster, reconciled.current_index);
            println!(
                "  current broker: {} (index {}, changed: {})",
                current, reconciled.current_index, reconciled.changed
            );
            for entry in lineup(&roster, reconciled.current_index) {
                println!("    {}. {}", entry.place, entry.broker);
            }
        }
        Err(e) => println!("  cannot reconcile: {e}"),
    }

    // Test 3: optional write
    if env::var("SMOKE_WRITE_POSITION").is_ok_and(|v| v == "1") {
        println!("\n--- SetStoredPosition ---");
        sheets
            .interpret(RosterEffect::SetStoredPosition { position: stored })
            .await?;
        println!("  wrote position {stored} back");
    } else {
        println!("\n--- SetStoredPosition (skipped, set SMOKE_WRITE_POSITION=1) ---");
    }

    // Test 4: messaging backend
    let Some(evolution) = config.evolution_client()? else {
        println!("\n--- Evolution API not configured, skipping ---");
        return Ok(());
    };

    println!("\n--- Probe {} ---", evolution.send_url());
    match evolution.interpret(NotifyEffect::Probe).await? {
        NotifyResponse::Reachable(reachable) => println!("  reachable: {reachable}"),
        other => anyhow::bail!("unexpected response: {other:?}"),
    }

    if let Ok(number) = env::var("SMOKE_SEND_TO") {
        println!("\n--- SendText to {number} ---");
        let effect = NotifyEffect::SendText {
            number,
            text: format!("Teste de integração ({})", config.signature),
        };
        match evolution.interpret(effect).await? {
            NotifyResponse::Delivery(receipt) => println!("  {receipt:?}"),
            other => anyhow::bail!("unexpected response: {other:?}"),
        }
    } else {
        println!("\n--- SendText (skipped, set SMOKE_SEND_TO) ---");
    }

    println!("\n=== Done ===\n");
    Ok(())
}
