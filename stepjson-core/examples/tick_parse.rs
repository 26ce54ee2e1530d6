//! Spread a parse over simulated scheduler ticks.
//!
//! Run with: RUST_LOG=stepjson_core=debug cargo run --example tick_parse

use stepjson_core::{ParseStatus, Parser, TokenBudget};
use tracing_subscriber::EnvFilter;

const SAVE: &str = r#"{
    "colony": "Kepler Ridge",
    "day": "212",
    "stock": { "ore": "1200", "ice": "0.75", "parts": [] },
    "drones": [
        { "id": "1", "role": "miner", "pos": [4, 9] },
        { "id": "2", "role": "hauler", "pos": [7, 2] },
        { "id": "3", "role": "scout", "pos": [0, 0] }
    ]
}"#;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut parser = Parser::new(SAVE, TokenBudget::new(8));
    let mut tick = 0;
    loop {
        tick += 1;
        match parser.resume() {
            Ok(ParseStatus::Suspended) => println!("tick {tick:>2}: {:>3}%", parser.progress()),
            Ok(ParseStatus::Complete) => {
                println!("tick {tick:>2}: done after {} tokens", parser.tokens_scanned());
                break;
            }
            Err(err) => {
                eprintln!("{err}");
                return;
            }
        }
    }

    let Some(root) = parser.into_result() else {
        return;
    };
    println!("{root:#}");

    let drones = root.as_object().and_then(|o| o.get("drones")).map_or(0, |d| d.len());
    println!("{drones} drones");
}
