//! Replay or discard pending reviews for a deck.

use super::{open_engine, runtime};

pub fn run(deck: &str, discard: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = open_engine()?;

    if discard {
        engine.discard_recovered_session(deck);
        println!("discarded stored session for deck {deck}");
        return Ok(());
    }

    let rt = runtime()?;
    let outcome = rt.block_on(engine.sync_pending_reviews(deck));
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    if !outcome.success {
        std::process::exit(1);
    }
    Ok(())
}
