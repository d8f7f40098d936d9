//! Deck status: due counts plus any stored session, as JSON.

use studyloop_core::ReviewApi;

use super::{open_engine, runtime};

pub fn run(deck: &str) -> Result<(), Box<dyn std::error::Error>> {
    let engine = open_engine()?;
    let rt = runtime()?;

    let counts = match rt.block_on(engine.api().due_counts(deck, None)) {
        Ok(counts) => counts,
        Err(e) => {
            if e.is_timeout() {
                eprintln!("review API timed out; check the configured base_url");
            }
            return Err(e.into());
        }
    };
    let info = engine.check_recoverable_session(deck);

    let status = serde_json::json!({
        "deck_id": deck,
        "counts": counts,
        "recovery": info,
    });
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
