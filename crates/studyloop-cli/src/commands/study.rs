//! Interactive study loop.

use clap::Args;
use studyloop_core::{
    Config, Event, Rating, ReviewApi, SessionConfig, SessionStatus, SessionSummary,
};

use super::{open_engine, runtime, CliEngine};

#[derive(Args)]
pub struct StudyArgs {
    /// Deck identifier
    #[arg(long)]
    pub deck: String,
    /// Deck display name (defaults to the id)
    #[arg(long)]
    pub name: Option<String>,
    /// Maximum cards this session (defaults from config)
    #[arg(long)]
    pub max: Option<u32>,
    /// Comma-separated tag filter
    #[arg(long)]
    pub tags: Option<String>,
    /// Prefetch interval previews on flip
    #[arg(long)]
    pub previews: bool,
}

pub fn run(args: StudyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut engine = open_engine()?;
    let rt = runtime()?;

    rt.block_on(async {
        handle_recovery(&mut engine, &args.deck).await?;

        let session_config = SessionConfig {
            deck_id: args.deck.clone(),
            deck_name: args.name.clone().unwrap_or_else(|| args.deck.clone()),
            max_cards: args.max.unwrap_or(config.study.default_max_cards),
            tag_filter: args
                .tags
                .as_ref()
                .map(|t| t.split(',').map(|s| s.trim().to_string()).collect()),
            prefetch_previews: args.previews || config.study.prefetch_previews,
        };

        if let Ok(counts) = engine
            .api()
            .due_counts(&args.deck, session_config.tag_filter.as_deref())
            .await
        {
            println!(
                "{} due, {} new, {} total",
                counts.due, counts.new_cards, counts.total
            );
        }

        let events = engine.start_session(session_config).await?;
        render_events(&events);
        study_loop(&mut engine).await
    })
}

async fn handle_recovery(
    engine: &mut CliEngine,
    deck: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let info = engine.check_recoverable_session(deck);
    if !info.recoverable {
        return Ok(());
    }
    let last_updated = info.last_updated.as_deref().unwrap_or("unknown");
    println!(
        "Found an unfinished session (updated {last_updated}, {} unsynced reviews).",
        info.unsynced_count
    );
    println!("  [r]esume (sync pending reviews) / [d]iscard");
    loop {
        match prompt("> ")?.as_str() {
            "r" => {
                let outcome = engine.resume_recovered_session(deck).await;
                println!(
                    "synced {} review(s), {} failed",
                    outcome.submitted,
                    outcome.failed.len()
                );
                if !outcome.success {
                    println!("some reviews are still pending; run `studyloop sync` later");
                }
                return Ok(());
            }
            "d" => {
                engine.discard_recovered_session(deck);
                println!("discarded");
                return Ok(());
            }
            _ => println!("please answer r or d"),
        }
    }
}

async fn study_loop(engine: &mut CliEngine) -> Result<(), Box<dyn std::error::Error>> {
    println!("commands: [f]lip, 1-4 rate (1=again 2=hard 3=good 4=easy), [p]ause, [r]esume, [q]uit");
    loop {
        match engine.status() {
            SessionStatus::Complete => {
                engine.reset_session()?;
                return Ok(());
            }
            SessionStatus::Abandoned => return Ok(()),
            _ => {}
        }

        let input = prompt("> ")?;
        let result = match input.as_str() {
            "f" | "" => {
                let flipped = engine.flip_card().await;
                if flipped.is_ok() {
                    if let Some(card) = engine.current_card() {
                        println!("{}", card.back);
                    }
                }
                flipped.map(|e| vec![e])
            }
            "1" => engine.rate_card(Rating::Again).await,
            "2" => engine.rate_card(Rating::Hard).await,
            "3" => engine.rate_card(Rating::Good).await,
            "4" => engine.rate_card(Rating::Easy).await,
            "p" => Ok(engine.pause_session().into_iter().collect()),
            "r" => Ok(engine.resume_session().into_iter().collect()),
            "q" => Ok(engine.exit_session().into_iter().collect()),
            other => {
                println!("unknown command: {other}");
                continue;
            }
        };

        match result {
            Ok(events) => render_events(&events),
            Err(e) => println!("{e}"),
        }
    }
}

fn render_events(events: &[Event]) {
    for event in events {
        match event {
            Event::SessionStarted { max_cards, .. } => {
                println!("session started (up to {max_cards} cards)");
            }
            Event::CardShown { card, cards_reviewed, .. } => {
                println!("--- card {} ---", cards_reviewed + 1);
                println!("{}", card.front);
            }
            Event::CardFlipped { previews, .. } => {
                if let Some(p) = previews {
                    println!(
                        "intervals: again {} / hard {} / good {} / easy {}",
                        p.again, p.hard, p.good, p.easy
                    );
                }
            }
            Event::CardRated { rating, duration_ms, synced, .. } => {
                let mark = if *synced { "" } else { " (queued)" };
                println!("rated {rating} in {:.1}s{mark}", *duration_ms as f64 / 1000.0);
            }
            Event::SessionPaused { .. } => println!("paused"),
            Event::SessionResumed { .. } => println!("resumed"),
            Event::SessionCompleted { summary, .. } => print_summary(summary),
            Event::SessionAbandoned { .. } => println!("session ended early"),
            _ => {}
        }
    }
}

fn print_summary(summary: &SessionSummary) {
    println!("session complete: {} cards reviewed", summary.cards_reviewed);
    println!(
        "  again {}  hard {}  good {}  easy {}",
        summary.again, summary.hard, summary.good, summary.easy
    );
    println!(
        "  accuracy {}%  total {:.1}s",
        summary.accuracy_pct,
        summary.total_duration_ms as f64 / 1000.0
    );
}

fn prompt(label: &str) -> Result<String, std::io::Error> {
    use std::io::Write;
    print!("{label}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
