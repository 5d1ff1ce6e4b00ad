use log::{error, info};

use crate::commands::{Command, USAGE};
use crate::engine::DrawEngine;
use crate::models::StopOutcome;
use crate::pool::parse_candidate_blob;

/// What the host should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

// Run a parsed command against the engine
pub async fn handle_command(
    engine: &mut DrawEngine,
    command: Command,
) -> Result<Reply, Box<dyn std::error::Error + Send + Sync>> {
    info!("Received command: {:?}", command);

    let text = match command {
        Command::Add(name) => {
            engine.add_candidate(&name);
            format!("{} candidate(s) in the pool.", engine.candidates().len())
        }
        Command::Load(path) => {
            let before = engine.candidates().len();
            let contents = tokio::fs::read_to_string(&path).await.map_err(|e| {
                error!("Failed to read candidate file {}: {}", path, e);
                e
            })?;
            engine.add_candidates(parse_candidate_blob(&contents));
            let after = engine.candidates().len();
            format!("Loaded {} new candidate(s) from {} ({} total).", after - before, path, after)
        }
        Command::Remove(name) => {
            engine.remove_candidate(&name);
            format!("{} candidate(s) in the pool.", engine.candidates().len())
        }
        Command::Clear => {
            engine.clear_candidates();
            "Candidate pool cleared.".to_string()
        }
        Command::Start(count) => match engine.start(count) {
            Ok(()) => format!(
                "Drawing... {} of {} winner(s) locked. Type `stop` to pick.",
                engine.current_winners().len(),
                count
            ),
            Err(e) => format!("Cannot start: {}", e),
        },
        Command::Stop(title) => describe_stop(engine.stop(&title)),
        Command::Reset => {
            engine.reset();
            "Round reset.".to_string()
        }
        Command::List => numbered(&engine.candidates(), "No candidates yet."),
        Command::Winners => numbered(&engine.current_winners(), "No winners in this round yet."),
        Command::Results => {
            let results = engine.results();
            if results.is_empty() {
                "No finished rounds.".to_string()
            } else {
                results
                    .iter()
                    .enumerate()
                    .map(|(i, r)| {
                        let title = if r.title.is_empty() { "(untitled)" } else { r.title.as_str() };
                        format!("{}. {}: {}", i + 1, title, r.winners.join(", "))
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        Command::Export { json: false } => engine.export_results(),
        Command::Export { json: true } => engine.export_results_json()?,
        Command::ClearResults => {
            engine.clear_results();
            "Results history cleared.".to_string()
        }
        Command::Help => USAGE.to_string(),
        Command::Quit => return Ok(Reply::Quit),
    };

    Ok(Reply::Text(text))
}

fn describe_stop(outcome: StopOutcome) -> String {
    match outcome {
        StopOutcome::Ignored => "Nothing is being drawn.".to_string(),
        StopOutcome::Pending { locked: Some(name), remaining } => {
            format!("Winner: {}! {} more to draw.", name, remaining)
        }
        StopOutcome::Pending { locked: None, remaining } => {
            format!("No candidate was highlighted. {} more to draw.", remaining)
        }
        StopOutcome::Completed(record) => {
            format!("Round complete! Winners: {}", record.winners.join(", "))
        }
    }
}

fn numbered(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        return empty.to_string();
    }
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}
