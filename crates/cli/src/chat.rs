use chrono::{DateTime, Utc};
use sente_core::api::AnalysisApi;
use std::io::Write;
use tokio::io::AsyncBufReadExt;

use crate::render;

/// One exchange kept in the session transcript. The transcript lives and
/// dies with this loop; nothing is persisted.
#[derive(Debug, Clone)]
struct Exchange {
    at: DateTime<Utc>,
    question: String,
    answer: String,
    intent: Option<String>,
}

pub async fn run(api: &AnalysisApi) -> anyhow::Result<()> {
    let mut transcript: Vec<Exchange> = Vec::new();
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

    println!("Ask about the portfolio (\"history\" replays this session, \"quit\" leaves).");
    loop {
        print!("you> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();
        match question {
            "" => continue,
            "quit" | "exit" => break,
            "history" => {
                replay(&transcript);
                continue;
            }
            _ => {}
        }

        match api.ask(question).await {
            Ok(outcome) => {
                render::ask_outcome(&outcome);
                transcript.push(Exchange {
                    at: Utc::now(),
                    question: question.to_string(),
                    answer: outcome.answer,
                    intent: outcome.intent,
                });
            }
            // A failed question keeps the session and its transcript alive.
            Err(err) => render::report_error(&err),
        }
    }

    Ok(())
}

fn replay(transcript: &[Exchange]) {
    if transcript.is_empty() {
        println!("(no questions yet)");
        return;
    }

    for exchange in transcript {
        println!(
            "[{}] you: {}",
            exchange.at.format("%H:%M:%S"),
            exchange.question
        );
        let label = exchange.intent.as_deref().unwrap_or("answer");
        println!("  {label}: {}", first_line(&exchange.answer));
    }
}

/// Replay shows one line per answer; the full text was already printed live.
fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("").trim()
}
