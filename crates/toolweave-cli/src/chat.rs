//! Interactive chat loop over stdin

use std::io::Write;

use anyhow::Result;
use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use toolweave_core::{Answer, ChatMessage, Orchestrator};

const PROMPT: &str = "Enter a query: ";

/// Read queries until quit/exit, end of input or Ctrl-C
///
/// A failing query is reported and the loop goes on.
pub async fn chat_loop(orchestrator: &Orchestrator, verbose: bool) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut history: Vec<ChatMessage> = Vec::new();

    println!("Type your queries, or 'quit' to exit.");
    loop {
        let Some(query) = next_query(&mut lines).await? else {
            break;
        };
        if query.is_empty() {
            continue;
        }
        if query.eq_ignore_ascii_case("quit") || query.eq_ignore_ascii_case("exit") {
            break;
        }

        match answer_query(orchestrator, &query, &history, verbose).await {
            Ok(answer) => {
                history.push(ChatMessage::user(query));
                history.push(ChatMessage::assistant(answer));
            }
            Err(e) => {
                eprintln!("\nError: {:#}", e);
            }
        }
    }
    Ok(())
}

async fn next_query(lines: &mut Lines<BufReader<Stdin>>) -> Result<Option<String>> {
    print!("\n{}", PROMPT);
    std::io::stdout().flush()?;

    tokio::select! {
        line = lines.next_line() => Ok(line?.map(|l| l.trim().to_string())),
        _ = tokio::signal::ctrl_c() => {
            println!();
            Ok(None)
        }
    }
}

/// Print the answer as it arrives and return its full text
async fn answer_query(
    orchestrator: &Orchestrator,
    query: &str,
    history: &[ChatMessage],
    verbose: bool,
) -> Result<String> {
    let outcome = orchestrator.process_query(query, history).await?;

    if verbose {
        for record in &outcome.tool_calls {
            println!("[{}]", record);
        }
    }

    let mut text = String::new();
    let mut fragments = match outcome.answer {
        Answer::Complete(full) => {
            println!("\n{}", full);
            return Ok(full);
        }
        stream @ Answer::Stream(_) => stream.into_stream(),
    };

    println!();
    while let Some(fragment) = fragments.next().await {
        let fragment = fragment?;
        print!("{}", fragment);
        std::io::stdout().flush()?;
        text.push_str(&fragment);
    }
    println!();
    Ok(text)
}
