//! Ask questions from async tasks and answer them in the terminal.
//!
//! # Examples
//!
//! ```sh
//! # One question at a time
//! prompter-demo
//!
//! # Show every pending question, oldest first, with the log pane open
//! prompter-demo --mode stack --logs --rounds 3
//! ```

use clap::Parser;
use prompter::DisplayMode;
use prompter::ui_log::UiTracingLayer;
use prompter_demo::{DemoConfig, Transcript, confirm_rounds, name_rounds, surface_failure};
use prompter_tui::DialogQueue;
use tokio::task::JoinSet;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Ask questions from async tasks and answer them in the terminal.
#[derive(Parser)]
#[command(name = "prompter-demo")]
struct Cli {
    /// Layout of pending prompts: top, stack, or reversed.
    #[arg(long, default_value = "top")]
    mode: DisplayMode,

    /// Open the log pane on start.
    #[arg(long)]
    logs: bool,

    /// How many times each task asks its question.
    #[arg(long, default_value_t = 2)]
    rounds: u32,

    /// Header title.
    #[arg(long, default_value = "prompter demo")]
    title: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = DemoConfig {
        display_mode: cli.mode,
        show_logs: cli.logs,
        rounds: cli.rounds,
        title: cli.title,
    };

    // Set up tracing → TUI log buffer.
    let (tracing_layer, log_buffer) = UiTracingLayer::new();
    tracing_subscriber::registry().with(tracing_layer).init();

    let queue = DialogQueue::with_config(config.build_queue_config());

    // Spawn TUI on a dedicated thread.
    let tui_config = config.build_tui_config(Some(log_buffer));
    let tui_handle = prompter_tui::spawn_tui(queue.clone(), tui_config);

    let transcript = Transcript::new();
    let mut prompts = JoinSet::new();
    prompts.spawn(confirm_rounds(queue.clone(), config.rounds, transcript.clone()));
    prompts.spawn(name_rounds(queue.clone(), config.rounds, transcript.clone()));

    let all_answered = async {
        while let Some(joined) = prompts.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = %e, "prompt task stopped"),
                Err(e) => warn!(error = %e, "prompt task panicked"),
            }
        }
        info!("all questions answered; press q to quit");
    };

    // Wait for the user to quit. The surface cancels whatever is still
    // pending on the way out.
    let mut tui_exit = tokio::task::spawn_blocking(move || tui_handle.join());
    let exit = tokio::select! {
        _ = all_answered => (&mut tui_exit).await,
        joined = &mut tui_exit => joined,
    };

    let entries = transcript.entries();
    if entries.is_empty() {
        println!("No answers recorded.");
    } else {
        for entry in entries {
            println!("{entry}");
        }
    }

    let failure = match exit {
        Ok(exit) => surface_failure(exit),
        Err(e) => Some(format!("TUI thread lost: {e}")),
    };
    if let Some(failure) = failure {
        eprintln!("Error: {failure}");
        std::process::exit(1);
    }
}
