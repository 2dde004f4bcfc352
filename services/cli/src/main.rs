use anyhow::{Context, Result};
use clap::Parser;
use debate_cli::commands::{self, Command, TopicChoice};
use debate_cli::config::Config;
use debate_core::{DebateController, OfflineResponder, Phase, Responder, SessionError};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::fmt::time::ChronoLocal;

#[derive(Parser)]
#[command(version, about = "Debate an AI opponent from the terminal")]
struct Cli {
    /// Skip the topic list and debate this topic
    #[arg(long)]
    topic: Option<String>,
    /// Base url of the debate backend (overrides DEBATE_API_URL)
    #[arg(long)]
    api_url: Option<String>,
    /// Use canned local replies instead of the backend
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load application configuration")?;

    // --- 2. Initialize Logging ---
    // Logs go to stderr so they do not interleave with the transcript on stdout.
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    // --- 3. Parse Command-Line Arguments ---
    let args = Cli::parse();

    // --- 4. Initialize the Responder ---
    let responder: Arc<dyn Responder> = if args.offline {
        tracing::info!("Running with the offline responder.");
        Arc::new(OfflineResponder)
    } else {
        let api_url = args.api_url.unwrap_or(config.api_url);
        let client_config = debate_client::Config::builder()
            .with_base_url(&api_url)
            .build();
        let client = debate_client::connect_with_config(client_config)
            .context("Failed to create the debate backend client")?;
        tracing::info!("Using debate backend at {}", client.base_url());
        Arc::new(client)
    };

    // --- 5. Start the Session ---
    // The topic catalog is fetched once here; a failed fetch leaves it empty.
    let controller = DebateController::start(responder).await;
    if let Some(topic) = args.topic {
        if let Err(e) = controller.enter_own_topic(&topic).await {
            tracing::warn!("Ignoring --topic: {}", e);
        }
    }

    // --- 6. Read Input ---
    // Lines are forwarded over a channel so exchanges can run while the user types.
    let (input_tx, mut input_rx) = tokio::sync::mpsc::channel::<String>(32);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if input_tx.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }
    });

    println!("Debate Studio. Type /help for commands.");
    show_prompt(&controller).await;

    while let Some(line) = input_rx.recv().await {
        let command = commands::parse(&line);
        if command == Command::Quit {
            break;
        }
        match handle_command(&controller, command).await {
            // An exchange was started; its task shows the prompt once the reply is in.
            Ok(true) => {}
            Ok(false) => show_prompt(&controller).await,
            Err(e) => {
                println!("{e}");
                show_prompt(&controller).await;
            }
        }
    }

    tracing::info!("Goodbye.");
    Ok(())
}

// Returns true when an exchange was spawned.
async fn handle_command(controller: &DebateController, command: Command) -> Result<bool> {
    let session = controller.session().await;
    match command {
        Command::Quit | Command::Empty => {}
        Command::Help => println!("{}", commands::HELP),
        Command::NewDebate => controller.reset().await,
        Command::Back => controller.go_back().await?,
        Command::Transcript => {
            for turn in session.transcript().iter() {
                println!("{}", commands::format_turn(turn));
            }
        }
        Command::Search(query) => {
            let hits = controller.catalog().search(&query);
            if hits.is_empty() {
                println!("No suggested topic matches \"{query}\".");
            }
            for topic in hits {
                println!("  - {topic}");
            }
        }
        Command::Text(text) => {
            // The controls are "disabled" while an exchange is in flight.
            if session.is_busy() {
                println!("The opponent is still answering...");
                return Ok(false);
            }
            match session.phase() {
                Phase::AwaitingTopic => match commands::resolve_topic(controller.catalog(), &text)
                {
                    TopicChoice::Suggestion(topic) => controller.select_topic(topic).await?,
                    TopicChoice::Own(text) => controller.enter_own_topic(&text).await?,
                },
                Phase::AwaitingStance | Phase::Active => {
                    spawn_exchange(controller.clone(), session.phase(), text);
                    return Ok(true);
                }
            }
        }
    }
    Ok(false)
}

fn spawn_exchange(controller: DebateController, phase: Phase, text: String) {
    println!("AI Opponent is thinking...");
    tokio::spawn(async move {
        let result = if phase == Phase::AwaitingStance {
            controller.start_debate(&text).await
        } else {
            controller.send_turn(&text).await
        };
        match result {
            Ok(Some(turn)) => println!("{}", commands::format_turn(&turn)),
            Ok(None) => tracing::debug!("Reply arrived after the session was reset"),
            Err(SessionError::Busy) => println!("The opponent is still answering..."),
            Err(e) => println!("{e}"),
        }
        show_prompt(&controller).await;
    });
}

async fn show_prompt(controller: &DebateController) {
    let session = controller.session().await;
    match session.phase() {
        Phase::AwaitingTopic => {
            println!();
            println!("{}", commands::format_catalog(controller.catalog()));
            println!("Pick a number or enter your own topic:");
        }
        Phase::AwaitingStance => {
            let topic = session.topic().map(|t| t.as_str()).unwrap_or_default();
            println!();
            println!("{topic}");
            println!("Define your position on this topic. The AI will take the opposing view. (/back for topics)");
        }
        Phase::Active => println!("[Round {}] Your response:", session.round()),
    }
}
