//! task-console - interactive console entry point
//!
//! Reads commands from stdin, drives the orchestrator and prints the task
//! list and results to stdout. Logs go to stderr.

use std::io::Write;

use task_console::task::TaskForm;
use task_console::{
    Config, HttpScoringClient, RequestOrchestrator, Strategy, TaskListView,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "\
Commands:
  add <title> | <due YYYY-MM-DD> | <hours> | <importance> [| <deps, comma-separated>]
  import                 paste a JSON array of tasks, end with a line containing only '.'
  analyze [strategy]     smart_balance | fastest_wins | high_impact | deadline_driven
  suggest                ask the service for suggested tasks
  list                   show current tasks
  results                show the last results
  clear                  remove all tasks, pending import and results
  help
  quit";

#[derive(Debug, PartialEq)]
enum Command {
    Add(TaskForm),
    Import,
    Analyze(Option<Strategy>),
    Suggest,
    List,
    Results,
    Clear,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word {
        "add" => {
            let mut fields = rest.split('|').map(|f| f.trim().to_string());
            Ok(Command::Add(TaskForm {
                title: fields.next().unwrap_or_default(),
                due_date: fields.next().unwrap_or_default(),
                estimated_hours: fields.next().unwrap_or_default(),
                importance: fields.next().unwrap_or_default(),
                dependencies: fields.next().unwrap_or_default(),
            }))
        }
        "import" => Ok(Command::Import),
        "analyze" if rest.is_empty() => Ok(Command::Analyze(None)),
        "analyze" => rest
            .parse()
            .map(|s| Command::Analyze(Some(s)))
            .map_err(|e| format!("{}", e)),
        "suggest" => Ok(Command::Suggest),
        "list" => Ok(Command::List),
        "results" => Ok(Command::Results),
        "clear" => Ok(Command::Clear),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("Unknown command '{}'. Type 'help'.", other)),
    }
}

async fn read_import_block(lines: &mut Lines<BufReader<Stdin>>) -> anyhow::Result<String> {
    let mut text = String::new();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == "." {
            break;
        }
        text.push_str(&line);
        text.push('\n');
    }
    Ok(text)
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

fn main() -> anyhow::Result<()> {
    // One cooperative thread: user input and network completions are handled in turn.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async_main())
}

async fn async_main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "task_console=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Loaded configuration: api_url={} timeout={:?} strategy={} dedup={}",
        config.api_url,
        config.request_timeout,
        config.default_strategy,
        config.dedup_policy.as_str()
    );

    let http = reqwest::Client::builder()
        .connect_timeout(config.request_timeout)
        .build()?;
    let client = HttpScoringClient::with_client(config.api_url.as_str(), http);
    let orchestrator = RequestOrchestrator::new(client, &config);

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            prompt();
            continue;
        }

        match parse_command(&line) {
            Ok(Command::Add(form)) => {
                let today = chrono::Local::now().date_naive();
                match orchestrator.add_task_from_form(&form, today).await {
                    Ok(_) => println!("{}", TaskListView(&orchestrator.tasks().await)),
                    Err(e) => println!("Error: {}", e),
                }
            }
            Ok(Command::Import) => {
                let text = read_import_block(&mut lines).await?;
                orchestrator.stage_import(text).await;
                println!("Import staged; it will be merged on the next 'analyze'.");
            }
            Ok(Command::Analyze(strategy)) => {
                let strategy = strategy.unwrap_or(config.default_strategy);
                println!("Analyzing...");
                let outcome = orchestrator.submit_analysis(strategy).await;
                println!("{}", TaskListView(&orchestrator.tasks().await));
                match outcome {
                    Ok(view) => println!("\n{}", view),
                    Err(e) => println!("Error: {}", e),
                }
            }
            Ok(Command::Suggest) => {
                println!("Fetching suggestions...");
                match orchestrator.request_suggestions().await {
                    Ok(view) => println!("{}", view),
                    Err(e) => println!("Error: {}", e),
                }
            }
            Ok(Command::List) => println!("{}", TaskListView(&orchestrator.tasks().await)),
            Ok(Command::Results) => match orchestrator.render_results().await {
                Some(view) => println!("{}", view),
                None => println!("No results yet."),
            },
            Ok(Command::Clear) => {
                orchestrator.clear_all().await;
                println!("{}", TaskListView(&[]));
            }
            Ok(Command::Help) => println!("{}", HELP),
            Ok(Command::Quit) => break,
            Err(message) => println!("{}", message),
        }
        prompt();
    }

    Ok(())
}
