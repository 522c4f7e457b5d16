//! stategraph binary: pick a topology, run it on a question, print each step's delta.

use clap::Parser;
use stategraph::StepEvent;
use stategraph_cli::{run_with_options, RunOptions, Topology};

#[derive(Parser, Debug)]
#[command(name = "stategraph")]
#[command(about = "Run a reference graph topology and stream its per-step state deltas")]
struct Args {
    /// Topology to run.
    #[arg(short, long, value_enum, default_value = "adaptive-rag")]
    topology: Topology,

    /// Question / task (also accepted as trailing positional words).
    #[arg(short, long, value_name = "TEXT")]
    message: Option<String>,

    /// Maximum node steps (overrides STATEGRAPH_RECURSION_LIMIT).
    #[arg(long, value_name = "N")]
    recursion_limit: Option<usize>,

    /// Checkpoint thread id; rerun with the same id to resume (overrides THREAD_ID).
    #[arg(long, value_name = "ID")]
    thread_id: Option<String>,

    /// SQLite checkpoint file (overrides DB_PATH).
    #[arg(long = "db", value_name = "PATH")]
    db_path: Option<String>,

    /// Print the topology as a Mermaid diagram and exit.
    #[arg(long)]
    mermaid: bool,

    /// Debug logs for node enter/exit and step commits.
    #[arg(short, long)]
    verbose: bool,

    #[arg(trailing_var_arg = true)]
    rest: Vec<String>,
}

fn get_message(args: &Args) -> String {
    if let Some(ref m) = args.message {
        return m.clone();
    }
    if args.rest.is_empty() {
        return "What is task decomposition for LLM agents?".to_string();
    }
    args.rest.join(" ").trim().to_string()
}

/// Load .env from current directory; if not found, try parent (workspace root when run from crate dir).
fn load_dotenv() {
    if dotenv::dotenv().is_ok() {
        return;
    }
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(parent) = cwd.parent() {
            let env_path = parent.join(".env");
            if env_path.is_file() {
                let _ = dotenv::from_path(env_path);
            }
        }
    }
}

/// Initializes tracing to stderr; if env `LOG_FILE` is set, also to that file (append, no ANSI).
fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::Layer;

    let default = if verbose {
        "info,stategraph=debug,stategraph_cli=debug"
    } else {
        "warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter.clone());
    let registry = tracing_subscriber::registry().with(stderr_layer);

    if let Ok(path) = std::env::var("LOG_FILE") {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_target(true)
            .with_filter(filter);
        registry.with(file_layer).init();
        tracing::info!(path = %path, "logging to file");
    } else {
        registry.init();
    }
    Ok(())
}

fn print_step(event: &StepEvent) {
    let next = event.next.as_deref().unwrap_or("END");
    let marker = if event.halted { " (halted)" } else { "" };
    println!("[step {}] {} -> {}{}", event.step, event.node, next, marker);
    println!("  {}", event.update.to_json());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    load_dotenv();
    init_tracing(args.verbose)?;

    if args.mermaid {
        println!("{}", args.topology.mermaid()?);
        return Ok(());
    }

    let input = get_message(&args);
    let options = RunOptions {
        topology: Some(args.topology),
        recursion_limit: args.recursion_limit,
        thread_id: args.thread_id.clone(),
        db_path: args.db_path.clone(),
        verbose: args.verbose,
    };

    println!("Topology: {}", args.topology.name());
    println!("Input: {}", input);
    println!("---");

    let state = match run_with_options(&input, &options, print_step).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    println!("---");
    match serde_json::to_string_pretty(&state) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("error: failed to render final state: {}", e),
    }
    Ok(())
}
