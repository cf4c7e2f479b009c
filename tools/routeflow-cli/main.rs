use clap::{Parser, Subcommand};
use routeflow::engine::actions::{self, ActionOutcome};
use routeflow::engine::HttpDecisionEngine;
use routeflow::flow::{self, DecisionType, EvaluationRequest};
use routeflow::graph::GraphSnapshot;
use routeflow::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Inspect, convert and test payment-routing flows
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML config file (layout constants, decision engine URL)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// JSON node catalog replacing the built-in one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rebuild a graph from a flow document and print its snapshot
    Load {
        /// Path to the flow document JSON
        flow: PathBuf,
    },
    /// Serialize a graph snapshot back into a flow document
    Export {
        /// Path to the graph snapshot JSON
        snapshot: PathBuf,
    },
    /// Re-flow a graph snapshot and print the positioned snapshot
    Layout {
        /// Path to the graph snapshot JSON
        snapshot: PathBuf,
    },
    /// Load a flow document and export it again, reporting any difference
    Roundtrip {
        /// Path to the flow document JSON
        flow: PathBuf,
    },
    /// Route a sample transaction through a flow document locally
    Evaluate {
        /// Path to the flow document JSON
        flow: PathBuf,
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = "")]
        brand: String,
        #[arg(long, default_value = "1")]
        installments: String,
    },
    /// Talk to the remote decision engine
    Remote {
        #[command(subcommand)]
        action: RemoteCommands,
    },
}

#[derive(Subcommand, Debug)]
enum RemoteCommands {
    /// List stored workflows
    List,
    /// Print the workflow stored for a merchant
    Fetch { merchant_id: String },
    /// Store a flow document under a workflow name
    Push {
        flow: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Route a sample transaction through a merchant's stored workflow
    Test {
        merchant_id: String,
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = "")]
        brand: String,
        #[arg(long, default_value = "1")]
        installments: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("routeflow=info,warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => EditorConfig::default(),
    };
    let catalog = match &cli.catalog {
        Some(path) => {
            let json = read(path);
            NodeCatalog::from_json(&json)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to load catalog: {}", e)))
        }
        None => NodeCatalog::default(),
    };

    match cli.command {
        Commands::Load { flow } => {
            let document = read_flow(&flow);
            let started = Instant::now();
            let loaded = TreeToGraphBuilder::new(&catalog, &config.loader).build(&document);
            eprintln!(
                "Loaded {} node(s), {} edge(s) in {:?}; {} item(s) dropped",
                loaded.graph.len(),
                loaded.graph.edges().len(),
                started.elapsed(),
                loaded.dropped
            );
            print_json(&loaded.graph.snapshot());
        }
        Commands::Export { snapshot } => {
            let graph = read_snapshot(&snapshot);
            let document = GraphToTreeBuilder::new(&graph)
                .build()
                .unwrap_or_else(|e| exit_with_error(&format!("Export failed: {}", e)));
            print_json(&document);
        }
        Commands::Layout { snapshot } => {
            let mut graph = read_snapshot(&snapshot);
            let started = Instant::now();
            let outcome = LayoutEngine::new(&config.layout)
                .apply(&mut graph)
                .unwrap_or_else(|| exit_with_error("Layout failed: the graph has no start node"));
            eprintln!(
                "Laid out {} node(s) in {:?}; {} unreachable",
                outcome.positions.len(),
                started.elapsed(),
                outcome.unreachable.len()
            );
            print_json(&graph.snapshot());
        }
        Commands::Roundtrip { flow } => {
            let document = read_flow(&flow);
            let loaded = TreeToGraphBuilder::new(&catalog, &config.loader).build(&document);
            let exported = GraphToTreeBuilder::new(&loaded.graph)
                .build()
                .unwrap_or_else(|e| exit_with_error(&format!("Export failed: {}", e)));
            if exported == document {
                println!("Round trip OK: {} node(s)", loaded.graph.len());
            } else {
                println!("Round trip changed the document ({} item(s) dropped):", loaded.dropped);
                print_json(&exported);
                std::process::exit(2);
            }
        }
        Commands::Evaluate {
            flow,
            amount,
            brand,
            installments,
        } => {
            let document = read_flow(&flow);
            let request = EvaluationRequest {
                merchant_id: String::new(),
                amount,
                brand,
                installments,
            };
            let evaluation = Evaluator::new(&document).evaluate(&EvaluationContext::from(&request));
            if evaluation.providers.is_empty() {
                println!("  -> No provider reached");
            } else {
                println!("  -> Providers: {}", evaluation.providers.join(", "));
            }
            println!("  -> Reason: {}", evaluation.reason());
        }
        Commands::Remote { action } => {
            let engine = HttpDecisionEngine::from_config(&config.engine)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to build HTTP client: {}", e)));
            run_remote(&engine, action).await;
        }
    }
}

async fn run_remote(engine: &HttpDecisionEngine, action: RemoteCommands) {
    match action {
        RemoteCommands::List => {
            let outcome = actions::list(engine).await;
            let workflows = unwrap_outcome(outcome);
            for workflow in &workflows {
                println!(
                    "{:<10} {} ({} item(s))",
                    workflow.merchant_code.as_deref().unwrap_or("-"),
                    workflow.name,
                    workflow.flow.len()
                );
            }
        }
        RemoteCommands::Fetch { merchant_id } => {
            let data = unwrap_outcome(actions::fetch(engine, &merchant_id).await);
            print_json(&data);
        }
        RemoteCommands::Push {
            flow,
            name,
            description,
        } => {
            let request = WorkflowRequest {
                name,
                description,
                flow: read_flow(&flow),
                decision_type: DecisionType::Btree,
            };
            unwrap_outcome(actions::save(engine, request).await);
            println!("Workflow stored");
        }
        RemoteCommands::Test {
            merchant_id,
            amount,
            brand,
            installments,
        } => {
            let request = EvaluationRequest {
                merchant_id,
                amount,
                brand,
                installments,
            };
            let providers = unwrap_outcome(actions::evaluate(engine, request).await);
            println!("  -> Providers: {}", providers.join(", "));
        }
    }
}

fn unwrap_outcome<T>(outcome: ActionOutcome<T>) -> T {
    match outcome.data {
        Some(data) if outcome.success => data,
        _ => exit_with_error(outcome.message.as_deref().unwrap_or(actions::UNEXPECTED_ERROR)),
    }
}

fn read(path: &PathBuf) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read '{}': {}", path.display(), e)))
}

fn read_flow(path: &PathBuf) -> Vec<FlowItem> {
    flow::parse_document(&read(path)).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to parse flow document '{}': {}", path.display(), e))
    })
}

fn read_snapshot(path: &PathBuf) -> Graph {
    let snapshot: GraphSnapshot = serde_json::from_str(&read(path)).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to parse graph snapshot '{}': {}", path.display(), e))
    });
    Graph::from_snapshot(snapshot)
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => exit_with_error(&format!("Failed to render JSON: {}", e)),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
