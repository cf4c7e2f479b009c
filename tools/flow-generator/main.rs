use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use routeflow::flow::{FlowItem, render_document};
use routeflow::registry::{Field, NodeCatalog, Operator};
use routeflow::graph::NodeKind;
use std::fs;

/// A CLI tool to generate random routing flow documents
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_flow.json")]
    output: String,

    /// Maximum nesting depth of conditions
    #[arg(long, default_value_t = 4)]
    depth: usize,

    /// Probability that a branch continues with another condition
    #[arg(long, default_value_t = 0.6)]
    branching: f64,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if !(0.0..=1.0).contains(&cli.branching) {
        eprintln!("Error: --branching ({}) must be between 0 and 1", cli.branching);
        std::process::exit(1);
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let catalog = NodeCatalog::default();
    let providers: Vec<String> = catalog
        .definitions()
        .iter()
        .filter(|d| d.kind == NodeKind::Provider)
        .filter_map(|d| d.default_value.clone())
        .collect();
    if providers.is_empty() {
        return Err("the catalog defines no providers".into());
    }

    println!(
        "Generating a flow (depth up to {}, branching {})...",
        cli.depth, cli.branching
    );
    let generator = Generator {
        providers: &providers,
        branching: cli.branching,
    };
    let flow = vec![generator.item(&mut rng, cli.depth)];
    let total: usize = flow.iter().map(FlowItem::size).sum();

    fs::write(&cli.output, render_document(&flow)?)?;
    println!(
        "Successfully generated {} flow item(s) and saved them to '{}'",
        total, cli.output
    );
    Ok(())
}

struct Generator<'a> {
    providers: &'a [String],
    branching: f64,
}

impl Generator<'_> {
    fn item(&self, rng: &mut StdRng, depth: usize) -> FlowItem {
        if depth == 0 || !rng.random_bool(self.branching) {
            return self.provider(rng);
        }
        let (field, operator, value) = self.condition(rng);
        let true_flow = vec![self.item(rng, depth - 1)];
        let false_flow = vec![self.item(rng, depth - 1)];
        FlowItem::condition(field.wire(), operator.wire(), &value, true_flow, false_flow)
    }

    fn provider(&self, rng: &mut StdRng) -> FlowItem {
        match self.providers.choose(rng) {
            Some(name) => FlowItem::provider(name),
            None => FlowItem::provider("STRIPE"),
        }
    }

    /// Picks a field the evaluator can exercise with a matching operator
    /// and a plausible value.
    fn condition(&self, rng: &mut StdRng) -> (Field, Operator, String) {
        let field = [Field::Amount, Field::Brand, Field::Installment]
            .choose(rng)
            .copied()
            .unwrap_or(Field::Amount);
        match field {
            Field::Amount => {
                let op = [Operator::GreaterThan, Operator::LessThanOrEqual]
                    .choose(rng)
                    .copied()
                    .unwrap_or(Operator::GreaterThan);
                (field, op, (rng.random_range(1..50) * 100).to_string())
            }
            Field::Brand => {
                let brands = ["VISA", "MASTERCARD", "ELO", "AMEX"];
                let value = brands.choose(rng).copied().unwrap_or("VISA");
                if rng.random_bool(0.5) {
                    (field, Operator::Equals, value.to_string())
                } else {
                    (field, Operator::In, format!("{},ELO", value))
                }
            }
            _ => (
                field,
                Operator::GreaterThanOrEqual,
                rng.random_range(2..=12).to_string(),
            ),
        }
    }
}
