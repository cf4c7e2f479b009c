use crate::flow::{Condition, EvaluationRequest, FlowItem};
use crate::registry::{Field, Operator};
use ahash::AHashMap;
use std::fmt;
use tracing::trace;

/// Transaction attributes keyed by wire field (`AMOUNT`, `BRAND`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationContext {
    values: AHashMap<String, String>,
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.values.insert(field.to_string(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }
}

impl From<&EvaluationRequest> for EvaluationContext {
    fn from(request: &EvaluationRequest) -> Self {
        Self::new()
            .with(Field::Amount.wire(), request.amount.clone())
            .with(Field::Brand.wire(), request.brand.clone())
            .with(Field::Installment.wire(), request.installments.clone())
    }
}

/// One condition visited during an evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub field: String,
    /// The context value, `None` when the context lacks the field.
    pub actual: Option<String>,
    pub operator: Operator,
    pub expected: String,
    pub outcome: bool,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.outcome {
            write!(f, "NOT ")?;
        }
        match &self.actual {
            Some(actual) => write!(f, "{} (was {})", self.field, actual)?,
            None => write!(f, "{} (missing)", self.field)?,
        }
        write!(f, " {} {}", self.operator.symbol(), self.expected)
    }
}

/// Outcome of routing one transaction through a flow document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// Providers reached, in document order.
    pub providers: Vec<String>,
    pub decisions: Vec<Decision>,
}

impl Evaluation {
    /// Human readable trail of the decisions taken.
    pub fn reason(&self) -> String {
        if self.decisions.is_empty() {
            return "no conditions evaluated".to_string();
        }
        self.decisions
            .iter()
            .map(Decision::to_string)
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}

/// Routes transactions through a flow document locally.
///
/// This mirrors what the remote engine does with a `BTREE` workflow closely
/// enough to dry-run a document without a network round trip.
pub struct Evaluator<'f> {
    flow: &'f [FlowItem],
}

impl<'f> Evaluator<'f> {
    pub fn new(flow: &'f [FlowItem]) -> Self {
        Self { flow }
    }

    pub fn evaluate(&self, context: &EvaluationContext) -> Evaluation {
        let mut evaluation = Evaluation::default();
        let mut stack: Vec<&FlowItem> = self.flow.iter().rev().collect();

        while let Some(item) = stack.pop() {
            match item {
                FlowItem::Provider(provider) => {
                    evaluation.providers.push(provider.provider_name.clone());
                }
                FlowItem::Condition(flow) => {
                    let decision = decide(&flow.condition, context);
                    trace!(%decision, "condition evaluated");
                    let branch = if decision.outcome {
                        &flow.true_flow
                    } else {
                        &flow.false_flow
                    };
                    stack.extend(branch.iter().rev());
                    evaluation.decisions.push(decision);
                }
            }
        }

        evaluation
    }
}

/// Convenience wrapper around [`Evaluator::evaluate`].
pub fn evaluate(flow: &[FlowItem], context: &EvaluationContext) -> Evaluation {
    Evaluator::new(flow).evaluate(context)
}

fn decide(condition: &Condition, context: &EvaluationContext) -> Decision {
    let operator = Operator::from_wire(&condition.operator).unwrap_or(Operator::Equals);
    let actual = context.get(&condition.field);
    let outcome = actual.is_some_and(|actual| compare(actual, operator, &condition.value));
    Decision {
        field: condition.field.clone(),
        actual: actual.map(str::to_string),
        operator,
        expected: condition.value.clone(),
        outcome,
    }
}

fn compare(actual: &str, operator: Operator, expected: &str) -> bool {
    match operator {
        Operator::Equals => same(actual, expected),
        Operator::NotEquals => !same(actual, expected),
        Operator::GreaterThan => order(actual, expected).is_gt(),
        Operator::GreaterThanOrEqual => order(actual, expected).is_ge(),
        Operator::LessThan => order(actual, expected).is_lt(),
        Operator::LessThanOrEqual => order(actual, expected).is_le(),
        Operator::In => member(actual, expected),
        Operator::NotIn => !member(actual, expected),
        Operator::Contains => contains(actual, expected),
        Operator::NotContains => !contains(actual, expected),
    }
}

fn numbers(a: &str, b: &str) -> Option<(f64, f64)> {
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

fn same(a: &str, b: &str) -> bool {
    match numbers(a, b) {
        Some((x, y)) => x == y,
        None => a.trim().eq_ignore_ascii_case(b.trim()),
    }
}

fn order(a: &str, b: &str) -> std::cmp::Ordering {
    match numbers(a, b) {
        Some((x, y)) => x.total_cmp(&y),
        None => a.trim().cmp(b.trim()),
    }
}

fn member(actual: &str, list: &str) -> bool {
    list.split(',').any(|candidate| same(actual, candidate))
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.trim().to_ascii_lowercase())
}
