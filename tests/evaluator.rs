//! Tests for local evaluation of flow documents.
mod common;
use common::*;
use routeflow::evaluator::evaluate;
use routeflow::flow::EvaluationRequest;
use routeflow::prelude::*;

fn amount(value: &str) -> EvaluationContext {
    EvaluationContext::new().with("AMOUNT", value)
}

#[test]
fn test_true_branch_taken() {
    let result = evaluate(&amount_flow(), &amount("150"));
    assert_eq!(result.providers, vec!["STRIPE"]);
    assert_eq!(result.reason(), "AMOUNT (was 150) > 100");
}

#[test]
fn test_false_branch_taken() {
    let result = evaluate(&amount_flow(), &amount("50"));
    assert_eq!(result.providers, vec!["ADYEN"]);
    assert_eq!(result.reason(), "NOT AMOUNT (was 50) > 100");
}

#[test]
fn test_missing_field_is_false() {
    let result = evaluate(&amount_flow(), &EvaluationContext::new());
    assert_eq!(result.providers, vec!["ADYEN"]);
    assert_eq!(result.decisions[0].actual, None);
    assert_eq!(result.reason(), "NOT AMOUNT (missing) > 100");
}

#[test]
fn test_numeric_comparison_beats_string_order() {
    // "9" > "100" as strings, but not as numbers
    let result = evaluate(&amount_flow(), &amount("9"));
    assert_eq!(result.providers, vec!["ADYEN"]);

    let flow = vec![FlowItem::condition("AMOUNT", "EQUALS", "100", vec![FlowItem::provider("STRIPE")], vec![])];
    assert_eq!(evaluate(&flow, &amount("100.0")).providers, vec!["STRIPE"]);
}

#[test]
fn test_false_chain_routing() {
    let flow = false_chain_flow();
    let context = |amount: &str, brand: &str, installments: &str| {
        EvaluationContext::from(&EvaluationRequest {
            merchant_id: "M1".to_string(),
            amount: amount.to_string(),
            brand: brand.to_string(),
            installments: installments.to_string(),
        })
    };

    assert_eq!(evaluate(&flow, &context("500", "VISA", "1")).providers, vec!["STRIPE"]);
    assert_eq!(evaluate(&flow, &context("50", "visa", "1")).providers, vec!["CIELO"]);
    assert_eq!(evaluate(&flow, &context("50", "ELO", "6")).providers, vec!["REDE"]);

    let result = evaluate(&flow, &context("50", "ELO", "2"));
    assert_eq!(result.providers, vec!["GETNET"]);
    assert_eq!(result.decisions.len(), 3);
    assert!(result.decisions.iter().all(|d| !d.outcome));
}

#[test]
fn test_membership_and_substring_operators() {
    let flow = |operator: &str, value: &str| {
        vec![FlowItem::condition(
            "BRAND",
            operator,
            value,
            vec![FlowItem::provider("HIT")],
            vec![FlowItem::provider("MISS")],
        )]
    };
    let brand = |value: &str| EvaluationContext::new().with("BRAND", value);

    assert_eq!(evaluate(&flow("IN", "VISA, MASTERCARD"), &brand("mastercard")).providers, vec!["HIT"]);
    assert_eq!(evaluate(&flow("NOT_IN", "VISA,MASTERCARD"), &brand("ELO")).providers, vec!["HIT"]);
    assert_eq!(evaluate(&flow("CONTAINS", "card"), &brand("MASTERCARD")).providers, vec!["HIT"]);
    assert_eq!(evaluate(&flow("NOT_CONTAINS", "card"), &brand("VISA")).providers, vec!["HIT"]);
    assert_eq!(evaluate(&flow("NOT_EQUALS", "VISA"), &brand("VISA")).providers, vec!["MISS"]);
}

#[test]
fn test_unknown_operator_behaves_as_equals() {
    let flow = vec![FlowItem::condition("BRAND", "SOUNDS_LIKE", "VISA", vec![FlowItem::provider("HIT")], vec![])];
    let result = evaluate(&flow, &EvaluationContext::new().with("BRAND", "VISA"));
    assert_eq!(result.providers, vec!["HIT"]);
    assert_eq!(result.decisions[0].operator, Operator::Equals);
}

#[test]
fn test_sequence_items_all_evaluated_in_order() {
    let flow = vec![
        FlowItem::provider("STRIPE"),
        FlowItem::condition("AMOUNT", "LESS_THAN", "10", vec![FlowItem::provider("ADYEN")], vec![]),
        FlowItem::provider("CIELO"),
    ];
    let result = evaluate(&flow, &amount("5"));
    assert_eq!(result.providers, vec!["STRIPE", "ADYEN", "CIELO"]);
}

#[test]
fn test_empty_flow_reaches_nothing() {
    let result = Evaluator::new(&[]).evaluate(&amount("5"));
    assert!(result.providers.is_empty());
    assert_eq!(result.reason(), "no conditions evaluated");
}
