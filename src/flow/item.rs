use serde::{Deserialize, Serialize};

/// One element of a routing flow document.
///
/// The wire format tags each element with `typeFlow`; an unknown tag is a
/// decode error rather than a silently ignored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "typeFlow")]
pub enum FlowItem {
    #[serde(rename = "CONDITION")]
    Condition(ConditionFlow),
    #[serde(rename = "PROVIDER")]
    Provider(ProviderFlow),
}

/// The test applied by a condition, using wire identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: String,
    #[serde(default)]
    pub value: String,
}

/// A decision point. Empty branches are omitted on the wire and an empty
/// array on input is treated the same as a missing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionFlow {
    pub condition: Condition,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub true_flow: Vec<FlowItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub false_flow: Vec<FlowItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderFlow {
    pub provider_name: String,
}

impl FlowItem {
    pub fn condition(
        field: &str,
        operator: &str,
        value: &str,
        true_flow: Vec<FlowItem>,
        false_flow: Vec<FlowItem>,
    ) -> Self {
        FlowItem::Condition(ConditionFlow {
            condition: Condition {
                field: field.to_string(),
                operator: operator.to_string(),
                value: value.to_string(),
            },
            true_flow,
            false_flow,
        })
    }

    pub fn provider(name: &str) -> Self {
        FlowItem::Provider(ProviderFlow {
            provider_name: name.to_string(),
        })
    }

    /// Counts this item and everything nested below it.
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(item) = stack.pop() {
            count += 1;
            if let FlowItem::Condition(c) = item {
                stack.extend(c.true_flow.iter());
                stack.extend(c.false_flow.iter());
            }
        }
        count
    }
}
