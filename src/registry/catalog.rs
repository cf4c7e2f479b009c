use crate::error::CatalogError;
use crate::graph::{NodeFields, NodeKind};
use crate::registry::Operator;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Describes one kind of node the operator can place on the canvas.
///
/// Condition definitions are keyed by their domain field id (`amount`,
/// `card`, ...). Visual attributes are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTypeDefinition {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub label: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub has_operator: bool,
    #[serde(default)]
    pub operator_options: Vec<String>,
    #[serde(default)]
    pub default_value: Option<String>,
}

impl NodeTypeDefinition {
    /// The fields a freshly created node of this type starts with.
    pub fn instantiate(&self) -> NodeFields {
        let value = self.default_value.clone().unwrap_or_default();
        let fields = match self.kind {
            NodeKind::Start => NodeFields::default(),
            NodeKind::Condition => NodeFields {
                field: Some(self.id.clone()),
                operator: self.has_operator.then(|| Operator::Equals.symbol().to_string()),
                value: Some(value),
                ..NodeFields::default()
            },
            NodeKind::Provider => NodeFields::provider(&value),
        };
        fields.with_label(self.label.clone())
    }
}

/// Read-only registry of node type definitions.
#[derive(Debug, Clone)]
pub struct NodeCatalog {
    definitions: Vec<NodeTypeDefinition>,
    index: AHashMap<String, usize>,
}

impl NodeCatalog {
    pub fn new(definitions: Vec<NodeTypeDefinition>) -> Result<Self, CatalogError> {
        let mut index = AHashMap::with_capacity(definitions.len());
        for (i, def) in definitions.iter().enumerate() {
            if index.insert(def.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateDefinition(def.id.clone()));
            }
        }
        Ok(Self { definitions, index })
    }

    /// Parses a JSON array of definitions.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let definitions: Vec<NodeTypeDefinition> = serde_json::from_str(json)?;
        Self::new(definitions)
    }

    pub fn definitions(&self) -> &[NodeTypeDefinition] {
        &self.definitions
    }

    pub fn get(&self, id: &str) -> Option<&NodeTypeDefinition> {
        self.index.get(id).map(|&i| &self.definitions[i])
    }

    pub fn start(&self) -> Option<&NodeTypeDefinition> {
        self.definitions.iter().find(|d| d.kind == NodeKind::Start)
    }

    /// Finds the provider definition whose default value equals `name` or
    /// whose label mentions it. First match wins.
    pub fn find_provider(&self, name: &str) -> Option<&NodeTypeDefinition> {
        self.definitions.iter().find(|d| {
            d.kind == NodeKind::Provider
                && (d.default_value.as_deref() == Some(name) || d.label.contains(name))
        })
    }
}

impl Default for NodeCatalog {
    fn default() -> Self {
        let definitions = builtin_definitions();
        let index = definitions
            .iter()
            .enumerate()
            .map(|(i, d)| (d.id.clone(), i))
            .collect();
        Self { definitions, index }
    }
}

fn builtin_definitions() -> Vec<NodeTypeDefinition> {
    let comparisons = ["=", "!=", ">", ">=", "<", "<="];
    let memberships = ["=", "!=", "in", "not_in"];
    let text = ["=", "!=", "contains", "not_contains"];

    let condition = |id: &str, label: &str, color: &str, description: &str, ops: &[&str]| {
        NodeTypeDefinition {
            id: id.to_string(),
            kind: NodeKind::Condition,
            label: label.to_string(),
            color: color.to_string(),
            description: description.to_string(),
            category: "condition".to_string(),
            has_operator: true,
            operator_options: ops.iter().map(|s| s.to_string()).collect(),
            default_value: None,
        }
    };
    let provider = |name: &str, label: &str, color: &str| NodeTypeDefinition {
        id: format!("provider-{}", name.to_lowercase()),
        kind: NodeKind::Provider,
        label: label.to_string(),
        color: color.to_string(),
        description: format!("Routes the transaction to {}", label),
        category: "provider".to_string(),
        has_operator: false,
        operator_options: Vec::new(),
        default_value: Some(name.to_string()),
    };

    vec![
        NodeTypeDefinition {
            id: "initial".to_string(),
            kind: NodeKind::Start,
            label: crate::graph::START_LABEL.to_string(),
            color: "bg-green-500".to_string(),
            description: "Entry point of every routing flow".to_string(),
            category: "trigger".to_string(),
            has_operator: false,
            operator_options: Vec::new(),
            default_value: None,
        },
        condition("amount", "Amount", "bg-blue-500", "Transaction amount", &comparisons),
        condition("card", "Card brand", "bg-purple-500", "Card brand", &memberships),
        condition("installments", "Installments", "bg-indigo-500", "Number of installments", &comparisons),
        condition("metadata", "Metadata", "bg-slate-500", "Free-form transaction metadata", &text),
        condition("paymentMethod", "Payment method", "bg-amber-500", "Card, PIX or boleto", &memberships),
        condition("country", "Country", "bg-teal-500", "Issuing country", &memberships),
        condition("currency", "Currency", "bg-cyan-500", "Transaction currency", &memberships),
        provider("STRIPE", "Stripe", "bg-violet-600"),
        provider("ADYEN", "Adyen", "bg-emerald-600"),
        provider("CIELO", "Cielo", "bg-sky-600"),
        provider("REDE", "Rede", "bg-orange-600"),
        provider("GETNET", "Getnet", "bg-red-600"),
        provider("PAGSEGURO", "PagSeguro", "bg-yellow-600"),
    ]
}
