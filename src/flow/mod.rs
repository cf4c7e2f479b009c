//! The nested flow document exchanged with the decision engine, and the
//! workflow records that carry it.

mod item;
mod workflow;

pub use item::*;
pub use workflow::*;

/// Parses a flow document (a JSON array of flow items).
pub fn parse_document(json: &str) -> Result<Vec<FlowItem>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Renders a flow document as pretty-printed JSON.
pub fn render_document(flow: &[FlowItem]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(flow)
}
