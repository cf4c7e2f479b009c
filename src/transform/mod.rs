//! The two directions of the transducer between the node/edge graph and the
//! nested flow document.
//!
//! Both walks use an explicit work stack, so the depth of a rule tree is
//! bounded by memory rather than by the call stack.

pub mod deserialize;
pub mod serialize;

pub use deserialize::{LoadedGraph, TreeToGraphBuilder};
pub use serialize::{GraphToTreeBuilder, serialize};

use crate::config::LoaderLayout;
use crate::flow::FlowItem;
use crate::registry::NodeCatalog;

/// Rebuilds a graph from `flow` using the given catalog and loader layout.
pub fn deserialize(flow: &[FlowItem], catalog: &NodeCatalog, layout: &LoaderLayout) -> LoadedGraph {
    TreeToGraphBuilder::new(catalog, layout).build(flow)
}
