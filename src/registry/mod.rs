//! Translation tables between editor identifiers and wire identifiers, and
//! the catalog of node types the editor can create.

mod catalog;
mod mapping;

pub use catalog::*;
pub use mapping::*;
