//! Graph helpers over fixed adjacency lists
//!
//! The dependency graph is represented as a map from node names to their
//! list of dependencies:
//!
//! ```text
//! HashMap<String, Vec<String>>
//!    ↓              ↓
//!  node_name    [dep1, dep2, dep3]
//! ```

use std::collections::HashMap;

use crate::error::Result;
use crate::resolver::sort::dependency_order;

/// Adjacency list keyed by node name
pub type DependencyList = HashMap<String, Vec<String>>;

/// Order every node reachable from `roots` in `deps`
///
/// Names missing from `deps` are treated as leaves.
///
/// # Errors
///
/// Returns `AssetError::CircularDependency` if the graph has a cycle.
pub fn order_list(roots: &[String], deps: &DependencyList) -> Result<Vec<String>> {
    dependency_order(roots, |name| Ok(deps.get(name).cloned().unwrap_or_default()))
}

/// Map each name to its 0-based position in `order`
pub fn rank_index(order: &[String]) -> HashMap<String, usize> {
    order
        .iter()
        .enumerate()
        .map(|(rank, name)| (name.clone(), rank))
        .collect()
}
