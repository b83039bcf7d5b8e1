//! Dependency ordering using depth-first search (DFS)
//!
//! Every graph assetpack handles (source bundles, provisional targets,
//! redirected targets) is ordered by the same walker.
//!
//! ## Algorithm
//!
//! Each node is in one of three states:
//!
//! 1. **Unvisited**: not reached yet
//! 2. **InProgress**: on the current walk, its dependencies are still being visited
//! 3. **Done**: fully visited and assigned a position in the order
//!
//! Reaching an `InProgress` node again means the walk has looped back onto
//! one of its own ancestors, which is a cycle. Nodes are appended when they
//! become `Done`, so every dependency precedes its dependents.
//!
//! Dependencies are requested lazily through a callback, exactly once per
//! node, which lets the resolver fetch bundles from the registry on first
//! reference.

use std::collections::HashMap;

use crate::error::{Result, circular_dependency};

/// Per-node traversal state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitState {
    Unvisited,
    InProgress,
    Done,
}

/// Context for one walk
struct WalkContext<F> {
    /// Yields the dependency names of a node, called once per node
    deps_of: F,
    /// Node states, absent means `Unvisited`
    states: HashMap<String, VisitState>,
    /// Nodes currently `InProgress`, outermost first
    stack: Vec<String>,
    /// Completion order
    order: Vec<String>,
}

impl<F> WalkContext<F>
where
    F: FnMut(&str) -> Result<Vec<String>>,
{
    fn state(&self, name: &str) -> VisitState {
        self.states
            .get(name)
            .copied()
            .unwrap_or(VisitState::Unvisited)
    }

    fn visit(&mut self, name: &str) -> Result<()> {
        match self.state(name) {
            VisitState::Done => return Ok(()),
            VisitState::InProgress => return Err(self.cycle_error(name)),
            VisitState::Unvisited => {}
        }

        self.states
            .insert(name.to_string(), VisitState::InProgress);
        self.stack.push(name.to_string());

        let deps = (self.deps_of)(name)?;
        for dep in &deps {
            self.visit(dep)?;
        }

        self.stack.pop();
        self.states.insert(name.to_string(), VisitState::Done);
        self.order.push(name.to_string());

        Ok(())
    }

    /// Build the error for a node reached while still in progress
    fn cycle_error(&self, name: &str) -> crate::error::AssetError {
        let start = self
            .stack
            .iter()
            .position(|entry| entry == name)
            .unwrap_or(0);
        let mut chain: Vec<&str> = self.stack[start..].iter().map(String::as_str).collect();
        chain.push(name);
        circular_dependency(name, chain.join(" -> "))
    }
}

/// Walk the graph reachable from `roots` and return its completion order
///
/// Roots are visited in the given order, so independent nodes keep the
/// caller's ordering.
///
/// # Errors
///
/// Returns `AssetError::CircularDependency` naming the first node found on a
/// cycle, or any error raised by `deps_of`.
///
/// # Example
///
/// ```text
/// widgets depends on core
/// roots: [widgets]
///
/// Result: [core, widgets]
/// ```
pub fn dependency_order<F>(roots: &[String], deps_of: F) -> Result<Vec<String>>
where
    F: FnMut(&str) -> Result<Vec<String>>,
{
    let mut ctx = WalkContext {
        deps_of,
        states: HashMap::new(),
        stack: Vec::new(),
        order: Vec::new(),
    };

    for root in roots {
        ctx.visit(root)?;
    }

    Ok(ctx.order)
}
