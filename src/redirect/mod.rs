//! Rewriting the dependency graph onto built targets
//!
//! After the build, every absorbed source bundle is replaced by the target
//! that absorbed it:
//!
//! ```text
//! before: widgets -> core          targets: ui = [widgets], base = [core]
//! after:  ui -> base               pass-through: widgets -> ui, core -> base
//! ```
//!
//! Targets only ever depend on other targets, and each absorbed name gets a
//! pass-through entry depending solely on its target, so existing references
//! to the old name keep pulling in the right compressed files.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::domain::TargetBundle;
use crate::error::{Result, unassigned_bundle, unknown_bundle};
use crate::resolver::{DependencyList, ResolvedBundles, order_list, rank_index};

/// Targets after redirection
#[derive(Debug, Clone)]
pub struct Redirected {
    /// Targets whose `depends` now name other targets only
    pub targets: BTreeMap<String, TargetBundle>,
    /// Absorbed source bundle name to absorbing target name
    pub pass_through: BTreeMap<String, String>,
    /// Target names, dependencies first
    pub order: Vec<String>,
}

/// Map each absorbed source bundle to the target holding it
pub fn owners(targets: &BTreeMap<String, TargetBundle>) -> HashMap<String, String> {
    targets
        .values()
        .flat_map(|target| {
            target
                .depends
                .iter()
                .map(move |bundle| (bundle.clone(), target.name.clone()))
        })
        .collect()
}

/// Target-level graph implied by the member bundles' dependencies
///
/// A target depends on another when one of its members depends on a member
/// of the other. Self references are dropped.
///
/// # Errors
///
/// Returns `AssetError::UnknownBundle` for a member missing from `resolved`,
/// and `AssetError::UnassignedBundle` for a dependency no target holds.
pub fn target_dependencies(
    targets: &BTreeMap<String, TargetBundle>,
    resolved: &ResolvedBundles,
) -> Result<DependencyList> {
    let owners = owners(targets);
    let mut graph = DependencyList::new();

    for target in targets.values() {
        let mut depends: Vec<String> = Vec::new();
        for member in &target.depends {
            let bundle = resolved
                .get(member)
                .ok_or_else(|| unknown_bundle(member.clone()))?;
            for dep in &bundle.depends {
                let owner = owners
                    .get(dep)
                    .ok_or_else(|| unassigned_bundle(dep.clone(), member.clone()))?;
                if owner != &target.name && !depends.contains(owner) {
                    depends.push(owner.clone());
                }
            }
        }
        graph.insert(target.name.clone(), depends);
    }

    Ok(graph)
}

/// Order targets so that each one follows the targets it needs
///
/// # Errors
///
/// Returns `AssetError::CircularDependency` naming a target when members
/// of two targets depend on each other in opposite directions.
pub fn target_order(
    targets: &BTreeMap<String, TargetBundle>,
    resolved: &ResolvedBundles,
) -> Result<Vec<String>> {
    let graph = target_dependencies(targets, resolved)?;
    let roots: Vec<String> = targets.keys().cloned().collect();
    order_list(&roots, &graph)
}

/// Point every target at other targets and emit pass-through entries
///
/// # Errors
///
/// Returns `AssetError::CircularDependency` if the rewritten target graph
/// has a cycle.
pub fn redirect(
    mut targets: BTreeMap<String, TargetBundle>,
    resolved: &ResolvedBundles,
) -> Result<Redirected> {
    let graph = target_dependencies(&targets, resolved)?;
    let roots: Vec<String> = targets.keys().cloned().collect();
    let order = order_list(&roots, &graph)?;
    let ranks = rank_index(&order);

    let mut pass_through = BTreeMap::new();
    for target in targets.values_mut() {
        for member in target.depends.drain(..) {
            pass_through.insert(member, target.name.clone());
        }

        let mut depends = graph.get(&target.name).cloned().unwrap_or_default();
        depends.sort_by_key(|name| ranks.get(name).copied().unwrap_or(usize::MAX));
        debug!(name = %target.name, depends = ?depends, "redirected target");
        target.depends = depends;
    }

    Ok(Redirected {
        targets,
        pass_through,
        order,
    })
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::TargetConfig;
    use crate::error::AssetError;
    use crate::partition::partition;
    use crate::resolver::resolve;
    use crate::resolver::tests::{names, registry_of};

    fn partitioned(
        bundles: &[(&str, &[&str])],
        requested: &[&str],
        targets: &[(&str, &[&str])],
    ) -> (BTreeMap<String, TargetBundle>, ResolvedBundles) {
        let resolved =
            resolve(&names(requested), &registry_of(bundles)).expect("test graph should resolve");
        let configs: BTreeMap<String, TargetConfig> = targets
            .iter()
            .map(|(name, depends)| {
                (
                    (*name).to_string(),
                    TargetConfig {
                        depends: names(depends),
                        out_dir: Some("out".to_string()),
                        out_url: Some("/out".to_string()),
                        ..TargetConfig::default()
                    },
                )
            })
            .collect();
        let targets = partition(&configs, &resolved).expect("test targets should partition");
        (targets, resolved)
    }

    #[test]
    fn test_single_target_redirects_all_sources() {
        let (targets, resolved) = partitioned(
            &[("core", &[]), ("widgets", &["core"])],
            &["widgets"],
            &[("all", &[])],
        );

        let redirected = redirect(targets, &resolved).expect("should redirect");

        assert!(redirected.targets["all"].depends.is_empty());
        assert_eq!(redirected.pass_through["core"], "all");
        assert_eq!(redirected.pass_through["widgets"], "all");
    }

    #[test]
    fn test_targets_depend_on_targets_only() {
        let (targets, resolved) = partitioned(
            &[
                ("core", &[]),
                ("widgets", &["core"]),
                ("admin", &["widgets", "core"]),
            ],
            &["admin"],
            &[("base", &["core"]), ("ui", &["widgets"]), ("back", &["admin"])],
        );

        let redirected = redirect(targets, &resolved).expect("should redirect");

        assert!(redirected.targets["base"].depends.is_empty());
        assert_eq!(redirected.targets["ui"].depends, names(&["base"]));
        assert_eq!(redirected.targets["back"].depends, names(&["base", "ui"]));
        for target in redirected.targets.values() {
            for dep in &target.depends {
                assert!(redirected.targets.contains_key(dep));
                assert!(!redirected.pass_through.contains_key(dep));
            }
        }
        assert_eq!(redirected.order, names(&["base", "ui", "back"]));
    }

    #[test]
    fn test_pass_through_points_at_absorbing_target() {
        let (targets, resolved) = partitioned(
            &[("core", &[]), ("widgets", &["core"]), ("admin", &["widgets"])],
            &["admin"],
            &[("front", &["core", "widgets"]), ("back", &[])],
        );

        let redirected = redirect(targets, &resolved).expect("should redirect");

        assert_eq!(redirected.pass_through.len(), 3);
        assert_eq!(redirected.pass_through["core"], "front");
        assert_eq!(redirected.pass_through["widgets"], "front");
        assert_eq!(redirected.pass_through["admin"], "back");
        assert_eq!(redirected.targets["back"].depends, names(&["front"]));
    }

    #[test]
    fn test_redirected_graph_orders_again() {
        let (targets, resolved) = partitioned(
            &[("core", &[]), ("widgets", &["core"]), ("admin", &["widgets"])],
            &["admin"],
            &[("a", &["core"]), ("b", &["widgets"]), ("c", &[])],
        );

        let redirected = redirect(targets, &resolved).expect("should redirect");
        let graph: DependencyList = redirected
            .targets
            .values()
            .map(|t| (t.name.clone(), t.depends.clone()))
            .collect();
        let roots: Vec<String> = graph.keys().cloned().collect();

        assert!(order_list(&roots, &graph).is_ok());
    }

    #[test]
    fn test_cross_target_cycle_rejected() {
        // x <- y and z <- w, with x,w in one target and y,z in the other
        let (targets, resolved) = partitioned(
            &[("x", &[]), ("y", &["x"]), ("w", &["z"]), ("z", &[])],
            &["y", "w"],
            &[("left", &["w", "x"]), ("right", &["y", "z"])],
        );

        let err = target_order(&targets, &resolved).expect_err("targets form a cycle");
        match err {
            AssetError::CircularDependency { name, .. } => {
                assert!(name == "left" || name == "right");
            }
            other => panic!("expected CircularDependency, got {other:?}"),
        }

        let err = redirect(targets, &resolved).expect_err("redirect re-validates");
        assert!(matches!(err, AssetError::CircularDependency { .. }));
    }

    #[test]
    fn test_owners_inverse_of_partition() {
        let (targets, _) = partitioned(
            &[("core", &[]), ("widgets", &["core"])],
            &["widgets"],
            &[("base", &["core"]), ("rest", &[])],
        );

        let owners = owners(&targets);
        assert_eq!(owners["core"], "base");
        assert_eq!(owners["widgets"], "rest");
    }
}
