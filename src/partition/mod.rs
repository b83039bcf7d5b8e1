//! Assignment of resolved source bundles to output targets
//!
//! Every resolved bundle ends up in exactly one target:
//! - targets with explicit `depends` absorb the bundles they list
//! - a single target without `depends` absorbs everything else
//!
//! Each target's member list is then sorted by resolution rank so the
//! bundler concatenates dependencies before their dependents.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use crate::config::TargetConfig;
use crate::domain::TargetBundle;
use crate::error::{
    Result, claimed_twice, missing_target_field, multiple_implicit_targets, target_name_collision,
    unassigned_bundle, unknown_bundle,
};
use crate::resolver::{ResolvedBundles, order_list, rank_index};

/// Build one target bundle per configured target
///
/// # Errors
///
/// - `AssetError::MultipleImplicitTargets` if two targets have empty `depends`
/// - `AssetError::BundleClaimedTwice` if two targets list the same bundle
/// - `AssetError::UnassignedBundle` if no target absorbs a resolved bundle
/// - `AssetError::MissingTargetField` if `outDir` or `outUrl` is missing
/// - `AssetError::TargetNameCollision` if a target is named like a source bundle
/// - `AssetError::CircularDependency` if the resolved graph has a cycle
pub fn partition(
    configs: &BTreeMap<String, TargetConfig>,
    resolved: &ResolvedBundles,
) -> Result<BTreeMap<String, TargetBundle>> {
    let order = order_list(resolved.order(), &resolved.dependency_list())?;
    let ranks = rank_index(&order);

    let (implicit, owners) = scan_targets(configs, resolved)?;

    let mut members: BTreeMap<&str, Vec<String>> = configs
        .iter()
        .map(|(name, config)| (name.as_str(), dedup(&config.depends)))
        .collect();

    let unclaimed: Vec<String> = order
        .iter()
        .filter(|name| !owners.contains_key(name.as_str()))
        .cloned()
        .collect();

    match implicit {
        Some(catch_all) => {
            debug!(name = catch_all, count = unclaimed.len(), "catch-all target absorbs");
            members.insert(catch_all, unclaimed);
        }
        None => {
            if let Some(name) = unclaimed.first() {
                return Err(unassigned_bundle(name.clone(), required_by(name, resolved)));
            }
        }
    }

    let mut targets = BTreeMap::new();
    for (name, config) in configs {
        let mut depends = members.remove(name.as_str()).unwrap_or_default();
        depends.sort_by_key(|bundle| ranks.get(bundle).copied().unwrap_or(usize::MAX));

        targets.insert(name.clone(), build_target(name, config, depends)?);
    }

    Ok(targets)
}

/// Find the catch-all target and the owner of every explicitly listed bundle
fn scan_targets<'a>(
    configs: &'a BTreeMap<String, TargetConfig>,
    resolved: &ResolvedBundles,
) -> Result<(Option<&'a str>, HashMap<&'a str, &'a str>)> {
    let mut implicit: Option<&str> = None;
    let mut owners: HashMap<&str, &str> = HashMap::new();

    for (name, config) in configs {
        if resolved.contains(name) {
            return Err(target_name_collision(name.clone()));
        }

        if config.depends.is_empty() {
            if let Some(first) = implicit {
                return Err(multiple_implicit_targets(first, name.clone()));
            }
            implicit = Some(name.as_str());
            continue;
        }

        for bundle in &config.depends {
            if !resolved.contains(bundle) {
                return Err(unknown_bundle(bundle.clone()));
            }
            if let Some(first) = owners.get(bundle.as_str()).copied() {
                if first != name.as_str() {
                    return Err(claimed_twice(bundle.clone(), first, name.clone()));
                }
            }
            owners.insert(bundle.as_str(), name.as_str());
        }
    }

    Ok((implicit, owners))
}

fn build_target(name: &str, config: &TargetConfig, depends: Vec<String>) -> Result<TargetBundle> {
    let out_dir = config
        .out_dir
        .clone()
        .ok_or_else(|| missing_target_field(name, "outDir"))?;
    let out_url = config
        .out_url
        .clone()
        .ok_or_else(|| missing_target_field(name, "outUrl"))?;

    Ok(TargetBundle {
        name: name.to_string(),
        depends,
        out_dir,
        out_url,
        script_pattern: config.script_pattern.clone(),
        style_pattern: config.style_pattern.clone(),
        script_files: Vec::new(),
        style_files: Vec::new(),
    })
}

fn dedup(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}

/// Name of a bundle depending on `name`, for error messages
fn required_by(name: &str, resolved: &ResolvedBundles) -> String {
    resolved
        .iter()
        .find(|bundle| bundle.depends.iter().any(|dep| dep == name))
        .map_or_else(|| "bundles".to_string(), |bundle| bundle.name.clone())
}
