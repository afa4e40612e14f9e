use indexmap::IndexMap;
use serde::Serialize;

use crate::model::config::EngineConfig;
use crate::model::tree::{ItemKind, Tree};

/// Structured result from `arrange check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// A structural problem that the engine cannot work with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    /// The same id appears on more than one node
    #[serde(rename = "duplicate_id")]
    DuplicateId { id: String, kinds: Vec<ItemKind> },
    /// The tree is empty or its first process is not the sentinel
    #[serde(rename = "missing_sentinel")]
    MissingSentinel { sentinel_id: String },
    /// The sentinel exists but not at index 0
    #[serde(rename = "sentinel_misplaced")]
    SentinelMisplaced { sentinel_id: String, index: usize },
}

/// A validation warning (non-critical issue).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    /// The sentinel holds subprocesses, which can never be dragged out of it
    #[serde(rename = "sentinel_has_subs")]
    SentinelHasSubs { count: usize },
    #[serde(rename = "empty_id")]
    EmptyId { kind: ItemKind, name: String },
    /// Ids with whitespace cannot be addressed from an event script
    #[serde(rename = "whitespace_in_id")]
    WhitespaceInId { id: String },
}

/// Validate a tree against the engine's invariants. Read-only.
///
/// Checks performed:
/// 1. Every id is unique across all levels
/// 2. The sentinel process sits at index 0 and nowhere else
/// 3. Warnings for sentinel subprocesses and unaddressable ids
pub fn check_tree(tree: &Tree, config: &EngineConfig) -> CheckResult {
    let mut result = CheckResult::default();
    let sentinel_id = config.sentinel_id();

    for (id, kinds) in find_duplicate_ids(tree) {
        result.errors.push(CheckError::DuplicateId { id, kinds });
    }

    match tree.processes.first() {
        Some(first) if first.id == sentinel_id => {
            if !first.subs.is_empty() {
                result.warnings.push(CheckWarning::SentinelHasSubs {
                    count: first.subs.len(),
                });
            }
        }
        _ => result.errors.push(CheckError::MissingSentinel {
            sentinel_id: sentinel_id.to_string(),
        }),
    }

    for (index, process) in tree.processes.iter().enumerate().skip(1) {
        if process.id == sentinel_id {
            result.errors.push(CheckError::SentinelMisplaced {
                sentinel_id: sentinel_id.to_string(),
                index,
            });
        }
    }

    check_ids(tree, &mut result);

    result.valid = result.errors.is_empty();
    result
}

fn check_ids(tree: &Tree, result: &mut CheckResult) {
    let mut named: Vec<(&str, &str, ItemKind)> = Vec::new();
    for process in &tree.processes {
        named.push((process.id.as_str(), process.name.as_str(), ItemKind::Process));
        for a in &process.activities {
            named.push((a.id.as_str(), a.name.as_str(), ItemKind::Activity));
        }
        for sub in &process.subs {
            named.push((sub.id.as_str(), sub.name.as_str(), ItemKind::Subprocess));
            for a in &sub.activities {
                named.push((a.id.as_str(), a.name.as_str(), ItemKind::Activity));
            }
        }
    }

    for (id, name, kind) in named {
        if id.is_empty() {
            result.warnings.push(CheckWarning::EmptyId {
                kind,
                name: name.to_string(),
            });
        } else if id.chars().any(char::is_whitespace) {
            result.warnings.push(CheckWarning::WhitespaceInId { id: id.to_string() });
        }
    }
}

/// Ids that occur more than once, in order of first appearance.
fn find_duplicate_ids(tree: &Tree) -> Vec<(String, Vec<ItemKind>)> {
    let mut seen: IndexMap<&str, Vec<ItemKind>> = IndexMap::new();
    for (id, kind) in tree.ids() {
        seen.entry(id).or_default().push(kind);
    }
    seen.into_iter()
        .filter(|(_, kinds)| kinds.len() > 1)
        .map(|(id, kinds)| (id.to_string(), kinds))
        .collect()
}
