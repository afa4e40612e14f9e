//! Id → owning container lookups.
//!
//! The tree carries no parent pointers, so every lookup is a linear scan in
//! tree order returning the first structural match. Ids are unique tree-wide,
//! which makes the first match the only match on a valid tree.

use crate::model::tree::{Process, Subprocess, Tree};

/// The process that owns subprocess `id`, or the process whose own id is
/// `id` (hovering a process container targets its subprocess list).
///
/// Never returns the sentinel: it neither gives up nor receives subprocesses.
pub fn process_owner_of_subprocess<'t>(
    tree: &'t Tree,
    id: &str,
    sentinel_id: &str,
) -> Option<&'t Process> {
    if id == sentinel_id {
        return None;
    }
    tree.processes
        .iter()
        .find(|p| p.id == id || p.subs.iter().any(|s| s.id == id))
        .filter(|p| p.id != sentinel_id)
}

/// The subprocess whose activity list contains `id`.
///
/// An empty subprocess has no activity row to hover, so its own id stands in
/// as the drop target and resolves to itself.
pub fn subprocess_owner_of_activity<'t>(tree: &'t Tree, id: &str) -> Option<&'t Subprocess> {
    tree.processes.iter().flat_map(|p| p.subs.iter()).find(|s| {
        (s.activities.is_empty() && s.id == id) || s.activities.iter().any(|a| a.id == id)
    })
}

/// The process that owns `id` at any depth: the process itself, one of its
/// direct activities, one of its subprocesses, or an activity inside one.
pub fn process_owner_of_activity<'t>(tree: &'t Tree, id: &str) -> Option<&'t Process> {
    tree.processes.iter().find(|p| {
        p.id == id
            || p.activities.iter().any(|a| a.id == id)
            || p
                .subs
                .iter()
                .any(|s| s.id == id || s.activities.iter().any(|a| a.id == id))
    })
}

/// Both owners of an activity-drag id, as resolved in one pass of the
/// controller.
#[derive(Debug, Clone, Copy)]
pub struct ActivityOwners<'t> {
    pub subprocess: Option<&'t Subprocess>,
    pub process: Option<&'t Process>,
}

pub fn activity_owners<'t>(tree: &'t Tree, id: &str) -> ActivityOwners<'t> {
    ActivityOwners {
        subprocess: subprocess_owner_of_activity(tree, id),
        process: process_owner_of_activity(tree, id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tree::{Activity, Process, Subprocess};

    const SENTINEL: &str = "single";

    fn tree_with_empty_sub() -> Tree {
        let mut tree = Tree::sample();
        tree.processes[2]
            .subs
            .push(Subprocess::new("s5", "Subprocess 5", vec![]));
        tree
    }

    #[test]
    fn test_subprocess_owner_by_sub_id() {
        let tree = Tree::sample();
        let owner = process_owner_of_subprocess(&tree, "s3", SENTINEL).unwrap();
        assert_eq!(owner.id, "p3");
    }

    #[test]
    fn test_subprocess_owner_by_process_id() {
        let tree = Tree::sample();
        let owner = process_owner_of_subprocess(&tree, "p2", SENTINEL).unwrap();
        assert_eq!(owner.id, "p2");
    }

    #[test]
    fn test_subprocess_owner_never_sentinel() {
        let mut tree = Tree::sample();
        assert!(process_owner_of_subprocess(&tree, SENTINEL, SENTINEL).is_none());

        // Even a subprocess placed under the sentinel does not resolve to it
        tree.processes[0]
            .subs
            .push(Subprocess::new("s9", "Stray", vec![]));
        assert!(process_owner_of_subprocess(&tree, "s9", SENTINEL).is_none());
    }

    #[test]
    fn test_subprocess_owner_ignores_activity_ids() {
        let tree = Tree::sample();
        assert!(process_owner_of_subprocess(&tree, "a3", SENTINEL).is_none());
        assert!(process_owner_of_subprocess(&tree, "nope", SENTINEL).is_none());
    }

    #[test]
    fn test_subprocess_owner_of_activity() {
        let tree = Tree::sample();
        assert_eq!(subprocess_owner_of_activity(&tree, "a61").unwrap().id, "s3");
        // Direct process activities have no subprocess owner
        assert!(subprocess_owner_of_activity(&tree, "a2").is_none());
        // A non-empty subprocess's own id is not a drop target
        assert!(subprocess_owner_of_activity(&tree, "s3").is_none());
    }

    #[test]
    fn test_empty_subprocess_resolves_to_itself() {
        let tree = tree_with_empty_sub();
        assert_eq!(subprocess_owner_of_activity(&tree, "s5").unwrap().id, "s5");
    }

    #[test]
    fn test_process_owner_of_activity_bridges_levels() {
        let tree = Tree::sample();
        assert_eq!(process_owner_of_activity(&tree, "a1").unwrap().id, "single");
        assert_eq!(process_owner_of_activity(&tree, "p2").unwrap().id, "p2");
        assert_eq!(process_owner_of_activity(&tree, "s4").unwrap().id, "p3");
        assert_eq!(process_owner_of_activity(&tree, "a8").unwrap().id, "p3");
        assert!(process_owner_of_activity(&tree, "zzz").is_none());
    }

    #[test]
    fn test_duplicate_ids_resolve_to_first_in_tree_order() {
        let mut tree = Tree::sample();
        tree.processes[2].activities.push(Activity::new("a2", "Dup"));
        assert_eq!(process_owner_of_activity(&tree, "a2").unwrap().id, "p2");
    }

    #[test]
    fn test_activity_owners_pair() {
        let tree = Tree::sample();
        let owners = activity_owners(&tree, "a4");
        assert_eq!(owners.subprocess.map(|s| s.id.as_str()), Some("s2"));
        assert_eq!(owners.process.map(|p| p.id.as_str()), Some("p2"));

        let tree = Tree::new(vec![Process::new("single", "S", vec![], vec![])]);
        let owners = activity_owners(&tree, "single");
        assert!(owners.subprocess.is_none());
        assert_eq!(owners.process.map(|p| p.id.as_str()), Some("single"));
    }
}
