//! Relocation of one node within or across id-addressed ordered lists.
//!
//! A [`ListSlot`] names one ordered list in the tree (the top-level process
//! list, a process's subprocesses, a process's direct activities, or a
//! subprocess's activities). The executors below are generic over the slot,
//! so one transfer and one reorder routine serve every level pair.
//!
//! Every executor resolves all indices before its first mutation: a rejected
//! move leaves the tree exactly as it was.

use crate::model::tree::{Activity, Node, Process, Subprocess, Tree};

/// Why a relocation was not applied. None of these reach the caller of the
/// engine; they are logged and the event is dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveRejected {
    #[error("no owning container for {0}")]
    UnresolvedContainer(String),
    #[error("{id} is not in {list}")]
    ActiveNotFound { id: String, list: String },
    #[error("the sentinel process cannot move or trade subprocesses")]
    SentinelViolation,
    #[error("source and destination positions are identical")]
    NoopMove,
}

/// Address of an ordered list in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPath<'a> {
    Processes,
    Subs(&'a str),
    ProcessActivities(&'a str),
    SubActivities(&'a str),
}

impl std::fmt::Display for ListPath<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListPath::Processes => write!(f, "processes"),
            ListPath::Subs(p) => write!(f, "{}.subs", p),
            ListPath::ProcessActivities(p) => write!(f, "{}.activities", p),
            ListPath::SubActivities(s) => write!(f, "sub:{}.activities", s),
        }
    }
}

/// Accessor/mutator pair for one ordered list of `Item`s
pub trait ListSlot {
    type Item: Node;

    fn path(&self) -> ListPath<'_>;
    fn list<'t>(&self, tree: &'t Tree) -> Option<&'t Vec<Self::Item>>;
    fn list_mut<'t>(&self, tree: &'t mut Tree) -> Option<&'t mut Vec<Self::Item>>;
}

/// The top-level process list
#[derive(Debug, Clone, Copy)]
pub struct Processes;

/// Subprocesses of the process with this id
#[derive(Debug, Clone, Copy)]
pub struct SubsOf<'a>(pub &'a str);

/// Direct activities of the process with this id
#[derive(Debug, Clone, Copy)]
pub struct ProcessActivities<'a>(pub &'a str);

/// Activities of the subprocess with this id
#[derive(Debug, Clone, Copy)]
pub struct SubActivities<'a>(pub &'a str);

impl ListSlot for Processes {
    type Item = Process;

    fn path(&self) -> ListPath<'_> {
        ListPath::Processes
    }

    fn list<'t>(&self, tree: &'t Tree) -> Option<&'t Vec<Process>> {
        Some(&tree.processes)
    }

    fn list_mut<'t>(&self, tree: &'t mut Tree) -> Option<&'t mut Vec<Process>> {
        Some(&mut tree.processes)
    }
}

impl ListSlot for SubsOf<'_> {
    type Item = Subprocess;

    fn path(&self) -> ListPath<'_> {
        ListPath::Subs(self.0)
    }

    fn list<'t>(&self, tree: &'t Tree) -> Option<&'t Vec<Subprocess>> {
        tree.processes.iter().find(|p| p.id == self.0).map(|p| &p.subs)
    }

    fn list_mut<'t>(&self, tree: &'t mut Tree) -> Option<&'t mut Vec<Subprocess>> {
        tree.processes
            .iter_mut()
            .find(|p| p.id == self.0)
            .map(|p| &mut p.subs)
    }
}

impl ListSlot for ProcessActivities<'_> {
    type Item = Activity;

    fn path(&self) -> ListPath<'_> {
        ListPath::ProcessActivities(self.0)
    }

    fn list<'t>(&self, tree: &'t Tree) -> Option<&'t Vec<Activity>> {
        tree.processes
            .iter()
            .find(|p| p.id == self.0)
            .map(|p| &p.activities)
    }

    fn list_mut<'t>(&self, tree: &'t mut Tree) -> Option<&'t mut Vec<Activity>> {
        tree.processes
            .iter_mut()
            .find(|p| p.id == self.0)
            .map(|p| &mut p.activities)
    }
}

impl ListSlot for SubActivities<'_> {
    type Item = Activity;

    fn path(&self) -> ListPath<'_> {
        ListPath::SubActivities(self.0)
    }

    fn list<'t>(&self, tree: &'t Tree) -> Option<&'t Vec<Activity>> {
        tree.processes
            .iter()
            .flat_map(|p| p.subs.iter())
            .find(|s| s.id == self.0)
            .map(|s| &s.activities)
    }

    fn list_mut<'t>(&self, tree: &'t mut Tree) -> Option<&'t mut Vec<Activity>> {
        tree.processes
            .iter_mut()
            .flat_map(|p| p.subs.iter_mut())
            .find(|s| s.id == self.0)
            .map(|s| &mut s.activities)
    }
}

// ---------------------------------------------------------------------------
// Insertion index
// ---------------------------------------------------------------------------

/// Where a dropped item lands in a destination list of `dest_len` items.
///
/// Hovering a member inserts before it, or after it once the pointer has
/// passed its bottom edge. Hovering anything else (the container itself)
/// appends.
pub fn insertion_index(dest_len: usize, over_index: Option<usize>, pointer_below: bool) -> usize {
    match over_index {
        Some(i) => (i + usize::from(pointer_below)).min(dest_len),
        None => dest_len,
    }
}

pub fn index_of<T: Node>(list: &[T], id: &str) -> Option<usize> {
    list.iter().position(|n| n.id() == id)
}

/// Stable move of the element at `from` to `to`; everything else keeps its
/// relative order.
pub fn move_within<T>(list: &mut Vec<T>, from: usize, to: usize) {
    if from == to || from >= list.len() || to >= list.len() {
        return;
    }
    let item = list.remove(from);
    list.insert(to, item);
}

// ---------------------------------------------------------------------------
// Executors
// ---------------------------------------------------------------------------

/// Move `active_id` out of `source` and into `dest`, next to `over_id`.
/// Returns the index it landed at.
pub fn transfer<S, D>(
    tree: &mut Tree,
    source: &S,
    dest: &D,
    active_id: &str,
    over_id: &str,
    pointer_below: bool,
) -> Result<usize, MoveRejected>
where
    S: ListSlot,
    D: ListSlot<Item = S::Item>,
{
    if source.path() == dest.path() {
        return Err(MoveRejected::NoopMove);
    }

    let src = source
        .list(tree)
        .ok_or_else(|| MoveRejected::UnresolvedContainer(source.path().to_string()))?;
    let active_index = index_of(src, active_id).ok_or_else(|| MoveRejected::ActiveNotFound {
        id: active_id.to_string(),
        list: source.path().to_string(),
    })?;
    let dst = dest
        .list(tree)
        .ok_or_else(|| MoveRejected::UnresolvedContainer(dest.path().to_string()))?;
    let index = insertion_index(dst.len(), index_of(dst, over_id), pointer_below);

    let item = source
        .list_mut(tree)
        .map(|list| list.remove(active_index))
        .ok_or_else(|| MoveRejected::UnresolvedContainer(source.path().to_string()))?;

    match dest.list_mut(tree) {
        Some(list) => {
            list.insert(index, item);
            Ok(index)
        }
        None => {
            // Put it back where it was
            if let Some(list) = source.list_mut(tree) {
                list.insert(active_index, item);
            }
            Err(MoveRejected::UnresolvedContainer(dest.path().to_string()))
        }
    }
}

/// Reorder `active_id` to the position of `over_id` within one list.
/// An `over_id` that is not a member (the container itself) targets the end.
/// Returns `(from, to)`.
pub fn reorder<S: ListSlot>(
    tree: &mut Tree,
    slot: &S,
    active_id: &str,
    over_id: &str,
) -> Result<(usize, usize), MoveRejected> {
    let list = slot
        .list_mut(tree)
        .ok_or_else(|| MoveRejected::UnresolvedContainer(slot.path().to_string()))?;
    let from = index_of(list, active_id).ok_or_else(|| MoveRejected::ActiveNotFound {
        id: active_id.to_string(),
        list: slot.path().to_string(),
    })?;
    let to = index_of(list, over_id).unwrap_or(list.len() - 1);
    if from == to {
        return Err(MoveRejected::NoopMove);
    }
    move_within(list, from, to);
    Ok((from, to))
}

/// Reorder the top-level process list. Index 0 belongs to the sentinel:
/// neither the dragged process nor its target may sit there.
pub fn reorder_processes(
    tree: &mut Tree,
    active_id: &str,
    over_id: &str,
) -> Result<(usize, usize), MoveRejected> {
    let from = index_of(&tree.processes, active_id).ok_or_else(|| MoveRejected::ActiveNotFound {
        id: active_id.to_string(),
        list: ListPath::Processes.to_string(),
    })?;
    let to = index_of(&tree.processes, over_id)
        .ok_or_else(|| MoveRejected::UnresolvedContainer(over_id.to_string()))?;
    if from == 0 || to == 0 {
        return Err(MoveRejected::SentinelViolation);
    }
    if from == to {
        return Err(MoveRejected::NoopMove);
    }
    move_within(&mut tree.processes, from, to);
    Ok((from, to))
}
