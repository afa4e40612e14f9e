//! The drag state machine: routes lifecycle events to the resolver and
//! executor pair that fits the dragged item's kind and the container pair
//! under the pointer.
//!
//! Cross-container moves happen live on `over`. Reorders inside one
//! container wait for `end`, unless `over` already dropped the item into
//! that container during the same drag: the live insertion stands.

use serde::Serialize;
use tracing::debug;

use crate::model::tree::{Activity, ItemKind, Process, Subprocess, Tree};
use crate::ops::move_ops::{
    self, ListSlot, MoveRejected, ProcessActivities, SubActivities, SubsOf,
};
use crate::ops::resolve::{self, ActivityOwners};

use super::checkpoint::Checkpoint;

/// Where the controller is in a drag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging { kind: ItemKind, active_id: String },
}

/// The item currently lifted, for overlay rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "node", rename_all = "lowercase")]
pub enum ActivePreview {
    Process(Process),
    Subprocess(Subprocess),
    Activity(Activity),
}

impl ActivePreview {
    pub fn kind(&self) -> ItemKind {
        match self {
            ActivePreview::Process(_) => ItemKind::Process,
            ActivePreview::Subprocess(_) => ItemKind::Subprocess,
            ActivePreview::Activity(_) => ItemKind::Activity,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DragSession {
    state: DragState,
    preview: Option<ActivePreview>,
    /// List the last live transfer of this drag landed in
    landed: Option<String>,
    sentinel_id: String,
}

impl DragSession {
    pub fn new(sentinel_id: &str) -> Self {
        DragSession {
            state: DragState::Idle,
            preview: None,
            landed: None,
            sentinel_id: sentinel_id.to_string(),
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn preview(&self) -> Option<&ActivePreview> {
        self.preview.as_ref()
    }

    pub fn start(&mut self, tree: &Tree, active_id: &str, kind: ItemKind) {
        if let DragState::Dragging { active_id: prev, .. } = &self.state {
            debug!(previous = %prev, "drag start while dragging; previous session dropped");
        }
        self.preview = lift(tree, active_id, kind, &self.sentinel_id);
        if self.preview.is_none() {
            debug!(%kind, active = active_id, "drag start: active item not found, no preview");
        }
        debug!(%kind, active = active_id, "drag start");
        self.landed = None;
        self.state = DragState::Dragging {
            kind,
            active_id: active_id.to_string(),
        };
    }

    /// Live cross-container moves. Fires many times per drag; each call sees
    /// the tree as the previous one left it.
    pub fn over(
        &mut self,
        checkpoint: &mut Checkpoint,
        active_id: &str,
        over_id: Option<&str>,
        pointer_below: bool,
    ) {
        let Some(kind) = self.kind_for(active_id) else {
            return;
        };
        let Some(over_id) = over_id else {
            return;
        };

        let outcome = match kind {
            ItemKind::Subprocess => checkpoint.apply(|tree| {
                subprocess_over(tree, &self.sentinel_id, active_id, over_id, pointer_below)
            }),
            ItemKind::Activity => {
                checkpoint.apply(|tree| activity_over(tree, active_id, over_id, pointer_below))
            }
            ItemKind::Process => return,
        };

        match outcome {
            Ok((list, index)) => {
                debug!(%kind, active = active_id, over = over_id, %list, index, "drag over: moved");
                self.landed = Some(list);
            }
            Err(reason) => debug!(%kind, active = active_id, over = over_id, %reason, "drag over: ignored"),
        }
    }

    /// Finish the drag: same-container reorders happen here. Always returns
    /// the controller to `Idle`.
    pub fn end(&mut self, checkpoint: &mut Checkpoint, active_id: &str, over_id: Option<&str>) {
        let kind = self.kind_for(active_id);
        let landed = self.landed.take();
        self.reset();

        let (Some(kind), Some(over_id)) = (kind, over_id) else {
            debug!(active = active_id, "drag end: nothing to drop");
            return;
        };

        let outcome = match kind {
            ItemKind::Subprocess => checkpoint.apply(|tree| {
                subprocess_end(tree, &self.sentinel_id, landed.as_deref(), active_id, over_id)
            }),
            ItemKind::Activity => checkpoint
                .apply(|tree| activity_end(tree, landed.as_deref(), active_id, over_id)),
            ItemKind::Process => {
                checkpoint.apply(|tree| move_ops::reorder_processes(tree, active_id, over_id))
            }
        };

        match outcome {
            Ok((from, to)) => debug!(%kind, active = active_id, over = over_id, from, to, "drag end: reordered"),
            Err(reason) => debug!(%kind, active = active_id, over = over_id, %reason, "drag end: ignored"),
        }
    }

    /// Drop the preview. Moves already made by `over` stay in the working
    /// tree; only `undo` on the checkpoint takes them back.
    pub fn cancel(&mut self) {
        debug!("drag cancel");
        self.reset();
    }

    fn reset(&mut self) {
        self.state = DragState::Idle;
        self.preview = None;
        self.landed = None;
    }

    /// The session's kind, if `active_id` is the item being dragged
    fn kind_for(&self, active_id: &str) -> Option<ItemKind> {
        match &self.state {
            DragState::Dragging { kind, active_id: id } if id == active_id => Some(*kind),
            DragState::Dragging { active_id: id, .. } => {
                debug!(session = %id, event = active_id, "event for another item ignored");
                None
            }
            DragState::Idle => {
                debug!(event = active_id, "event while idle ignored");
                None
            }
        }
    }
}

/// Snapshot of the item being lifted
fn lift(tree: &Tree, active_id: &str, kind: ItemKind, sentinel_id: &str) -> Option<ActivePreview> {
    match kind {
        ItemKind::Process => tree.process(active_id).cloned().map(ActivePreview::Process),
        ItemKind::Subprocess => resolve::process_owner_of_subprocess(tree, active_id, sentinel_id)
            .and_then(|p| p.subs.iter().find(|s| s.id == active_id))
            .cloned()
            .map(ActivePreview::Subprocess),
        ItemKind::Activity => tree.activity(active_id).cloned().map(ActivePreview::Activity),
    }
}

// ---------------------------------------------------------------------------
// Over
// ---------------------------------------------------------------------------

fn subprocess_over(
    tree: &mut Tree,
    sentinel_id: &str,
    active_id: &str,
    over_id: &str,
    pointer_below: bool,
) -> Result<(String, usize), MoveRejected> {
    let (from, to) = subprocess_owners(tree, sentinel_id, active_id, over_id)?;
    if from == to {
        // Same process: reordering waits for the drop
        return Err(MoveRejected::NoopMove);
    }
    land(tree, &SubsOf(&from), &SubsOf(&to), active_id, over_id, pointer_below)
}

/// Transfer, reporting the destination list by name
fn land<S, D>(
    tree: &mut Tree,
    source: &S,
    dest: &D,
    active_id: &str,
    over_id: &str,
    pointer_below: bool,
) -> Result<(String, usize), MoveRejected>
where
    S: ListSlot,
    D: ListSlot<Item = S::Item>,
{
    let index = move_ops::transfer(tree, source, dest, active_id, over_id, pointer_below)?;
    Ok((dest.path().to_string(), index))
}

/// Which pair of activity lists a cross-container activity move runs between
#[derive(Debug, Clone, PartialEq, Eq)]
enum ActivityRoute {
    SubToSub { from: String, to: String },
    ProcessToSub { from: String, to: String },
    SubToProcess { from: String, to: String },
    ProcessToProcess { from: String, to: String },
}

impl ActivityRoute {
    /// First matching case wins: subprocess pairs, then process → subprocess,
    /// then subprocess → process, then process pairs.
    fn classify(active: &ActivityOwners<'_>, over: &ActivityOwners<'_>) -> Option<ActivityRoute> {
        if let (Some(a), Some(o)) = (active.subprocess, over.subprocess) {
            return Some(ActivityRoute::SubToSub { from: a.id.clone(), to: o.id.clone() });
        }
        if let (Some(a), Some(o)) = (active.process, over.subprocess) {
            return Some(ActivityRoute::ProcessToSub { from: a.id.clone(), to: o.id.clone() });
        }
        if let (Some(a), Some(o)) = (active.subprocess, over.process) {
            return Some(ActivityRoute::SubToProcess { from: a.id.clone(), to: o.id.clone() });
        }
        if let (Some(a), Some(o)) = (active.process, over.process) {
            return Some(ActivityRoute::ProcessToProcess { from: a.id.clone(), to: o.id.clone() });
        }
        None
    }
}

fn activity_over(
    tree: &mut Tree,
    active_id: &str,
    over_id: &str,
    pointer_below: bool,
) -> Result<(String, usize), MoveRejected> {
    let route = ActivityRoute::classify(
        &resolve::activity_owners(tree, active_id),
        &resolve::activity_owners(tree, over_id),
    )
    .ok_or_else(|| MoveRejected::UnresolvedContainer(over_id.to_string()))?;

    match route {
        ActivityRoute::SubToSub { from, to } | ActivityRoute::ProcessToProcess { from, to }
            if from == to =>
        {
            Err(MoveRejected::NoopMove)
        }
        ActivityRoute::SubToSub { from, to } => land(
            tree,
            &SubActivities(&from),
            &SubActivities(&to),
            active_id,
            over_id,
            pointer_below,
        ),
        ActivityRoute::ProcessToSub { from, to } => land(
            tree,
            &ProcessActivities(&from),
            &SubActivities(&to),
            active_id,
            over_id,
            pointer_below,
        ),
        ActivityRoute::SubToProcess { from, to } => land(
            tree,
            &SubActivities(&from),
            &ProcessActivities(&to),
            active_id,
            over_id,
            pointer_below,
        ),
        ActivityRoute::ProcessToProcess { from, to } => land(
            tree,
            &ProcessActivities(&from),
            &ProcessActivities(&to),
            active_id,
            over_id,
            pointer_below,
        ),
    }
}

// ---------------------------------------------------------------------------
// End
// ---------------------------------------------------------------------------

/// Same-container reorder at drop time. Skipped when a live transfer of
/// this drag already placed the item in `slot`.
fn settle<S: ListSlot>(
    tree: &mut Tree,
    slot: &S,
    landed: Option<&str>,
    active_id: &str,
    over_id: &str,
) -> Result<(usize, usize), MoveRejected> {
    if landed.is_some_and(|list| slot.path().to_string() == list) {
        return Err(MoveRejected::NoopMove);
    }
    move_ops::reorder(tree, slot, active_id, over_id)
}

fn subprocess_end(
    tree: &mut Tree,
    sentinel_id: &str,
    landed: Option<&str>,
    active_id: &str,
    over_id: &str,
) -> Result<(usize, usize), MoveRejected> {
    let (_, to) = subprocess_owners(tree, sentinel_id, active_id, over_id)?;
    settle(tree, &SubsOf(&to), landed, active_id, over_id)
}

fn activity_end(
    tree: &mut Tree,
    landed: Option<&str>,
    active_id: &str,
    over_id: &str,
) -> Result<(usize, usize), MoveRejected> {
    let active = resolve::activity_owners(tree, active_id);
    let over = resolve::activity_owners(tree, over_id);

    let same_sub = match (active.subprocess, over.subprocess) {
        (Some(a), Some(o)) if a.id == o.id => Some(a.id.clone()),
        _ => None,
    };
    let same_process = match (active.process, over.process) {
        (Some(a), Some(o)) if a.id == o.id => Some(a.id.clone()),
        _ => None,
    };

    if let Some(sub) = same_sub {
        settle(tree, &SubActivities(&sub), landed, active_id, over_id)
    } else if let Some(process) = same_process {
        settle(tree, &ProcessActivities(&process), landed, active_id, over_id)
    } else {
        Err(MoveRejected::UnresolvedContainer(over_id.to_string()))
    }
}

/// Owning process ids of a dragged subprocess and of its hover target
fn subprocess_owners(
    tree: &Tree,
    sentinel_id: &str,
    active_id: &str,
    over_id: &str,
) -> Result<(String, String), MoveRejected> {
    let owner = |id: &str| {
        resolve::process_owner_of_subprocess(tree, id, sentinel_id)
            .map(|p| p.id.clone())
            .ok_or_else(|| {
                if id == sentinel_id {
                    MoveRejected::SentinelViolation
                } else {
                    MoveRejected::UnresolvedContainer(id.to_string())
                }
            })
    };
    Ok((owner(active_id)?, owner(over_id)?))
}
