use crate::model::tree::Tree;
use crate::ops::move_ops::MoveRejected;

/// Committed vs. working snapshots of the tree.
///
/// The two trees are separately owned values, so a mutation of `working`
/// can never leak into `committed`. `dirty` is kept in step with every
/// successful mutation.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    committed: Tree,
    working: Tree,
    dirty: bool,
}

impl Checkpoint {
    pub fn new(tree: Tree) -> Self {
        Checkpoint {
            committed: tree.clone(),
            working: tree,
            dirty: false,
        }
    }

    pub fn working(&self) -> &Tree {
        &self.working
    }

    pub fn committed(&self) -> &Tree {
        &self.committed
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Run one mutation against the working tree. A rejected mutation has
    /// not touched the tree, so the dirty flag is only refreshed on success.
    pub(crate) fn apply<T>(
        &mut self,
        f: impl FnOnce(&mut Tree) -> Result<T, MoveRejected>,
    ) -> Result<T, MoveRejected> {
        let out = f(&mut self.working)?;
        self.dirty = self.working != self.committed;
        Ok(out)
    }

    /// Make the working tree the new checkpoint. Returns whether anything
    /// was pending.
    pub fn confirm(&mut self) -> bool {
        let was_dirty = self.dirty;
        self.committed = self.working.clone();
        self.dirty = false;
        was_dirty
    }

    /// Throw away everything since the last checkpoint. Returns whether
    /// anything was discarded.
    pub fn undo(&mut self) -> bool {
        let was_dirty = self.dirty;
        self.working = self.committed.clone();
        self.dirty = false;
        was_dirty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::move_ops::{ProcessActivities, reorder};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_is_clean() {
        let cp = Checkpoint::new(Tree::sample());
        assert!(!cp.is_dirty());
        assert_eq!(cp.working(), cp.committed());
    }

    #[test]
    fn test_apply_marks_dirty() {
        let mut cp = Checkpoint::new(Tree::sample());
        cp.apply(|t| reorder(t, &ProcessActivities("p2"), "a22", "a2"))
            .unwrap();
        assert!(cp.is_dirty());
        assert_eq!(cp.committed(), &Tree::sample());
    }

    #[test]
    fn test_rejected_apply_stays_clean() {
        let mut cp = Checkpoint::new(Tree::sample());
        let r = cp.apply(|t| reorder(t, &ProcessActivities("p2"), "a2", "a2"));
        assert_eq!(r, Err(MoveRejected::NoopMove));
        assert!(!cp.is_dirty());
    }

    #[test]
    fn test_moving_back_clears_dirty() {
        let mut cp = Checkpoint::new(Tree::sample());
        cp.apply(|t| reorder(t, &ProcessActivities("p2"), "a22", "a2"))
            .unwrap();
        cp.apply(|t| reorder(t, &ProcessActivities("p2"), "a22", "a2"))
            .unwrap();
        assert!(!cp.is_dirty());
    }

    #[test]
    fn test_confirm_then_undo_keeps_confirmed_state() {
        let mut cp = Checkpoint::new(Tree::sample());
        cp.apply(|t| reorder(t, &ProcessActivities("p2"), "a22", "a2"))
            .unwrap();
        let at_confirm = cp.working().clone();

        assert!(cp.confirm());
        assert!(!cp.is_dirty());
        assert!(!cp.undo());
        assert_eq!(cp.working(), &at_confirm);
    }

    #[test]
    fn test_undo_restores_initial_tree() {
        let mut cp = Checkpoint::new(Tree::sample());
        cp.apply(|t| reorder(t, &ProcessActivities("single"), "a1", "a11"))
            .unwrap();
        assert!(cp.undo());
        assert_eq!(cp.working(), &Tree::sample());
        assert!(!cp.is_dirty());
    }
}
