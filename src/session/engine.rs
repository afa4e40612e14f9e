use tracing::info;

use crate::model::config::EngineConfig;
use crate::model::tree::{ItemKind, Tree};
use crate::ops::check::{CheckError, check_tree};

use super::checkpoint::Checkpoint;
use super::drag::{ActivePreview, DragSession, DragState};

/// Lifecycle and checkpoint events, in the shape the sensor layer and the
/// confirm/undo controls deliver them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Start {
        active_id: String,
        kind: ItemKind,
    },
    Over {
        active_id: String,
        over_id: Option<String>,
        pointer_below_target_bottom: bool,
    },
    End {
        active_id: String,
        over_id: Option<String>,
    },
    Cancel,
    Confirm,
    Undo,
}

/// Renders in event-script syntax
impl std::fmt::Display for EngineEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineEvent::Start { active_id, kind } => write!(f, "start {} {}", kind, active_id),
            EngineEvent::Over {
                active_id,
                over_id,
                pointer_below_target_bottom,
            } => {
                write!(f, "over {}", active_id)?;
                if let Some(over) = over_id {
                    let side = if *pointer_below_target_bottom { "below" } else { "above" };
                    write!(f, " {} {}", over, side)?;
                }
                Ok(())
            }
            EngineEvent::End { active_id, over_id } => match over_id {
                Some(over) => write!(f, "end {} {}", active_id, over),
                None => write!(f, "end {}", active_id),
            },
            EngineEvent::Cancel => write!(f, "cancel"),
            EngineEvent::Confirm => write!(f, "confirm"),
            EngineEvent::Undo => write!(f, "undo"),
        }
    }
}

/// The tree failed validation and cannot back an engine
#[derive(Debug, thiserror::Error)]
#[error("invalid tree: {}", describe(.0))]
pub struct InvalidTree(pub Vec<CheckError>);

fn describe(errors: &[CheckError]) -> String {
    errors
        .iter()
        .map(|e| match e {
            CheckError::DuplicateId { id, .. } => format!("duplicate id {}", id),
            CheckError::MissingSentinel { sentinel_id } => {
                format!("first process is not the sentinel '{}'", sentinel_id)
            }
            CheckError::SentinelMisplaced { sentinel_id, index } => {
                format!("sentinel '{}' found at index {}", sentinel_id, index)
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Drag controller plus checkpoint: everything a rendering layer talks to.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    checkpoint: Checkpoint,
    session: DragSession,
}

impl Engine {
    /// Build an engine without validating the tree
    pub fn new(tree: Tree, config: EngineConfig) -> Self {
        let session = DragSession::new(config.sentinel_id());
        Engine {
            config,
            checkpoint: Checkpoint::new(tree),
            session,
        }
    }

    /// Build an engine, refusing trees that break id uniqueness or the
    /// sentinel-first rule.
    pub fn try_new(tree: Tree, config: EngineConfig) -> Result<Self, InvalidTree> {
        let result = check_tree(&tree, &config);
        if !result.valid {
            return Err(InvalidTree(result.errors));
        }
        Ok(Engine::new(tree, config))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // --- Sensor events ---

    pub fn on_drag_start(&mut self, active_id: &str, kind: ItemKind) {
        self.session.start(self.checkpoint.working(), active_id, kind);
    }

    pub fn on_drag_over(&mut self, active_id: &str, over_id: Option<&str>, pointer_below: bool) {
        self.session
            .over(&mut self.checkpoint, active_id, over_id, pointer_below);
    }

    pub fn on_drag_end(&mut self, active_id: &str, over_id: Option<&str>) {
        self.session.end(&mut self.checkpoint, active_id, over_id);
    }

    pub fn on_drag_cancel(&mut self) {
        self.session.cancel();
    }

    pub fn apply(&mut self, event: &EngineEvent) {
        match event {
            EngineEvent::Start { active_id, kind } => self.on_drag_start(active_id, *kind),
            EngineEvent::Over {
                active_id,
                over_id,
                pointer_below_target_bottom,
            } => self.on_drag_over(active_id, over_id.as_deref(), *pointer_below_target_bottom),
            EngineEvent::End { active_id, over_id } => {
                self.on_drag_end(active_id, over_id.as_deref())
            }
            EngineEvent::Cancel => self.on_drag_cancel(),
            EngineEvent::Confirm => {
                self.confirm();
            }
            EngineEvent::Undo => {
                self.undo();
            }
        }
    }

    // --- Rendering surface ---

    pub fn working_tree(&self) -> &Tree {
        self.checkpoint.working()
    }

    pub fn committed_tree(&self) -> &Tree {
        self.checkpoint.committed()
    }

    pub fn active_preview(&self) -> Option<&ActivePreview> {
        self.session.preview()
    }

    pub fn drag_state(&self) -> &DragState {
        self.session.state()
    }

    pub fn is_dirty(&self) -> bool {
        self.checkpoint.is_dirty()
    }

    /// Returns whether there was anything to confirm
    pub fn confirm(&mut self) -> bool {
        let changed = self.checkpoint.confirm();
        info!(changed, "confirm");
        changed
    }

    /// Returns whether anything was rolled back
    pub fn undo(&mut self) -> bool {
        let changed = self.checkpoint.undo();
        info!(changed, "undo");
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tree::Process;
    use pretty_assertions::assert_eq;

    fn engine() -> Engine {
        Engine::try_new(Tree::sample(), EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_try_new_rejects_invalid_tree() {
        let tree = Tree::new(vec![Process::new("p1", "One", vec![], vec![])]);
        let err = Engine::try_new(tree, EngineConfig::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid tree: first process is not the sentinel 'single'"
        );
    }

    #[test]
    fn test_apply_events_in_order() {
        let mut e = engine();
        let events = vec![
            EngineEvent::Start {
                active_id: "a1".into(),
                kind: ItemKind::Activity,
            },
            EngineEvent::Over {
                active_id: "a1".into(),
                over_id: Some("a2".into()),
                pointer_below_target_bottom: false,
            },
            EngineEvent::End {
                active_id: "a1".into(),
                over_id: Some("a1".into()),
            },
        ];
        for event in &events {
            e.apply(event);
        }
        assert!(e.is_dirty());
        assert!(e.active_preview().is_none());
        let p2: Vec<&str> = e.working_tree().processes[1]
            .activities
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(p2, vec!["a1", "a2", "a22"]);
    }

    #[test]
    fn test_event_display_uses_script_syntax() {
        let over = EngineEvent::Over {
            active_id: "s1".into(),
            over_id: Some("s2".into()),
            pointer_below_target_bottom: true,
        };
        assert_eq!(over.to_string(), "over s1 s2 below");
        let start = EngineEvent::Start {
            active_id: "p2".into(),
            kind: ItemKind::Process,
        };
        assert_eq!(start.to_string(), "start process p2");
        let end = EngineEvent::End {
            active_id: "a1".into(),
            over_id: None,
        };
        assert_eq!(end.to_string(), "end a1");
    }

    #[test]
    fn test_preview_visible_while_dragging() {
        let mut e = engine();
        e.on_drag_start("p2", ItemKind::Process);
        assert_eq!(e.active_preview().map(|p| p.kind()), Some(ItemKind::Process));
        e.on_drag_cancel();
        assert!(e.active_preview().is_none());
        assert_eq!(e.drag_state(), &DragState::Idle);
    }

    #[test]
    fn test_confirm_and_undo_events() {
        let mut e = engine();
        e.on_drag_start("p3", ItemKind::Process);
        e.on_drag_end("p3", Some("p2"));
        e.apply(&EngineEvent::Confirm);
        assert!(!e.is_dirty());
        assert_eq!(e.committed_tree(), e.working_tree());

        e.on_drag_start("p2", ItemKind::Process);
        e.on_drag_end("p2", Some("p3"));
        assert!(e.is_dirty());
        e.apply(&EngineEvent::Undo);
        assert_eq!(e.working_tree().processes[1].id, "p3");
        assert!(!e.undo());
    }
}
