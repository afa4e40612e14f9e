use serde::Serialize;

use crate::model::tree::{Activity, Process, Subprocess, Tree, TreeCounts};
use crate::session::drag::ActivePreview;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ReplayJson<'a> {
    pub events: usize,
    pub dirty: bool,
    pub working: &'a Tree,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<&'a ActivePreview>,
}

#[derive(Serialize)]
pub struct TraceStepJson<'a> {
    pub step: usize,
    pub event: String,
    pub dirty: bool,
    pub working: &'a Tree,
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// Indented outline of the whole tree
pub fn format_tree(tree: &Tree) -> Vec<String> {
    let mut lines = Vec::new();
    for process in &tree.processes {
        lines.extend(format_process(process));
    }
    lines
}

pub fn format_process(process: &Process) -> Vec<String> {
    let mut lines = vec![format!("== {} ({}) ==", process.name, process.id)];
    for a in &process.activities {
        lines.push(format_activity(a, 1));
    }
    for sub in &process.subs {
        lines.extend(format_subprocess(sub, 1));
    }
    lines
}

pub fn format_subprocess(sub: &Subprocess, depth: usize) -> Vec<String> {
    let indent = "  ".repeat(depth);
    let mut lines = vec![format!("{}-- {} ({}) --", indent, sub.name, sub.id)];
    if sub.activities.is_empty() {
        lines.push(format!("{}  (empty)", indent));
    }
    for a in &sub.activities {
        lines.push(format_activity(a, depth + 1));
    }
    lines
}

pub fn format_activity(activity: &Activity, depth: usize) -> String {
    format!("{}{}  {}", "  ".repeat(depth), activity.id, activity.name)
}

/// One-line description of the lifted item
pub fn format_preview(preview: &ActivePreview) -> String {
    match preview {
        ActivePreview::Process(p) => format!("lifted process {} ({})", p.id, p.name),
        ActivePreview::Subprocess(s) => format!("lifted subprocess {} ({})", s.id, s.name),
        ActivePreview::Activity(a) => format!("lifted activity {} ({})", a.id, a.name),
    }
}

pub fn format_counts(counts: &TreeCounts) -> String {
    format!(
        "{} processes, {} subprocesses, {} activities",
        counts.processes, counts.subprocesses, counts.activities
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn tree_outline() {
        let tree = Tree::new(vec![
            Process::new("single", "Loose", vec![Activity::new("a1", "Activity 1")], vec![]),
            Process::new(
                "p2",
                "Process 2",
                vec![Activity::new("a2", "Activity 2")],
                vec![
                    Subprocess::new("s1", "Sub 1", vec![Activity::new("a3", "Activity 3")]),
                    Subprocess::new("s2", "Sub 2", vec![]),
                ],
            ),
        ]);
        assert_snapshot!(format_tree(&tree).join("\n"), @r"
        == Loose (single) ==
          a1  Activity 1
        == Process 2 (p2) ==
          a2  Activity 2
          -- Sub 1 (s1) --
            a3  Activity 3
          -- Sub 2 (s2) --
            (empty)
        ");
    }

    #[test]
    fn preview_line() {
        let preview = ActivePreview::Activity(Activity::new("a7", "Activity 7"));
        assert_eq!(format_preview(&preview), "lifted activity a7 (Activity 7)");
    }

    #[test]
    fn counts_line() {
        assert_eq!(
            format_counts(&Tree::sample().counts()),
            "3 processes, 4 subprocesses, 11 activities"
        );
    }
}
