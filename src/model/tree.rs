use serde::{Deserialize, Serialize};

/// Anything that lives in an id-addressed ordered list
pub trait Node {
    fn id(&self) -> &str;
}

/// What kind of item a drag session is carrying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Process,
    Subprocess,
    Activity,
}

impl ItemKind {
    pub fn parse(s: &str) -> Option<ItemKind> {
        match s {
            "process" => Some(ItemKind::Process),
            "subprocess" => Some(ItemKind::Subprocess),
            "activity" => Some(ItemKind::Activity),
            _ => None,
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKind::Process => write!(f, "process"),
            ItemKind::Subprocess => write!(f, "subprocess"),
            ItemKind::Activity => write!(f, "activity"),
        }
    }
}

/// A leaf item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub name: String,
}

impl Activity {
    pub fn new(id: &str, name: &str) -> Self {
        Activity {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

/// A container nested under a process, holding activities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subprocess {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl Subprocess {
    pub fn new(id: &str, name: &str, activities: Vec<Activity>) -> Self {
        Subprocess {
            id: id.to_string(),
            name: name.to_string(),
            activities,
        }
    }
}

/// A top-level container. Holds activities directly and/or subprocesses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub subs: Vec<Subprocess>,
}

impl Process {
    pub fn new(id: &str, name: &str, activities: Vec<Activity>, subs: Vec<Subprocess>) -> Self {
        Process {
            id: id.to_string(),
            name: name.to_string(),
            activities,
            subs,
        }
    }
}

impl Node for Activity {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Node for Subprocess {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Node for Process {
    fn id(&self) -> &str {
        &self.id
    }
}

/// The whole hierarchy. Element 0 is expected to be the sentinel process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    #[serde(default)]
    pub processes: Vec<Process>,
}

/// Node totals at each level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TreeCounts {
    pub processes: usize,
    pub subprocesses: usize,
    pub activities: usize,
}

impl Tree {
    pub fn new(processes: Vec<Process>) -> Self {
        Tree { processes }
    }

    pub fn process(&self, id: &str) -> Option<&Process> {
        self.processes.iter().find(|p| p.id == id)
    }

    pub fn subprocess(&self, id: &str) -> Option<&Subprocess> {
        self.processes
            .iter()
            .flat_map(|p| p.subs.iter())
            .find(|s| s.id == id)
    }

    /// Find an activity anywhere: direct process activities are searched
    /// before the activities of that process's subprocesses.
    pub fn activity(&self, id: &str) -> Option<&Activity> {
        for process in &self.processes {
            if let Some(a) = process.activities.iter().find(|a| a.id == id) {
                return Some(a);
            }
            for sub in &process.subs {
                if let Some(a) = sub.activities.iter().find(|a| a.id == id) {
                    return Some(a);
                }
            }
        }
        None
    }

    pub fn counts(&self) -> TreeCounts {
        let mut counts = TreeCounts {
            processes: self.processes.len(),
            ..TreeCounts::default()
        };
        for process in &self.processes {
            counts.activities += process.activities.len();
            counts.subprocesses += process.subs.len();
            for sub in &process.subs {
                counts.activities += sub.activities.len();
            }
        }
        counts
    }

    /// Every id in tree order: process, its activities, then each subprocess
    /// followed by its activities.
    pub fn ids(&self) -> Vec<(&str, ItemKind)> {
        let mut out = Vec::new();
        for process in &self.processes {
            out.push((process.id.as_str(), ItemKind::Process));
            for a in &process.activities {
                out.push((a.id.as_str(), ItemKind::Activity));
            }
            for sub in &process.subs {
                out.push((sub.id.as_str(), ItemKind::Subprocess));
                for a in &sub.activities {
                    out.push((a.id.as_str(), ItemKind::Activity));
                }
            }
        }
        out
    }

    /// The demo hierarchy: a sentinel with loose activities, then two
    /// processes with nested subprocesses.
    pub fn sample() -> Tree {
        Tree::new(vec![
            Process::new(
                "single",
                "Single Activities",
                vec![
                    Activity::new("a1", "Activity 1"),
                    Activity::new("a11", "Activity 11"),
                ],
                vec![],
            ),
            Process::new(
                "p2",
                "Process 2",
                vec![
                    Activity::new("a2", "Activity 2"),
                    Activity::new("a22", "Activity 22"),
                ],
                vec![
                    Subprocess::new("s1", "Subprocess 1", vec![Activity::new("a3", "Activity 3")]),
                    Subprocess::new("s2", "Subprocess 2", vec![Activity::new("a4", "Activity 4")]),
                ],
            ),
            Process::new(
                "p3",
                "Process 3",
                vec![Activity::new("a5", "Activity 5")],
                vec![
                    Subprocess::new(
                        "s3",
                        "Subprocess 3",
                        vec![
                            Activity::new("a6", "Activity 6"),
                            Activity::new("a61", "Activity 61"),
                        ],
                    ),
                    Subprocess::new(
                        "s4",
                        "Subprocess 4",
                        vec![
                            Activity::new("a7", "Activity 7"),
                            Activity::new("a8", "Activity 8"),
                        ],
                    ),
                ],
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_counts() {
        let counts = Tree::sample().counts();
        assert_eq!(
            counts,
            TreeCounts {
                processes: 3,
                subprocesses: 4,
                activities: 11,
            }
        );
    }

    #[test]
    fn test_lookup_by_level() {
        let tree = Tree::sample();
        assert_eq!(tree.process("p3").unwrap().name, "Process 3");
        assert_eq!(tree.subprocess("s2").unwrap().activities[0].id, "a4");
        assert_eq!(tree.activity("a61").unwrap().name, "Activity 61");
        assert!(tree.activity("s1").is_none());
        assert!(tree.process("s1").is_none());
    }

    #[test]
    fn test_ids_in_tree_order() {
        let tree = Tree::sample();
        let ids: Vec<&str> = tree.ids().into_iter().map(|(id, _)| id).collect();
        assert_eq!(&ids[..6], &["single", "a1", "a11", "p2", "a2", "a22"]);
        assert_eq!(&ids[6..9], &["s1", "a3", "s2"]);
    }

    #[test]
    fn test_item_kind_parse() {
        assert_eq!(ItemKind::parse("subprocess"), Some(ItemKind::Subprocess));
        assert_eq!(ItemKind::parse("Process"), None);
        assert_eq!(ItemKind::Activity.to_string(), "activity");
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let tree: Tree =
            toml::from_str("[[processes]]\nid = \"single\"\nname = \"Loose\"\n").unwrap();
        assert!(tree.processes[0].activities.is_empty());
        assert!(tree.processes[0].subs.is_empty());
    }
}
