//! # Navigation Visualizer
//!
//! Builds the router hierarchy shown by the debug dashboard. A router's
//! children are the registered routers whose ids match the routes it
//! currently presents; roots are routers nobody presents.
//!
//! ```text
//! home [stack] depth=0 sheet=routerFeatureA-1
//! └─ routerFeatureA-1 [stack] depth=2 sheet=routerFeatureB-1
//!    └─ routerFeatureB-1 [stack] depth=2
//! ```

use std::collections::{HashMap, HashSet};

use crate::core::{AppRouter, RouterSnapshot};
use crate::debug::recorder::{DebugRecorder, NavigationLogEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterNode {
    pub snapshot: RouterSnapshot,
    pub children: Vec<RouterNode>,
}

impl RouterNode {
    pub fn id(&self) -> &str {
        &self.snapshot.id
    }
}

/// Router forest, roots sorted by id.
pub fn hierarchy(app: &AppRouter) -> Vec<RouterNode> {
    let snapshots = app.snapshot();
    let by_id: HashMap<&str, &RouterSnapshot> =
        snapshots.iter().map(|s| (s.id.as_str(), s)).collect();

    let presented: HashSet<&str> = snapshots
        .iter()
        .flat_map(|s| s.presented_ids().filter(move |child| *child != s.id))
        .filter(|child| by_id.contains_key(child))
        .collect();

    let mut visited = HashSet::new();
    let mut roots: Vec<RouterNode> = snapshots
        .iter()
        .filter(|s| !presented.contains(s.id.as_str()))
        .filter_map(|s| build_node(s, &by_id, &mut visited))
        .collect();

    // Routers that only present each other have no root; show them anyway.
    for snapshot in &snapshots {
        if let Some(node) = build_node(snapshot, &by_id, &mut visited) {
            roots.push(node);
        }
    }
    roots
}

fn build_node(
    snapshot: &RouterSnapshot,
    by_id: &HashMap<&str, &RouterSnapshot>,
    visited: &mut HashSet<String>,
) -> Option<RouterNode> {
    if !visited.insert(snapshot.id.clone()) {
        return None;
    }
    let children = snapshot
        .presented_ids()
        .filter_map(|child| by_id.get(child))
        .filter_map(|child| build_node(child, by_id, visited))
        .collect();
    Some(RouterNode {
        snapshot: snapshot.clone(),
        children,
    })
}

/// Text rendering of [`hierarchy`], one router per line.
pub fn render_tree(nodes: &[RouterNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        render_node(node, "", None, &mut out);
    }
    out
}

fn render_node(node: &RouterNode, prefix: &str, last: Option<bool>, out: &mut String) {
    let (branch, child_prefix) = match last {
        None => ("", prefix.to_string()),
        Some(true) => ("└─ ", format!("{prefix}   ")),
        Some(false) => ("├─ ", format!("{prefix}│  ")),
    };
    out.push_str(prefix);
    out.push_str(branch);
    out.push_str(&describe(&node.snapshot));
    out.push('\n');

    let count = node.children.len();
    for (index, child) in node.children.iter().enumerate() {
        render_node(child, &child_prefix, Some(index + 1 == count), out);
    }
}

fn describe(snapshot: &RouterSnapshot) -> String {
    let mut line = format!("{} [{}]", snapshot.id, snapshot.kind.label());
    match &snapshot.selected_tab {
        Some(tab) => line.push_str(&format!(" tab={tab}")),
        None => line.push_str(&format!(" depth={}", snapshot.stack.len())),
    }
    if let Some(sheet) = &snapshot.sheet {
        line.push_str(&format!(" sheet={sheet}"));
    }
    if let Some(full_screen) = &snapshot.full_screen {
        line.push_str(&format!(" fullscreen={full_screen}"));
    }
    line
}

/// Timeline of one router's events, oldest first.
pub fn history(recorder: &DebugRecorder, router_id: &str) -> Vec<NavigationLogEntry> {
    let mut entries = recorder.entries_for(router_id);
    entries.reverse();
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{StackRouter, TabRoutable};
    use crate::debug::LogKind;
    use crate::test_support::{TestRoute, TestTab, test_app};

    #[test]
    fn test_presented_router_nests_under_presenter() {
        let (app, _, home) = test_app();
        let child = StackRouter::<TestRoute>::with_id("child");
        app.register(child.clone());
        home.present_sheet(TestRoute::Child("child".into()));

        let roots = hierarchy(&app);
        let ids: Vec<&str> = roots.iter().map(RouterNode::id).collect();
        // Uppercase sorts first
        assert_eq!(ids, vec![TestTab::KEY, "home"]);
        assert!(roots[0].children.is_empty());
        assert_eq!(roots[1].children.len(), 1);
        assert_eq!(roots[1].children[0].id(), "child");
    }

    #[test]
    fn test_render_tree_lines() {
        let (app, _, home) = test_app();
        let child = StackRouter::<TestRoute>::with_id("child");
        app.register(child.clone());
        home.present_sheet(TestRoute::Child("child".into()));
        child.navigate(TestRoute::Detail(1));

        let text = render_tree(&hierarchy(&app));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "TestTab [tab] tab=Home");
        assert_eq!(lines[1], "home [stack] depth=0 sheet=child");
        assert_eq!(lines[2], "└─ child [stack] depth=1");
    }

    #[test]
    fn test_mutual_presentation_still_listed() {
        let (app, _, _) = test_app();
        let a = StackRouter::<TestRoute>::with_id("a");
        let b = StackRouter::<TestRoute>::with_id("b");
        app.register(a.clone());
        app.register(b.clone());
        a.present_sheet(TestRoute::Child("b".into()));
        b.present_sheet(TestRoute::Child("a".into()));

        let text = render_tree(&hierarchy(&app));
        assert!(text.contains("a [stack]"));
        assert!(text.contains("b [stack]"));
    }

    #[test]
    fn test_history_is_oldest_first() {
        let recorder = DebugRecorder::new(10);
        recorder.record(LogKind::Registration, "first", "a");
        recorder.record(LogKind::Navigation, "second", "a");
        let timeline = history(&recorder, "a");
        assert_eq!(timeline[0].message, "first");
        assert_eq!(timeline[1].message, "second");
    }
}
