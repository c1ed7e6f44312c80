use super::*;
use crate::models::{FileTree, NodeData};
use std::path::PathBuf;

fn tree() -> FileTree {
    FileTree::from_nodes(
        PathBuf::from("/ws"),
        "ws",
        vec![
            NodeData::file("a", "a.ts", "A"),
            NodeData::file("b", "b.py", "B"),
            NodeData::file("c", "c.md", "C"),
            NodeData::folder("d", "dir", Vec::new()),
        ],
    )
    .unwrap()
}

fn open_all(tabs: &mut TabSet, tree: &FileTree, ids: &[&str]) {
    for id in ids {
        tabs.open_file(tree.get(id).unwrap()).unwrap();
    }
}

fn ids(tabs: &TabSet) -> Vec<&str> {
    tabs.tabs().iter().map(|t| t.node_id.as_str()).collect()
}

#[test]
fn open_appends_and_activates() {
    let tree = tree();
    let mut tabs = TabSet::new();
    open_all(&mut tabs, &tree, &["a", "b"]);

    assert_eq!(ids(&tabs), vec!["a", "b"]);
    assert_eq!(tabs.active_id(), Some("b"));
    let tab = tabs.active().unwrap();
    assert_eq!(&*tab.content, "B");
    assert_eq!(tab.language, LanguageId::Python);
}

#[test]
fn open_twice_keeps_single_tab_without_reorder() {
    let tree = tree();
    let mut tabs = TabSet::new();
    open_all(&mut tabs, &tree, &["a", "b", "c"]);

    assert!(tabs.open_file(tree.get("a").unwrap()).unwrap());
    assert!(!tabs.open_file(tree.get("a").unwrap()).unwrap());
    assert_eq!(ids(&tabs), vec!["a", "b", "c"]);
    assert_eq!(tabs.active_id(), Some("a"));
}

#[test]
fn open_folder_is_invalid() {
    let tree = tree();
    let mut tabs = TabSet::new();
    assert!(matches!(
        tabs.open_file(tree.get("d").unwrap()),
        Err(WorkspaceError::InvalidOperation(_))
    ));
    assert!(tabs.is_empty());
}

#[test]
fn closing_active_middle_tab_focuses_last_remaining() {
    let tree = tree();
    let mut tabs = TabSet::new();
    open_all(&mut tabs, &tree, &["a", "b", "c"]);
    tabs.set_active("b").unwrap();

    assert!(tabs.close_tab("b"));
    assert_eq!(ids(&tabs), vec!["a", "c"]);
    assert_eq!(tabs.active_id(), Some("c"));
}

#[test]
fn closing_inactive_tab_keeps_active() {
    let tree = tree();
    let mut tabs = TabSet::new();
    open_all(&mut tabs, &tree, &["a", "b", "c"]);
    tabs.set_active("a").unwrap();

    assert!(tabs.close_tab("c"));
    assert_eq!(tabs.active_id(), Some("a"));
    assert!(!tabs.close_tab("c"));
}

#[test]
fn closing_last_tab_clears_active() {
    let tree = tree();
    let mut tabs = TabSet::new();
    open_all(&mut tabs, &tree, &["a"]);
    assert!(tabs.close_tab("a"));
    assert_eq!(tabs.active_id(), None);
    assert!(tabs.active().is_none());
}

#[test]
fn set_active_requires_open_tab() {
    let mut tabs = TabSet::new();
    assert!(matches!(
        tabs.set_active("a"),
        Err(WorkspaceError::InvalidOperation(_))
    ));
}

#[test]
fn sync_and_rename_update_in_place() {
    let tree = tree();
    let mut tabs = TabSet::new();
    open_all(&mut tabs, &tree, &["a", "b"]);

    assert!(tabs.sync_content("a", "new"));
    assert!(!tabs.sync_content("a", "new"));
    assert!(!tabs.sync_content("zzz", "new"));
    assert!(tabs.rename("a", "a.json"));

    let tab = tabs.get("a").unwrap();
    assert_eq!(&*tab.content, "new");
    assert_eq!(tab.name, "a.json");
    assert_eq!(tab.language, LanguageId::Json);
    assert_eq!(ids(&tabs), vec!["a", "b"]);
    assert_eq!(tabs.active_id(), Some("b"));
}

#[test]
fn retain_applies_close_rule() {
    let tree = tree();
    let mut tabs = TabSet::new();
    open_all(&mut tabs, &tree, &["a", "b", "c"]);
    tabs.set_active("a").unwrap();

    let closed = tabs.retain(|id| id != "a" && id != "c");
    assert_eq!(closed, vec!["a", "c"]);
    assert_eq!(ids(&tabs), vec!["b"]);
    assert_eq!(tabs.active_id(), Some("b"));

    let closed = tabs.clear();
    assert_eq!(closed, vec!["b"]);
    assert_eq!(tabs.active_id(), None);
}
