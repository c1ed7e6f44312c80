use super::*;
use crate::kernel::services::ports::WorkspaceConfig;
use crate::kernel::state::NoticeLevel;

fn nodes() -> Vec<NodeData> {
    vec![
        NodeData::folder(
            "src",
            "src",
            vec![
                NodeData::file("a", "a.ts", "A"),
                NodeData::folder("lib", "lib", vec![NodeData::file("b", "b.ts", "B")]),
            ],
        ),
        NodeData::file("c", "c.md", "C"),
    ]
}

fn loaded_store() -> Store {
    let mut store = Store::new(AppState::new(WorkspaceConfig::default()));
    let result = store.dispatch(Action::OpenWorkspace {
        root: PathBuf::from("/ws"),
    });
    assert_eq!(
        result.effects,
        vec![Effect::LoadWorkspace {
            root: PathBuf::from("/ws")
        }]
    );
    assert!(store.state().loading);
    let result = store.dispatch(Action::WorkspaceLoaded {
        root: PathBuf::from("/ws"),
        result: Ok(nodes()),
    });
    assert!(result.error.is_none());
    store
}

fn open(store: &mut Store, id: &str) {
    let result = store.dispatch(Action::OpenFile { id: id.to_string() });
    assert!(result.error.is_none(), "{:?}", result.error);
}

fn tab_ids(store: &Store) -> Vec<&str> {
    store
        .state()
        .tabs
        .tabs()
        .iter()
        .map(|t| t.node_id.as_str())
        .collect()
}

fn tree_json(store: &Store) -> String {
    serde_json::to_string(&store.state().tree.to_nodes()).unwrap()
}

#[test]
fn workspace_load_populates_tree() {
    let store = loaded_store();
    let state = store.state();
    assert!(!state.loading);
    assert_eq!(state.tree.len(), 5);
    assert_eq!(state.tree.label(), "ws");
    assert_eq!(state.tree.get("b").unwrap().origin_label(), "ws");
}

#[test]
fn create_file_in_folder_opens_it_and_schedules_write() {
    let mut store = Store::new(AppState::new(WorkspaceConfig::default()));
    store.dispatch(Action::OpenWorkspace {
        root: PathBuf::from("/ws"),
    });
    store.dispatch(Action::WorkspaceLoaded {
        root: PathBuf::from("/ws"),
        result: Ok(vec![NodeData::folder("1", "src", Vec::new())]),
    });

    let result = store.dispatch(Action::CreateNode {
        parent: Some("1".to_string()),
        kind: NodeKind::File,
        name: "a.ts".to_string(),
    });

    assert!(result.error.is_none());
    let folder = store.state().tree.get("1").unwrap();
    assert_eq!(folder.is_open(), Some(true));
    let children: Vec<_> = folder.children().collect();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].name(), "a.ts");
    assert_eq!(children[0].content(), Some(""));
    assert_eq!(
        result.effects,
        vec![Effect::ScheduleWrite {
            node_id: children[0].id().to_string(),
            target: PathBuf::from("/ws/src/a.ts"),
            content: String::new(),
        }]
    );
}

#[test]
fn create_folder_emits_create_folder() {
    let mut store = loaded_store();
    let result = store.dispatch(Action::CreateNode {
        parent: None,
        kind: NodeKind::Folder,
        name: "docs".to_string(),
    });
    assert_eq!(
        result.effects,
        vec![Effect::CreateFolder {
            path: PathBuf::from("/ws/docs")
        }]
    );
}

#[test]
fn create_rejects_bad_parent_and_names() {
    let mut store = loaded_store();
    let before = tree_json(&store);

    let result = store.dispatch(Action::CreateNode {
        parent: Some("a".to_string()),
        kind: NodeKind::File,
        name: "x".to_string(),
    });
    assert_eq!(result.error, Some(WorkspaceError::NotFound("a".to_string())));

    for name in ["", "  ", "a/b", ".."] {
        let result = store.dispatch(Action::CreateNode {
            parent: None,
            kind: NodeKind::File,
            name: name.to_string(),
        });
        assert!(matches!(
            result.error,
            Some(WorkspaceError::InvalidOperation(_))
        ));
        assert!(!result.state_changed);
    }
    assert_eq!(tree_json(&store), before);
}

#[test]
fn edit_updates_tree_and_tab_and_schedules_write() {
    let mut store = loaded_store();
    open(&mut store, "b");

    let result = store.dispatch(Action::EditContent {
        id: "b".to_string(),
        content: "new".to_string(),
    });

    assert_eq!(store.state().tree.get("b").unwrap().content(), Some("new"));
    assert_eq!(&*store.state().tabs.get("b").unwrap().content, "new");
    assert_eq!(
        result.effects,
        vec![Effect::ScheduleWrite {
            node_id: "b".to_string(),
            target: PathBuf::from("/ws/src/lib/b.ts"),
            content: "new".to_string(),
        }]
    );
}

#[test]
fn edit_errors_leave_state_unchanged() {
    let mut store = loaded_store();
    let before = tree_json(&store);

    let result = store.dispatch(Action::EditContent {
        id: "missing".to_string(),
        content: "x".to_string(),
    });
    assert_eq!(
        result.error,
        Some(WorkspaceError::NotFound("missing".to_string()))
    );

    let result = store.dispatch(Action::EditContent {
        id: "src".to_string(),
        content: "x".to_string(),
    });
    assert!(matches!(
        result.error,
        Some(WorkspaceError::InvalidOperation(_))
    ));
    assert!(result.effects.is_empty());
    assert_eq!(tree_json(&store), before);
}

#[test]
fn close_active_middle_tab_focuses_last() {
    let mut store = loaded_store();
    open(&mut store, "a");
    open(&mut store, "b");
    open(&mut store, "c");
    store.dispatch(Action::SetActiveTab { id: "b".to_string() });

    let result = store.dispatch(Action::CloseTab { id: "b".to_string() });

    assert_eq!(tab_ids(&store), vec!["a", "c"]);
    assert_eq!(store.state().tabs.active_id(), Some("c"));
    assert_eq!(
        result.effects,
        vec![Effect::CancelWrites {
            node_ids: vec!["b".to_string()]
        }]
    );

    let result = store.dispatch(Action::CloseTab { id: "b".to_string() });
    assert!(!result.state_changed);
    assert!(result.effects.is_empty());
}

#[test]
fn open_folder_or_missing_is_rejected() {
    let mut store = loaded_store();
    let result = store.dispatch(Action::OpenFile {
        id: "src".to_string(),
    });
    assert!(matches!(
        result.error,
        Some(WorkspaceError::InvalidOperation(_))
    ));
    let result = store.dispatch(Action::OpenFile {
        id: "zzz".to_string(),
    });
    assert_eq!(result.error, Some(WorkspaceError::NotFound("zzz".to_string())));
    assert!(store.state().tabs.is_empty());
}

#[test]
fn delete_closes_tabs_of_subtree_and_cancels_writes() {
    let mut store = loaded_store();
    open(&mut store, "a");
    open(&mut store, "c");
    open(&mut store, "b");

    let result = store.dispatch(Action::DeleteNode {
        id: "src".to_string(),
    });

    assert_eq!(tab_ids(&store), vec!["c"]);
    assert_eq!(store.state().tabs.active_id(), Some("c"));
    assert_eq!(
        result.effects,
        vec![Effect::CancelWrites {
            node_ids: vec![
                "src".to_string(),
                "a".to_string(),
                "lib".to_string(),
                "b".to_string()
            ]
        }]
    );

    let result = store.dispatch(Action::DeleteNode {
        id: "src".to_string(),
    });
    assert!(!result.state_changed);
    assert!(result.error.is_none());
}

#[test]
fn rename_updates_tab_label() {
    let mut store = loaded_store();
    open(&mut store, "c");
    store.dispatch(Action::RenameNode {
        id: "c".to_string(),
        name: "c.json".to_string(),
    });
    let tab = store.state().tabs.get("c").unwrap();
    assert_eq!(tab.name, "c.json");
    assert_eq!(tab.language.language_id(), "json");
}

#[test]
fn drag_onto_descendant_is_rejected_through_store() {
    let mut store = loaded_store();
    let before = tree_json(&store);

    store.dispatch(Action::DragStart {
        id: "src".to_string(),
    });
    let result = store.dispatch(Action::DragEnter {
        id: "lib".to_string(),
    });
    assert!(!result.state_changed);
    assert_eq!(
        store.state().drag.state(),
        &DragState::Dragging {
            source: "src".to_string()
        }
    );

    let result = store.dispatch(Action::Drop);
    assert!(result.error.is_none());
    assert_eq!(store.state().drag.state(), &DragState::Idle);
    assert_eq!(tree_json(&store), before);
}

#[test]
fn drag_and_drop_moves_node() {
    let mut store = loaded_store();
    store.dispatch(Action::DragStart { id: "c".to_string() });
    store.dispatch(Action::DragEnter {
        id: "lib".to_string(),
    });
    let result = store.dispatch(Action::Drop);

    assert!(result.state_changed);
    assert_eq!(
        store.state().tree.target_path("c"),
        Some(PathBuf::from("/ws/src/lib/c.md"))
    );
}

#[test]
fn failed_load_yields_empty_tree_and_notice() {
    let mut store = loaded_store();
    open(&mut store, "a");

    let result = store.dispatch(Action::WorkspaceLoaded {
        root: PathBuf::from("/ws"),
        result: Err(ExternalIoError::new("load_workspace", "disk gone")),
    });

    assert!(matches!(result.error, Some(WorkspaceError::ExternalIo(_))));
    let state = store.state();
    assert!(state.tree.is_empty());
    assert!(state.tabs.is_empty());
    let notice = state.notices().last().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.message.contains("disk gone"));
}

#[test]
fn reload_keeps_tabs_of_surviving_nodes_and_refreshes_them() {
    let mut store = loaded_store();
    open(&mut store, "a");
    open(&mut store, "b");

    store.dispatch(Action::ReloadWorkspace);
    store.dispatch(Action::WorkspaceLoaded {
        root: PathBuf::from("/ws"),
        result: Ok(vec![NodeData::file("a", "a.ts", "from disk")]),
    });

    assert_eq!(tab_ids(&store), vec!["a"]);
    assert_eq!(store.state().tabs.active_id(), Some("a"));
    assert_eq!(&*store.state().tabs.get("a").unwrap().content, "from disk");
}

#[test]
fn invalid_loaded_tree_keeps_previous_tree() {
    let mut store = loaded_store();
    let before = tree_json(&store);

    let result = store.dispatch(Action::WorkspaceLoaded {
        root: PathBuf::from("/ws"),
        result: Ok(vec![
            NodeData::file("x", "x", ""),
            NodeData::file("x", "y", ""),
        ]),
    });

    assert!(matches!(
        result.error,
        Some(WorkspaceError::InvalidOperation(_))
    ));
    assert_eq!(tree_json(&store), before);
    assert_eq!(store.state().notices().len(), 1);
}

#[test]
fn reload_without_workspace_is_invalid() {
    let mut store = Store::new(AppState::new(WorkspaceConfig::default()));
    let result = store.dispatch(Action::ReloadWorkspace);
    assert!(matches!(
        result.error,
        Some(WorkspaceError::InvalidOperation(_))
    ));
    assert!(result.effects.is_empty());
}

#[test]
fn edits_without_workspace_root_do_not_schedule_writes() {
    let mut store = Store::new(AppState::new(WorkspaceConfig::default()));
    store.dispatch(Action::CreateNode {
        parent: None,
        kind: NodeKind::File,
        name: "scratch.txt".to_string(),
    });
    let id = store.state().tree.roots().next().unwrap().id().to_string();
    let result = store.dispatch(Action::EditContent {
        id,
        content: "x".to_string(),
    });
    assert!(result.error.is_none());
    assert!(result.effects.is_empty());
}

#[test]
fn terminal_commands_round_trip() {
    let mut store = loaded_store();
    let result = store.dispatch(Action::TerminalSubmit {
        line: "echo hi".to_string(),
    });
    let [Effect::RunCommand {
        request,
        command,
        args,
    }] = result.effects.as_slice()
    else {
        panic!("expected one RunCommand effect, got {:?}", result.effects);
    };
    assert_eq!(command, "echo");
    assert_eq!(args, &vec!["hi".to_string()]);

    let result = store.dispatch(Action::CommandFinished {
        request: *request,
        result: Ok("hi\n".to_string()),
    });
    assert!(result.state_changed);
    let texts: Vec<_> = store
        .state()
        .terminal
        .lines()
        .iter()
        .map(|l| l.text.as_str())
        .collect();
    assert_eq!(texts, vec!["$ echo hi", "hi"]);

    let result = store.dispatch(Action::TerminalSubmit {
        line: "clear".to_string(),
    });
    assert!(result.effects.is_empty());
    assert!(store.state().terminal.lines().is_empty());
}

#[test]
fn extension_install_reloads_workspace_on_success() {
    let mut store = loaded_store();
    let result = store.dispatch(Action::InstallExtension {
        package: " lodash ".to_string(),
    });
    assert_eq!(
        result.effects,
        vec![Effect::InstallExtension {
            project_path: PathBuf::from("/ws"),
            package: "lodash".to_string(),
        }]
    );

    let busy = store.dispatch(Action::InstallExtension {
        package: "react".to_string(),
    });
    assert!(matches!(busy.error, Some(WorkspaceError::InvalidOperation(_))));

    let result = store.dispatch(Action::ExtensionInstalled {
        package: "lodash".to_string(),
        result: Ok(InstallOutcome {
            success: true,
            message: "Installed lodash".to_string(),
        }),
    });
    assert_eq!(
        result.effects,
        vec![Effect::LoadWorkspace {
            root: PathBuf::from("/ws")
        }]
    );
    let state = store.state();
    assert!(state.extensions.installing.is_none());
    assert!(state.extensions.installed.contains("lodash"));
    assert_eq!(state.notices().last().unwrap().level, NoticeLevel::Info);
}

#[test]
fn extension_install_failure_is_a_notice() {
    let mut store = loaded_store();
    store.dispatch(Action::InstallExtension {
        package: "bad".to_string(),
    });
    let result = store.dispatch(Action::ExtensionInstalled {
        package: "bad".to_string(),
        result: Ok(InstallOutcome {
            success: false,
            message: "404".to_string(),
        }),
    });
    assert!(result.effects.is_empty());
    assert!(store.state().extensions.installing.is_none());
    assert_eq!(store.state().notices().last().unwrap().message, "404");
}

#[test]
fn external_error_report_adds_notice() {
    let mut store = loaded_store();
    let result = store.dispatch(Action::ReportExternalError(ExternalIoError::new(
        "write_file",
        "read-only",
    )));
    assert!(result.state_changed);
    assert!(result.error.is_none());
    assert_eq!(
        store.state().notices().last().unwrap().message,
        "write_file failed: read-only"
    );
}

fn reload(store: &mut Store, nodes: Vec<NodeData>) -> DispatchResult {
    let result = store.dispatch(Action::ReloadWorkspace);
    assert!(result.error.is_none());
    store.dispatch(Action::WorkspaceLoaded {
        root: PathBuf::from("/ws"),
        result: Ok(nodes),
    })
}

fn content(store: &Store, id: &str) -> String {
    store
        .state()
        .tree
        .get(id)
        .and_then(|n| n.content())
        .unwrap_or_default()
        .to_string()
}

#[test]
fn reload_keeps_unsaved_edit_of_surviving_file() {
    let mut store = loaded_store();
    open(&mut store, "a");
    store.dispatch(Action::EditContent {
        id: "a".to_string(),
        content: "edited".to_string(),
    });

    let result = reload(&mut store, nodes());

    assert!(result.effects.is_empty());
    assert_eq!(content(&store, "a"), "edited");
    assert_eq!(&*store.state().tabs.get("a").unwrap().content, "edited");
    assert_eq!(content(&store, "b"), "B");
}

#[test]
fn edit_while_loading_is_laid_over_loaded_tree() {
    let mut store = loaded_store();
    store.dispatch(Action::ReloadWorkspace);
    assert!(store.state().loading);

    let result = store.dispatch(Action::EditContent {
        id: "c".to_string(),
        content: "typed during load".to_string(),
    });
    assert_eq!(result.effects.len(), 1);

    store.dispatch(Action::WorkspaceLoaded {
        root: PathBuf::from("/ws"),
        result: Ok(nodes()),
    });
    assert_eq!(content(&store, "c"), "typed during load");
}

#[test]
fn reload_cancels_writes_of_files_that_are_gone() {
    let mut store = loaded_store();
    for (id, text) in [("a", "x"), ("c", "y")] {
        store.dispatch(Action::EditContent {
            id: id.to_string(),
            content: text.to_string(),
        });
    }

    let result = reload(&mut store, vec![NodeData::file("c", "c.md", "C")]);

    assert_eq!(
        result.effects,
        vec![Effect::CancelWrites {
            node_ids: vec!["a".to_string()]
        }]
    );
    assert_eq!(content(&store, "c"), "y");
}

#[test]
fn saved_content_is_not_laid_over_later_reloads() {
    let mut store = loaded_store();
    store.dispatch(Action::EditContent {
        id: "a".to_string(),
        content: "saved".to_string(),
    });
    let result = store.dispatch(Action::ContentSaved {
        id: "a".to_string(),
        content: "saved".to_string(),
    });
    assert!(!result.state_changed);

    reload(&mut store, nodes());
    assert_eq!(content(&store, "a"), "A");
}

#[test]
fn save_of_older_content_keeps_edit_unsaved() {
    let mut store = loaded_store();
    for text in ["first", "second"] {
        store.dispatch(Action::EditContent {
            id: "a".to_string(),
            content: text.to_string(),
        });
    }
    store.dispatch(Action::ContentSaved {
        id: "a".to_string(),
        content: "first".to_string(),
    });

    reload(&mut store, nodes());
    assert_eq!(content(&store, "a"), "second");
}

#[test]
fn save_landing_during_load_keeps_edit_unsaved() {
    let mut store = loaded_store();
    store.dispatch(Action::EditContent {
        id: "a".to_string(),
        content: "edited".to_string(),
    });
    store.dispatch(Action::ReloadWorkspace);
    store.dispatch(Action::ContentSaved {
        id: "a".to_string(),
        content: "edited".to_string(),
    });
    store.dispatch(Action::WorkspaceLoaded {
        root: PathBuf::from("/ws"),
        result: Ok(nodes()),
    });
    assert_eq!(content(&store, "a"), "edited");
}

#[test]
fn closing_tab_discards_unsaved_edit_on_reload() {
    let mut store = loaded_store();
    open(&mut store, "a");
    store.dispatch(Action::EditContent {
        id: "a".to_string(),
        content: "dropped".to_string(),
    });
    store.dispatch(Action::CloseTab { id: "a".to_string() });

    reload(&mut store, nodes());
    assert_eq!(content(&store, "a"), "A");
}

#[test]
fn switching_root_does_not_carry_edits_over() {
    let mut store = loaded_store();
    store.dispatch(Action::EditContent {
        id: "a".to_string(),
        content: "edited".to_string(),
    });

    store.dispatch(Action::OpenWorkspace {
        root: PathBuf::from("/other"),
    });
    let result = store.dispatch(Action::WorkspaceLoaded {
        root: PathBuf::from("/other"),
        result: Ok(nodes()),
    });

    assert!(result.effects.is_empty());
    assert_eq!(content(&store, "a"), "A");
}

#[test]
fn dismiss_notice_action_removes_notice() {
    let mut store = loaded_store();
    store.dispatch(Action::ReportExternalError(ExternalIoError::new(
        "write_file",
        "read-only",
    )));
    let id = store.state().notices().last().unwrap().id;

    let result = store.dispatch(Action::DismissNotice { id });
    assert!(result.state_changed);
    assert_eq!(store.state().notices().len(), 0);

    let result = store.dispatch(Action::DismissNotice { id });
    assert!(!result.state_changed);
}
