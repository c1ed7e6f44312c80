use super::*;

#[test]
fn notices_are_capped_oldest_first() {
    let config = WorkspaceConfig {
        max_notices: 2,
        ..WorkspaceConfig::default()
    };
    let mut state = AppState::new(config);
    state.push_notice(NoticeLevel::Info, "one");
    state.push_notice(NoticeLevel::Error, "two");
    state.push_notice(NoticeLevel::Error, "three");

    let messages: Vec<_> = state.notices().map(|n| n.message.as_str()).collect();
    assert_eq!(messages, vec!["two", "three"]);
}

#[test]
fn dismiss_notice_by_id() {
    let mut state = AppState::new(WorkspaceConfig::default());
    state.push_notice(NoticeLevel::Info, "hello");
    let id = state.notices().next().unwrap().id;
    assert!(state.dismiss_notice(id));
    assert!(!state.dismiss_notice(id));
    assert_eq!(state.notices().len(), 0);
}

#[test]
fn workspace_label_prefers_config_override() {
    let mut state = AppState::new(WorkspaceConfig::default());
    assert_eq!(state.workspace_label(Path::new("/home/me/proj")), "proj");

    state.config.workspace_label = Some("Custom".to_string());
    assert_eq!(state.workspace_label(Path::new("/home/me/proj")), "Custom");
}
