mod common;

use common::{Call, FakeHost, diag};
use pretty_assertions::assert_eq;
use problem_nav::DiagnosticSeverity::*;
use problem_nav::{CommandId, CommandKind, Environment, Position, ProblemNavigation};
use serde_json::{Value, json};

fn engine(section: Value) -> ProblemNavigation {
    ProblemNavigation::from_value(&section, Environment::default())
}

fn next_in_workspace(navigation: &mut ProblemNavigation, host: &mut FakeHost) {
    navigation.execute(CommandId::new(1, CommandKind::NextInWorkspace), host);
}

fn prev_in_workspace(navigation: &mut ProblemNavigation, host: &mut FakeHost) {
    navigation.execute(CommandId::new(1, CommandKind::PrevInWorkspace), host);
}

fn errors_elsewhere() -> FakeHost {
    FakeHost::new()
        .with_file("/a.rs", vec![diag(3, Warning)])
        .with_file("/b.rs", vec![diag(7, Error)])
        .with_file("/c.rs", vec![diag(1, Error)])
}

#[test]
fn test_better_basket_in_another_file_wins() {
    let mut navigation = engine(json!({ "base": { "severity": "error > warning" } }));
    let mut host = errors_elsewhere();
    host.open("/a.rs", 0);

    next_in_workspace(&mut navigation, &mut host);

    assert_eq!(host.opened(), vec![("/b.rs".to_string(), true)]);
    assert_eq!(host.active_path().as_deref(), Some("/b.rs"));
    assert_eq!(host.active_line(), Some(7));
}

#[test]
fn test_prioritized_active_document_always_wins() {
    let mut navigation = engine(json!({
        "base": { "severity": "error > warning", "prioritizeActive": true }
    }));
    let mut host = errors_elsewhere();
    host.open("/a.rs", 0);

    next_in_workspace(&mut navigation, &mut host);

    assert!(host.opened().is_empty());
    assert_eq!(host.active_line(), Some(3));
}

#[test]
fn test_same_basket_without_wrap_stays_in_active_document() {
    let mut navigation = engine(json!({ "base": { "severity": "error > warning" } }));
    let mut host = FakeHost::new()
        .with_file("/a.rs", vec![diag(3, Error)])
        .with_file("/b.rs", vec![diag(7, Error)]);
    host.open("/a.rs", 0);

    next_in_workspace(&mut navigation, &mut host);

    assert!(host.opened().is_empty());
    assert_eq!(host.active_line(), Some(3));
}

#[test]
fn test_wrapped_hit_defers_to_the_next_file() {
    let mut navigation = engine(json!({ "base": { "severity": "error > warning" } }));
    let mut host = FakeHost::new()
        .with_file("/a.rs", vec![diag(3, Error)])
        .with_file("/b.rs", vec![diag(7, Error)]);
    host.open("/a.rs", 5);

    next_in_workspace(&mut navigation, &mut host);

    assert_eq!(host.active_path().as_deref(), Some("/b.rs"));
    assert_eq!(host.active_line(), Some(7));
}

#[test]
fn test_wrapped_hit_still_beats_a_worse_workspace_hit() {
    let mut navigation = engine(json!({ "base": { "severity": "error > warning" } }));
    let mut host = FakeHost::new()
        .with_file("/a.rs", vec![diag(3, Warning)])
        .with_file("/b.rs", vec![diag(7, Error)]);
    host.open("/b.rs", 9);

    next_in_workspace(&mut navigation, &mut host);

    assert!(host.opened().is_empty());
    assert_eq!(host.active_path().as_deref(), Some("/b.rs"));
    assert_eq!(host.active_line(), Some(7));
}

#[test]
fn test_wrapped_hit_loses_ties_to_the_workspace() {
    let mut navigation = engine(json!({ "base": { "severity": "error > warning" } }));
    let mut host = FakeHost::new()
        .with_file("/a.rs", vec![diag(3, Warning)])
        .with_file("/b.rs", vec![diag(7, Warning)]);
    host.open("/b.rs", 9);

    next_in_workspace(&mut navigation, &mut host);

    assert_eq!(host.active_path().as_deref(), Some("/a.rs"));
    assert_eq!(host.active_line(), Some(3));
}

#[test]
fn test_single_file_workspace_is_not_counted_twice() {
    let mut navigation = engine(json!({}));
    let mut host = FakeHost::new().with_file("/a.rs", vec![diag(3, Error)]);
    host.open("/a.rs", 5);

    next_in_workspace(&mut navigation, &mut host);

    assert!(host.opened().is_empty());
    assert_eq!(host.active_line(), Some(3));
}

#[test]
fn test_backward_prefers_lower_basket_over_proximity() {
    let mut navigation = engine(json!({ "base": { "severity": "error > warning" } }));
    let mut host = errors_elsewhere();
    host.files[1].1.clear();
    host.open("/b.rs", 0);

    prev_in_workspace(&mut navigation, &mut host);

    assert_eq!(host.active_path().as_deref(), Some("/c.rs"));
    assert_eq!(host.active_line(), Some(1));
}

#[test]
fn test_without_active_editor_the_walk_starts_at_the_first_file() {
    let mut navigation = engine(json!({}));
    let mut host = errors_elsewhere();

    next_in_workspace(&mut navigation, &mut host);

    assert_eq!(host.opened(), vec![("/a.rs".to_string(), true)]);
    assert_eq!(host.active_line(), Some(3));
}

#[test]
fn test_open_in_preview_setting() {
    let mut navigation = engine(json!({ "1": { "openInPreview": false } }));
    let mut host = errors_elsewhere();
    host.open("/a.rs", 9);

    next_in_workspace(&mut navigation, &mut host);

    assert_eq!(host.opened(), vec![("/b.rs".to_string(), false)]);
}

#[test]
fn test_rejected_open_is_swallowed() {
    let mut navigation = engine(json!({ "base": { "severity": "error" } }));
    let mut host = errors_elsewhere();
    host.failing_paths.push("/b.rs".to_string());
    host.open("/a.rs", 0);

    next_in_workspace(&mut navigation, &mut host);

    assert_eq!(host.opened(), vec![("/b.rs".to_string(), true)]);
    assert_eq!(host.active_path().as_deref(), Some("/a.rs"));
    assert_eq!(host.active_line(), Some(0));
}

#[test]
fn test_no_jump_when_focus_did_not_move() {
    let mut navigation = engine(json!({ "base": { "severity": "error" } }));
    let mut host = errors_elsewhere();
    host.open_steals_focus = false;
    host.open("/a.rs", 0);

    next_in_workspace(&mut navigation, &mut host);

    assert_eq!(host.opened().len(), 1);
    assert!(
        !host
            .calls
            .iter()
            .any(|call| matches!(call, Call::SetSelection(..)))
    );
}

#[test]
fn test_open_peek_is_closed_before_leaving_the_file() {
    let mut navigation = engine(json!({ "base": { "severity": "error" } }));
    let mut host = FakeHost::new()
        .with_file("/a.rs", vec![diag(3, Error)])
        .with_file("/b.rs", vec![diag(7, Error)]);
    let first = host.open("/a.rs", 0);

    next_in_workspace(&mut navigation, &mut host);
    assert!(navigation.peek().is_standard_open(first));

    host.calls.clear();
    next_in_workspace(&mut navigation, &mut host);

    assert_eq!(host.calls[0], Call::CloseMarkerPeek);
    assert_eq!(host.calls[1], Call::Open("/b.rs".to_string(), true));
    let second = host.active_editor_id();
    assert!(host.calls.contains(&Call::SetSelection(second, Position::new(7, 0))));
    assert!(navigation.peek().is_standard_open(second));
    assert!(!navigation.peek().is_standard_open(first));
}
