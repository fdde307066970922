mod common;

use common::{FakeHost, diag};
use problem_nav::DiagnosticSeverity::*;
use problem_nav::settings::FilterSettings;
use problem_nav::{
    CommandId, CommandKind, Environment, FileId, Filter, FilterError, NavigationSettings,
    ProblemNavigation, WorkspaceFolder,
};
use serde_json::json;
use std::rc::Rc;

fn filter_settings(include: &[&str], exclude: &[&str]) -> FilterSettings {
    let strings = |globs: &[&str]| -> Rc<[String]> { globs.iter().map(|g| g.to_string()).collect() };
    FilterSettings {
        include: strings(include),
        exclude: strings(exclude),
        ..NavigationSettings::default().filter
    }
}

fn included(filter: &Filter, file: &str) -> bool {
    filter.is_included(&FileId::new(file))
}

#[test]
fn test_exclude_test_files() {
    let filter = Filter::new(&filter_settings(&[], &["**/*.test.*"]), &[]).unwrap();
    assert!(!included(&filter, "src/foo.test.ts"));
    assert!(included(&filter, "src/foo.ts"));
}

#[test]
fn test_multi_root_paths_start_with_folder_name() {
    let folders = [
        WorkspaceFolder::new("frontend", "/w/fe"),
        WorkspaceFolder::new("backend", "/w/be"),
    ];
    let filter = Filter::new(&filter_settings(&["frontend/**"], &[]), &folders).unwrap();
    assert!(included(&filter, "/w/fe/app.ts"));
    assert!(!included(&filter, "/w/be/app.ts"));
}

#[test]
fn test_invalid_globs() {
    let settings = filter_settings(&["src/[oops"], &["**/*.md"]);
    assert!(matches!(
        Filter::new(&settings, &[]),
        Err(FilterError::InvalidGlob { ref pattern, .. }) if pattern == "src/[oops"
    ));

    let lenient = Filter::new_lenient(&settings, &[]).unwrap();
    assert!(included(&lenient, "lib/x.rs"));
    assert!(!included(&lenient, "lib/x.md"));
}

#[test]
fn test_results_are_memoized() {
    let filter = Filter::new(&filter_settings(&[], &["**/*.md"]), &[]).unwrap();
    for _ in 0..3 {
        assert!(!included(&filter, "file:///docs/a.md"));
        assert!(included(&filter, "file:///src/a.rs"));
    }
    assert_eq!(filter.cached_len(), 2);
}

#[test]
fn test_configuration_change_invalidates_filters() {
    let mut navigation = ProblemNavigation::from_value(
        &json!({ "base": { "filter": { "exclude": ["**/*.gen.rs"] } } }),
        Environment::default(),
    );
    let mut host = FakeHost::new().with_file("/src/a.gen.rs", vec![diag(4, Error)]);
    host.open("/src/a.gen.rs", 0);
    let next = CommandId::new(1, CommandKind::Next);

    navigation.execute(next, &mut host);
    assert!(host.calls.is_empty());
    assert_eq!(navigation.config_cache().len(), 1);
    assert_eq!(navigation.config_cache().filter_count(), 1);

    navigation.on_configuration_changed(&json!({}), Environment::default(), &mut host);
    assert!(navigation.config_cache().is_empty());
    assert_eq!(navigation.config_cache().filter_count(), 0);

    navigation.execute(next, &mut host);
    assert_eq!(host.active_line(), Some(4));
    assert_eq!(navigation.config_cache().filter_count(), 0);
}
