//! End-to-end synthesis passes over an in-memory store.

use pretty_assertions::assert_eq;
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;
use warp_menu_config::{AggregationConfig, Settings};
use warp_menu_core::{InMemoryResourceStore, MENU_UPDATED_MESSAGE, SynthesisError, Synthesizer};
use warp_menu_protocol::{
    EventSeverity, REASON_MENU_UPDATE_FAILED, REASON_MENU_UPDATED, ResourceRef,
};
use warp_menu_test_utils::{
    FailingResourceStore, RecordingEventRecorder, component_resource, descriptor,
    global_config_resource, menu_config_resource, target_resource,
};

const NAMESPACE: &str = "ecosystem";

const EXTERNALS_ONLY: &str = "sources:\n  - path: /config/_global/externals\n    type: externals\n";

const FULL_CONFIG: &str = r#"
sources:
  - path: /dogu
    type: dogus
    tag: warp
  - path: /config/_global/externals
    type: externals
  - path: /nowhere
    type: bogus
  - type: support_entry_config
    path: /support
support:
  - identifier: docsCesHomepage
    external: true
    href: https://docs.example.com/
  - identifier: aboutCloudoguToken
    external: false
    href: /local/about
order:
  Development Apps: 100
  Support: 200
"#;

const NEWS_GLOBAL_CONFIG: &str = r#"
externals:
  news: |
    DisplayName: Test
    URL: https://x
    Description: News
    Category: News
"#;

fn settings(menu_dir: &std::path::Path) -> Settings {
    let mut settings = Settings::new(NAMESPACE);
    settings.menu_path = menu_dir.join("warp").join("menu.json");
    settings
}

fn synthesizer(
    store: &InMemoryResourceStore,
    recorder: &RecordingEventRecorder,
    settings: Settings,
) -> Synthesizer {
    Synthesizer::from_store(Arc::new(store.clone()), Arc::new(recorder.clone()), settings)
}

#[tokio::test]
async fn single_external_record_becomes_one_category() {
    let dir = tempdir().expect("tempdir");
    let settings = settings(dir.path());
    let menu_path = settings.menu_path.clone();
    let store = InMemoryResourceStore::with_resources([
        target_resource(NAMESPACE),
        menu_config_resource(NAMESPACE, EXTERNALS_ONLY),
        global_config_resource(NAMESPACE, NEWS_GLOBAL_CONFIG),
    ]);
    let recorder = RecordingEventRecorder::new();

    synthesizer(&store, &recorder, settings)
        .run_once()
        .await
        .expect("run once");

    assert_eq!(
        fs::read_to_string(&menu_path).expect("menu file"),
        r#"[{"Title":"News","Order":0,"Entries":[{"Title":"News","DisplayName":"Test","Href":"https://x","Target":"self"}]}]"#
    );
    let events = recorder.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].reason, REASON_MENU_UPDATED);
    assert_eq!(events[0].message, MENU_UPDATED_MESSAGE);
    assert_eq!(events[0].severity, EventSeverity::Normal);
    assert_eq!(
        events[0].target,
        ResourceRef::new(NAMESPACE, "k8s-ces-assets-nginx")
    );
}

#[tokio::test]
async fn combines_components_externals_and_support() {
    let dir = tempdir().expect("tempdir");
    let store = InMemoryResourceStore::with_resources([
        target_resource(NAMESPACE),
        menu_config_resource(NAMESPACE, FULL_CONFIG),
        global_config_resource(
            NAMESPACE,
            &format!(
                "{NEWS_GLOBAL_CONFIG}disabled_warpmenu_support_entries: '[\"aboutCloudoguToken\"]'\n"
            ),
        ),
        component_resource(
            NAMESPACE,
            &descriptor("official/redmine", "Redmine", "Redmine", "Development Apps", &["warp"]),
        ),
        component_resource(
            NAMESPACE,
            &descriptor("official/jenkins", "Jenkins", "Jenkins CI", "Development Apps", &["warp"]),
        ),
        component_resource(
            NAMESPACE,
            &descriptor("official/postgresql", "PostgreSQL", "Database", "Base", &[]),
        ),
    ]);
    let recorder = RecordingEventRecorder::new();

    let menu = synthesizer(&store, &recorder, settings(dir.path()))
        .run_once()
        .await
        .expect("run once");

    let titles: Vec<(&str, i32, usize)> = menu
        .categories
        .iter()
        .map(|category| (category.title.as_str(), category.order, category.entries.len()))
        .collect();
    assert_eq!(
        titles,
        vec![("News", 0, 1), ("Development Apps", 100, 2), ("Support", 200, 1)]
    );

    let development = menu.category("Development Apps").expect("development");
    assert_eq!(development.entries[0].title, "Jenkins CI");
    assert_eq!(development.entries[0].href, "/jenkins");

    let support = menu.category("Support").expect("support");
    assert_eq!(support.entries[0].title, "docsCesHomepage");
    assert_eq!(support.entries[0].target.to_string(), "external");
}

#[tokio::test]
async fn empty_config_writes_empty_menu() {
    let dir = tempdir().expect("tempdir");
    let settings = settings(dir.path());
    let menu_path = settings.menu_path.clone();
    let store = InMemoryResourceStore::with_resources([
        target_resource(NAMESPACE),
        menu_config_resource(NAMESPACE, "sources: []\nsupport: []\n"),
    ]);
    let recorder = RecordingEventRecorder::new();

    let menu = synthesizer(&store, &recorder, settings)
        .run_once()
        .await
        .expect("run once");

    assert!(menu.is_empty());
    assert_eq!(fs::read_to_string(menu_path).expect("menu file"), "[]");
}

#[tokio::test]
async fn failed_pass_keeps_previous_menu() {
    let dir = tempdir().expect("tempdir");
    let settings = settings(dir.path());
    let menu_path = settings.menu_path.clone();
    let store = InMemoryResourceStore::with_resources([
        target_resource(NAMESPACE),
        menu_config_resource(NAMESPACE, EXTERNALS_ONLY),
        global_config_resource(NAMESPACE, NEWS_GLOBAL_CONFIG),
    ]);
    let recorder = RecordingEventRecorder::new();
    let synthesizer = synthesizer(&store, &recorder, settings);
    synthesizer.run_once().await.expect("first pass");
    let previous = fs::read_to_string(&menu_path).expect("menu file");

    store.apply(global_config_resource(NAMESPACE, "externals: {}\n"));
    store.apply(menu_config_resource(NAMESPACE, "sources: [\n"));

    let err = synthesizer.run_once().await.expect_err("pass must fail");
    assert!(matches!(err, SynthesisError::ConfigLoad(_)));
    assert_eq!(fs::read_to_string(&menu_path).expect("menu file"), previous);
    assert_eq!(
        recorder.reasons(),
        vec![REASON_MENU_UPDATED, REASON_MENU_UPDATE_FAILED]
    );
}

#[tokio::test]
async fn unwritable_menu_path_is_reported() {
    let dir = tempdir().expect("tempdir");
    let mut settings = settings(dir.path());
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a dir").expect("write blocker");
    settings.menu_path = blocker.join("menu.json");
    let store = InMemoryResourceStore::with_resources([
        target_resource(NAMESPACE),
        menu_config_resource(NAMESPACE, EXTERNALS_ONLY),
    ]);
    let recorder = RecordingEventRecorder::new();

    let err = synthesizer(&store, &recorder, settings)
        .run_once()
        .await
        .expect_err("write must fail");
    assert!(matches!(err, SynthesisError::Write { .. }));
    assert_eq!(fs::read_to_string(&blocker).expect("blocker"), "not a dir");
    assert_eq!(recorder.reasons(), vec![REASON_MENU_UPDATE_FAILED]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overlapping_passes_all_succeed() {
    let dir = tempdir().expect("tempdir");
    let settings = settings(dir.path());
    let menu_path = settings.menu_path.clone();
    let store = InMemoryResourceStore::with_resources([
        target_resource(NAMESPACE),
        menu_config_resource(NAMESPACE, EXTERNALS_ONLY),
        global_config_resource(NAMESPACE, NEWS_GLOBAL_CONFIG),
    ]);
    let recorder = RecordingEventRecorder::new();
    let synthesizer = synthesizer(&store, &recorder, settings);

    let passes: Vec<_> = (0..8)
        .map(|_| {
            let synthesizer = synthesizer.clone();
            tokio::spawn(async move { synthesizer.run_once().await })
        })
        .collect();
    for pass in passes {
        pass.await.expect("join").expect("pass");
    }

    assert_eq!(recorder.reasons(), vec![REASON_MENU_UPDATED; 8]);
    assert!(
        fs::read_to_string(&menu_path)
            .expect("menu file")
            .contains("\"News\"")
    );
}

#[tokio::test]
async fn missing_target_fails_the_pass() {
    let dir = tempdir().expect("tempdir");
    let settings = settings(dir.path());
    let menu_path = settings.menu_path.clone();
    let store =
        InMemoryResourceStore::with_resources([menu_config_resource(NAMESPACE, EXTERNALS_ONLY)]);
    let recorder = RecordingEventRecorder::new();

    let err = synthesizer(&store, &recorder, settings)
        .run_once()
        .await
        .expect_err("must fail");

    assert!(matches!(err, SynthesisError::TargetLookup { .. }));
    assert!(!menu_path.exists());
    let events = recorder.events();
    assert_eq!(events[0].severity, EventSeverity::Warning);
    assert!(events[0].message.contains("k8s-ces-assets-nginx"));
}

#[tokio::test]
async fn malformed_menu_config_fails_the_pass() {
    let dir = tempdir().expect("tempdir");
    let store = InMemoryResourceStore::with_resources([
        target_resource(NAMESPACE),
        menu_config_resource(NAMESPACE, "sources: [\n"),
    ]);
    let recorder = RecordingEventRecorder::new();

    let err = synthesizer(&store, &recorder, settings(dir.path()))
        .run_once()
        .await
        .expect_err("must fail");
    assert!(matches!(err, SynthesisError::ConfigLoad(_)));
    assert_eq!(recorder.reasons(), vec![REASON_MENU_UPDATE_FAILED]);
}

#[tokio::test]
async fn unreachable_store_is_reported_not_panicked() {
    let dir = tempdir().expect("tempdir");
    let recorder = RecordingEventRecorder::new();
    let synthesizer = Synthesizer::from_store(
        Arc::new(FailingResourceStore::new("cluster unreachable")),
        Arc::new(recorder.clone()),
        settings(dir.path()),
    );

    let err = synthesizer
        .reconcile(&ResourceRef::new(NAMESPACE, "global-config"))
        .await
        .expect_err("must fail");
    assert!(err.to_string().contains("cluster unreachable"));
    assert_eq!(recorder.reasons(), vec![REASON_MENU_UPDATE_FAILED]);
}

#[tokio::test]
async fn synthesize_absorbs_source_errors() {
    let dir = tempdir().expect("tempdir");
    let store = InMemoryResourceStore::with_resources([global_config_resource(
        NAMESPACE,
        NEWS_GLOBAL_CONFIG,
    )]);
    let recorder = RecordingEventRecorder::new();
    let config = AggregationConfig::load_from_str(FULL_CONFIG).expect("config");

    let menu = synthesizer(&store, &recorder, settings(dir.path()))
        .synthesize(&config)
        .await
        .expect("synthesize");

    let titles: Vec<&str> = menu
        .categories
        .iter()
        .map(|category| category.title.as_str())
        .collect();
    assert_eq!(titles, vec!["News", "Support"]);
    assert!(recorder.events().is_empty());
}
