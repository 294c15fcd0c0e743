use serde_json::json;
use stagehand_cli::core::StagehandError;
use stagehand_cli::test_utils::{ThemeFixture, init_test_logging};
use stagehand_cli::theme::{JsonThemeStore, PublishOutcome, ThemeStore};

use crate::common::{TestSite, aurora, bare};

#[tokio::test]
async fn test_discovery_skips_malformed_descriptor() {
    init_test_logging(None);
    let site = TestSite::new().unwrap();
    site.add_theme(&aurora()).unwrap();
    site.add_theme(&ThemeFixture::new("broken").raw_descriptor("{ not json")).unwrap();

    let manager = site.manager().await.unwrap();
    let report = manager.discover_themes().unwrap();

    assert_eq!(report.slugs(), vec!["aurora"]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].directory_name, "broken");
    assert!(matches!(report.skipped[0].reason, StagehandError::DescriptorParse { .. }));
}

#[tokio::test]
async fn test_install_is_idempotent() {
    let site = TestSite::new().unwrap();
    site.add_theme(&aurora()).unwrap();
    let manager = site.manager().await.unwrap();
    let report = manager.discover_themes().unwrap();
    let discovered = report.get("aurora").unwrap();

    manager.install_theme(discovered, Some("alex")).unwrap();
    manager.install_theme(discovered, Some("alex")).unwrap();

    let installed = manager.installed_themes().unwrap();
    assert_eq!(installed.len(), 1);
    assert_eq!(installed[0].version, "2.1.0");
    assert_eq!(installed[0].installed_by.as_deref(), Some("alex"));
}

#[tokio::test]
async fn test_install_defaults_missing_fields() {
    let site = TestSite::new().unwrap();
    site.add_theme(&ThemeFixture::new("plain").raw_descriptor(r#"{"slug":"plain","name":"Plain"}"#))
        .unwrap();
    let manager = site.manager().await.unwrap();
    let report = manager.install_all_themes(None).unwrap();
    assert!(report.all_succeeded());

    let theme = manager.find_theme("plain").unwrap().unwrap();
    assert_eq!(theme.version, "1.0.0");
    assert!(theme.templates.is_empty());
    assert!(theme.assets.is_empty());
    assert!(theme.menus.is_empty());
    assert!(theme.is_installed);
    assert!(!theme.is_active);
}

#[tokio::test]
async fn test_single_active_theme_across_activations() {
    let site = TestSite::new().unwrap();
    for slug in ["aurora", "minimal", "docs"] {
        site.add_theme(&bare(slug)).unwrap();
    }
    let manager = site.manager().await.unwrap();
    assert!(manager.install_all_themes(None).unwrap().all_succeeded());
    assert!(manager.active_theme().is_none());

    for slug in ["minimal", "aurora", "docs", "docs", "minimal"] {
        assert!(manager.activate_theme(slug));
        let active: Vec<_> = manager
            .installed_themes()
            .unwrap()
            .into_iter()
            .filter(|t| t.is_active)
            .map(|t| t.slug)
            .collect();
        assert_eq!(active, vec![slug.to_string()]);
        assert_eq!(manager.active_theme().unwrap().slug, slug);
    }
}

#[tokio::test]
async fn test_activation_visible_to_fresh_manager() {
    let site = TestSite::new().unwrap();
    site.add_theme(&bare("aurora")).unwrap();
    site.add_theme(&bare("minimal")).unwrap();

    let first = site.manager().await.unwrap();
    first.install_all_themes(None).unwrap();
    assert!(first.activate_theme("aurora"));
    assert_eq!(first.active_theme().unwrap().slug, "aurora");

    // A second process sharing the registry file
    let second = site.manager().await.unwrap();
    assert_eq!(second.active_theme().unwrap().slug, "aurora");
    assert!(second.activate_theme("minimal"));
    assert_eq!(second.active_theme().unwrap().slug, "minimal");

    let store = JsonThemeStore::new(site.root().join(".stagehand/registry.json"));
    let active: Vec<_> = store.all().unwrap().into_iter().filter(|t| t.is_active).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].slug, "minimal");
}

#[tokio::test]
async fn test_activation_preconditions() {
    let site = TestSite::new().unwrap();
    site.add_theme(&bare("aurora")).unwrap();
    let manager = site.manager().await.unwrap();

    assert!(!manager.activate_theme("aurora"));
    assert!(matches!(
        manager.try_activate_theme("aurora"),
        Err(StagehandError::ThemeNotFound { .. })
    ));

    manager.install_all_themes(None).unwrap();
    std::fs::remove_dir_all(site.themes_dir().join("aurora")).unwrap();
    assert!(matches!(
        manager.try_activate_theme("aurora"),
        Err(StagehandError::ThemeFilesMissing { .. })
    ));
    assert!(manager.active_theme().is_none());
}

#[tokio::test]
async fn test_uninstall_rules() {
    let site = TestSite::new().unwrap();
    site.add_theme(&aurora()).unwrap();
    site.add_theme(&bare("minimal").asset("css/min.css", "x")).unwrap();
    let manager = site.manager().await.unwrap();
    manager.install_all_themes(None).unwrap();
    assert!(manager.activate_theme("aurora"));
    assert!(site.public_dir().join("minimal/css/min.css").is_file());

    assert!(!manager.uninstall_theme("aurora"));
    assert!(manager.find_theme("aurora").unwrap().is_some());
    assert!(!manager.uninstall_theme("unknown"));

    assert!(manager.uninstall_theme("minimal"));
    assert!(manager.find_theme("minimal").unwrap().is_none());
    assert!(!site.public_dir().join("minimal").exists());
    assert_eq!(manager.installed_themes().unwrap().len(), 1);
    // Source files stay on disk
    assert!(site.themes_dir().join("minimal/theme.json").is_file());
}

#[tokio::test]
async fn test_publish_replaces_stale_files_and_uses_directory() {
    let site = TestSite::new().unwrap();
    site.add_theme(&aurora().directory("aurora-2024")).unwrap();
    let manager = site.manager().await.unwrap();
    manager.install_all_themes(None).unwrap();

    let published = site.public_dir().join("aurora-2024");
    assert!(published.join("css/app.css").is_file());
    std::fs::write(published.join("stale.txt"), "old").unwrap();

    let theme = manager.find_theme("aurora").unwrap().unwrap();
    assert_eq!(theme.directory_path, "aurora-2024");
    assert!(matches!(manager.try_publish_assets(&theme), Ok(PublishOutcome::Published(2))));
    assert!(!published.join("stale.txt").exists());
    assert!(!site.public_dir().join("aurora").exists());
}

#[tokio::test]
async fn test_publish_all_keeps_going() {
    let site = TestSite::new().unwrap();
    site.add_theme(&aurora()).unwrap();
    site.add_theme(&bare("minimal")).unwrap();
    let manager = site.manager().await.unwrap();
    manager.install_all_themes(None).unwrap();

    // No assets folder is a success, not a failure
    assert!(manager.publish_all_assets());

    // A file squatting on the public root makes every publish fail
    std::fs::remove_dir_all(site.public_dir()).unwrap();
    std::fs::write(site.public_dir(), "not a directory").unwrap();

    let report = manager
        .publish_all_assets_report(&stagehand_cli::utils::ProgressBar::hidden())
        .unwrap();
    assert_eq!(report.len(), 2);
    assert!(report.failed.iter().any(|(slug, _)| slug == "aurora"));
    assert!(!manager.publish_all_assets());
}

#[tokio::test]
async fn test_reinstall_from_new_directory_moves_assets() {
    let site = TestSite::new().unwrap();
    site.add_theme(&aurora()).unwrap();
    let manager = site.manager().await.unwrap();
    manager.install_all_themes(None).unwrap();
    assert!(manager.activate_theme("aurora"));
    assert!(site.public_dir().join("aurora").is_dir());

    std::fs::rename(site.themes_dir().join("aurora"), site.themes_dir().join("aurora-v2")).unwrap();
    let report = manager.install_all_themes(None).unwrap();
    assert!(report.all_succeeded());

    let theme = manager.active_theme().unwrap();
    assert_eq!(theme.directory_path, "aurora-v2");
    assert!(!site.public_dir().join("aurora").exists());
    assert!(site.public_dir().join("aurora-v2/css/app.css").is_file());
    assert_eq!(manager.favicon_url(Some(&theme)), "/themes/aurora-v2/images/favicon.png");
}

#[tokio::test]
async fn test_directory_conflict_reported_in_batch() {
    let site = TestSite::new().unwrap();
    site.add_theme(&aurora()).unwrap();
    let manager = site.manager().await.unwrap();
    manager.install_all_themes(None).unwrap();

    // Same folder now declares a different slug
    std::fs::write(
        site.themes_dir().join("aurora/theme.json"),
        json!({ "slug": "borealis", "name": "Borealis" }).to_string(),
    )
    .unwrap();

    let report = manager.install_all_themes(None).unwrap();
    assert!(!report.all_succeeded());
    assert!(matches!(
        report.failed[0],
        (ref slug, StagehandError::DirectoryConflict { .. }) if slug == "borealis"
    ));
}
