use predicates::prelude::*;
use std::fs;

use crate::common::{TestSite, aurora, bare};

#[test]
fn test_help_lists_commands() {
    let site = TestSite::new().unwrap();
    site.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("themes"))
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_discover_reports_skipped_directories() {
    let site = TestSite::new().unwrap();
    site.add_theme(&aurora()).unwrap();
    site.add_theme(&bare("broken").raw_descriptor("{")).unwrap();

    site.cmd()
        .args(["themes", "discover"])
        .assert()
        .success()
        .stdout(predicate::str::contains("aurora"))
        .stdout(predicate::str::contains("v2.1.0"))
        .stdout(predicate::str::contains("broken"));
}

#[test]
fn test_install_all_activate_and_list() {
    let site = TestSite::new().unwrap();
    site.add_theme(&aurora()).unwrap();
    site.add_theme(&bare("minimal")).unwrap();

    site.cmd()
        .args(["themes", "install", "--all", "--by", "alex"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed aurora"))
        .stdout(predicate::str::contains("Installed minimal"));
    assert!(site.public_dir().join("aurora/css/app.css").is_file());

    site.cmd()
        .args(["themes", "activate", "aurora"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Activated aurora"));

    site.cmd()
        .args(["themes", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("● aurora"))
        .stdout(predicate::str::contains("minimal"));
}

#[test]
fn test_list_without_themes_prints_tip() {
    let site = TestSite::new().unwrap();
    site.cmd()
        .args(["themes", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No themes installed."));
}

#[test]
fn test_activate_unknown_suggests_slug() {
    let site = TestSite::new().unwrap();
    site.add_theme(&aurora()).unwrap();
    site.cmd().args(["themes", "install", "aurora"]).assert().success();

    site.cmd()
        .args(["themes", "activate", "auroa"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Theme 'auroa' is not registered"))
        .stderr(predicate::str::contains("Did you mean: aurora?"));
}

#[test]
fn test_uninstall_active_theme_is_refused() {
    let site = TestSite::new().unwrap();
    site.add_theme(&aurora()).unwrap();
    site.cmd().args(["themes", "install", "--all"]).assert().success();
    site.cmd().args(["themes", "activate", "aurora"]).assert().success();

    site.cmd()
        .args(["themes", "uninstall", "aurora"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("is the active theme"));
    assert!(site.public_dir().join("aurora").is_dir());
}

#[test]
fn test_publish_single_theme() {
    let site = TestSite::new().unwrap();
    site.add_theme(&aurora()).unwrap();
    site.cmd().args(["themes", "install", "aurora"]).assert().success();
    fs::remove_dir_all(site.public_dir()).unwrap();

    site.cmd()
        .args(["themes", "publish", "aurora"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 files"));
    assert!(site.public_dir().join("aurora/images/favicon.png").is_file());
}

#[test]
fn test_render_page_with_active_theme() {
    let site = TestSite::new().unwrap();
    site.add_theme(&aurora()).unwrap();
    site.cmd().args(["themes", "install", "--all"]).assert().success();
    site.cmd().args(["themes", "activate", "aurora"]).assert().success();
    site.write_content("about.md", "---\ntitle: About\n---\n<p>Hello from the field</p>\n")
        .unwrap();

    site.cmd()
        .args(["render", "page", "content/about.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<title>About | Field Notes</title>"))
        .stdout(predicate::str::contains("<article class=\"aurora-page\">"))
        .stdout(predicate::str::contains("<p>Hello from the field</p>"));
}

#[test]
fn test_render_with_menus_and_output_file() {
    let site = TestSite::new().unwrap();
    site.add_theme(&aurora()).unwrap();
    site.cmd().args(["themes", "install", "--all"]).assert().success();
    site.cmd().args(["themes", "activate", "aurora"]).assert().success();
    site.write_content("about.md", "---\ntitle: About\n---\n<p>Hi</p>").unwrap();
    let menus = site
        .write_content(
            "menus.json",
            r#"[{ "slug": "main", "name": "Main", "location": "primary", "items": [
                { "id": 1, "label": "Home", "url": "/" },
                { "id": 2, "label": "Account", "url": "/account", "visibility": "auth" }
            ] }]"#,
        )
        .unwrap();
    let output = site.root().join("about.html");

    site.cmd()
        .args(["render", "page", "content/about.md", "--set", "site_name=Override", "--menus"])
        .arg(&menus)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let html = fs::read_to_string(&output).unwrap();
    assert!(html.contains("<header>Override<nav><ul class=\"menu\">"));
    assert!(html.contains("<a href=\"/\">Home</a>"));
    assert!(!html.contains("Account"));
}

#[test]
fn test_render_without_theme_uses_builtin_markup() {
    let site = TestSite::new().unwrap();
    site.write_content("rain.md", "---\ntitle: Rain\nauthor: Sam\n---\n<p>Wet.</p>").unwrap();

    site.cmd()
        .args(["render", "post", "content/rain.md"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<!DOCTYPE html>"))
        .stdout(predicate::str::contains("By Sam"));
}

#[test]
fn test_render_missing_file_fails() {
    let site = TestSite::new().unwrap();
    site.cmd()
        .args(["render", "page", "content/nope.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.md"));
}

#[test]
fn test_config_path_and_show() {
    let site = TestSite::new().unwrap();
    site.cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stagehand.toml"));

    site.cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Field Notes"));
}
