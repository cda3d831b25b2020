//! Snapshot tests for the indented layout tree.
//!
//! Uses insta inline snapshots so the expected tree sits next to the site
//! that produces it.

use cmslayout::model::LayoutId;
use cmslayout::select::{options_for_select, SelectRequest};
use cmslayout::source::{load_site_file, LoadedSite};

fn fixture() -> LoadedSite {
    load_site_file("tests/fixtures/site.toml").expect("fixture site should load")
}

fn render(options: &[cmslayout::select::SelectOption]) -> String {
    options
        .iter()
        .map(|option| option.label.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn snapshot_full_tree() {
    let loaded = fixture();
    let options = options_for_select(&loaded.store, SelectRequest::new(loaded.site));

    insta::assert_snapshot!(render(&options), @r"
    Default
    . . Blog
    . . . . Blog Post
    . . Landing Page
    Plain
    ");
}

#[test]
fn snapshot_subtree_with_custom_spacer() {
    let loaded = fixture();
    let blog: Vec<LayoutId> = loaded
        .store
        .layout_by_identifier(loaded.site, "blog")
        .map(|layout| vec![layout.id])
        .unwrap_or_default();

    let options = options_for_select(
        &loaded.store,
        SelectRequest::new(loaded.site)
            .starting_at(&blog)
            .with_depth(1)
            .with_spacer("-- "),
    );

    insta::assert_snapshot!(render(&options), @r"
    -- Blog
    -- -- Blog Post
    ");
}

#[test]
fn snapshot_tree_json() {
    let loaded = fixture();
    let blog = loaded
        .store
        .layout_by_identifier(loaded.site, "blog")
        .expect("fixture layout exists")
        .id;
    let options = options_for_select(
        &loaded.store,
        SelectRequest::new(loaded.site).starting_at(std::slice::from_ref(&blog)),
    );

    let json = serde_json::to_string(&options).expect("options serialize");

    insta::assert_snapshot!(json, @r#"[{"label":"Blog","id":2},{"label":". . Blog Post","id":3}]"#);
}
