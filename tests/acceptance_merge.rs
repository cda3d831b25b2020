//! Acceptance tests for layout inheritance.
//!
//! Each test builds a small site through the public store API and checks one
//! observable behavior of merging, ordering, invalidation or tree formatting.

use cmslayout::merge::{render_page, MarkerRecorder, MergeEngine, RenderContext};
use cmslayout::model::{
    LayoutDraft, LayoutError, LayoutId, LayoutIdentifier, LayoutNode, PageId, SiteId,
    StructuralError, ValidationError,
};
use cmslayout::select::{options_for_select, SelectRequest};
use cmslayout::source::{load_site_file, LoadedSite};
use cmslayout::store::LayoutStore;

// ===== Test Fixtures =====

const SITE_FIXTURE: &str = "tests/fixtures/site.toml";

fn fixture() -> LoadedSite {
    load_site_file(SITE_FIXTURE).expect("fixture site should load")
}

fn id_of(loaded: &LoadedSite, identifier: &str) -> LayoutId {
    loaded
        .store
        .layout_by_identifier(loaded.site, identifier)
        .expect("fixture layout exists")
        .id
}

fn page_of(loaded: &LoadedSite, slug: &str) -> PageId {
    loaded
        .store
        .page_by_slug(loaded.site, slug)
        .expect("fixture page exists")
        .id
}

fn raw_node(id: u64, parent: Option<u64>) -> LayoutNode {
    LayoutNode {
        id: LayoutId::new(id),
        site: SiteId::new(1),
        identifier: LayoutIdentifier::new(format!("node_{id}")).expect("valid identifier"),
        label: format!("Node {id}"),
        content: Some(format!("<n{id}>{{{{ cms:page:content }}}}</n{id}>")),
        head: None,
        css: None,
        js: None,
        parent: parent.map(LayoutId::new),
        position: 0,
        app_layout: None,
    }
}

// ===== Content merge =====

#[test]
fn three_level_chain_nests_content() {
    let loaded = fixture();
    let engine = MergeEngine::new(&loaded.store, &MarkerRecorder);

    let merged = engine
        .merged_content(id_of(&loaded, "blog_post"))
        .expect("chain merges");

    assert_eq!(
        merged,
        "<html><body><main><article>{{ cms:page:content:text }}</article></main></body></html>"
    );
}

#[test]
fn parent_without_placeholder_is_discarded() {
    let mut loaded = fixture();
    let default = id_of(&loaded, "default");
    loaded
        .store
        .update(default, |d| d.content = Some("<html>no slot</html>".into()))
        .expect("update succeeds");

    let engine = MergeEngine::new(&loaded.store, &MarkerRecorder);
    let merged = engine
        .merged_content(id_of(&loaded, "landing"))
        .expect("chain merges");

    assert_eq!(merged, "<section>standalone</section>");
}

#[test]
fn root_content_is_returned_verbatim() {
    let loaded = fixture();
    let engine = MergeEngine::new(&loaded.store, &MarkerRecorder);
    assert_eq!(
        engine.merged_content(id_of(&loaded, "plain")).unwrap(),
        "plain body"
    );
}

#[test]
fn root_without_content_merges_to_empty() {
    let mut store = LayoutStore::new();
    let site = store.add_site("Empty");
    let root = store.create(LayoutDraft::new(site, "bare")).unwrap().id;
    let engine = MergeEngine::new(&store, &MarkerRecorder);
    assert_eq!(engine.merged_content(root).unwrap(), "");
}

// ===== Head merge =====

#[test]
fn head_fragments_run_root_first() {
    let loaded = fixture();
    let engine = MergeEngine::new(&loaded.store, &MarkerRecorder);
    let leaf = id_of(&loaded, "blog_post");

    let head = engine
        .merged_head(leaf, &mut RenderContext::for_layout(leaf))
        .expect("head merges");

    assert_eq!(
        head.fragments(),
        [
            "<title>Site</title>",
            "<link rel=alternate href=/feed>",
            "<meta name=post>"
        ]
    );
    assert_eq!(
        head.to_string(),
        "<title>Site</title><link rel=alternate href=/feed><meta name=post>"
    );
}

// ===== Cycle guard =====

#[test]
fn two_node_cycle_fails_with_structural_error() {
    let mut store = LayoutStore::new();
    store.restore(raw_node(1, Some(2)));
    store.restore(raw_node(2, Some(1)));
    let engine = MergeEngine::new(&store, &MarkerRecorder);

    let result = engine.merged_content(LayoutId::new(1));

    assert!(matches!(
        result,
        Err(LayoutError::Structural(StructuralError::Cycle { .. }))
    ));
}

// ===== Positions & identifiers =====

#[test]
fn three_siblings_get_positions_in_creation_order() {
    let mut store = LayoutStore::new();
    let site = store.add_site("Positions");
    let root = store.create(LayoutDraft::new(site, "root")).unwrap().id;

    let positions: Vec<i64> = ["first", "second", "third"]
        .iter()
        .map(|name| {
            let id = store
                .create(LayoutDraft::new(site, *name).with_parent(root))
                .unwrap()
                .id;
            store.layout(id).unwrap().position
        })
        .collect();

    assert_eq!(positions, vec![0, 1, 2]);
}

#[test]
fn identifiers_are_unique_per_site_only() {
    let mut store = LayoutStore::new();
    let first = store.add_site("First");
    let second = store.add_site("Second");

    store.create(LayoutDraft::new(first, "default")).unwrap();
    let duplicate = store.create(LayoutDraft::new(first, "default"));
    let other_site = store.create(LayoutDraft::new(second, "default"));

    assert!(matches!(
        duplicate,
        Err(LayoutError::Validation(ValidationError::DuplicateIdentifier { .. }))
    ));
    assert!(other_site.is_ok());
}

// ===== Invalidation cascade =====

/// Root R, child C with cached page P, and R's sibling S.
fn cascade_site() -> (LayoutStore, LayoutId, LayoutId, LayoutId, PageId) {
    let mut store = LayoutStore::new();
    let site = store.add_site("Cascade");
    let root = store
        .create(LayoutDraft::new(site, "root").with_content("<r>{{ cms:page:content }}</r>"))
        .unwrap()
        .id;
    let child = store
        .create(
            LayoutDraft::new(site, "child")
                .with_parent(root)
                .with_content("child"),
        )
        .unwrap()
        .id;
    let sibling = store.create(LayoutDraft::new(site, "sibling")).unwrap().id;
    let page = store.add_page(site, "page", Some(child)).unwrap();
    render_page(&mut store, &MarkerRecorder, 64, page).unwrap();
    assert!(store.page(page).unwrap().is_cached());
    (store, root, child, sibling, page)
}

#[test]
fn saving_root_clears_descendant_page() {
    let (mut store, root, _, _, page) = cascade_site();
    store.update(root, |d| d.label = "Root".into()).unwrap();
    assert!(!store.page(page).unwrap().is_cached());
}

#[test]
fn saving_child_clears_its_page() {
    let (mut store, _, child, _, page) = cascade_site();
    store.update(child, |d| d.head = Some("<meta>".into())).unwrap();
    assert!(!store.page(page).unwrap().is_cached());
}

#[test]
fn saving_unrelated_sibling_keeps_page_cached() {
    let (mut store, _, _, sibling, page) = cascade_site();
    store.update(sibling, |d| d.css = Some("a {}".into())).unwrap();
    assert!(store.page(page).unwrap().is_cached());
}

#[test]
fn rerender_after_root_edit_reflects_new_content() {
    let (mut store, root, _, _, page) = cascade_site();
    assert_eq!(
        render_page(&mut store, &MarkerRecorder, 64, page).unwrap(),
        "<r>child</r>"
    );

    store
        .update(root, |d| d.content = Some("<R>{{ cms:page:content }}</R>".into()))
        .unwrap();

    assert_eq!(
        render_page(&mut store, &MarkerRecorder, 64, page).unwrap(),
        "<R>child</R>"
    );
}

#[test]
fn destroying_layout_clears_and_detaches_pages() {
    let mut loaded = fixture();
    let landing = id_of(&loaded, "landing");
    let welcome = page_of(&loaded, "welcome");
    render_page(&mut loaded.store, &MarkerRecorder, 64, welcome).unwrap();

    let outcome = loaded.store.destroy(landing).unwrap();

    assert_eq!(outcome.detached_pages, vec![welcome]);
    assert!(!loaded.store.page(welcome).unwrap().is_cached());
    assert_eq!(
        render_page(&mut loaded.store, &MarkerRecorder, 64, welcome).unwrap(),
        ""
    );
}

// ===== Tree formatting =====

#[test]
fn excluding_a_node_skips_its_children() {
    let loaded = fixture();
    let default = id_of(&loaded, "default");

    let options = options_for_select(
        &loaded.store,
        SelectRequest::new(loaded.site).excluding(default),
    );

    let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, vec!["Plain"]);
}
