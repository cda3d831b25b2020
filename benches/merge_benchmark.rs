//! Merge benchmarks over deep layout chains.
//!
//! Content merge is a fold over the chain; head merge runs the processor once
//! per layout. Both should stay linear in chain depth.
//!
//! Run with: cargo bench

#![allow(missing_docs)] // criterion macros generate undocumented items

use cmslayout::merge::{MarkerRecorder, MergeEngine, RenderContext};
use cmslayout::model::{LayoutDraft, LayoutId};
use cmslayout::store::LayoutStore;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Build a single chain `depth` layouts deep and return the innermost id.
fn deep_chain(depth: usize) -> (LayoutStore, LayoutId) {
    let mut store = LayoutStore::new();
    let site = store.add_site("Bench");
    let filler = "<div class=\"row\">lorem ipsum dolor sit amet</div>".repeat(20);

    let mut parent: Option<LayoutId> = None;
    for level in 0..depth {
        let mut draft = LayoutDraft::new(site, format!("level_{level}"))
            .with_content(format!(
                "{filler}<section>{{{{ cms:page:content:rich_text }}}}</section>{filler}"
            ))
            .with_head(format!("<meta name=\"level\" content=\"{level}\">{{{{ cms:asset:css }}}}"));
        if let Some(parent) = parent {
            draft = draft.with_parent(parent);
        }
        let id = store.create(draft).expect("bench layout is valid").id;
        parent = Some(id);
    }

    (store, parent.expect("depth is positive"))
}

fn bench_merged_content(c: &mut Criterion) {
    let mut group = c.benchmark_group("merged_content");
    for depth in [4_usize, 16, 60] {
        let (store, leaf) = deep_chain(depth);
        let processor = MarkerRecorder;
        group.bench_with_input(BenchmarkId::from_parameter(depth), &leaf, |b, &leaf| {
            let engine = MergeEngine::new(&store, &processor);
            b.iter(|| black_box(engine.merged_content(black_box(leaf)).expect("merge succeeds")));
        });
    }
    group.finish();
}

fn bench_merged_head(c: &mut Criterion) {
    let mut group = c.benchmark_group("merged_head");
    for depth in [4_usize, 16, 60] {
        let (store, leaf) = deep_chain(depth);
        let processor = MarkerRecorder;
        group.bench_with_input(BenchmarkId::from_parameter(depth), &leaf, |b, &leaf| {
            let engine = MergeEngine::new(&store, &processor);
            b.iter(|| {
                let mut context = RenderContext::for_layout(leaf);
                black_box(
                    engine
                        .merged_head(black_box(leaf), &mut context)
                        .expect("merge succeeds"),
                )
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_merged_content, bench_merged_head);
criterion_main!(benches);
