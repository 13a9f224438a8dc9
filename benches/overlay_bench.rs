#![allow(missing_docs, clippy::unwrap_used)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use pocketview::color::{
    layer_visible, pocket_color_index, BaselineSnapshot, ColorAssignment,
};
use pocketview::engine::{HeadlessEngine, VisualizationEngine};
use pocketview::error::LoadError;
use pocketview::options::Options;
use pocketview::prediction::{parse_prediction, PredictionData, PredictionId};
use pocketview::selection::{SelectionCache, SelectionEntry};
use pocketview::sync::PocketSync;
use serde_json::json;

const RESIDUES: usize = 2000;
const ATOMS_PER_POCKET: u32 = 150;

/// Synthetic prediction with `count` pockets of overlapping surface patches.
fn prediction(count: u32) -> PredictionData {
    let indices: Vec<String> = (1..=RESIDUES).map(|i| format!("A_{i}")).collect();
    let scores: Vec<f64> = (0..RESIDUES).map(|i| (i % 10) as f64).collect();
    let pockets: Vec<_> = (0..count)
        .map(|p| {
            let first = p * ATOMS_PER_POCKET / 2;
            json!({
                "name": format!("pocket{}", p + 1),
                "rank": p + 1,
                "center": [0, 0, 0],
                "residues": (first..first + 20)
                    .map(|r| format!("A_{}", r % RESIDUES as u32 + 1))
                    .collect::<Vec<_>>(),
                "surface": (first..first + ATOMS_PER_POCKET).collect::<Vec<_>>()
            })
        })
        .collect();
    let payload = json!({
        "structure": {
            "indices": indices,
            "scores": { "conservation": scores, "plddt": scores }
        },
        "pockets": pockets,
        "metadata": { "predictedStructure": true }
    });
    parse_prediction(&payload.to_string()).unwrap()
}

fn loaded(count: u32) -> PocketSync<HeadlessEngine> {
    let data = prediction(count);
    let mut sync = PocketSync::new(HeadlessEngine::new(), Options::default());
    let mut loader =
        move |_: &PredictionId| -> Result<PredictionData, LoadError> {
            Ok(data.clone())
        };
    let _ = sync
        .load_structure(&mut loader, PredictionId::new("bench", "synthetic"))
        .unwrap();
    sync
}

fn layering_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("layer_visible");
    for count in [10_u32, 50, 200] {
        let sync = loaded(count);
        let model = sync.model().unwrap();
        let baseline = BaselineSnapshot::capture(
            &sync.engine().color_mapping(model).unwrap_or_else(|| {
                ColorAssignment::new(RESIDUES, RESIDUES)
            }),
        );
        let footprints: Vec<&SelectionEntry> =
            sync.pockets().iter().map(|p| p.selection.as_ref()).collect();

        group.bench_function(format!("{count}_pockets"), |b| {
            b.iter(|| {
                black_box(layer_visible(
                    &baseline,
                    footprints
                        .iter()
                        .enumerate()
                        .map(|(i, f)| (*f, pocket_color_index(i, 7))),
                ))
            });
        });
    }
    group.finish();
}

fn toggle_benchmark(c: &mut Criterion) {
    let mut sync = loaded(50);
    let mut index = 0;
    c.bench_function("show_only_pocket_50", |b| {
        b.iter(|| {
            index = (index + 1) % 50;
            sync.show_only_pocket(black_box(index)).unwrap();
            sync.engine_mut().clear_commands();
        });
    });
}

fn cache_benchmark(c: &mut Criterion) {
    let data = prediction(50);
    let mut engine = HeadlessEngine::new();
    let model = engine.load_structure(&data).unwrap();
    let mut cache = SelectionCache::new();
    for pocket in &data.pockets {
        let _ = cache.get_or_compute(&engine, model, pocket).unwrap();
    }
    c.bench_function("selection_cache_hit", |b| {
        b.iter(|| {
            black_box(
                cache
                    .get_or_compute(&engine, model, black_box(&data.pockets[25]))
                    .unwrap(),
            )
        });
    });
}

criterion_group!(benches, layering_benchmark, toggle_benchmark, cache_benchmark);
criterion_main!(benches);
