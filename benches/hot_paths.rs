use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nuclear_map::data::{Country, Dataset};
use nuclear_map::map::{MapRenderer, Viewport};
use nuclear_map::symbols::{Atlas, Control, DataStats, RadiusScaler, Schema};

/// Forty countries over 1965-2022 with a mix of sentinel, zero and positive values
fn synthetic_dataset() -> Dataset {
    let years: Vec<i32> = (1965..=2022).collect();
    let countries = (0..40)
        .map(|i| {
            let values = (0..years.len())
                .map(|y| match (i + y) % 7 {
                    0 => -1.0,
                    1 => 0.0,
                    n => (n * 11 + i) as f64 % 80.0 + 0.5,
                })
                .collect();
            let lon = -10.0 + (i % 8) as f64 * 5.0;
            let lat = 38.0 + (i / 8) as f64 * 5.0;
            Country::new(format!("Country {i}"), lon, lat, values)
        })
        .collect();
    Dataset::new(Schema::from_years(years), countries)
}

fn bench_radius(c: &mut Criterion) {
    let scaler = RadiusScaler::default();
    c.bench_function("radius_scaling", |b| {
        b.iter(|| {
            let mut total = 0.0;
            for v in -1..100 {
                total += scaler.radius(black_box(v as f64));
            }
            total
        })
    });
}

fn bench_stats(c: &mut Criterion) {
    let dataset = synthetic_dataset();
    let scaler = RadiusScaler::default();
    c.bench_function("dataset_stats", |b| {
        b.iter(|| DataStats::from_dataset(black_box(&dataset), &scaler))
    });
}

fn bench_repaint(c: &mut Criterion) {
    let mut atlas = match Atlas::new(synthetic_dataset(), RadiusScaler::default()) {
        Ok(atlas) => atlas,
        Err(e) => panic!("synthetic dataset rejected: {e}"),
    };
    c.bench_function("step_and_repaint", |b| b.iter(|| atlas.apply(Control::Forward)));
}

fn bench_render(c: &mut Criterion) {
    let atlas = match Atlas::new(synthetic_dataset(), RadiusScaler::default()) {
        Ok(atlas) => atlas,
        Err(e) => panic!("synthetic dataset rejected: {e}"),
    };
    let mut renderer = MapRenderer::new();
    nuclear_map::data::generate_simple_europe(&mut renderer);
    let viewport = Viewport::europe(400, 200);
    c.bench_function("render_map_200x50", |b| {
        b.iter(|| renderer.render(200, 50, black_box(&viewport), atlas.markers(), Some(3)))
    });
}

criterion_group!(benches, bench_radius, bench_stats, bench_repaint, bench_render);
criterion_main!(benches);
