use criterion::{Criterion, black_box, criterion_group, criterion_main};
use planogram_compliance::BoundingBox;
use planogram_compliance::pipeline::{corner_correspondence, project_layout, rectify};
use planogram_compliance::utils::raster::{WorkingResolution, rasterize_box};

mod common;

fn bench_rasterize_box(c: &mut Criterion) {
    let bbox = BoundingBox::try_new(100, 120, 400, 700).unwrap();
    c.bench_function("rasterize_box_640x853", |b| {
        b.iter(|| rasterize_box(black_box(640), black_box(853), black_box(&bbox)))
    });
}

fn bench_project_layout(c: &mut Criterion) {
    let (layout, detections) = common::shelf_fixture(8);
    let resolution = WorkingResolution::for_image(
        detections.image_width(),
        detections.image_height(),
        640,
    )
    .unwrap();
    let transform = rectify(&corner_correspondence(&layout, &detections, &resolution)).unwrap();
    let items = layout.flatten_items();
    c.bench_function("project_layout_32_items", |b| {
        b.iter(|| {
            project_layout(
                black_box(&items),
                layout.canvas_size(),
                &transform,
                &resolution,
                127,
                true,
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, bench_rasterize_box, bench_project_layout);
criterion_main!(benches);
