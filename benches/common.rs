use planogram_compliance::{
    BoundingBox, CatalogItem, DetectionSet, Layout, PerspectiveTransform, Point, Shelf,
};

/// A 4-shelf cabinet with `per_shelf` slots per shelf, photographed under mild perspective
#[allow(dead_code)]
pub fn shelf_fixture(per_shelf: usize) -> (Layout, DetectionSet) {
    let (width, height) = (2000i64, 1600i64);
    let slot_w = width / per_shelf as i64;
    let shelf_h = height / 4;
    let mut shelves = Vec::new();
    for s in 0..4 {
        let top = s * shelf_h;
        let items = (0..per_shelf as i64)
            .map(|i| {
                let bbox = BoundingBox::try_new(
                    i * slot_w + 5,
                    top + 10,
                    (i + 1) * slot_w - 5,
                    top + shelf_h - 10,
                )
                .unwrap();
                CatalogItem::new((i % 7) as u32 + 1, bbox)
            })
            .collect();
        shelves.push(Shelf::new(
            BoundingBox::try_new(0, top, width, top + shelf_h).unwrap(),
            items,
        ));
    }
    let layout = Layout::new(BoundingBox::try_new(0, 0, width, height).unwrap(), shelves).unwrap();

    let corners = [
        Point::new(300.0, 250.0),
        Point::new(2700.0, 300.0),
        Point::new(2650.0, 3700.0),
        Point::new(350.0, 3650.0),
    ];
    let h = PerspectiveTransform::from_points(&layout.corners(), &corners).unwrap();
    let detections = layout
        .items()
        .map(|item| {
            let p = item.bbox().corners().map(|c| h.transform(&c).unwrap());
            let l = p.iter().map(|q| q.x).fold(f64::INFINITY, f64::min);
            let t = p.iter().map(|q| q.y).fold(f64::INFINITY, f64::min);
            let r = p.iter().map(|q| q.x).fold(f64::NEG_INFINITY, f64::max);
            let b = p.iter().map(|q| q.y).fold(f64::NEG_INFINITY, f64::max);
            CatalogItem::new(item.label(), BoundingBox::from_float_truncated(l, t, r, b).unwrap())
        })
        .collect();
    let set = DetectionSet::new(3024, 4032, corners, detections).unwrap();
    (layout, set)
}
