#![no_main]

use libfuzzer_sys::fuzz_target;
use reorder_core::geometry::{Point, Rect};
use reorder_core::id::{CollectionId, ItemId};
use reorder_insertion::resolver::resolve;
use reorder_insertion::zoning::compute_zones;
use reorder_insertion::{ItemRecord, ZoningParams};

fuzz_target!(|data: &[u8]| {
    // First byte: collection width; then 4 bytes per rect, 2 per probe point.
    if data.len() < 5 {
        return;
    }
    let width = f64::from(data[0]) * 4.0;
    let count = ((data.len() - 1) / 6).min(64);
    let (rect_bytes, point_bytes) = data[1..].split_at(count * 4);

    let rects: Vec<Rect> = rect_bytes
        .chunks_exact(4)
        .map(|b| {
            Rect::new(
                f64::from(b[0] as i8) * 4.0,
                f64::from(b[1] as i8) * 4.0,
                f64::from(b[2]),
                f64::from(b[3]),
            )
        })
        .collect();

    let params = ZoningParams::default();
    let zones = compute_zones(width, &rects, &params);
    assert_eq!(zones.len(), rects.len(), "one zone pair per item");
    assert_eq!(zones, compute_zones(width, &rects, &params), "zoning not deterministic");

    let items: Vec<ItemRecord<usize>> = zones
        .into_iter()
        .enumerate()
        .map(|(index, zones)| ItemRecord {
            id: ItemId::new(index as u64 + 1).unwrap_or(ItemId::MIN),
            index,
            value: index,
            zones,
        })
        .collect();

    for b in point_bytes.chunks_exact(2) {
        let pointer = Point::new(f64::from(b[0] as i8) * 5.0, f64::from(b[1] as i8) * 5.0);
        if let Some(resolution) = resolve(CollectionId::MIN, pointer, &items) {
            assert!(resolution.index < items.len(), "resolved index out of range");
            assert!(resolution.zone.contains(pointer), "resolved zone misses pointer");
            let earlier = items[..resolution.index].iter().any(|item| {
                item.zones.ascending.is_some_and(|zone| zone.contains(pointer))
                    || item.zones.descending.is_some_and(|zone| zone.contains(pointer))
            });
            assert!(!earlier, "first match did not win");
        }
    }
});
