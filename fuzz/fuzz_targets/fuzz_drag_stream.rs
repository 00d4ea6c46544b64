#![no_main]

use libfuzzer_sys::fuzz_target;
use reorder_core::geometry::Point;
use reorder_core::id::CollectionId;
use reorder_harness::{BoardLayout, Scenario};
use reorder_insertion::CollectionOptions;

fn collection(raw: u64) -> CollectionId {
    CollectionId::new(raw).unwrap_or(CollectionId::MIN)
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 || data.len() > 4096 {
        return;
    }
    let lists = [collection(1), collection(2), collection(3)];
    let layouts = [
        BoardLayout::COLUMN,
        BoardLayout::ROW,
        BoardLayout::Grid {
            columns: 3,
            item_width: 40.0,
            item_height: 30.0,
            gap: 8.0,
        },
    ];

    let mut scenario = Scenario::new();
    let mut next_value = 0u32;
    for (slot, &id) in lists.iter().enumerate() {
        let len = u32::from(data[slot % data.len()] % 6);
        let values: Vec<u32> = (next_value..next_value + len).collect();
        next_value += len;
        let options = CollectionOptions::default()
            .group("fuzz")
            .sortable(data[0] & (1 << slot) == 0);
        if scenario
            .add(
                id,
                Point::new(slot as f64 * 260.0, 0.0),
                220.0,
                layouts[slot],
                values,
                options,
            )
            .is_err()
        {
            return;
        }
    }
    scenario.tick();

    // Op bytes: 0-1 start, 2-4 drag-over, 5 move, 6 drop, 7 cancel, 8 scroll.
    for chunk in data[1..].chunks_exact(3) {
        let op = chunk[0] % 9;
        let point = Point::new(f64::from(chunk[1]) * 3.2 - 20.0, f64::from(chunk[2]) * 1.6 - 20.0);
        let id = lists[usize::from(chunk[1]) % lists.len()];
        match op {
            0 | 1 => {
                let len = scenario.values(id).len();
                if len > 0 {
                    let _ = scenario.start(id, usize::from(chunk[2]) % len);
                }
            }
            2..=4 => {
                scenario.drag_over(id, point);
            }
            5 => {
                scenario.move_to(point);
            }
            6 => {
                scenario.drop();
            }
            7 => {
                scenario.cancel();
            }
            _ => {
                scenario
                    .board
                    .set_scroll(Point::new(0.0, f64::from(chunk[2]) - 64.0));
                scenario.engine.document_scrolled();
                scenario.tick();
            }
        }

        let total: usize = lists.iter().map(|&id| scenario.values(id).len()).sum();
        assert_eq!(total as u32, next_value, "values lost or duplicated");
        for &id in &lists {
            if let Some(record) = scenario.engine.registry().get(id) {
                let indices: Vec<usize> = record.items.iter().map(|item| item.index).collect();
                let dense: Vec<usize> = (0..record.items.len()).collect();
                assert_eq!(indices, dense, "item indices not dense");
            }
        }
    }
});
