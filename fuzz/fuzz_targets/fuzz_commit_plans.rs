#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use reorder_insertion::Direction;
use reorder_insertion::commit::{plan_reorder, plan_transfer};

#[derive(Debug, Arbitrary)]
struct Input {
    source_len: u8,
    target_len: u8,
    original_index: u16,
    target_index: u16,
    removed: u8,
    ascending: bool,
}

fuzz_target!(|input: Input| {
    let source: Vec<u32> = (0..u32::from(input.source_len)).collect();
    let target: Vec<u32> = (1_000..1_000 + u32::from(input.target_len)).collect();
    let original = usize::from(input.original_index);
    let target_index = usize::from(input.target_index);
    let direction = if input.ascending {
        Direction::Ascending
    } else {
        Direction::Descending
    };

    // Reorder: any dragged value, any (possibly stale) indices.
    if let Some(&dragged) = source.get(original % source.len().max(1)) {
        let plan = plan_reorder(&source, &[dragged], original, target_index, direction);
        assert_eq!(plan.values.len(), source.len());
        assert_eq!(plan.values[plan.position], dragged);
        let mut sorted = plan.values.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, source, "reorder is not a permutation");
    }

    // Transfer: removal and insertion are clamped, never panic.
    let removed = usize::from(input.removed % 4);
    let start = original.min(source.len());
    let end = (start + removed).min(source.len());
    let moving = source[start..end].to_vec();
    let plan = plan_transfer(&source, &target, &moving, original, removed, target_index);
    assert_eq!(
        plan.source_values.len() + plan.target_values.len(),
        source.len() + target.len(),
        "transfer lost or duplicated values"
    );
});
