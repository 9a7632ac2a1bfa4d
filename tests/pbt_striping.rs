//! Property-based tests for the striping engine and placement math
//!
//! Verifies the data-placement contract over randomized layouts and data:
//! write/read round-trips, exact partitioning of stripe indices across
//! targets, and deterministic round-robin placement.

use std::rc::Rc;

use proptest::prelude::*;

use stripefs::catalog::StripeLayout;
use stripefs::storage::InMemoryStripeStore;
use stripefs::striping::{placement_of, target_for_stripe, StripingEngine, Striper};

/// Number of configured targets in all generated scenarios
const NUM_TARGETS: usize = 4;

fn target_names() -> Vec<String> {
    (1..=NUM_TARGETS).map(|i| format!("ost{}", i)).collect()
}

/// Valid layouts: 1 <= stripe_count <= NUM_TARGETS, stripe_size > 0
fn arb_layout() -> impl Strategy<Value = StripeLayout> {
    (1u32..=NUM_TARGETS as u32, 1u64..=8192).prop_map(|(count, size)| StripeLayout::new(count, size))
}

proptest! {
    /// read_striped(write_striped(data)) == data
    #[test]
    fn roundtrip_preserves_bytes(
        layout in arb_layout(),
        data in prop::collection::vec(any::<u8>(), 0..32 * 1024),
    ) {
        let store = Rc::new(InMemoryStripeStore::new(NUM_TARGETS));
        let engine = StripingEngine::new(store);

        engine.write_striped(1, &data, layout).unwrap();
        let read = engine.read_striped(1, data.len() as u64, layout).unwrap();

        prop_assert_eq!(read, data);
    }

    /// placement_of partitions [0, num_stripes) exactly, with every target listed
    #[test]
    fn placement_partitions_indices(
        layout in arb_layout(),
        total_size in 0u64..256 * 1024,
    ) {
        let placement = placement_of(total_size, layout, &target_names());

        prop_assert_eq!(placement.len(), NUM_TARGETS);

        let num_stripes = Striper::new(layout).stripe_count_of(total_size);

        let mut all: Vec<u64> = placement
            .iter()
            .flat_map(|p| p.stripes.iter().copied())
            .collect();
        all.sort_unstable();

        let expected: Vec<u64> = (0..num_stripes).collect();
        prop_assert_eq!(all, expected);
    }

    /// Each listed stripe index i sits on target i % stripe_count
    #[test]
    fn placement_follows_round_robin(
        layout in arb_layout(),
        total_size in 0u64..256 * 1024,
    ) {
        let placement = placement_of(total_size, layout, &target_names());

        for (target_index, target) in placement.iter().enumerate() {
            for &stripe_index in &target.stripes {
                prop_assert_eq!(
                    target_for_stripe(stripe_index, layout.stripe_count),
                    target_index
                );
            }
        }
    }

    /// Placement is a pure function: identical inputs, identical outputs
    #[test]
    fn placement_is_deterministic(
        layout in arb_layout(),
        total_size in 0u64..256 * 1024,
    ) {
        let first = placement_of(total_size, layout, &target_names());
        let second = placement_of(total_size, layout, &target_names());
        prop_assert_eq!(first, second);
    }

    /// Stripe count matches ceil(total_size / stripe_size)
    #[test]
    fn stripe_count_is_ceiling(
        layout in arb_layout(),
        total_size in 0u64..256 * 1024,
    ) {
        let striper = Striper::new(layout);
        let expected = total_size.div_ceil(layout.stripe_size);
        prop_assert_eq!(striper.stripe_count_of(total_size), expected);
    }
}
