//! Property tests for the relocation count ledgers.
//!
//! The deterministic doubling schedule makes every counter a closed-form
//! function of the push count; these properties pin the ledgers for all
//! small sizes rather than a handful of scenarios.

use proptest::prelude::*;

use relocation::workload::{expected_relocations, run_box, run_clone, run_native_baseline};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn clone_ledger_matches_schedule(size in 0usize..300) {
        let moved = expected_relocations(size);
        let counts = run_clone(size);
        prop_assert_eq!(counts.fresh, size as u64);
        prop_assert_eq!(counts.cloned, size as u64 + moved);
        prop_assert_eq!(counts.transferred, 0);
        prop_assert_eq!(counts.dropped, 2 * size as u64 + moved);
        prop_assert_eq!(counts.released, 0);
    }

    #[test]
    fn box_ledger_matches_schedule(size in 0usize..300) {
        let moved = expected_relocations(size);
        let counts = run_box(size);
        prop_assert_eq!(counts.fresh, size as u64);
        prop_assert_eq!(counts.cloned, 0);
        prop_assert_eq!(counts.transferred, size as u64 + moved);
        prop_assert_eq!(counts.dropped, 2 * size as u64 + moved);
        prop_assert_eq!(counts.released, size as u64);
    }

    #[test]
    fn every_allocation_is_released_once(size in 0usize..300) {
        let counts = run_box(size);
        prop_assert_eq!(counts.released, counts.fresh + counts.cloned);
    }

    #[test]
    fn native_growth_runs_no_element_code(size in 0usize..300) {
        let counts = run_native_baseline(size);
        prop_assert_eq!(counts.fresh, size as u64);
        prop_assert_eq!(counts.cloned, 0);
        prop_assert_eq!(counts.transferred, 0);
        prop_assert_eq!(counts.dropped, size as u64);
    }
}
