use proptest::prelude::*;
use rl_assign::{balanced_indices, balanced_sample, index_counts, ConditionVocabulary};
use rl_core::rng::RngHandle;

proptest! {
    #[test]
    fn counts_differ_by_at_most_one(seed in any::<u64>(), n in 0usize..200, k in 1usize..8) {
        let mut rng = RngHandle::from_seed(seed);
        let drawn = balanced_indices(n, k, &mut rng).unwrap();
        prop_assert_eq!(drawn.len(), n);
        let counts = index_counts(&drawn, k);
        let max = *counts.iter().max().unwrap();
        let min = *counts.iter().min().unwrap();
        prop_assert!(max - min <= 1, "counts {:?}", counts);
        prop_assert_eq!(min, n / k);
    }

    #[test]
    fn exact_multiples_split_evenly(seed in any::<u64>(), cycles in 1usize..40, arms in 0i64..5) {
        let vocab = ConditionVocabulary::for_arms(arms).unwrap();
        let n = cycles * vocab.len();
        let mut rng = RngHandle::from_seed(seed);
        let drawn = balanced_sample(n, &vocab, &mut rng).unwrap();
        for label in vocab.labels() {
            prop_assert_eq!(drawn.iter().filter(|l| *l == label).count(), cycles);
        }
    }

    #[test]
    fn same_seed_same_sequence(seed in any::<u64>(), n in 1usize..64, k in 1usize..6) {
        let a = balanced_indices(n, k, &mut RngHandle::from_seed(seed)).unwrap();
        let b = balanced_indices(n, k, &mut RngHandle::from_seed(seed)).unwrap();
        prop_assert_eq!(a, b);
    }
}

#[test]
fn hundred_units_two_conditions_is_fifty_fifty_for_every_seed() {
    let vocab = ConditionVocabulary::for_arms(1).unwrap();
    for seed in 0..50u64 {
        let drawn = balanced_sample(100, &vocab, &mut RngHandle::from_seed(seed)).unwrap();
        assert_eq!(drawn.iter().filter(|l| l.as_str() == "C").count(), 50);
    }
}

#[test]
fn residual_labels_vary_across_seeds() {
    // With n = 4, k = 3 the extra unit should land on each label for some seed.
    let mut heavy = [false; 3];
    for seed in 0..200u64 {
        let drawn = balanced_indices(4, 3, &mut RngHandle::from_seed(seed)).unwrap();
        let counts = index_counts(&drawn, 3);
        if let Some(idx) = counts.iter().position(|&c| c == 2) {
            heavy[idx] = true;
        }
    }
    assert_eq!(heavy, [true; 3]);
}
