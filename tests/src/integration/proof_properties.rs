//! # Proof Properties
//!
//! Property tests over the partial Merkle tree validator:
//! round trips from the standard builder, hash tampering and exact
//! stream lengths.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use proptest::sample::Index;

    use spv_merkle_sync::{
        compute_merkle_root, validate_and_extract, ProofError, MAX_BLOCK_TRANSACTIONS,
    };

    use crate::fixtures::{header_for, leaves, proof, selected, wire_message};

    fn leaf_count_and_matches(max: usize) -> impl Strategy<Value = Vec<bool>> {
        (1usize..=max).prop_flat_map(|n| prop::collection::vec(any::<bool>(), n))
    }

    fn is_malformed<T>(result: &Result<T, ProofError>) -> bool {
        matches!(result, Err(ProofError::MalformedProof { .. }))
    }

    proptest! {
        #[test]
        fn prop_builder_round_trip(matches in leaf_count_and_matches(64), seed in any::<u32>()) {
            let txs = leaves(matches.len(), seed);
            let result = proof(&txs, &matches).extract_matches(MAX_BLOCK_TRANSACTIONS).unwrap();

            let indices: Vec<u32> = matches
                .iter()
                .enumerate()
                .filter(|(_, m)| **m)
                .map(|(i, _)| i as u32)
                .collect();
            prop_assert_eq!(Some(result.merkle_root), compute_merkle_root(&txs));
            prop_assert_eq!(result.matched, selected(&txs, &matches));
            prop_assert_eq!(result.indices, indices);
        }

        #[test]
        fn prop_wire_round_trip(matches in leaf_count_and_matches(64), seed in any::<u32>()) {
            let txs = leaves(matches.len(), seed);
            let header = header_for(&txs, seed);
            let message = wire_message(&header, &proof(&txs, &matches));

            let result = validate_and_extract(&message, MAX_BLOCK_TRANSACTIONS).unwrap();

            prop_assert_eq!(result.merkle_root, header.merkle_root);
            prop_assert_eq!(result.matched, selected(&txs, &matches));
        }

        #[test]
        fn prop_hash_bit_flip_never_validates(
            matches in leaf_count_and_matches(32),
            seed in any::<u32>(),
            pick in any::<Index>(),
            bit in 0usize..256,
        ) {
            let txs = leaves(matches.len(), seed);
            let root = compute_merkle_root(&txs).unwrap();
            let mut tree = proof(&txs, &matches);
            let i = pick.index(tree.hashes.len());
            tree.hashes[i][bit / 8] ^= 1 << (bit % 8);

            if let Ok(result) = tree.extract_matches(MAX_BLOCK_TRANSACTIONS) {
                prop_assert_ne!(result.merkle_root, root);
            }
        }

        #[test]
        fn prop_hash_count_is_exact(matches in leaf_count_and_matches(17), seed in any::<u32>()) {
            let txs = leaves(matches.len(), seed);
            let tree = proof(&txs, &matches);

            let mut extra = tree.clone();
            extra.hashes.push([0xee; 32]);
            prop_assert!(is_malformed(&extra.extract_matches(MAX_BLOCK_TRANSACTIONS)));

            let mut missing = tree;
            missing.hashes.pop();
            prop_assert!(is_malformed(&missing.extract_matches(MAX_BLOCK_TRANSACTIONS)));
        }

        #[test]
        fn prop_flag_count_is_exact(matches in leaf_count_and_matches(17), seed in any::<u32>()) {
            let txs = leaves(matches.len(), seed);
            let tree = proof(&txs, &matches);

            let mut extra = tree.clone();
            extra.flags.push(false);
            prop_assert!(is_malformed(&extra.extract_matches(MAX_BLOCK_TRANSACTIONS)));

            // A single leaf with its only flag removed is the accepted
            // "one leaf, no flags" form.
            if matches.len() > 1 {
                let mut missing = tree;
                missing.flags.pop();
                prop_assert!(is_malformed(&missing.extract_matches(MAX_BLOCK_TRANSACTIONS)));
            }
        }
    }

    #[test]
    fn test_single_leaf_without_flags_matches_nothing() {
        let txs = leaves(1, 0);
        let mut tree = proof(&txs, &[true]);
        tree.flags.clear();

        let result = tree.extract_matches(MAX_BLOCK_TRANSACTIONS).unwrap();

        assert_eq!(result.merkle_root, txs[0]);
        assert!(result.matched.is_empty());
    }

    #[test]
    fn test_every_shape_up_to_seventeen_leaves() {
        for n in 1..=17usize {
            let txs = leaves(n, n as u32);
            for pattern in [vec![false; n], vec![true; n]] {
                let result = proof(&txs, &pattern)
                    .extract_matches(MAX_BLOCK_TRANSACTIONS)
                    .unwrap();
                assert_eq!(Some(result.merkle_root), compute_merkle_root(&txs), "n = {}", n);
                assert_eq!(result.matched, selected(&txs, &pattern), "n = {}", n);
            }
        }
    }
}
