//! Closed-form candidate count (§4.4): must agree exactly with the number
//! of lines [`crate::combinator::pipeline::run_pipeline`] would emit for
//! the same inputs and flags.

/// Falling factorial `P(n, k) = n·(n-1)···(n-k+1)`, `0` when `k > n`.
pub fn falling_factorial(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    (0..k).fold(1u64, |acc, i| acc * (n - i))
}

/// `S(n) = Σ_{i=min..max} P(n, i)`: the self-combination emission count.
pub fn sum_subset_counts(n: u64, min: u64, max: u64) -> u64 {
    (min..=max).map(|i| falling_factorial(n, i)).sum()
}

/// `T(n) = Σ_{i=min..max} P(n, i)·(i+1)`: the per-word insertion count
/// (every ordered subset of length `i` has `i+1` insertion slots).
pub fn sum_insertion_counts(n: u64, min: u64, max: u64) -> u64 {
    (min..=max)
        .map(|i| falling_factorial(n, i) * (i + 1))
        .sum()
}

/// Inputs needed to compute the keyspace for one invocation.
pub struct KeyspaceArgs {
    /// Size of the (unruled) target list.
    pub target_len: u64,
    pub min_target: u64,
    pub max_target: u64,
    pub self_combination: bool,
    /// `Wtot`: the sum, across every valid wordlist, of its effective word
    /// count (its line count, or the total of `applyRuleCPU` outputs
    /// across every wordlist rule when wordlist rules are set).
    pub wordlist_total: u64,
    /// Size of the augmented target list for every non-noop target rule,
    /// in rule-file order (after any `--partial-deduplicate` set-difference
    /// has been applied, matching what the pipeline would actually feed
    /// into the combined generator for that rule's pass).
    pub target_rule_augment_lens: Vec<u64>,
}

/// The baseline contribution: self-combination over the plain target list
/// plus cross-product with every wordlist, with no rule augmentation.
fn baseline_contribution(args: &KeyspaceArgs) -> u64 {
    let n = args.target_len;
    let self_part = if args.self_combination {
        sum_subset_counts(n, args.min_target, args.max_target)
    } else {
        0
    };
    self_part + args.wordlist_total * sum_insertion_counts(n, args.min_target, args.max_target)
}

/// Compute the total candidate count for the configured run.
///
/// The orchestrator always runs one baseline pass (no target rule), and
/// then one additional pass per non-noop target rule in which every
/// combined combination must draw at least one element from that rule's
/// augmented list (§4.3.1). For an augmented list of size `m`, the
/// combined pool has `n + m` elements, so `P(n+m, i) - P(n, i)` is the
/// count of length-`i` combined arrangements that use at least one
/// augmented element (total arrangements over the combined pool, minus
/// the ones that happen to use only original-target elements). Each rule
/// pass therefore contributes `S(nb) - S(n)` (and `T(nb) - T(n)` per
/// wordlist) on top of the baseline, rather than a second full `S(nb)`.
pub fn calculate_keyspace(args: &KeyspaceArgs) -> u64 {
    let baseline = baseline_contribution(args);

    if args.target_rule_augment_lens.is_empty() {
        return baseline;
    }

    let n = args.target_len;
    let min = args.min_target;
    let max = args.max_target;

    let mut total = baseline;
    for &m in &args.target_rule_augment_lens {
        let nb = n + m;
        let self_delta = if args.self_combination {
            sum_subset_counts(nb, min, max) - sum_subset_counts(n, min, max)
        } else {
            0
        };
        let wordlist_delta = args.wordlist_total
            * (sum_insertion_counts(nb, min, max) - sum_insertion_counts(n, min, max));
        total += self_delta + wordlist_delta;
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falling_factorial_basic() {
        assert_eq!(falling_factorial(5, 0), 1);
        assert_eq!(falling_factorial(5, 1), 5);
        assert_eq!(falling_factorial(5, 2), 20);
        assert_eq!(falling_factorial(5, 6), 0);
    }

    #[test]
    fn scenario_5_matches_spec() {
        // target=[a,b,c], wordlist totals 2 words, min=max=2, self-combination.
        let args = KeyspaceArgs {
            target_len: 3,
            min_target: 2,
            max_target: 2,
            self_combination: true,
            wordlist_total: 2,
            target_rule_augment_lens: vec![],
        };
        assert_eq!(calculate_keyspace(&args), 42);
    }

    #[test]
    fn scenario_6_matches_spec() {
        // target=["ab"], rule "u" -> augmented=["AB"], no wordlists, min=max=1.
        let args = KeyspaceArgs {
            target_len: 1,
            min_target: 1,
            max_target: 1,
            self_combination: true,
            wordlist_total: 0,
            target_rule_augment_lens: vec![1],
        };
        assert_eq!(calculate_keyspace(&args), 2);
    }

    #[test]
    fn no_rules_matches_baseline_only() {
        let args = KeyspaceArgs {
            target_len: 2,
            min_target: 1,
            max_target: 2,
            self_combination: true,
            wordlist_total: 0,
            target_rule_augment_lens: vec![],
        };
        assert_eq!(calculate_keyspace(&args), baseline_contribution(&args));
    }

    #[test]
    fn self_combination_false_drops_self_term() {
        let args = KeyspaceArgs {
            target_len: 4,
            min_target: 1,
            max_target: 3,
            self_combination: false,
            wordlist_total: 5,
            target_rule_augment_lens: vec![],
        };
        let expected = args.wordlist_total
            * sum_insertion_counts(args.target_len, args.min_target, args.max_target);
        assert_eq!(calculate_keyspace(&args), expected);
    }

    #[test]
    fn multiple_rules_do_not_double_count_baseline() {
        // Two target rules, each producing an augmented list of size 1 over
        // a target of size 1: baseline "ab" plus two distinct single-element
        // combined passes, each contributing exactly their own augmented word.
        let args = KeyspaceArgs {
            target_len: 1,
            min_target: 1,
            max_target: 1,
            self_combination: true,
            wordlist_total: 0,
            target_rule_augment_lens: vec![1, 1],
        };
        // baseline (1) + rule1 contributes 1 + rule2 contributes 1 = 3
        assert_eq!(calculate_keyspace(&args), 3);
    }
}
