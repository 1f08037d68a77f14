//! Rule identity fingerprinting.
//!
//! Two rule lines that behave identically are expected to collide on a
//! fixed, deterministic test corpus. Hashing each rule's output over that
//! corpus gives a cheap fingerprint usable for offline dedup of large rule
//! files without retaining every transformed word.

use std::hash::Hasher;

use twox_hash::XxHash64;

use super::RuleLine;

const ALPHANUMERIC: &[u8] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Build the fixed corpus used to fingerprint rule behavior.
pub fn create_test_words() -> Vec<Vec<u8>> {
    let mut words = Vec::new();

    for b in 0u8..=255 {
        words.push(vec![b; 37]);
    }

    let mut combined = Vec::new();
    for b in 0u8..=255 {
        for _ in 0..37 {
            combined.push(b);
            combined.push(b'a');
        }
    }
    let mut reversed = combined.clone();
    reversed.reverse();
    words.push(combined);
    words.push(reversed);

    for i in 0..37usize {
        let len = i + 1;
        let mut alphabet = ALPHANUMERIC.to_vec();
        if i % 2 == 0 {
            alphabet.reverse();
        }
        let start = alphabet.len() - len;
        words.push(alphabet[start..].to_vec());
    }

    words
}

/// A 64-bit fingerprint of a rule line's behavior over the fixed corpus.
pub fn unique_id(rule: &RuleLine) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    for word in create_test_words() {
        let out = rule.apply(&word);
        hasher.write(&out);
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Op;

    #[test]
    fn identical_behavior_collides() {
        let a = RuleLine {
            ops: vec![Op::Lowercase],
        };
        let b = RuleLine {
            ops: vec![Op::Lowercase],
        };
        assert_eq!(unique_id(&a), unique_id(&b));
    }

    #[test]
    fn different_behavior_differs() {
        let a = RuleLine {
            ops: vec![Op::Lowercase],
        };
        let b = RuleLine {
            ops: vec![Op::Uppercase],
        };
        assert_ne!(unique_id(&a), unique_id(&b));
    }

    #[test]
    fn corpus_is_nonempty_and_deterministic() {
        let first = create_test_words();
        let second = create_test_words();
        assert_eq!(first, second);
        assert!(first.len() > 256);
    }
}
