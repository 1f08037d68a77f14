//! Target-permutation / wordlist-insertion combinator.

pub mod perm;
pub mod pipeline;
