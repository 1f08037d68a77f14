//! Lazy, backtracking generator of ordered permutations (no repeats,
//! order matters) of length `k` drawn from a slice of length `n`.
//!
//! Emission order is lexicographic over index tuples: depth-first,
//! always advancing the smallest unused index at each position.

pub struct Permutations<'a, T> {
    data: &'a [T],
    k: usize,
    n: usize,
    used: Vec<bool>,
    stack: Vec<usize>,
    cursor: Vec<usize>,
    done: bool,
    first_call: bool,
}

impl<'a, T> Permutations<'a, T> {
    pub fn new(data: &'a [T], k: usize) -> Self {
        let n = data.len();
        let done = k == 0 || k > n;
        Self {
            data,
            k,
            n,
            used: vec![false; n],
            stack: Vec::with_capacity(k),
            cursor: vec![0; k],
            done,
            first_call: true,
        }
    }

    /// Total count of permutations this generator would emit: the
    /// falling factorial `P(n, k)`.
    pub fn count_hint(n: usize, k: usize) -> u64 {
        if k > n {
            return 0;
        }
        let mut total: u64 = 1;
        for i in 0..k {
            total *= (n - i) as u64;
        }
        total
    }
}

impl<'a, T: Clone> Iterator for Permutations<'a, T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if !self.first_call {
            if let Some(last) = self.stack.pop() {
                self.used[last] = false;
            }
        }
        self.first_call = false;

        let mut d = self.stack.len();
        loop {
            if d == self.k {
                break;
            }

            let mut found = None;
            for idx in self.cursor[d]..self.n {
                if !self.used[idx] {
                    found = Some(idx);
                    break;
                }
            }

            match found {
                Some(idx) => {
                    self.used[idx] = true;
                    self.stack.push(idx);
                    self.cursor[d] = idx + 1;
                    d += 1;
                    if d < self.k {
                        self.cursor[d] = 0;
                    }
                }
                None => {
                    if d == 0 {
                        self.done = true;
                        return None;
                    }
                    d -= 1;
                    let popped = self.stack.pop().unwrap();
                    self.used[popped] = false;
                }
            }
        }

        Some(self.stack.iter().map(|&i| self.data[i].clone()).collect())
    }
}
