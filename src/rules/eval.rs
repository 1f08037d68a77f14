//! Evaluation of a single rule [`Op`] against a byte string.
//!
//! Every function here is total: out-of-range positions, empty inputs, and
//! reject conditions never panic. Rejections return an empty `Vec`; every
//! other out-of-range condition returns the input unchanged, matching the
//! reference semantics.

use super::opcode::numeric_param;
use super::Op;

/// Apply a single op to `input`, returning the transformed bytes.
pub fn apply(op: &Op, input: &[u8]) -> Vec<u8> {
    match *op {
        Op::Noop => input.to_vec(),
        Op::Lowercase => lowercase(input),
        Op::Uppercase => uppercase(input),
        Op::CapitalizeFirst => capitalize_first(input),
        Op::InvertFirst => invert_first(input),
        Op::ToggleAll => toggle_all(input),
        Op::ToggleAt(n) => toggle_at(input, numeric_param(n)),
        Op::Reverse => reverse_runes(input),
        Op::Duplicate => duplicate(input),
        Op::Reflect => reflect(input),
        Op::RotateLeft => rotate_left(input),
        Op::RotateRight => rotate_right(input),
        Op::DeleteFirst => delete_first(input),
        Op::DeleteLast => delete_last(input),
        Op::SwapFirstTwo => swap_first_two(input),
        Op::SwapLastTwo => swap_last_two(input),
        Op::DupEachChar => dup_each_rune(input),
        Op::TitleCase => title_case(input),
        Op::Repeat(n) => repeat(input, numeric_param(n)),
        Op::DeleteAt(n) => delete_at(input, numeric_param(n)),
        Op::PrependDup(n) => prepend_dup(input, numeric_param(n)),
        Op::AppendDup(n) => append_dup(input, numeric_param(n)),
        Op::Truncate(n) => truncate(input, numeric_param(n)),
        Op::Replace(c, d) => replace_all(input, c, d),
        Op::ReplaceNth(n, c, d) => replace_nth(input, numeric_param(n), c, d),
        Op::Append(c) => append_char(input, c),
        Op::Prepend(c) => prepend_char(input, c),
        Op::DupFirstN(n) => dup_first_n(input, numeric_param(n)),
        Op::DupLastN(n) => dup_last_n(input, numeric_param(n)),
        Op::BitShiftLeft(n) => bit_shift(input, numeric_param(n), true),
        Op::BitShiftRight(n) => bit_shift(input, numeric_param(n), false),
        Op::Decrement(n) => decrement_at(input, numeric_param(n)),
        Op::Increment(n) => increment_at(input, numeric_param(n)),
        Op::PurgeChar(c) => purge(input, c),
        Op::ShiftLeftIntoAt(n) => shift_left_into(input, numeric_param(n)),
        Op::ShiftRightIntoAt(n) => shift_right_into(input, numeric_param(n)),
        Op::TitleCaseAfter(c) => title_case_after(input, c),
        Op::InsertAt(n, c) => insert_at(input, numeric_param(n), c),
        Op::DeleteRange(n, m) => delete_range(input, numeric_param(n), numeric_param(m)),
        Op::OverwriteAt(n, c) => overwrite_at(input, numeric_param(n), c),
        Op::SwapAt(n, m) => swap_runes_at(input, numeric_param(n), numeric_param(m)),
        Op::Extract(n, m) => extract(input, numeric_param(n), numeric_param(m)),
        Op::RejectLenGe(n) => reject_if(input, input.len() >= numeric_param(n)),
        Op::RejectLenLe(n) => reject_if(input, input.len() <= numeric_param(n)),
        Op::RejectLenEq(n) => reject_if(input, input.len() == numeric_param(n)),
        Op::RejectContains(c) => reject_if(input, input.contains(&c)),
        Op::RejectNotContains(c) => reject_if(input, !input.contains(&c)),
        Op::ToggleAfterNth(n, c) => toggle_after_nth(input, numeric_param(n), c),
    }
}

fn to_chars(input: &[u8]) -> Vec<char> {
    String::from_utf8_lossy(input).chars().collect()
}

fn from_chars(chars: &[char]) -> Vec<u8> {
    chars.iter().collect::<String>().into_bytes()
}

fn to_upper_char(c: char) -> char {
    c.to_uppercase().next().unwrap_or(c)
}

fn to_lower_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn toggle_case_char(c: char) -> char {
    if c.is_uppercase() {
        to_lower_char(c)
    } else if c.is_lowercase() {
        to_upper_char(c)
    } else {
        c
    }
}

fn reject_if(input: &[u8], condition: bool) -> Vec<u8> {
    if condition {
        Vec::new()
    } else {
        input.to_vec()
    }
}

fn lowercase(input: &[u8]) -> Vec<u8> {
    String::from_utf8_lossy(input).to_lowercase().into_bytes()
}

fn uppercase(input: &[u8]) -> Vec<u8> {
    String::from_utf8_lossy(input).to_uppercase().into_bytes()
}

fn capitalize_first(input: &[u8]) -> Vec<u8> {
    let mut v = input.to_vec();
    if let Some(first) = v.first_mut() {
        *first = first.to_ascii_uppercase();
        for b in v.iter_mut().skip(1) {
            *b = b.to_ascii_lowercase();
        }
    }
    v
}

fn invert_first(input: &[u8]) -> Vec<u8> {
    let mut v = input.to_vec();
    if let Some(first) = v.first_mut() {
        *first = first.to_ascii_lowercase();
        for b in v.iter_mut().skip(1) {
            *b = b.to_ascii_uppercase();
        }
    }
    v
}

fn toggle_all(input: &[u8]) -> Vec<u8> {
    let chars: Vec<char> = to_chars(input)
        .into_iter()
        .map(toggle_case_char)
        .collect();
    from_chars(&chars)
}

fn toggle_at(input: &[u8], n: usize) -> Vec<u8> {
    let mut chars = to_chars(input);
    if n < chars.len() {
        chars[n] = toggle_case_char(chars[n]);
    }
    from_chars(&chars)
}

fn reverse_runes(input: &[u8]) -> Vec<u8> {
    let mut chars = to_chars(input);
    chars.reverse();
    from_chars(&chars)
}

fn duplicate(input: &[u8]) -> Vec<u8> {
    let mut v = input.to_vec();
    v.extend_from_slice(input);
    v
}

fn reflect(input: &[u8]) -> Vec<u8> {
    let chars = to_chars(input);
    let mut result = chars.clone();
    result.extend(chars.iter().rev());
    from_chars(&result)
}

fn rotate_left(input: &[u8]) -> Vec<u8> {
    if input.len() < 2 {
        return input.to_vec();
    }
    let mut v = input[1..].to_vec();
    v.push(input[0]);
    v
}

fn rotate_right(input: &[u8]) -> Vec<u8> {
    if input.len() < 2 {
        return input.to_vec();
    }
    let mut v = vec![input[input.len() - 1]];
    v.extend_from_slice(&input[..input.len() - 1]);
    v
}

fn delete_first(input: &[u8]) -> Vec<u8> {
    if input.is_empty() {
        Vec::new()
    } else {
        input[1..].to_vec()
    }
}

fn delete_last(input: &[u8]) -> Vec<u8> {
    if input.is_empty() {
        Vec::new()
    } else {
        input[..input.len() - 1].to_vec()
    }
}

fn swap_first_two(input: &[u8]) -> Vec<u8> {
    let mut chars = to_chars(input);
    if chars.len() >= 2 {
        chars.swap(0, 1);
    }
    from_chars(&chars)
}

fn swap_last_two(input: &[u8]) -> Vec<u8> {
    let mut chars = to_chars(input);
    let n = chars.len();
    if n >= 2 {
        chars.swap(n - 2, n - 1);
    }
    from_chars(&chars)
}

fn dup_each_rune(input: &[u8]) -> Vec<u8> {
    let chars = to_chars(input);
    let mut out = Vec::with_capacity(chars.len() * 2);
    for c in chars {
        out.push(c);
        out.push(c);
    }
    from_chars(&out)
}

fn title_case(input: &[u8]) -> Vec<u8> {
    let lowered = String::from_utf8_lossy(input).to_lowercase();
    let mut chars: Vec<char> = lowered.chars().collect();
    let mut at_word_start = true;
    for c in chars.iter_mut() {
        if at_word_start {
            *c = to_upper_char(*c);
        }
        at_word_start = *c == ' ';
    }
    from_chars(&chars)
}

fn repeat(input: &[u8], n: usize) -> Vec<u8> {
    let mut v = Vec::with_capacity(input.len() * (n + 1));
    for _ in 0..=n {
        v.extend_from_slice(input);
    }
    v
}

fn delete_at(input: &[u8], n: usize) -> Vec<u8> {
    if n >= input.len() {
        return input.to_vec();
    }
    let mut v = input.to_vec();
    v.remove(n);
    v
}

fn prepend_dup(input: &[u8], n: usize) -> Vec<u8> {
    if input.is_empty() {
        return input.to_vec();
    }
    let mut v = vec![input[0]; n];
    v.extend_from_slice(input);
    v
}

fn append_dup(input: &[u8], n: usize) -> Vec<u8> {
    if input.is_empty() {
        return input.to_vec();
    }
    let last = input[input.len() - 1];
    let mut v = input.to_vec();
    v.extend(std::iter::repeat(last).take(n));
    v
}

fn truncate(input: &[u8], n: usize) -> Vec<u8> {
    input[..n.min(input.len())].to_vec()
}

fn replace_all(input: &[u8], c: u8, d: u8) -> Vec<u8> {
    input.iter().map(|&b| if b == c { d } else { b }).collect()
}

fn replace_nth(input: &[u8], n: usize, c: u8, d: u8) -> Vec<u8> {
    let mut v = input.to_vec();
    let mut count = 0;
    for b in v.iter_mut() {
        if *b == c {
            if count == n {
                *b = d;
                break;
            }
            count += 1;
        }
    }
    v
}

fn append_char(input: &[u8], c: u8) -> Vec<u8> {
    let mut v = input.to_vec();
    v.push(c);
    v
}

fn prepend_char(input: &[u8], c: u8) -> Vec<u8> {
    let mut v = Vec::with_capacity(input.len() + 1);
    v.push(c);
    v.extend_from_slice(input);
    v
}

fn dup_first_n(input: &[u8], n: usize) -> Vec<u8> {
    if n == 0 || n > input.len() {
        return input.to_vec();
    }
    let mut v = input[..n].to_vec();
    v.extend_from_slice(input);
    v
}

fn dup_last_n(input: &[u8], n: usize) -> Vec<u8> {
    if n == 0 {
        return input.to_vec();
    }
    let mut v = input.to_vec();
    if n > input.len() {
        v.extend_from_slice(input);
    } else {
        v.extend_from_slice(&input[input.len() - n..]);
    }
    v
}

fn bit_shift(input: &[u8], n: usize, left: bool) -> Vec<u8> {
    let mut v = input.to_vec();
    if n < v.len() {
        v[n] = if left { v[n] << 1 } else { v[n] >> 1 };
    }
    v
}

fn decrement_at(input: &[u8], n: usize) -> Vec<u8> {
    let mut v = input.to_vec();
    if n < v.len() {
        v[n] = v[n].wrapping_sub(1);
    }
    v
}

fn increment_at(input: &[u8], n: usize) -> Vec<u8> {
    let mut v = input.to_vec();
    if n < v.len() {
        v[n] = v[n].wrapping_add(1);
    }
    v
}

fn purge(input: &[u8], c: u8) -> Vec<u8> {
    input.iter().copied().filter(|&b| b != c).collect()
}

fn shift_left_into(input: &[u8], n: usize) -> Vec<u8> {
    let mut v = input.to_vec();
    if n + 1 < v.len() {
        v[n] = v[n + 1];
        v.truncate(v.len() - 1);
    }
    v
}

fn shift_right_into(input: &[u8], n: usize) -> Vec<u8> {
    let mut v = input.to_vec();
    if n > 0 && n < v.len() {
        v[n] = v[n - 1];
    }
    v
}

fn title_case_after(input: &[u8], c: u8) -> Vec<u8> {
    let mut chars = to_chars(input);
    let target = c as char;
    let mut capitalize_next = false;
    for ch in chars.iter_mut() {
        if capitalize_next {
            *ch = to_upper_char(*ch);
        }
        capitalize_next = *ch == target;
    }
    from_chars(&chars)
}

fn insert_at(input: &[u8], n: usize, c: u8) -> Vec<u8> {
    if n > input.len() {
        return input.to_vec();
    }
    let mut v = input.to_vec();
    v.insert(n, c);
    v
}

fn delete_range(input: &[u8], n: usize, m: usize) -> Vec<u8> {
    if n + m >= input.len() {
        return input.to_vec();
    }
    let mut v = input[..n].to_vec();
    v.extend_from_slice(&input[n + m..]);
    v
}

fn overwrite_at(input: &[u8], n: usize, c: u8) -> Vec<u8> {
    let mut v = input.to_vec();
    if n < v.len() {
        v[n] = c;
    }
    v
}

fn swap_runes_at(input: &[u8], n: usize, m: usize) -> Vec<u8> {
    let mut chars = to_chars(input);
    if n < chars.len() && m < chars.len() {
        chars.swap(n, m);
    }
    from_chars(&chars)
}

fn extract(input: &[u8], n: usize, m: usize) -> Vec<u8> {
    if n + m > input.len() {
        return input.to_vec();
    }
    input[n..n + m].to_vec()
}

fn toggle_after_nth(input: &[u8], n: usize, c: u8) -> Vec<u8> {
    let mut chars = to_chars(input);
    let target = c as char;
    let mut count = 0;
    for i in 0..chars.len() {
        if chars[i] == target {
            if count == n {
                if i + 1 < chars.len() {
                    chars[i + 1] = toggle_case_char(chars[i + 1]);
                }
                break;
            }
            count += 1;
        }
    }
    from_chars(&chars)
}
