//! Human-friendly string ordering for checklist names.
//!
//! Digit runs compare by numeric value ("Item 2" < "Item 10"), letters
//! compare by their base form ignoring case and accents ("Émile" sorts with
//! "Eva"), and punctuation sorts before digits, digits before letters.
//! Names that differ only in case, accents or leading zeros compare equal,
//! so a stable sort keeps their original order.

use std::cmp::Ordering;
use unicode_normalization::char::{decompose_canonical, is_combining_mark};

pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let left = fold(a);
    let right = fold(b);
    let (mut i, mut j) = (0, 0);

    loop {
        match (left.get(i).copied(), right.get(j).copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_run = digit_run(&left[i..]);
                let r_run = digit_run(&right[j..]);
                i += l_run.len();
                j += r_run.len();
                let ord = compare_digit_runs(l_run, r_run);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(l), Some(r)) => {
                i += 1;
                j += 1;
                let ord = weight(l).cmp(&weight(r));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

/// Canonical decomposition with combining marks dropped, lowercased.
fn fold(s: &str) -> Vec<char> {
    let mut folded = Vec::with_capacity(s.len());
    for c in s.chars() {
        decompose_canonical(c, |base| {
            if !is_combining_mark(base) {
                folded.extend(base.to_lowercase());
            }
        });
    }
    folded
}

fn digit_run(chars: &[char]) -> &[char] {
    let end = chars
        .iter()
        .position(|c| !c.is_ascii_digit())
        .unwrap_or(chars.len());
    &chars[..end]
}

fn compare_digit_runs(a: &[char], b: &[char]) -> Ordering {
    let a = trim_leading_zeros(a);
    let b = trim_leading_zeros(b);
    // 去掉前導零後，位數較多者數值較大
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn trim_leading_zeros(run: &[char]) -> &[char] {
    let start = run.iter().position(|&c| c != '0').unwrap_or(run.len());
    &run[start..]
}

// 標點與空白 < 數字 < 文字
fn weight(c: char) -> (u8, char) {
    let class = if c.is_alphabetic() {
        2
    } else if c.is_numeric() {
        1
    } else {
        0
    };
    (class, c)
}
