//! The change-all mutator: apply a combining function to every prefix,
//! suffix or substring of an input, materializing missing keys from the
//! trie's default value.
//!
//! Inputs are cut on UTF-8 character boundaries, so a multi-byte character
//! is never split. Bytes that are not part of a valid character are cut
//! one at a time without affecting the characters around them. The empty
//! string is never a derived key.

use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::error::Error;
use crate::Trie;

/// Which derived keys [`Trie::change_all`] visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum ChangeMode {
    /// Every non-empty prefix, longest first.
    Prefix,
    /// Every non-empty suffix, the whole input first.
    Suffix,
    /// Every distinct non-empty substring.
    Substring,
}

impl ChangeMode {
    /// Option name for this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeMode::Prefix => "prefix",
            ChangeMode::Suffix => "suffix",
            ChangeMode::Substring => "substring",
        }
    }
}

impl fmt::Display for ChangeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "prefix" => Ok(ChangeMode::Prefix),
            "suffix" => Ok(ChangeMode::Suffix),
            "substring" => Ok(ChangeMode::Substring),
            other => Err(Error::UnknownChangeMode { name: other.into() }),
        }
    }
}

/// Offsets at which `input` may be cut, including `0` and `input.len()`.
fn cut_points(input: &[u8]) -> SmallVec<[usize; 64]> {
    let mut cuts = SmallVec::new();
    let mut offset = 0;
    for chunk in input.utf8_chunks() {
        cuts.extend(chunk.valid().char_indices().map(|(i, _)| offset + i));
        offset += chunk.valid().len();
        cuts.extend(offset..offset + chunk.invalid().len());
        offset += chunk.invalid().len();
    }
    cuts.push(input.len());
    cuts
}

/// Byte ranges of `input` that `mode` derives, in visiting order.
pub(crate) fn derived_ranges(mode: ChangeMode, input: &[u8]) -> Vec<Range<usize>> {
    let cuts = cut_points(input);
    let n = input.len();
    match mode {
        ChangeMode::Prefix => cuts[1..].iter().rev().map(|&end| 0..end).collect(),
        ChangeMode::Suffix => cuts[..cuts.len() - 1].iter().map(|&start| start..n).collect(),
        ChangeMode::Substring => {
            let mut seen: HashSet<&[u8]> = HashSet::new();
            let mut ranges = Vec::new();
            for (i, &start) in cuts.iter().enumerate() {
                for &end in cuts[i + 1..].iter().rev() {
                    if seen.insert(&input[start..end]) {
                        ranges.push(start..end);
                    }
                }
            }
            ranges
        }
    }
}

impl<V> Trie<V> {
    /// Apply `combine` to every key that `mode` derives from `input`.
    ///
    /// `combine` receives the stored value, or the default for keys not yet
    /// present (`None` if the trie has no default), and returns the value to
    /// store. Each derived key is combined exactly once.
    ///
    /// ```rust
    /// use triez::{ChangeMode, Trie};
    ///
    /// let mut t: Trie<i64> = Trie::new();
    /// t.set("exp", 2);
    /// t.change_all(ChangeMode::Suffix, "regexp", |v| v.copied().unwrap_or(0) + 4);
    /// assert_eq!(t.get("regexp"), Some(&4));
    /// assert_eq!(t.get("exp"), Some(&6));
    /// assert_eq!(t.len(), 6);
    /// ```
    pub fn change_all<F>(&mut self, mode: ChangeMode, input: impl AsRef<[u8]>, mut combine: F)
    where
        F: FnMut(Option<&V>) -> V,
    {
        self.try_change_all(mode, input, |v| Ok::<V, Infallible>(combine(v)))
            .unwrap_or_else(|never| match never {});
    }

    /// Fallible [`change_all`](Trie::change_all). On the first `Err` the
    /// pass stops; keys already combined keep their new values.
    pub fn try_change_all<E, F>(
        &mut self,
        mode: ChangeMode,
        input: impl AsRef<[u8]>,
        mut combine: F,
    ) -> Result<(), E>
    where
        F: FnMut(Option<&V>) -> Result<V, E>,
    {
        let input = input.as_ref();
        let ranges = derived_ranges(mode, input);
        tracing::trace!(%mode, input_len = input.len(), derived = ranges.len(), "change-all pass");
        for range in ranges {
            let key = &input[range];
            let current = self.get(key).or(self.default.as_ref());
            let next = combine(current)?;
            self.set(key, next);
        }
        Ok(())
    }
}
