//! Substring occurrence index over a single text.
//!
//! Every distinct character maps to the [`RangedSet`] of positions at which
//! it occurs. A sequence `s` starts at position `p` iff `s[i]` occurs at
//! `p + i` for every `i`, so the start positions are the intersection of each
//! character's position set shifted down by its index in `s`.

use crate::sets::RangedSet;
use rustc_hash::FxHashMap;

/// Character position index over one text. Positions count `char`s, not bytes.
#[derive(Clone, Debug)]
pub struct SubstringIndex {
    text: String,
    len: usize,
    case_sensitive: bool,
    positions: FxHashMap<char, RangedSet>,
}

#[inline]
fn fold(c: char, case_sensitive: bool) -> char {
    if case_sensitive {
        c
    } else {
        c.to_ascii_lowercase()
    }
}

impl SubstringIndex {
    /// Index `text` case-sensitively.
    pub fn new(text: &str) -> Self {
        Self::with_case(text, true)
    }

    /// Index `text`; when `case_sensitive` is false ASCII letters are folded
    /// at build and query time.
    pub fn with_case(text: &str, case_sensitive: bool) -> Self {
        let len = text.chars().count();
        let mut positions: FxHashMap<char, RangedSet> = FxHashMap::default();
        for (i, c) in text.chars().enumerate() {
            positions
                .entry(fold(c, case_sensitive))
                .or_insert_with(|| RangedSet::new(0, len))
                .insert_index(i);
        }
        Self {
            text: text.to_string(),
            len,
            case_sensitive,
            positions,
        }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the text in characters.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Number of distinct (folded) characters in the text.
    pub fn distinct_chars(&self) -> usize {
        self.positions.len()
    }

    /// Positions of a single character.
    pub fn positions(&self, c: char) -> Option<&RangedSet> {
        self.positions.get(&fold(c, self.case_sensitive))
    }

    /// True iff the indexed text equals `other` exactly.
    pub fn source_equals(&self, other: &str) -> bool {
        self.text == other
    }

    /// Start positions of every occurrence of `sequence`, ascending.
    ///
    /// The empty sequence has no occurrences.
    pub fn occurrences(&self, sequence: &str) -> RangedSet {
        self.scan(sequence, None)
    }

    /// Occurrences of `sequence` that start at one of `candidates`.
    ///
    /// `candidates` may cover any range; positions outside the text are
    /// ignored. Chaining a previous result shifted by a fixed distance asks
    /// for `sequence` exactly that far after an earlier match.
    pub fn occurrences_within(&self, sequence: &str, candidates: &RangedSet) -> RangedSet {
        self.scan(sequence, Some(candidates))
    }

    pub fn contains(&self, sequence: &str) -> bool {
        !self.occurrences(sequence).is_empty()
    }

    pub fn count(&self, sequence: &str) -> usize {
        self.occurrences(sequence).count()
    }

    fn scan(&self, sequence: &str, seed: Option<&RangedSet>) -> RangedSet {
        let empty = || RangedSet::new(0, self.len);
        let mut chars = sequence.chars().map(|c| fold(c, self.case_sensitive));

        let Some(first) = chars.next() else {
            return empty();
        };
        let Some(first_positions) = self.positions.get(&first) else {
            return empty();
        };

        let mut result = first_positions.clone();
        if let Some(seed) = seed {
            result.retain_in(&seed.shifted(0));
        }

        for (i, c) in chars.enumerate() {
            if result.is_empty() {
                break;
            }
            let Some(next) = self.positions.get(&c) else {
                return empty();
            };
            result.retain_in(&next.shifted(-(i as i64 + 1)));
        }
        result
    }
}
