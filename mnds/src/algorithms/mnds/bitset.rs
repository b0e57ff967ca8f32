#[cfg(test)]
#[path = "../../../tests/unit/algorithms/mnds/bitset_test.rs"]
mod bitset_test;

/// Amount of bits used to address a bit inside of a word.
pub(crate) const N_BIT_ADDR: usize = 6;

/// Amount of bits in a word.
pub(crate) const WORD_SIZE: usize = 1 << N_BIT_ADDR;

/// Returns amount of words needed to keep `size` bits.
pub(crate) fn words_for(size: usize) -> usize {
    (size >> N_BIT_ADDR) + 1
}

/// A bit-vector of solution ordinals which keeps track of its first and last non-empty words,
/// so most of the operations scale with the occupied range instead of the full population size.
///
/// The backing storage is materialized on the first insertion only: in a typical population most
/// of the solutions belong to the first fronts and never get a dominator.
#[derive(Clone, Debug)]
pub struct DominanceBitset {
    words: Vec<u64>,
    first: usize,
    last: usize,
}

impl Default for DominanceBitset {
    fn default() -> Self {
        Self { words: Vec::new(), first: usize::MAX, last: 0 }
    }
}

impl DominanceBitset {
    /// Creates an empty bitset with materialized storage for given amount of bits.
    pub fn with_size(size: usize) -> Self {
        Self { words: vec![0; words_for(size)], ..Self::default() }
    }

    /// Returns true if no bit is set.
    pub fn is_empty(&self) -> bool {
        self.first > self.last
    }

    /// Returns an inclusive range of active words, if any.
    pub fn range(&self) -> Option<(usize, usize)> {
        if self.is_empty() { None } else { Some((self.first, self.last)) }
    }

    /// Returns a word at given index. Words outside of the active range are always zero.
    pub fn word(&self, index: usize) -> u64 {
        self.words.get(index).copied().unwrap_or(0)
    }

    /// Checks whether given bit is set.
    pub fn contains(&self, bit: usize) -> bool {
        let index = bit >> N_BIT_ADDR;
        if self.is_empty() || index < self.first || index > self.last {
            return false;
        }

        self.words[index] & (1 << (bit & (WORD_SIZE - 1))) != 0
    }

    /// Sets given bit, `total_words` is used to materialize the storage.
    pub fn insert(&mut self, bit: usize, total_words: usize) {
        let index = bit >> N_BIT_ADDR;
        self.materialize(total_words.max(index + 1));

        self.words[index] |= 1 << (bit & (WORD_SIZE - 1));

        if self.is_empty() {
            self.first = index;
            self.last = index;
        } else {
            self.first = self.first.min(index);
            self.last = self.last.max(index);
        }
    }

    /// Unsets given bit compacting active range when its word becomes empty.
    /// Returns true if the bit was set.
    pub fn remove(&mut self, bit: usize) -> bool {
        if !self.contains(bit) {
            return false;
        }

        let index = bit >> N_BIT_ADDR;
        self.words[index] &= !(1 << (bit & (WORD_SIZE - 1)));

        if self.words[index] == 0 {
            self.compact();
        }

        true
    }

    /// Unsets all bits.
    pub fn clear(&mut self) {
        if let Some((first, last)) = self.range() {
            self.words[first..=last].iter_mut().for_each(|word| *word = 0);
        }

        self.first = usize::MAX;
        self.last = 0;
    }

    /// Replaces content with bits of `visited` which are lower than `bit`.
    /// Returns true if at least one bit is set afterwards.
    pub fn assign_prefix(&mut self, visited: &DominanceBitset, bit: usize, total_words: usize) -> bool {
        self.clear();

        let index = bit >> N_BIT_ADDR;
        let (first, last) = match visited.range() {
            Some((first, _)) if index < first => return false,
            Some((first, last)) => (first, last.min(index)),
            None => return false,
        };

        self.materialize(total_words);
        self.words[first..=last].copy_from_slice(&visited.words[first..=last]);

        if last == index {
            self.words[index] &= (1 << (bit & (WORD_SIZE - 1))) - 1;
        }

        self.first = first;
        self.last = last;
        self.compact();

        !self.is_empty()
    }

    /// Keeps only bits which are also set in `other`.
    /// Returns true if at least one bit is set afterwards.
    pub fn intersect_with(&mut self, other: &DominanceBitset) -> bool {
        let (old_first, old_last) = match self.range() {
            Some(range) => range,
            None => return false,
        };

        let (mut first, mut last) = match other.range() {
            Some((first, last)) => (old_first.max(first), old_last.min(last)),
            None => (usize::MAX, 0),
        };

        while first <= last && self.words[first] & other.words[first] == 0 {
            first += 1;
        }
        while first <= last && self.words[last] & other.words[last] == 0 {
            last -= 1;
        }

        if first > last {
            self.clear();
            return false;
        }

        self.words[old_first..first].iter_mut().for_each(|word| *word = 0);
        self.words[last + 1..=old_last].iter_mut().for_each(|word| *word = 0);
        self.words[first..=last].iter_mut().zip(other.words[first..=last].iter()).for_each(|(word, other)| {
            *word &= *other;
        });

        self.first = first;
        self.last = last;

        true
    }

    /// Checks whether both bitsets have at least one common bit.
    pub fn intersects(&self, other: &DominanceBitset) -> bool {
        match (self.range(), other.range()) {
            (Some((first, last)), Some((other_first, other_last))) => {
                let (first, last) = (first.max(other_first), last.min(other_last));
                (first..=last).any(|index| self.words[index] & other.words[index] != 0)
            }
            _ => false,
        }
    }

    /// Iterates over set bits in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        let (first, last) = self.range().unwrap_or((1, 0));

        (first..=last).flat_map(move |index| {
            let mut word = self.words[index];
            std::iter::from_fn(move || {
                if word == 0 {
                    return None;
                }

                let bit = word.trailing_zeros() as usize;
                word &= word - 1;

                Some(index * WORD_SIZE + bit)
            })
        })
    }

    fn materialize(&mut self, total_words: usize) {
        if self.words.len() < total_words {
            self.words.resize(total_words, 0);
        }
    }

    fn compact(&mut self) {
        let (mut first, mut last) = (self.first, self.last);

        while first <= last && self.words[first] == 0 {
            first += 1;
        }
        while first <= last && self.words[last] == 0 {
            last -= 1;
        }

        if first > last {
            self.first = usize::MAX;
            self.last = 0;
        } else {
            self.first = first;
            self.last = last;
        }
    }
}
