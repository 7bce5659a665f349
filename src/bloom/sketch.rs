// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::bloom::BloomFilterBuilder;
use crate::error::Error;
use crate::hash::hash_bytes;

// Finalizer applied to the base hash to derive the probe stride.
const STRIDE_XOR: u64 = 0x8E3C5B2F1A0D9E74;
const STRIDE_MUL: u64 = 0x9E3779B97F4A7C15;

/// A Bloom filter for probabilistic set membership testing.
///
/// Provides fast membership queries with:
/// - No false negatives (inserted items always return `true`)
/// - Tunable false positive rate
/// - Constant space usage
///
/// The filter is a plain value. Mutating methods take `&mut self`; sharing one filter between
/// writers requires external synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloomFilter {
    /// Total number of bits in the filter (m)
    num_bits: u64,
    /// Number of probes per item (k)
    num_hashes: u64,
    /// Count of bits set to 1
    num_bits_set: u64,
    /// Bit array packed into u64 words
    /// Length = ceil(num_bits / 64)
    bit_array: Vec<u64>,
}

impl BloomFilter {
    /// Creates an empty filter with exactly `num_bits` bits and `num_hashes` probes per item.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument) if
    /// either argument is 0.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilter;
    /// let filter = BloomFilter::new(10_000, 7).unwrap();
    /// assert_eq!(filter.num_bits(), 10_000);
    /// assert_eq!(filter.num_hashes(), 7);
    ///
    /// assert!(BloomFilter::new(0, 7).is_err());
    /// ```
    pub fn new(num_bits: u64, num_hashes: u64) -> Result<Self, Error> {
        BloomFilterBuilder::with_size(num_bits, num_hashes).build()
    }

    /// Creates an empty filter sized for `max_items` distinct items at false positive
    /// probability `fpp`.
    ///
    /// See [`calc_params`](crate::bloom::calc_params) for the sizing formulas.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument) if
    /// `max_items` is 0 or `fpp` is not in (0.0, 1.0).
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilter;
    /// let filter = BloomFilter::with_fpr(1000, 0.01).unwrap();
    /// assert_eq!(filter.num_bits(), 9586);
    /// assert_eq!(filter.num_hashes(), 7);
    /// ```
    pub fn with_fpr(max_items: u64, fpp: f64) -> Result<Self, Error> {
        BloomFilterBuilder::with_accuracy(max_items, fpp).build()
    }

    /// `bit_array` must be zeroed and hold `ceil(num_bits / 64)` words.
    pub(super) fn from_parts(num_bits: u64, num_hashes: u64, bit_array: Vec<u64>) -> Self {
        BloomFilter {
            num_bits,
            num_hashes,
            num_bits_set: 0,
            bit_array,
        }
    }

    // ========================================================================
    // Query Operations
    // ========================================================================

    /// Tests whether an item is possibly in the set.
    ///
    /// Returns:
    /// - `true`: Item was **possibly** inserted (or false positive)
    /// - `false`: Item was **definitely not** inserted
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilter;
    /// let mut filter = BloomFilter::with_fpr(100, 0.01).unwrap();
    /// filter.insert("apple");
    ///
    /// assert!(filter.contains("apple")); // true - was inserted
    /// assert!(!filter.contains("grape")); // false - never inserted (probably)
    /// ```
    pub fn contains(&self, item: impl AsRef<[u8]>) -> bool {
        if self.is_empty() {
            return false;
        }

        let (h1, h2) = compute_hashes(item.as_ref());
        self.check_bits(h1, h2)
    }

    /// Tests and inserts an item in a single operation.
    ///
    /// Returns whether the item was possibly already in the set before insertion.
    /// The item is hashed once instead of twice.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilter;
    /// let mut filter = BloomFilter::with_fpr(100, 0.01).unwrap();
    ///
    /// assert!(!filter.contains_and_insert(42_u64.to_le_bytes()));
    /// assert!(filter.contains_and_insert(42_u64.to_le_bytes()));
    /// ```
    pub fn contains_and_insert(&mut self, item: impl AsRef<[u8]>) -> bool {
        let (h1, h2) = compute_hashes(item.as_ref());
        let was_present = self.check_bits(h1, h2);
        self.set_bits(h1, h2);
        was_present
    }

    // ========================================================================
    // Update Operations
    // ========================================================================

    /// Inserts an item into the filter.
    ///
    /// After insertion, `contains(item)` will always return `true`. Inserting the same item
    /// again leaves the filter unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilter;
    /// let mut filter = BloomFilter::with_fpr(100, 0.01).unwrap();
    ///
    /// filter.insert("apple");
    /// filter.insert(b"raw bytes");
    /// filter.insert(42_u64.to_le_bytes());
    ///
    /// assert!(filter.contains("apple"));
    /// ```
    pub fn insert(&mut self, item: impl AsRef<[u8]>) {
        let (h1, h2) = compute_hashes(item.as_ref());
        self.set_bits(h1, h2);
    }

    /// Resets every bit to zero, keeping the size and probe count.
    ///
    /// Returns the filter itself so calls can be chained.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilter;
    /// let mut filter = BloomFilter::with_fpr(100, 0.01).unwrap();
    /// filter.insert("apple");
    ///
    /// filter.clear().insert("pear");
    /// assert!(!filter.contains("apple"));
    /// assert!(filter.contains("pear"));
    /// ```
    pub fn clear(&mut self) -> &mut Self {
        self.bit_array.fill(0);
        self.num_bits_set = 0;
        self
    }

    // ========================================================================
    // Set Operations
    // ========================================================================

    /// Merges another filter into this one via bitwise OR (union).
    ///
    /// After merging, this filter will recognize items from either filter
    /// (plus any false positives from either).
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::SizeMismatch`](crate::error::ErrorKind::SizeMismatch) or
    /// [`ErrorKind::HashCountMismatch`](crate::error::ErrorKind::HashCountMismatch) when the
    /// filters are not compatible. This filter is left unchanged in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilter;
    /// let mut f1 = BloomFilter::with_fpr(100, 0.01).unwrap();
    /// let mut f2 = BloomFilter::with_fpr(100, 0.01).unwrap();
    ///
    /// f1.insert("a");
    /// f2.insert("b");
    ///
    /// f1.union(&f2).unwrap();
    /// assert!(f1.contains("a"));
    /// assert!(f1.contains("b"));
    /// ```
    pub fn union(&mut self, other: &BloomFilter) -> Result<(), Error> {
        self.check_compatible(other)?;

        for (word, other_word) in self.bit_array.iter_mut().zip(&other.bit_array) {
            *word |= *other_word;
        }

        self.recount_bits_set();
        Ok(())
    }

    /// Intersects this filter with another via bitwise AND.
    ///
    /// After intersection, this filter will recognize items present in both filters. False
    /// positives of either filter may carry over, so the result over-approximates the true
    /// intersection.
    ///
    /// # Errors
    ///
    /// Fails when the filters are not compatible, leaving this filter unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilter;
    /// let mut f1 = BloomFilter::with_fpr(100, 0.01).unwrap();
    /// let mut f2 = BloomFilter::with_fpr(100, 0.01).unwrap();
    ///
    /// f1.insert("a");
    /// f1.insert("b");
    /// f2.insert("b");
    /// f2.insert("c");
    ///
    /// f1.intersect(&f2).unwrap();
    /// assert!(f1.contains("b")); // In both
    /// // "a" and "c" likely return false now
    /// ```
    pub fn intersect(&mut self, other: &BloomFilter) -> Result<(), Error> {
        self.check_compatible(other)?;

        for (word, other_word) in self.bit_array.iter_mut().zip(&other.bit_array) {
            *word &= *other_word;
        }

        self.recount_bits_set();
        Ok(())
    }

    /// Tests whether every bit set in `other` is also set in this filter.
    ///
    /// A `true` result means `other` is (probably) a subset of this filter's set.
    ///
    /// # Errors
    ///
    /// Fails when the filters are not compatible; the bits are not compared in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilter;
    /// let mut big = BloomFilter::new(1024, 4).unwrap();
    /// let mut small = BloomFilter::new(1024, 4).unwrap();
    ///
    /// big.insert("a");
    /// big.insert("b");
    /// small.insert("a");
    ///
    /// assert!(big.is_superset(&small).unwrap());
    /// assert!(!small.is_superset(&big).unwrap());
    /// ```
    pub fn is_superset(&self, other: &BloomFilter) -> Result<bool, Error> {
        self.check_compatible(other)?;

        Ok(self
            .bit_array
            .iter()
            .zip(&other.bit_array)
            .all(|(word, other_word)| (word & other_word) == *other_word))
    }

    /// Checks whether two filters can be combined.
    ///
    /// Filters are compatible if they have the same number of bits and the same number of
    /// hash probes. A size mismatch is reported first when both differ.
    pub fn check_compatible(&self, other: &BloomFilter) -> Result<(), Error> {
        if self.num_bits != other.num_bits {
            return Err(Error::size_mismatch(self.num_bits, other.num_bits));
        }
        if self.num_hashes != other.num_hashes {
            return Err(Error::hash_count_mismatch(
                self.num_hashes,
                other.num_hashes,
            ));
        }
        Ok(())
    }

    /// Returns whether [`check_compatible`](Self::check_compatible) succeeds.
    pub fn is_compatible(&self, other: &BloomFilter) -> bool {
        self.check_compatible(other).is_ok()
    }

    // ========================================================================
    // Statistics and Properties
    // ========================================================================

    /// Returns whether the filter is empty (no bit set).
    pub fn is_empty(&self) -> bool {
        self.num_bits_set == 0
    }

    /// Returns the number of bits set to 1.
    pub fn bits_used(&self) -> u64 {
        self.num_bits_set
    }

    /// Returns the number of bits still set to 0.
    pub fn count_zero_bits(&self) -> u64 {
        self.num_bits - self.num_bits_set
    }

    /// Returns the total number of bits in the filter (m).
    pub fn num_bits(&self) -> u64 {
        self.num_bits
    }

    /// Returns the number of hash probes per item (k).
    pub fn num_hashes(&self) -> u64 {
        self.num_hashes
    }

    /// Returns the current load factor (fraction of bits set).
    ///
    /// Values near 0.5 indicate the filter is approaching saturation.
    pub fn load_factor(&self) -> f64 {
        self.num_bits_set as f64 / self.num_bits as f64
    }

    /// Estimates the current false positive probability from the observed load.
    ///
    /// A non-member is reported present when all k probes land on set bits, so the estimate is
    /// `load^k`. This assumes uniform bit distribution.
    pub fn estimated_fpp(&self) -> f64 {
        self.load_factor().powf(self.num_hashes as f64)
    }

    /// Estimates the number of distinct items inserted.
    ///
    /// Uses the Swamidass-Baldi estimator `-(m / k) * ln(x / m)` where `x` is the number of
    /// zero bits. A saturated filter (`x == 0`) is evaluated at `x = 1`, which yields
    /// `(m / k) * ln(m)`, the largest estimate this filter can report.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilter;
    /// let mut filter = BloomFilter::with_fpr(1000, 0.01).unwrap();
    /// assert_eq!(filter.approximate_cardinality(), 0);
    ///
    /// for i in 0..500_u64 {
    ///     filter.insert(i.to_le_bytes());
    /// }
    /// let estimate = filter.approximate_cardinality();
    /// assert!(estimate > 450 && estimate < 550);
    /// ```
    pub fn approximate_cardinality(&self) -> u64 {
        let m = self.num_bits as f64;
        let k = self.num_hashes as f64;
        let x = self.count_zero_bits().max(1) as f64;

        let estimate = -(m / k) * (x / m).ln();
        // ln(x / m) <= 0, so the estimate is never negative; `as` truncates toward zero.
        estimate as u64
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    /// Checks if all k bits are set for the given hash values.
    fn check_bits(&self, h1: u64, h2: u64) -> bool {
        (0..self.num_hashes).all(|i| self.get_bit(self.compute_bit_index(h1, h2, i)))
    }

    /// Sets all k bits for the given hash values.
    fn set_bits(&mut self, h1: u64, h2: u64) {
        for i in 0..self.num_hashes {
            let bit_index = self.compute_bit_index(h1, h2, i);
            self.set_bit(bit_index);
        }
    }

    /// Computes a bit index using double hashing (Kirsch-Mitzenmacher).
    /// Formula: (h1 + i * h2) mod num_bits
    fn compute_bit_index(&self, h1: u64, h2: u64, i: u64) -> u64 {
        h1.wrapping_add(i.wrapping_mul(h2)) % self.num_bits
    }

    fn get_bit(&self, bit_index: u64) -> bool {
        let word_index = (bit_index / 64) as usize;
        let mask = 1u64 << (bit_index % 64);
        (self.bit_array[word_index] & mask) != 0
    }

    /// Sets a single bit and updates the count if it wasn't already set.
    fn set_bit(&mut self, bit_index: u64) {
        let word_index = (bit_index / 64) as usize;
        let mask = 1u64 << (bit_index % 64);

        if (self.bit_array[word_index] & mask) == 0 {
            self.bit_array[word_index] |= mask;
            self.num_bits_set += 1;
        }
    }

    fn recount_bits_set(&mut self) {
        self.num_bits_set = self
            .bit_array
            .iter()
            .map(|word| u64::from(word.count_ones()))
            .sum();
    }
}

/// Derives the two base hashes for double hashing from a single 64-bit hash.
fn compute_hashes(data: &[u8]) -> (u64, u64) {
    let h1 = hash_bytes(data);
    let mut h2 = h1 ^ STRIDE_XOR;
    h2 = h2.wrapping_mul(STRIDE_MUL);
    h2 ^= h2 >> 33;
    (h1, h2)
}

// ============================================================================
// Tests
// ============================================================================
