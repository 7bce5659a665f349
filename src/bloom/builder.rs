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

use super::BloomFilter;
use crate::error::Error;

const MIN_NUM_BITS: u64 = 1;
const MIN_NUM_HASHES: u64 = 1;

/// Builder for creating [`BloomFilter`] instances.
///
/// Provides two construction modes:
/// - [`with_accuracy()`](Self::with_accuracy): Specify target items and false positive rate
///   (recommended)
/// - [`with_size()`](Self::with_size): Specify exact bit count and hash functions (manual)
///
/// Parameters are validated by [`build()`](Self::build).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomFilterBuilder {
    sizing: Sizing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Sizing {
    Accuracy { max_items: u64, fpp: f64 },
    Size { num_bits: u64, num_hashes: u64 },
}

impl BloomFilterBuilder {
    /// Creates a builder with optimal parameters for a target accuracy.
    ///
    /// The number of bits and hash functions are derived with [`calc_params`] when the
    /// filter is built.
    ///
    /// # Arguments
    ///
    /// - `max_items`: Maximum expected number of distinct items
    /// - `fpp`: Target false positive probability (e.g., 0.01 for 1%)
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilterBuilder;
    /// // Optimal for 10,000 items with 1% FPP
    /// let filter = BloomFilterBuilder::with_accuracy(10_000, 0.01).build().unwrap();
    /// assert_eq!(filter.num_hashes(), 7);
    /// ```
    pub fn with_accuracy(max_items: u64, fpp: f64) -> Self {
        BloomFilterBuilder {
            sizing: Sizing::Accuracy { max_items, fpp },
        }
    }

    /// Creates a builder with manual size specification.
    ///
    /// Use this when you want precise control over the filter size,
    /// or when working with pre-calculated parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilterBuilder;
    /// let filter = BloomFilterBuilder::with_size(10_000, 7).build().unwrap();
    /// assert_eq!(filter.num_bits(), 10_000);
    /// ```
    pub fn with_size(num_bits: u64, num_hashes: u64) -> Self {
        BloomFilterBuilder {
            sizing: Sizing::Size {
                num_bits,
                num_hashes,
            },
        }
    }

    /// Builds the Bloom filter.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument) if:
    /// - `max_items` is 0 or `fpp` is not in (0.0, 1.0)
    /// - `num_bits` or `num_hashes` is 0
    /// - the bit array would not be addressable on this platform, or cannot be allocated
    pub fn build(self) -> Result<BloomFilter, Error> {
        let (num_bits, num_hashes) = match self.sizing {
            Sizing::Accuracy { max_items, fpp } => calc_params(max_items, fpp)?,
            Sizing::Size {
                num_bits,
                num_hashes,
            } => (num_bits, num_hashes),
        };

        if num_bits < MIN_NUM_BITS {
            return Err(Error::invalid_argument(format!(
                "num_bits must be at least {MIN_NUM_BITS}"
            ))
            .with_context("num_bits", num_bits));
        }
        if num_hashes < MIN_NUM_HASHES {
            return Err(Error::invalid_argument(format!(
                "num_hashes must be at least {MIN_NUM_HASHES}"
            ))
            .with_context("num_hashes", num_hashes));
        }

        let num_words = usize::try_from(num_bits.div_ceil(64)).map_err(|err| {
            Error::invalid_argument("num_bits exceeds the addressable size")
                .with_context("num_bits", num_bits)
                .set_source(err)
        })?;

        let mut bit_array = Vec::new();
        bit_array.try_reserve_exact(num_words).map_err(|err| {
            Error::invalid_argument("failed to allocate the bit array")
                .with_context("num_bits", num_bits)
                .set_source(err)
        })?;
        bit_array.resize(num_words, 0u64);

        Ok(BloomFilter::from_parts(num_bits, num_hashes, bit_array))
    }

    // ========================================================================
    // Static Suggestion Methods
    // ========================================================================

    /// Suggests the number of bits given max items and target FPP.
    ///
    /// Formula: `m = ceil(-n * ln(p) / (ln(2)^2))`
    /// where n = max_items, p = fpp
    ///
    /// The inputs are not validated; see [`calc_params`] for the checked version.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilterBuilder;
    /// let bits = BloomFilterBuilder::suggest_num_bits(1000, 0.01);
    /// assert_eq!(bits, 9586);
    /// ```
    pub fn suggest_num_bits(max_items: u64, fpp: f64) -> u64 {
        exact_num_bits(max_items, fpp).ceil() as u64
    }

    /// Suggests the number of hash functions given max items and bit count.
    ///
    /// Formula: `k = ceil((m/n) * ln(2))`
    /// where m = num_bits, n = max_items
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomfilter::bloom::BloomFilterBuilder;
    /// let hashes = BloomFilterBuilder::suggest_num_hashes(1000, 9586);
    /// assert_eq!(hashes, 7); // 6.64 rounded up
    /// ```
    pub fn suggest_num_hashes(max_items: u64, num_bits: u64) -> u64 {
        let m = num_bits as f64;
        let n = max_items as f64;
        (std::f64::consts::LN_2 * m / n).ceil() as u64
    }
}

fn exact_num_bits(max_items: u64, fpp: f64) -> f64 {
    let n = max_items as f64;
    let ln2_squared = std::f64::consts::LN_2 * std::f64::consts::LN_2;
    -n * fpp.ln() / ln2_squared
}

/// Derives the bit count and hash count for `max_items` items at false positive
/// probability `fpp`.
///
/// Both values are rounded up, so the filter is never smaller or less hashed than the target
/// rate requires:
/// - `m = ceil(-n * ln(p) / (ln(2)^2))`
/// - `k = ceil(ln(2) * m / n)`
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument) if
/// `max_items` is 0, `fpp` is not in (0.0, 1.0), or the bit count does not fit in a `u64`.
///
/// # Examples
///
/// ```
/// # use bloomfilter::bloom::calc_params;
/// let (m, k) = calc_params(1000, 0.01).unwrap();
/// assert_eq!((m, k), (9586, 7));
/// ```
pub fn calc_params(max_items: u64, fpp: f64) -> Result<(u64, u64), Error> {
    if max_items == 0 {
        return Err(Error::invalid_argument("max_items must be greater than 0"));
    }
    if !(fpp > 0.0 && fpp < 1.0) {
        return Err(
            Error::invalid_argument("fpp must be between 0.0 and 1.0 (exclusive)")
                .with_context("fpp", fpp),
        );
    }

    // u64::MAX as f64 rounds up to 2^64, which no u64 holds.
    let exact = exact_num_bits(max_items, fpp);
    if !(exact.is_finite() && exact < u64::MAX as f64) {
        return Err(Error::invalid_argument("num_bits does not fit in a u64")
            .with_context("max_items", max_items)
            .with_context("fpp", fpp));
    }

    let num_bits = exact.ceil() as u64;
    let num_hashes = BloomFilterBuilder::suggest_num_hashes(max_items, num_bits);
    Ok((num_bits, num_hashes))
}
