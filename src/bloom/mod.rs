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

//! Bloom Filter implementation for probabilistic set membership testing.
//!
//! A Bloom filter is a space-efficient probabilistic data structure used to test whether
//! an element is a member of a set. False positive matches are possible, but false negatives
//! are not. In other words, a query returns either "possibly in set" or "definitely not in set".
//!
//! # Properties
//!
//! - **No false negatives**: If an item was inserted, `contains()` will always return `true`
//! - **Possible false positives**: `contains()` may return `true` for items never inserted
//! - **Fixed size**: the bit array never grows; inserting more items than planned raises the
//!   false positive rate
//! - **No deletion**: bits are only ever set, except by [`BloomFilter::clear`] and
//!   [`BloomFilter::intersect`]
//!
//! # Usage
//!
//! ```rust
//! use bloomfilter::bloom::BloomFilter;
//!
//! // Create a filter optimized for 1000 items with 1% false positive rate
//! let mut filter = BloomFilter::with_fpr(1000, 0.01).unwrap();
//!
//! // Insert items
//! filter.insert("apple");
//! filter.insert("banana");
//! filter.insert(42_u64.to_le_bytes());
//!
//! // Check membership
//! assert!(filter.contains("apple")); // true - definitely inserted
//! assert!(!filter.contains("grape")); // false - never inserted (probably)
//!
//! // Get statistics
//! println!("Capacity: {} bits", filter.num_bits());
//! println!("Zero bits: {}", filter.count_zero_bits());
//! println!("Est. items: {}", filter.approximate_cardinality());
//! ```
//!
//! # Creating Filters
//!
//! ## By Accuracy (Recommended)
//!
//! Calculates size and hash count from the expected number of items:
//!
//! ```rust
//! # use bloomfilter::bloom::BloomFilterBuilder;
//! let filter = BloomFilterBuilder::with_accuracy(
//!     10_000, // Expected max items
//!     0.01,   // Target false positive probability (1%)
//! )
//! .build()
//! .unwrap();
//! ```
//!
//! ## By Size (Manual)
//!
//! ```rust
//! # use bloomfilter::bloom::BloomFilter;
//! let filter = BloomFilter::new(
//!     95_851, // Number of bits
//!     7,      // Number of hash functions
//! )
//! .unwrap();
//! ```
//!
//! # Set Operations
//!
//! Filters with the same number of bits and hash functions can be combined with
//! [`BloomFilter::union`] and [`BloomFilter::intersect`], and compared with
//! [`BloomFilter::is_superset`]. Filters that differ are rejected with
//! [`ErrorKind::SizeMismatch`](crate::error::ErrorKind::SizeMismatch) or
//! [`ErrorKind::HashCountMismatch`](crate::error::ErrorKind::HashCountMismatch) before any bit
//! is touched.
//!
//! # Hashing
//!
//! Items are byte strings. Each item is hashed once with 64-bit xxHash (seed 0); the `k` probe
//! positions are derived from that hash and a mixed copy of it by double hashing
//! (Kirsch-Mitzenmacher): `(h1 + i * h2) mod m`. The hash is stable across processes, so
//! filters built independently over the same items have identical bits.

mod builder;
mod sketch;

pub use self::builder::BloomFilterBuilder;
pub use self::builder::calc_params;
pub use self::sketch::BloomFilter;
