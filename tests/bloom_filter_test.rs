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

use bloomfilter::bloom::BloomFilter;
use bloomfilter::bloom::calc_params;
use bloomfilter::error::ErrorKind;
use googletest::assert_that;
use googletest::prelude::contains_substring;
use googletest::prelude::near;

const RELATIVE_ERROR_FOR_CARDINALITY: f64 = 0.2;

/// Xorshift generator so probe sets are reproducible between runs.
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn seeded(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

fn key(i: u64) -> String {
    format!("key-{i}")
}

#[test]
fn test_no_false_negatives() {
    for (num_bits, num_hashes) in [(1, 1), (7, 3), (64, 1), (1000, 5), (4096, 13)] {
        let mut filter = BloomFilter::new(num_bits, num_hashes).unwrap();
        let mut rng = XorShift64::seeded(num_bits + 17);
        let items: Vec<[u8; 8]> = (0..300).map(|_| rng.next_u64().to_le_bytes()).collect();

        for item in &items {
            filter.insert(item);
        }
        for item in &items {
            assert!(
                filter.contains(item),
                "false negative with m={num_bits} k={num_hashes}"
            );
        }
    }
}

#[test]
fn test_empty_filter_contains_nothing() {
    let filter = BloomFilter::with_fpr(100, 0.01).unwrap();
    assert!(filter.is_empty());
    assert!(!filter.contains(""));
    assert!(!filter.contains("apple"));
}

#[test]
fn test_insert_is_idempotent() {
    let mut once = BloomFilter::with_fpr(1000, 0.01).unwrap();
    once.insert("apple");

    let mut twice = once.clone();
    twice.insert("apple");

    assert_eq!(once, twice);
    assert_eq!(once.bits_used(), twice.bits_used());
}

#[test]
fn test_independent_filters_agree() {
    let mut f1 = BloomFilter::with_fpr(500, 0.02).unwrap();
    let mut f2 = BloomFilter::with_fpr(500, 0.02).unwrap();
    for i in 0..500 {
        f1.insert(key(i));
    }
    for i in (0..500).rev() {
        f2.insert(key(i));
    }
    assert_eq!(f1, f2);
}

#[test]
fn test_contains_and_insert() {
    let mut filter = BloomFilter::with_fpr(100, 0.01).unwrap();

    assert!(!filter.contains_and_insert("apple"));
    assert!(filter.contains_and_insert("apple"));
    assert!(filter.contains("apple"));
}

#[test]
fn test_clear_resets_to_empty() {
    let mut filter = BloomFilter::with_fpr(1000, 0.01).unwrap();
    for i in 0..100 {
        filter.insert(key(i));
    }
    assert!(!filter.is_empty());

    let num_bits = filter.num_bits();
    let num_hashes = filter.num_hashes();
    filter.clear();

    assert!(filter.is_empty());
    assert_eq!(filter.count_zero_bits(), num_bits);
    assert_eq!(filter.num_bits(), num_bits);
    assert_eq!(filter.num_hashes(), num_hashes);
    for i in 0..100 {
        assert!(!filter.contains(key(i)));
    }
    assert_eq!(filter, BloomFilter::with_fpr(1000, 0.01).unwrap());
}

#[test]
fn test_clear_is_chainable() {
    let mut filter = BloomFilter::new(512, 3).unwrap();
    filter.insert("old");

    filter.clear().insert("new");
    assert!(filter.contains("new"));
    assert!(!filter.contains("old"));
}

#[test]
fn test_calc_params_sanity() {
    let (m, k) = calc_params(1000, 0.01).unwrap();
    assert!(m > 1000);
    assert!(k >= 1);
    assert_eq!((m, k), (9586, 7));
}

#[test]
fn test_calc_params_rejects_invalid_input() {
    let err = calc_params(0, 0.01).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let err = calc_params(1000, 1.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_that!(err.message(), contains_substring("fpp must be between"));
}

#[test]
fn test_new_rejects_zero_parameters() {
    let err = BloomFilter::new(0, 3).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_that!(err.message(), contains_substring("num_bits"));

    let err = BloomFilter::new(100, 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_that!(err.message(), contains_substring("num_hashes"));
}

#[test]
fn test_oversized_filters_are_rejected() {
    let err = BloomFilter::new(u64::MAX, 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_that!(err.message(), contains_substring("allocate"));

    let err = BloomFilter::with_fpr(u64::MAX / 4, 1e-300).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_that!(err.message(), contains_substring("does not fit"));
}

#[test]
fn test_false_positive_rate() {
    let mut filter = BloomFilter::with_fpr(1000, 0.01).unwrap();
    for i in 0..1000 {
        filter.insert(key(i));
    }

    let mut rng = XorShift64::seeded(0x9E37_79B9_7F4A_7C15);
    let probes = 100_000;
    let false_positives = (0..probes)
        .filter(|_| filter.contains(format!("probe-{}", rng.next_u64())))
        .count();
    let rate = false_positives as f64 / probes as f64;

    assert!(rate > 0.001 && rate < 0.1, "false positive rate {rate}");
    let expected = filter.estimated_fpp();
    assert!(expected > 0.001 && expected < 0.1, "estimated fpp {expected}");
}

#[test]
fn test_union() {
    let mut f1 = BloomFilter::with_fpr(1000, 0.01).unwrap();
    let mut f2 = BloomFilter::with_fpr(1000, 0.01).unwrap();
    for i in 0..300 {
        f1.insert(key(i));
    }
    for i in 200..500 {
        f2.insert(key(i));
    }

    let before: Vec<bool> = (0..1000)
        .map(|i| f1.contains(key(i)) || f2.contains(key(i)))
        .collect();

    f1.union(&f2).unwrap();
    for (i, was_member) in before.into_iter().enumerate() {
        if was_member {
            assert!(f1.contains(key(i as u64)), "lost key {i} in union");
        }
    }
    assert!(f1.is_superset(&f2).unwrap());
}

#[test]
fn test_union_with_empty_is_noop() {
    let mut f1 = BloomFilter::new(2048, 4).unwrap();
    f1.insert("a");
    let snapshot = f1.clone();

    f1.union(&BloomFilter::new(2048, 4).unwrap()).unwrap();
    assert_eq!(f1, snapshot);
}

#[test]
fn test_intersect() {
    let mut f1 = BloomFilter::with_fpr(1000, 0.01).unwrap();
    let mut f2 = BloomFilter::with_fpr(1000, 0.01).unwrap();
    for i in 0..300 {
        f1.insert(key(i));
    }
    for i in 200..500 {
        f2.insert(key(i));
    }
    let bits_before = f1.bits_used();

    f1.intersect(&f2).unwrap();
    for i in 200..300 {
        assert!(f1.contains(key(i)));
    }
    assert!(f1.bits_used() < bits_before);
    assert!(f2.is_superset(&f1).unwrap());
}

#[test]
fn test_is_superset() {
    let mut a = BloomFilter::new(4096, 5).unwrap();
    let mut b = BloomFilter::new(4096, 5).unwrap();
    for i in 0..50 {
        a.insert(key(i));
    }
    for i in 0..10 {
        b.insert(key(i));
    }

    // reflexive
    assert!(a.is_superset(&a).unwrap());
    assert!(a.is_superset(&b).unwrap());
    assert!(!b.is_superset(&a).unwrap());

    a.clear();
    assert!(!a.is_superset(&b).unwrap());
    b.clear();
    assert!(a.is_superset(&b).unwrap());
}

#[test]
fn test_size_mismatch() {
    let mut f1 = BloomFilter::new(100, 3).unwrap();
    let f2 = BloomFilter::new(200, 3).unwrap();

    assert!(!f1.is_compatible(&f2));
    let err = f1.union(&f2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SizeMismatch);
    assert_that!(err.message(), contains_substring("mismatched sizes"));
    assert_eq!(err.context("num_bits"), Some("100"));
    assert_eq!(err.context("other_num_bits"), Some("200"));

    let err = f1.intersect(&f2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SizeMismatch);
    let err = f1.is_superset(&f2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SizeMismatch);
}

#[test]
fn test_hash_count_mismatch() {
    let mut f1 = BloomFilter::new(100, 3).unwrap();
    let f2 = BloomFilter::new(100, 5).unwrap();

    let err = f1.check_compatible(&f2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HashCountMismatch);

    let err = f1.union(&f2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HashCountMismatch);
    assert_that!(err.message(), contains_substring("mismatched hash counts"));

    let err = f1.intersect(&f2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HashCountMismatch);
    let err = f1.is_superset(&f2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HashCountMismatch);
}

#[test]
fn test_size_mismatch_reported_before_hash_count() {
    let f1 = BloomFilter::new(100, 3).unwrap();
    let f2 = BloomFilter::new(200, 5).unwrap();
    let err = f1.check_compatible(&f2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SizeMismatch);
}

#[test]
fn test_mismatch_leaves_filter_untouched() {
    let mut f1 = BloomFilter::new(128, 3).unwrap();
    f1.insert("a");
    let snapshot = f1.clone();

    let mut other = BloomFilter::new(128, 4).unwrap();
    other.insert("b");
    assert!(f1.union(&other).is_err());
    assert_eq!(f1, snapshot);

    let empty = BloomFilter::new(256, 3).unwrap();
    assert!(f1.intersect(&empty).is_err());
    assert_eq!(f1, snapshot);
    assert!(f1.contains("a"));
}

#[test]
fn test_count_zero_bits() {
    let mut filter = BloomFilter::new(100, 3).unwrap();
    assert_eq!(filter.count_zero_bits(), 100);

    filter.insert("a");
    let zero_bits = filter.count_zero_bits();
    assert!((97..100).contains(&zero_bits));
    assert_eq!(zero_bits + filter.bits_used(), 100);
}

#[test]
fn test_approximate_cardinality() {
    for (n, p) in [(500, 0.05), (1000, 0.01), (10_000, 0.001)] {
        let mut filter = BloomFilter::with_fpr(n, p).unwrap();
        assert_eq!(filter.approximate_cardinality(), 0);

        for i in 0..n {
            filter.insert(key(i));
        }

        let estimate = filter.approximate_cardinality() as f64;
        assert_that!(estimate, near(n as f64, RELATIVE_ERROR_FOR_CARDINALITY * n as f64));
    }
}

#[test]
fn test_approximate_cardinality_saturated() {
    let mut filter = BloomFilter::new(8, 2).unwrap();
    for i in 0..1000 {
        filter.insert(key(i));
    }

    assert_eq!(filter.count_zero_bits(), 0);
    assert_eq!(filter.approximate_cardinality(), (4.0 * 8.0_f64.ln()) as u64);
}

#[test]
fn test_statistics() {
    let mut filter = BloomFilter::new(1000, 5).unwrap();
    assert_eq!(filter.bits_used(), 0);
    assert_eq!(filter.load_factor(), 0.0);
    assert_eq!(filter.estimated_fpp(), 0.0);

    filter.insert("test");
    assert!(filter.bits_used() > 0);
    assert!(filter.load_factor() > 0.0);
    assert!(filter.estimated_fpp() > 0.0);
}

#[test]
fn test_filter_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BloomFilter>();
}
