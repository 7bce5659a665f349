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

use std::hash::Hasher;

const DEFAULT_SEED: u64 = 0;

// Unsigned 64-bit primes from xxhash64.
const P1: u64 = 0x9E3779B185EBCA87;
const P2: u64 = 0xC2B2AE3D27D4EB4F;
const P3: u64 = 0x165667B19E3779F9;
const P4: u64 = 0x85EBCA77C2B2AE63;
const P5: u64 = 0x27D4EB2F165667C5;

const STRIPE_LEN: usize = 32;

/// Streaming XXH64.
///
/// Input is consumed in 32 byte stripes across four lanes; whatever does not fill a stripe
/// waits in `buffer` until more bytes arrive or the hash is finished.
#[derive(Debug, Clone)]
pub struct XxHash64 {
    seed: u64,
    total_len: u64,
    lanes: [u64; 4],
    buffer: [u8; STRIPE_LEN],
    buffer_len: usize,
}

impl XxHash64 {
    /// Creates a hasher with the given seed.
    pub(crate) fn with_seed(seed: u64) -> Self {
        XxHash64 {
            seed,
            total_len: 0,
            lanes: [
                seed.wrapping_add(P1).wrapping_add(P2),
                seed.wrapping_add(P2),
                seed,
                seed.wrapping_sub(P1),
            ],
            buffer: [0; STRIPE_LEN],
            buffer_len: 0,
        }
    }

    /// Returns the hash of all bytes written so far.
    pub(crate) fn finish64(&self) -> u64 {
        let mut hash = if self.total_len >= STRIPE_LEN as u64 {
            let [v1, v2, v3, v4] = self.lanes;
            let mut acc = v1
                .rotate_left(1)
                .wrapping_add(v2.rotate_left(7))
                .wrapping_add(v3.rotate_left(12))
                .wrapping_add(v4.rotate_left(18));
            for lane in self.lanes {
                acc = merge_round(acc, lane);
            }
            acc
        } else {
            self.seed.wrapping_add(P5)
        };

        hash = hash.wrapping_add(self.total_len);

        let mut tail = &self.buffer[..self.buffer_len];
        while tail.len() >= 8 {
            hash ^= round(0, super::read_u64_le(tail));
            hash = hash.rotate_left(27).wrapping_mul(P1).wrapping_add(P4);
            tail = &tail[8..];
        }

        if tail.len() >= 4 {
            hash ^= u64::from(super::read_u32_le(tail)).wrapping_mul(P1);
            hash = hash.rotate_left(23).wrapping_mul(P2).wrapping_add(P3);
            tail = &tail[4..];
        }

        for &byte in tail {
            hash ^= u64::from(byte).wrapping_mul(P5);
            hash = hash.rotate_left(11).wrapping_mul(P1);
        }

        avalanche(hash)
    }

    #[inline]
    fn consume_stripe(&mut self, stripe: &[u8]) {
        for (lane, word) in self.lanes.iter_mut().zip(stripe.chunks_exact(8)) {
            *lane = round(*lane, super::read_u64_le(word));
        }
    }
}

impl Default for XxHash64 {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

impl Hasher for XxHash64 {
    fn finish(&self) -> u64 {
        self.finish64()
    }

    fn write(&mut self, bytes: &[u8]) {
        self.total_len = self.total_len.wrapping_add(bytes.len() as u64);

        if self.buffer_len + bytes.len() < STRIPE_LEN {
            self.buffer[self.buffer_len..self.buffer_len + bytes.len()].copy_from_slice(bytes);
            self.buffer_len += bytes.len();
            return;
        }

        let mut bytes = bytes;

        if self.buffer_len != 0 {
            let needed = STRIPE_LEN - self.buffer_len;
            self.buffer[self.buffer_len..].copy_from_slice(&bytes[..needed]);
            let stripe = self.buffer;
            self.consume_stripe(&stripe);
            self.buffer_len = 0;
            bytes = &bytes[needed..];
        }

        let mut stripes = bytes.chunks_exact(STRIPE_LEN);
        for stripe in &mut stripes {
            self.consume_stripe(stripe);
        }

        let remainder = stripes.remainder();
        self.buffer[..remainder.len()].copy_from_slice(remainder);
        self.buffer_len = remainder.len();
    }
}

#[inline]
fn round(acc: u64, input: u64) -> u64 {
    acc.wrapping_add(input.wrapping_mul(P2))
        .rotate_left(31)
        .wrapping_mul(P1)
}

#[inline]
fn merge_round(acc: u64, lane: u64) -> u64 {
    (acc ^ round(0, lane)).wrapping_mul(P1).wrapping_add(P4)
}

#[inline]
fn avalanche(mut hash: u64) -> u64 {
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(P2);
    hash ^= hash >> 29;
    hash = hash.wrapping_mul(P3);
    hash ^ (hash >> 32)
}
