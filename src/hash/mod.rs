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

//! The hashing primitive behind probe generation.

mod xxhash;

use byteorder::ByteOrder;
use byteorder::LittleEndian;

pub(crate) use self::xxhash::XxHash64;

/// Hashes a byte string with 64-bit xxHash and seed 0.
///
/// The seed is fixed so that filters built in different processes over the same elements
/// produce identical bit arrays and can be merged.
pub(crate) fn hash_bytes(data: &[u8]) -> u64 {
    use std::hash::Hasher;

    let mut hasher = XxHash64::default();
    hasher.write(data);
    hasher.finish64()
}

/// Reads an u64 from the first 8 bytes of a slice in little-endian order.
///
/// # Panics
///
/// Panics if `bytes.len()` is less than 8.
fn read_u64_le(bytes: &[u8]) -> u64 {
    LittleEndian::read_u64(bytes)
}

/// Reads an u32 from the first 4 bytes of a slice in little-endian order.
///
/// # Panics
///
/// Panics if `bytes.len()` is less than 4.
fn read_u32_le(bytes: &[u8]) -> u32 {
    LittleEndian::read_u32(bytes)
}
