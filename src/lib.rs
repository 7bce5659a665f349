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

//! # Bloom filter
//!
//! A fixed-size Bloom filter: approximate set membership with no false negatives and a
//! tunable false positive rate, meant to sit in front of an expensive exact lookup.
//!
//! Besides insertion and queries, filters support union, intersection, a subset test and an
//! estimate of how many distinct items were inserted. See the [`bloom`] module.
//!
//! Filters are not internally synchronized; share them across threads behind a lock.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

pub mod bloom;
pub mod error;

mod hash;
