// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Scoring: how matches turn into numbers.

pub mod core;

pub use self::core::*;
