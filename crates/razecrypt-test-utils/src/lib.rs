// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Razecrypt integration tests.
//!
//! # Components
//!
//! - [`MockStore`] - In-memory document store with raw-document access
//! - [`TestHarness`] - SQLite store in a temp directory plus a fast codec
//! - [`fixtures`] - Cheap key derivation and owner helpers

pub mod fixtures;
pub mod harness;
pub mod mock_store;

pub use fixtures::{owner, test_codec};
pub use harness::TestHarness;
pub use mock_store::MockStore;
