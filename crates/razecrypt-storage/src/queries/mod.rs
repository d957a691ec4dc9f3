// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query functions over the [`Database`](crate::database::Database).

pub mod records;
