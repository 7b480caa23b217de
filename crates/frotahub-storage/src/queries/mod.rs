// SPDX-FileCopyrightText: 2026 Frotahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules, one per storage concern.
//!
//! All functions take `&Database` and run through the single writer thread.

pub mod roster;
pub mod settings;
pub mod submissions;
