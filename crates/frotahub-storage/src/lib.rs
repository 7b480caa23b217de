// SPDX-FileCopyrightText: 2026 Frotahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for Frotahub.
//!
//! Submissions, the service-center roster, and key-value settings live in one
//! database file. All access funnels through a single tokio-rusqlite
//! connection; [`SqliteStore`] exposes the whole surface behind the
//! `SubmissionStore` trait.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStore;
pub use database::Database;
