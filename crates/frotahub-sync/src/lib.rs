// SPDX-FileCopyrightText: 2026 Frotahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote synchronization for Frotahub.
//!
//! [`HttpTransport`] is the thin wire adapter; [`SyncEngine`] owns the
//! queue-drain policy (single cycle, insertion order, stop on first failure)
//! and the periodic timers.

pub mod engine;
pub mod transport;

pub use engine::{CycleOutcome, SyncEngine, SyncState};
pub use transport::{endpoint_is_usable, HttpTransport};
