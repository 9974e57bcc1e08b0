// Copyright 2025 Classwatch Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Event kinds and the listener seam.
//!
//! The pipeline never delivers events itself; woven bytecode does, at
//! runtime, through whatever dispatch layer the host wires up. Here the
//! listener only serves two purposes: it selects which event kinds the
//! weaver should emit hooks for, and it acts as the identity key for
//! listener-id allocation.

use serde::{Deserialize, Serialize};

/// Kinds of observability events woven bytecode can emit.
///
/// Fixed at registration time; the weaver receives the full selection and
/// only emits hooks for the kinds listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Method body entered.
    Before,
    /// Method body returning normally.
    Return,
    /// Method body unwinding with an exception.
    Throws,
    /// A source line is about to execute.
    Line,
    /// An outgoing call site is about to be invoked.
    CallBefore,
    /// An outgoing call site returned normally.
    CallReturn,
    /// An outgoing call site threw.
    CallThrows,
    /// A forced early return injected by a listener.
    ImmediatelyReturn,
    /// A forced throw injected by a listener.
    ImmediatelyThrows,
}

impl EventKind {
    /// The entry/exit/exception triple most registrations subscribe to.
    pub const BASIC: [EventKind; 3] = [EventKind::Before, EventKind::Return, EventKind::Throws];
}

/// Opaque sink for woven events.
///
/// The transform pipeline holds listeners only as identity keys; delivery
/// happens elsewhere. Implementations must tolerate calls from any thread
/// the host loads classes on.
pub trait EventListener: Send + Sync {}
