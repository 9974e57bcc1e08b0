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

//! Bytecode weaving seam.

use std::borrow::Cow;
use std::collections::BTreeSet;

use crate::error::WeaveError;
use crate::event::EventKind;
use crate::loader::LoaderRef;

/// Rewrites class-file buffers so the selected behaviors emit events.
pub trait BytecodeWeaver: Send + Sync {
    /// Weave event hooks into `bytecode` for every behavior in
    /// `sign_codes`, routing emitted events to `listener_id` inside
    /// `namespace`, restricted to the given event kinds.
    ///
    /// Returning `Cow::Borrowed` signals that nothing needed to change;
    /// `Cow::Owned` carries a new, well-formed buffer. A weaver must never
    /// return an owned copy of an unchanged buffer: the caller treats the
    /// variant itself as the no-op signal.
    fn weave<'a>(
        &self,
        loader: Option<&LoaderRef>,
        bytecode: &'a [u8],
        sign_codes: &BTreeSet<String>,
        namespace: &str,
        listener_id: i32,
        event_kinds: &[EventKind],
    ) -> Result<Cow<'a, [u8]>, WeaveError>;
}
