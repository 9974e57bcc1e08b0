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

//! Classwatch Transform
//!
//! The decision pipeline that runs on every class-definition event of an
//! observed host process. For each candidate class it filters out the
//! machinery's own classes, gates bootstrap classes behind the unsafe
//! flag, delegates to structural matching and bytecode weaving, detects
//! weaver no-ops, and accounts the impact — all without ever letting a
//! failure escape onto the host's class-loading path.

pub mod affect;
pub mod object_ids;
pub mod transformer;

pub use affect::{AffectSnapshot, AffectStatistic};
pub use object_ids::ObjectIdRegistry;
pub use transformer::{ClassTransformer, TransformerConfig, RESERVED_CLASS_PREFIX};
