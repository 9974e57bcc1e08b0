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

//! Classwatch Core
//!
//! Data model and collaborator seams for the class transform pipeline:
//! event kinds, loader references, structural class views, the matcher
//! algebra, and the resolver/weaver traits the pipeline delegates to.

pub mod error;
pub mod event;
pub mod loader;
pub mod matcher;
pub mod resolve;
pub mod structure;
pub mod weave;

pub use error::{StructureError, TransformError, WeaveError};
pub use event::{EventKind, EventListener};
pub use loader::{loader_display, loader_key, ClassRef, LoaderKind, LoaderRef, ProtectionContext};
pub use matcher::{AndMatcher, CapabilityMatcher, Matcher, MatcherExt, MatchingResult};
pub use resolve::StructureResolver;
pub use structure::{BehaviorStructure, ClassKind, ClassStructure};
pub use weave::BytecodeWeaver;
