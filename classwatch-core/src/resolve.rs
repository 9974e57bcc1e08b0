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

//! Structure resolution seam.

use crate::error::StructureError;
use crate::loader::{ClassRef, LoaderRef};
use crate::structure::ClassStructure;

/// Produces structural views of classes.
///
/// Resolution runs inline on class-loading threads and must be CPU-bound;
/// an implementation that performs blocking I/O stalls the host.
pub trait StructureResolver: Send + Sync {
    /// Resolve from a candidate class-file buffer, before the class exists.
    fn from_bytecode(
        &self,
        bytecode: &[u8],
        loader: Option<&LoaderRef>,
    ) -> Result<ClassStructure, StructureError>;

    /// Resolve from an already-loaded class, on redefinition events.
    fn from_loaded(&self, class: &ClassRef) -> Result<ClassStructure, StructureError>;
}
