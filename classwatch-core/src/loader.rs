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

//! Class loader references.
//!
//! The host hands every transform invocation the defining loader of the
//! candidate class, or nothing at all for bootstrap-defined classes. The
//! pipeline only needs three facts about a loader: a stable key for impact
//! accounting, something printable for logs, and its provenance, because
//! classes defined by the instrumentation machinery's own loaders must
//! never be rewritten.

use std::fmt;

/// Provenance of a class loader, as reported by the host integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoaderKind {
    /// An ordinary host-application loader.
    Application,
    /// The loader that defines the instrumentation machinery itself.
    Instrumentation,
    /// A per-module isolation loader reserved for instrumentation modules.
    IsolatedModule,
}

/// Reference to a defining class loader. `None` at the transform seam means
/// the class is bootstrap-defined.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoaderRef {
    id: u64,
    name: String,
    kind: LoaderKind,
}

impl LoaderRef {
    pub fn new(id: u64, name: impl Into<String>, kind: LoaderKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> LoaderKind {
        self.kind
    }
}

impl fmt::Display for LoaderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.id)
    }
}

/// Stable accounting key for an optional loader. Bootstrap maps to 0;
/// host integrations must hand out loader ids starting at 1.
pub fn loader_key(loader: Option<&LoaderRef>) -> u64 {
    loader.map(LoaderRef::id).unwrap_or(0)
}

/// Log rendering for an optional loader.
pub fn loader_display(loader: Option<&LoaderRef>) -> String {
    match loader {
        Some(l) => l.to_string(),
        None => "bootstrap".to_string(),
    }
}

/// Handle to an already-loaded class, present on redefinition and
/// retransformation events. Its structure is resolved from the live class
/// rather than from the candidate bytecode.
#[derive(Debug, Clone)]
pub struct ClassRef {
    internal_name: String,
    loader: Option<LoaderRef>,
}

impl ClassRef {
    pub fn new(internal_name: impl Into<String>, loader: Option<LoaderRef>) -> Self {
        Self {
            internal_name: internal_name.into(),
            loader,
        }
    }

    /// Internal-form class name, e.g. `"java/util/List"`.
    pub fn internal_name(&self) -> &str {
        &self.internal_name
    }

    pub fn loader(&self) -> Option<&LoaderRef> {
        self.loader.as_ref()
    }
}

/// Opaque protection-domain token carried through the transform seam.
/// The decision procedure never inspects it.
#[derive(Debug, Clone, Default)]
pub struct ProtectionContext;
