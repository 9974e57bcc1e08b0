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

//! Structural views of classes.
//!
//! A [`ClassStructure`] is a read-only snapshot of one class as of one load
//! event: its internal-form name, hierarchy, and member behaviors. It is
//! produced by a [`StructureResolver`](crate::resolve::StructureResolver)
//! and consumed by matchers; it never outlives the transform invocation
//! that created it.

/// Method access flag: declared `static`.
pub const ACC_STATIC: u16 = 0x0008;
/// Method access flag: implemented in native code, no bytecode body.
pub const ACC_NATIVE: u16 = 0x0100;
/// Method access flag: declared `abstract`, no bytecode body.
pub const ACC_ABSTRACT: u16 = 0x0400;

/// What kind of type a class file declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Annotation,
    Enum,
}

/// One member behavior (method or constructor) of a class.
#[derive(Debug, Clone)]
pub struct BehaviorStructure {
    name: String,
    descriptor: String,
    access_flags: u16,
}

impl BehaviorStructure {
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>, access_flags: u16) -> Self {
        Self {
            name: name.into(),
            descriptor: descriptor.into(),
            access_flags,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// JVM method descriptor, e.g. `"(Ljava/lang/String;)V"`.
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    pub fn access_flags(&self) -> u16 {
        self.access_flags
    }

    pub fn is_static(&self) -> bool {
        self.access_flags & ACC_STATIC != 0
    }

    pub fn is_native(&self) -> bool {
        self.access_flags & ACC_NATIVE != 0
    }

    pub fn is_abstract(&self) -> bool {
        self.access_flags & ACC_ABSTRACT != 0
    }

    /// Whether this behavior has a bytecode body the weaver can rewrite.
    pub fn has_body(&self) -> bool {
        !self.is_native() && !self.is_abstract()
    }
}

/// Read-only structural snapshot of one class.
#[derive(Debug, Clone)]
pub struct ClassStructure {
    internal_name: String,
    kind: ClassKind,
    super_names: Vec<String>,
    interface_names: Vec<String>,
    behaviors: Vec<BehaviorStructure>,
}

impl ClassStructure {
    pub fn new(
        internal_name: impl Into<String>,
        kind: ClassKind,
        super_names: Vec<String>,
        interface_names: Vec<String>,
        behaviors: Vec<BehaviorStructure>,
    ) -> Self {
        Self {
            internal_name: internal_name.into(),
            kind,
            super_names,
            interface_names,
            behaviors,
        }
    }

    /// Internal-form class name, e.g. `"com/app/Svc"`.
    pub fn internal_name(&self) -> &str {
        &self.internal_name
    }

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    /// Superclass chain, nearest first, excluding this class itself.
    pub fn super_names(&self) -> &[String] {
        &self.super_names
    }

    pub fn interface_names(&self) -> &[String] {
        &self.interface_names
    }

    pub fn behaviors(&self) -> &[BehaviorStructure] {
        &self.behaviors
    }

    /// Canonical signature of one behavior of this class:
    /// `{class}.{name}{descriptor}`, e.g. `"com/app/Svc.run()V"`.
    pub fn sign_code_of(&self, behavior: &BehaviorStructure) -> String {
        format!(
            "{}.{}{}",
            self.internal_name,
            behavior.name(),
            behavior.descriptor()
        )
    }
}
