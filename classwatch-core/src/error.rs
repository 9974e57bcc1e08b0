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

//! Error taxonomy.
//!
//! None of these ever cross the public transform boundary: the pipeline
//! recovers every failure into "no transformation" and a log record. They
//! exist so the recovery point knows what it is recovering from.

use thiserror::Error;

/// Structural resolution could not interpret the bytecode or live class.
#[derive(Debug, Error)]
pub enum StructureError {
    #[error("malformed class file: {0}")]
    MalformedBytecode(String),
    #[error("truncated class file at offset {offset}")]
    Truncated { offset: usize },
    #[error("loaded class {internal_name} is not resolvable")]
    Unresolvable { internal_name: String },
}

/// The weaver could not produce valid instrumented bytecode.
#[derive(Debug, Error)]
pub enum WeaveError {
    #[error("weaving failed for {sign_code}: {reason}")]
    Behavior { sign_code: String, reason: String },
    #[error("woven class file would be invalid: {0}")]
    InvalidOutput(String),
}

/// Any failure inside one transform invocation, on its way to the
/// outermost recovery point.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Structure(#[from] StructureError),
    #[error(transparent)]
    Weave(#[from] WeaveError),
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}
