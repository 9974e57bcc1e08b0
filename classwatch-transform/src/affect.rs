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

//! Impact accounting for one registration.
//!
//! Every genuine rewrite records the loader, class, and behaviors it
//! touched; the accumulated distinct counts are what operators see when
//! they ask "what did this watch actually instrument". Records arrive from
//! whatever threads the host loads classes on, so the sets are sharded
//! concurrent sets with no lock spanning the rest of the pipeline. Counts
//! are monotone for the registration's lifetime; a snapshot is consistent
//! per field, not across fields, which is enough for diagnostics.

use std::collections::BTreeSet;

use classwatch_core::{loader_key, LoaderRef};
use dashmap::DashSet;
use serde::Serialize;

/// Cumulative distinct counts at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AffectSnapshot {
    pub class_count: usize,
    pub behavior_count: usize,
    pub loader_count: usize,
}

/// Concurrent accumulator of what one registration has rewritten.
#[derive(Debug, Default)]
pub struct AffectStatistic {
    loaders: DashSet<u64>,
    classes: DashSet<(u64, String)>,
    behaviors: DashSet<String>,
}

impl AffectStatistic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one successful rewrite. Never called for a no-op.
    pub fn record(
        &self,
        loader: Option<&LoaderRef>,
        internal_class_name: &str,
        sign_codes: &BTreeSet<String>,
    ) {
        let key = loader_key(loader);
        self.loaders.insert(key);
        self.classes.insert((key, internal_class_name.to_string()));
        for sign_code in sign_codes {
            self.behaviors.insert(sign_code.clone());
        }
    }

    /// Distinct (loader, class) pairs rewritten so far.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Distinct behaviors rewritten so far.
    pub fn behavior_count(&self) -> usize {
        self.behaviors.len()
    }

    /// Distinct defining loaders touched so far.
    pub fn loader_count(&self) -> usize {
        self.loaders.len()
    }

    pub fn snapshot(&self) -> AffectSnapshot {
        AffectSnapshot {
            class_count: self.class_count(),
            behavior_count: self.behavior_count(),
            loader_count: self.loader_count(),
        }
    }
}
