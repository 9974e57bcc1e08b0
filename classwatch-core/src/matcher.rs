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

//! Structural matching seam and its combinators.
//!
//! The pattern language itself lives in the match engine; this module only
//! fixes the evaluation contract and the small algebra the pipeline needs:
//! `gate.and(registration_matcher)`, where the left side filters out what
//! must not be woven and the right side selects what the registration asked
//! for.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::loader::LoaderRef;
use crate::structure::{ClassKind, ClassStructure};

/// Outcome of evaluating a matcher against one class structure.
#[derive(Debug, Clone, Default)]
pub struct MatchingResult {
    behavior_sign_codes: BTreeSet<String>,
}

impl MatchingResult {
    pub fn unmatched() -> Self {
        Self::default()
    }

    pub fn of(sign_codes: impl IntoIterator<Item = String>) -> Self {
        Self {
            behavior_sign_codes: sign_codes.into_iter().collect(),
        }
    }

    /// A result matches iff at least one behavior matched.
    pub fn is_matched(&self) -> bool {
        !self.behavior_sign_codes.is_empty()
    }

    pub fn behavior_sign_codes(&self) -> &BTreeSet<String> {
        &self.behavior_sign_codes
    }

    pub fn into_behavior_sign_codes(self) -> BTreeSet<String> {
        self.behavior_sign_codes
    }

    /// Behaviors matched by both results.
    pub fn intersect(&self, other: &MatchingResult) -> MatchingResult {
        MatchingResult {
            behavior_sign_codes: self
                .behavior_sign_codes
                .intersection(&other.behavior_sign_codes)
                .cloned()
                .collect(),
        }
    }
}

/// Predicate over class structures. Must be pure and must not block: it is
/// evaluated inline on the host's class-loading threads.
pub trait Matcher: Send + Sync {
    fn matching(&self, structure: &ClassStructure) -> MatchingResult;
}

/// Conjunction combinator extension. Short-circuits: the right side is not
/// evaluated when the left side matched nothing.
pub trait MatcherExt: Matcher + Sized {
    fn and<M: Matcher>(self, other: M) -> AndMatcher<Self, M> {
        AndMatcher {
            left: self,
            right: other,
        }
    }
}

impl<M: Matcher + Sized> MatcherExt for M {}

impl Matcher for Arc<dyn Matcher> {
    fn matching(&self, structure: &ClassStructure) -> MatchingResult {
        (**self).matching(structure)
    }
}

/// Intersection of two matchers' behavior sets.
pub struct AndMatcher<L, R> {
    left: L,
    right: R,
}

impl<L: Matcher, R: Matcher> Matcher for AndMatcher<L, R> {
    fn matching(&self, structure: &ClassStructure) -> MatchingResult {
        let left = self.left.matching(structure);
        if !left.is_matched() {
            return MatchingResult::unmatched();
        }
        left.intersect(&self.right.matching(structure))
    }
}

/// Namespaces that are foundational to the host platform and only weavable
/// when the registration opted into unsafe mode.
const PLATFORM_PREFIXES: [&str; 4] = ["java/", "javax/", "jdk/", "sun/"];

/// The capability gate built per transform invocation.
///
/// Matches every behavior the weaver is structurally able to rewrite, and
/// nothing more: concrete classes only, behaviors with a bytecode body only,
/// and core platform namespaces only under the unsafe flag. Conjoined with
/// the registration's own matcher, it bounds what any pattern can select.
pub struct CapabilityMatcher {
    from_platform_loader: bool,
    unsafe_enabled: bool,
}

impl CapabilityMatcher {
    pub fn new(loader: Option<&LoaderRef>, unsafe_enabled: bool) -> Self {
        Self {
            from_platform_loader: loader.is_none(),
            unsafe_enabled,
        }
    }

    fn is_platform_name(name: &str) -> bool {
        PLATFORM_PREFIXES.iter().any(|p| name.starts_with(p))
    }
}

impl Matcher for CapabilityMatcher {
    fn matching(&self, structure: &ClassStructure) -> MatchingResult {
        match structure.kind() {
            ClassKind::Interface | ClassKind::Annotation => return MatchingResult::unmatched(),
            ClassKind::Class | ClassKind::Enum => {}
        }
        if !self.unsafe_enabled
            && (self.from_platform_loader || Self::is_platform_name(structure.internal_name()))
        {
            return MatchingResult::unmatched();
        }
        MatchingResult::of(
            structure
                .behaviors()
                .iter()
                .filter(|b| b.has_body())
                .map(|b| structure.sign_code_of(b)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LoaderKind;
    use crate::structure::{BehaviorStructure, ACC_ABSTRACT};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed(MatchingResult);

    impl Matcher for Fixed {
        fn matching(&self, _structure: &ClassStructure) -> MatchingResult {
            self.0.clone()
        }
    }

    struct Counting<'a>(&'a AtomicUsize);

    impl Matcher for Counting<'_> {
        fn matching(&self, _structure: &ClassStructure) -> MatchingResult {
            self.0.fetch_add(1, Ordering::SeqCst);
            MatchingResult::of(["com/app/Svc.run()V".to_string()])
        }
    }

    fn structure(name: &str, kind: ClassKind) -> ClassStructure {
        ClassStructure::new(
            name,
            kind,
            vec!["java/lang/Object".to_string()],
            vec![],
            vec![
                BehaviorStructure::new("run", "()V", 0),
                BehaviorStructure::new("plan", "()V", ACC_ABSTRACT),
            ],
        )
    }

    #[test]
    fn test_and_intersects() {
        let left = Fixed(MatchingResult::of([
            "a.run()V".to_string(),
            "a.stop()V".to_string(),
        ]));
        let right = Fixed(MatchingResult::of(["a.run()V".to_string()]));
        let result = left.and(right).matching(&structure("a", ClassKind::Class));
        assert!(result.is_matched());
        assert_eq!(result.behavior_sign_codes().len(), 1);
        assert!(result.behavior_sign_codes().contains("a.run()V"));
    }

    #[test]
    fn test_and_short_circuits_unmatched_left() {
        let calls = AtomicUsize::new(0);
        let left = Fixed(MatchingResult::unmatched());
        let right = Counting(&calls);
        let result = left.and(right).matching(&structure("a", ClassKind::Class));
        assert!(!result.is_matched());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_capability_rejects_interfaces() {
        let gate = CapabilityMatcher::new(None, true);
        let result = gate.matching(&structure("com/app/Api", ClassKind::Interface));
        assert!(!result.is_matched());
    }

    #[test]
    fn test_capability_skips_bodyless_behaviors() {
        let loader = LoaderRef::new(1, "app", LoaderKind::Application);
        let gate = CapabilityMatcher::new(Some(&loader), false);
        let result = gate.matching(&structure("com/app/Svc", ClassKind::Class));
        let codes: Vec<_> = result.behavior_sign_codes().iter().cloned().collect();
        assert_eq!(codes, vec!["com/app/Svc.run()V".to_string()]);
    }

    #[test]
    fn test_capability_platform_gating() {
        let loader = LoaderRef::new(1, "app", LoaderKind::Application);
        let safe = CapabilityMatcher::new(Some(&loader), false);
        assert!(!safe
            .matching(&structure("java/util/List2", ClassKind::Class))
            .is_matched());
        let unsafe_gate = CapabilityMatcher::new(Some(&loader), true);
        assert!(unsafe_gate
            .matching(&structure("java/util/List2", ClassKind::Class))
            .is_matched());
    }
}
