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

//! Instrumented collaborator doubles shared by the integration tests.

#![allow(dead_code)]

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use classwatch_core::{
    BehaviorStructure, BytecodeWeaver, ClassKind, ClassRef, ClassStructure, EventKind,
    EventListener, LoaderRef, Matcher, MatchingResult, StructureError, StructureResolver,
    WeaveError,
};
use classwatch_transform::{ClassTransformer, ObjectIdRegistry, TransformerConfig};

pub struct Sink;
impl EventListener for Sink {}

/// Matcher selecting every behavior of the structure.
pub struct MatchAll;

impl Matcher for MatchAll {
    fn matching(&self, structure: &ClassStructure) -> MatchingResult {
        MatchingResult::of(
            structure
                .behaviors()
                .iter()
                .map(|b| structure.sign_code_of(b)),
        )
    }
}

/// Matcher selecting nothing.
pub struct MatchNone;

impl Matcher for MatchNone {
    fn matching(&self, _structure: &ClassStructure) -> MatchingResult {
        MatchingResult::unmatched()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    Succeed,
    Fail,
    Panic,
}

/// Call-counting resolver producing a single-method class named after the
/// requested class (or `com/app/Svc` for bytecode resolution).
pub struct CountingResolver {
    pub calls: AtomicUsize,
    mode: ResolveMode,
    class_name: String,
}

impl CountingResolver {
    pub fn succeeding(class_name: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            mode: ResolveMode::Succeed,
            class_name: class_name.to_string(),
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            mode: ResolveMode::Fail,
            class_name: String::new(),
        }
    }

    pub fn panicking() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            mode: ResolveMode::Panic,
            class_name: String::new(),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn produce(&self, name: &str) -> Result<ClassStructure, StructureError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            ResolveMode::Succeed => Ok(one_method_class(name)),
            ResolveMode::Fail => Err(StructureError::MalformedBytecode(
                "injected resolution failure".to_string(),
            )),
            ResolveMode::Panic => panic!("injected resolver panic"),
        }
    }
}

impl StructureResolver for CountingResolver {
    fn from_bytecode(
        &self,
        _bytecode: &[u8],
        _loader: Option<&LoaderRef>,
    ) -> Result<ClassStructure, StructureError> {
        let name = self.class_name.clone();
        self.produce(&name)
    }

    fn from_loaded(&self, class: &ClassRef) -> Result<ClassStructure, StructureError> {
        self.produce(class.internal_name())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum WeaveMode {
    Rewrite,
    Noop,
    Fail,
    Panic,
}

/// Call-counting weaver. In `Rewrite` mode it appends one marker byte.
pub struct CountingWeaver {
    pub calls: AtomicUsize,
    mode: WeaveMode,
}

impl CountingWeaver {
    pub fn new(mode: WeaveMode) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            mode,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BytecodeWeaver for CountingWeaver {
    fn weave<'a>(
        &self,
        _loader: Option<&LoaderRef>,
        bytecode: &'a [u8],
        _sign_codes: &BTreeSet<String>,
        _namespace: &str,
        _listener_id: i32,
        _event_kinds: &[EventKind],
    ) -> Result<Cow<'a, [u8]>, WeaveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            WeaveMode::Rewrite => {
                let mut out = bytecode.to_vec();
                out.push(0xEE);
                Ok(Cow::Owned(out))
            }
            WeaveMode::Noop => Ok(Cow::Borrowed(bytecode)),
            WeaveMode::Fail => Err(WeaveError::InvalidOutput(
                "injected weave failure".to_string(),
            )),
            WeaveMode::Panic => panic!("injected weaver panic"),
        }
    }
}

pub fn one_method_class(name: &str) -> ClassStructure {
    ClassStructure::new(
        name,
        ClassKind::Class,
        vec!["java/lang/Object".to_string()],
        vec![],
        vec![BehaviorStructure::new("run", "()V", 0)],
    )
}

pub fn app_loader(id: u64) -> LoaderRef {
    LoaderRef::new(id, "AppClassLoader", classwatch_core::LoaderKind::Application)
}

pub fn config(matcher: Arc<dyn Matcher>, unsafe_enabled: bool) -> TransformerConfig {
    TransformerConfig {
        watch_id: 1001,
        module_id: "integration".to_string(),
        matcher,
        listener: Arc::new(Sink),
        unsafe_enabled,
        event_kinds: EventKind::BASIC.to_vec(),
        namespace: "default".to_string(),
    }
}

pub fn build(
    matcher: Arc<dyn Matcher>,
    unsafe_enabled: bool,
    resolver: Arc<CountingResolver>,
    weaver: Arc<CountingWeaver>,
) -> (ClassTransformer, Arc<CountingResolver>, Arc<CountingWeaver>) {
    let registry = ObjectIdRegistry::new();
    let transformer = ClassTransformer::with_registry(
        config(matcher, unsafe_enabled),
        Arc::clone(&resolver) as Arc<dyn StructureResolver>,
        Arc::clone(&weaver) as Arc<dyn BytecodeWeaver>,
        &registry,
    );
    (transformer, resolver, weaver)
}
