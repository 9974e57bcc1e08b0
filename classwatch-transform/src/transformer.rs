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

//! The per-class transform pipeline.
//!
//! [`ClassTransformer::transform`] runs inline on the host's class-loading
//! threads, once per class-definition or redefinition event, and decides
//! whether the candidate class gets event-emitting instrumentation. The
//! order of the decision steps is load-bearing: self-protection first (a
//! resolver call on one of our own support classes can recurse into class
//! loading), then the cheap loader gates, then structure resolution,
//! matching, and weaving.
//!
//! The public entry point never propagates an error. The host is blocked
//! inside class loading while this runs; anything that escapes here can
//! abort or corrupt the load of an unrelated class. Every internal failure,
//! including a panicking collaborator, degrades to "no transformation" and
//! a warning carrying this registration's identity.

use std::borrow::Cow;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use classwatch_core::{
    loader_display, BytecodeWeaver, CapabilityMatcher, ClassRef, EventKind, EventListener,
    LoaderKind, LoaderRef, Matcher, MatcherExt, ProtectionContext, StructureResolver,
    TransformError,
};
use tracing::{debug, info, warn};

use crate::affect::AffectStatistic;
use crate::object_ids::ObjectIdRegistry;

/// Internal-name prefix of the subsystem's own support classes injected
/// into the host. Transforming anything under it recurses into our own
/// class loading.
pub const RESERVED_CLASS_PREFIX: &str = "com/classwatch/";

/// Everything a watch registration fixes for its lifetime.
pub struct TransformerConfig {
    /// Identifies the owning watch request.
    pub watch_id: i32,
    /// Identifies the owning module/session.
    pub module_id: String,
    /// The registration's own matcher, conjoined with the capability gate
    /// on every invocation.
    pub matcher: Arc<dyn Matcher>,
    /// Event sink; held as an identity key only, never invoked here.
    pub listener: Arc<dyn EventListener>,
    /// Whether bootstrap-defined classes may be transformed.
    pub unsafe_enabled: bool,
    /// Event kinds the weaver should emit hooks for.
    pub event_kinds: Vec<EventKind>,
    /// Isolation namespace routing woven hooks to the right runtime.
    pub namespace: String,
}

/// One registration's transform pipeline. Immutable after construction
/// apart from its [`AffectStatistic`].
pub struct ClassTransformer {
    watch_id: i32,
    module_id: String,
    matcher: Arc<dyn Matcher>,
    listener: Arc<dyn EventListener>,
    unsafe_enabled: bool,
    event_kinds: Vec<EventKind>,
    namespace: String,
    listener_id: i32,
    affect: AffectStatistic,
    resolver: Arc<dyn StructureResolver>,
    weaver: Arc<dyn BytecodeWeaver>,
}

impl ClassTransformer {
    /// Build a transformer, allocating its listener id from the
    /// process-wide registry.
    pub fn new(
        config: TransformerConfig,
        resolver: Arc<dyn StructureResolver>,
        weaver: Arc<dyn BytecodeWeaver>,
    ) -> Self {
        Self::with_registry(config, resolver, weaver, ObjectIdRegistry::global())
    }

    /// Build against an explicit registry. Production code uses
    /// [`ClassTransformer::new`]; isolated registries exist for embedders
    /// that scope listener ids themselves, and for tests.
    pub fn with_registry(
        config: TransformerConfig,
        resolver: Arc<dyn StructureResolver>,
        weaver: Arc<dyn BytecodeWeaver>,
        registry: &ObjectIdRegistry,
    ) -> Self {
        let listener_id = registry.identity(&config.listener);
        Self {
            watch_id: config.watch_id,
            module_id: config.module_id,
            matcher: config.matcher,
            listener: config.listener,
            unsafe_enabled: config.unsafe_enabled,
            event_kinds: config.event_kinds,
            namespace: config.namespace,
            listener_id,
            affect: AffectStatistic::new(),
            resolver,
            weaver,
        }
    }

    /// Decide one class-definition event.
    ///
    /// Returns the rewritten class-file buffer, or `None` when no
    /// transformation was performed for any reason. Never panics, never
    /// returns an error: failures surface only in logs and in affect
    /// under-reporting.
    pub fn transform(
        &self,
        loader: Option<&LoaderRef>,
        internal_class_name: Option<&str>,
        class_being_redefined: Option<&ClassRef>,
        _protection: &ProtectionContext,
        bytecode: &[u8],
    ) -> Option<Vec<u8>> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.try_transform(loader, internal_class_name, class_being_redefined, bytecode)
        }));
        match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(cause)) => {
                warn!(
                    class = internal_class_name.unwrap_or("<unnamed>"),
                    loader = %loader_display(loader),
                    module = %self.module_id,
                    watch_id = self.watch_id,
                    error = %cause,
                    "transform failed, ignoring this class"
                );
                None
            }
            Err(payload) => {
                warn!(
                    class = internal_class_name.unwrap_or("<unnamed>"),
                    loader = %loader_display(loader),
                    module = %self.module_id,
                    watch_id = self.watch_id,
                    error = panic_message(&payload),
                    "transform panicked, ignoring this class"
                );
                None
            }
        }
    }

    fn try_transform(
        &self,
        loader: Option<&LoaderRef>,
        internal_class_name: Option<&str>,
        class_being_redefined: Option<&ClassRef>,
        bytecode: &[u8],
    ) -> Result<Option<Vec<u8>>, TransformError> {
        // Our own injected support classes: touching them while they load
        // deadlocks against ourselves.
        if let Some(name) = internal_class_name {
            if name.starts_with(RESERVED_CLASS_PREFIX) {
                debug!(class = name, "transform ignore, reserved namespace");
                return Ok(None);
            }
        }

        match loader.map(LoaderRef::kind) {
            // Classes defined by the machinery's own loader.
            Some(LoaderKind::Instrumentation) => {
                debug!(
                    class = internal_class_name.unwrap_or("<unnamed>"),
                    loader = %loader_display(loader),
                    "transform ignore, instrumentation loader"
                );
                return Ok(None);
            }
            // Classes defined by a per-module isolation loader.
            Some(LoaderKind::IsolatedModule) => {
                debug!(
                    class = internal_class_name.unwrap_or("<unnamed>"),
                    loader = %loader_display(loader),
                    "transform ignore, isolated module loader"
                );
                return Ok(None);
            }
            Some(LoaderKind::Application) | None => {}
        }

        // Bootstrap classes are foundational to the host; rewriting them
        // requires an explicit opt-in.
        if loader.is_none() && !self.unsafe_enabled {
            debug!(
                class = internal_class_name.unwrap_or("<unnamed>"),
                "transform ignore, class from bootstrap but unsafe disabled"
            );
            return Ok(None);
        }

        // On redefinition the structure is already loaded; otherwise it
        // comes from the candidate buffer.
        let structure = match class_being_redefined {
            Some(class) => self.resolver.from_loaded(class)?,
            None => self.resolver.from_bytecode(bytecode, loader)?,
        };
        let class_name = internal_class_name.unwrap_or_else(|| structure.internal_name());

        let result = CapabilityMatcher::new(loader, self.unsafe_enabled)
            .and(Arc::clone(&self.matcher))
            .matching(&structure);
        if !result.is_matched() {
            debug!(
                class = class_name,
                loader = %loader_display(loader),
                "transform ignore, no behaviors matched"
            );
            return Ok(None);
        }
        let sign_codes = result.into_behavior_sign_codes();

        let woven = self.weaver.weave(
            loader,
            bytecode,
            &sign_codes,
            &self.namespace,
            self.listener_id,
            &self.event_kinds,
        )?;
        match woven {
            Cow::Borrowed(_) => {
                debug!(
                    class = class_name,
                    loader = %loader_display(loader),
                    "transform ignore, nothing changed"
                );
                Ok(None)
            }
            Cow::Owned(buffer) => {
                self.affect.record(loader, class_name, &sign_codes);
                info!(
                    class = class_name,
                    loader = %loader_display(loader),
                    module = %self.module_id,
                    behaviors = sign_codes.len(),
                    "transform finished"
                );
                Ok(Some(buffer))
            }
        }
    }

    pub fn watch_id(&self) -> i32 {
        self.watch_id
    }

    pub fn module_id(&self) -> &str {
        &self.module_id
    }

    pub fn listener_id(&self) -> i32 {
        self.listener_id
    }

    pub fn matcher(&self) -> &Arc<dyn Matcher> {
        &self.matcher
    }

    pub fn listener(&self) -> &Arc<dyn EventListener> {
        &self.listener
    }

    pub fn event_kinds(&self) -> &[EventKind] {
        &self.event_kinds
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Live impact accounting for external reporting.
    pub fn affect_statistic(&self) -> &AffectStatistic {
        &self.affect
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "<non-string panic payload>"
    }
}
