//! Dispatch engine.
//!
//! Routes typed values through the formatter registry while tracking
//! recursion depth. The depth counter has one owner per engine and triggers
//! information-table cache invalidation exactly when a rendering tree
//! returns to depth zero, so every read inside one tree observes a single
//! target snapshot and no stale addresses leak into the next inspection.

use crate::info::ObjectInfoTable;
use crate::memory::TargetMemory;
use crate::registry::FormatterRegistry;
use crate::symbols::SymbolManager;
use anyhow::Result;

/// A value in target memory paired with its runtime type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedValue {
    /// Runtime type name used for registry resolution.
    pub type_name: String,
    /// Address of the value in target memory.
    pub address: u64,
}

impl TypedValue {
    pub fn new(type_name: impl Into<String>, address: u64) -> Self {
        Self { type_name: type_name.into(), address }
    }
}

/// Formatter invocation depth. Zero means no inspection is in progress.
#[derive(Debug, Default)]
pub struct DispatchContext {
    depth: u32,
}

impl DispatchContext {
    pub fn new() -> Self {
        Self { depth: 0 }
    }

    /// Current nesting depth.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    fn enter(&mut self) {
        self.depth += 1;
    }

    /// Leave one dispatch level; returns the new depth.
    fn exit(&mut self) -> u32 {
        debug_assert!(self.depth > 0, "dispatch exit below depth zero");
        self.depth = self.depth.saturating_sub(1);
        self.depth
    }
}

/// Everything one rendering tree needs: the registry, the target, the
/// information table, and the depth counter. Borrowed for the duration of
/// one top-level inspection.
pub struct Scope<'a> {
    pub registry: &'a FormatterRegistry,
    pub mem: &'a mut dyn TargetMemory,
    pub info: &'a mut ObjectInfoTable,
    pub symbols: &'a SymbolManager,
    pub ctx: &'a mut DispatchContext,
}

impl Scope<'_> {
    /// Dispatch a value through the registry.
    ///
    /// `Ok(None)` means no formatter had an opinion and the caller should
    /// fall back to a default representation. Formatter faults propagate,
    /// but only after the depth counter has been unwound and, at depth
    /// zero, the cache invalidated.
    pub fn dispatch(&mut self, value: &TypedValue) -> Result<Option<String>> {
        let registry = self.registry;
        let Some(formatter) = registry.resolve(&value.type_name) else {
            return Ok(None);
        };

        self.ctx.enter();
        let result = formatter.format(self, value);
        if self.ctx.exit() == 0 {
            self.info.invalidate();
        }
        result.map(Some)
    }

    /// Run `body` one dispatch level deep, with the same depth-zero
    /// invalidation guarantee as `dispatch`. Used to bracket display-adapter
    /// rendering so nested dispatches inside it stay within one snapshot.
    pub fn nested<T>(
        &mut self,
        body: impl FnOnce(&mut Scope<'_>) -> Result<T>,
    ) -> Result<T> {
        self.ctx.enter();
        let result = body(self);
        if self.ctx.exit() == 0 {
            self.info.invalidate();
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::InfoTableLayout;
    use crate::mock::MockTarget;
    use crate::registry::ValueFormatter;
    use regex::Regex;

    struct Literal(&'static str);

    impl ValueFormatter for Literal {
        fn format(&self, _scope: &mut Scope<'_>, _value: &TypedValue) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    // Renders "outer[<inner>]" by re-entering the engine for a sub-value.
    struct Nesting;

    impl ValueFormatter for Nesting {
        fn format(&self, scope: &mut Scope<'_>, value: &TypedValue) -> Result<String> {
            let inner = scope
                .dispatch(&TypedValue::new("inner_t", value.address + 4))?
                .unwrap_or_else(|| "?".to_string());
            Ok(format!("outer[{inner}]"))
        }
    }

    struct Failing;

    impl ValueFormatter for Failing {
        fn format(&self, _scope: &mut Scope<'_>, _value: &TypedValue) -> Result<String> {
            anyhow::bail!("target read fault")
        }
    }

    fn fixture() -> (MockTarget, ObjectInfoTable, SymbolManager, DispatchContext) {
        (
            MockTarget::new(),
            ObjectInfoTable::new(InfoTableLayout::default()),
            SymbolManager::new(),
            DispatchContext::new(),
        )
    }

    #[test]
    fn test_no_matching_formatter_is_not_an_error() {
        let registry = FormatterRegistry::new();
        let (mut mem, mut info, symbols, mut ctx) = fixture();
        let mut scope = Scope {
            registry: &registry,
            mem: &mut mem,
            info: &mut info,
            symbols: &symbols,
            ctx: &mut ctx,
        };
        let out = scope.dispatch(&TypedValue::new("Foreign_Type", 0x1000)).unwrap();
        assert!(out.is_none());
        assert_eq!(ctx.depth(), 0);
        // A registry miss never touches the depth counter or the cache.
        assert_eq!(info.generation(), 0);
    }

    #[test]
    fn test_nested_dispatch_invalidates_once_at_depth_zero() {
        let mut registry = FormatterRegistry::new();
        registry.register(Regex::new("^outer_t$").unwrap(), Box::new(Nesting));
        registry.register(Regex::new("^inner_t$").unwrap(), Box::new(Literal("leaf")));
        let (mut mem, mut info, symbols, mut ctx) = fixture();
        let mut scope = Scope {
            registry: &registry,
            mem: &mut mem,
            info: &mut info,
            symbols: &symbols,
            ctx: &mut ctx,
        };

        let out = scope.dispatch(&TypedValue::new("outer_t", 0x2000)).unwrap();
        assert_eq!(out.as_deref(), Some("outer[leaf]"));
        assert_eq!(ctx.depth(), 0);
        // One top-level call, one invalidation, however deep it nested.
        assert_eq!(info.generation(), 1);
    }

    #[test]
    fn test_error_path_still_unwinds_and_invalidates() {
        let mut registry = FormatterRegistry::new();
        registry.register(Regex::new("^bad_t$").unwrap(), Box::new(Failing));
        let (mut mem, mut info, symbols, mut ctx) = fixture();
        let mut scope = Scope {
            registry: &registry,
            mem: &mut mem,
            info: &mut info,
            symbols: &symbols,
            ctx: &mut ctx,
        };

        assert!(scope.dispatch(&TypedValue::new("bad_t", 0)).is_err());
        assert_eq!(ctx.depth(), 0);
        assert_eq!(info.generation(), 1);
    }
}
