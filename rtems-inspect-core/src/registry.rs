//! Formatter registry.
//!
//! An ordered table of (type-name predicate, formatter) pairs. Resolution
//! scans in registration order and the first matching predicate wins; that
//! ordering is a documented contract, not an iteration accident, so hosts
//! can shadow a general predicate with a more specific one registered
//! earlier.

use crate::dispatch::{Scope, TypedValue};
use anyhow::Result;
use regex::Regex;

/// Renders one typed value into a report fragment. Formatters may re-enter
/// the dispatch engine through the scope to render embedded values.
pub trait ValueFormatter {
    fn format(&self, scope: &mut Scope<'_>, value: &TypedValue) -> Result<String>;
}

struct RegistryEntry {
    predicate: Regex,
    formatter: Box<dyn ValueFormatter>,
}

/// Ordered registry mapping type-name predicates to formatters.
///
/// Built explicitly at startup and passed by reference into the dispatch
/// engine; there is no load-time global population.
#[derive(Default)]
pub struct FormatterRegistry {
    entries: Vec<RegistryEntry>,
}

impl FormatterRegistry {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Append an entry. Earlier registrations take precedence on overlap.
    pub fn register(&mut self, predicate: Regex, formatter: Box<dyn ValueFormatter>) {
        self.entries.push(RegistryEntry { predicate, formatter });
    }

    /// Resolve the formatter for a type name: the first entry, in
    /// registration order, whose predicate matches. `None` is the normal
    /// no-opinion path, not an error.
    pub fn resolve(&self, type_name: &str) -> Option<&dyn ValueFormatter> {
        self.entries
            .iter()
            .find(|entry| entry.predicate.is_match(type_name))
            .map(|entry| &*entry.formatter)
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DispatchContext;
    use crate::info::{InfoTableLayout, ObjectInfoTable};
    use crate::mock::MockTarget;
    use crate::symbols::SymbolManager;

    struct Tagged(&'static str);

    impl ValueFormatter for Tagged {
        fn format(&self, _scope: &mut Scope<'_>, _value: &TypedValue) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn render(registry: &FormatterRegistry, type_name: &str) -> Option<String> {
        let mut mem = MockTarget::new();
        let mut info = ObjectInfoTable::new(InfoTableLayout::default());
        let symbols = SymbolManager::new();
        let mut ctx = DispatchContext::new();
        let mut scope = Scope {
            registry,
            mem: &mut mem,
            info: &mut info,
            symbols: &symbols,
            ctx: &mut ctx,
        };
        scope.dispatch(&TypedValue::new(type_name, 0x1000)).unwrap()
    }

    #[test]
    fn test_resolve_misses_cleanly() {
        let registry = FormatterRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.resolve("Semaphore_Control").is_none());
    }

    #[test]
    fn test_first_registered_wins_both_orders() {
        // Anchored and prefix predicates both match "Semaphore_Control".
        let specific = Regex::new("^Semaphore_Control$").unwrap();
        let general = Regex::new("^Semaphore").unwrap();

        let mut a = FormatterRegistry::new();
        a.register(specific.clone(), Box::new(Tagged("specific")));
        a.register(general.clone(), Box::new(Tagged("general")));
        assert_eq!(render(&a, "Semaphore_Control").as_deref(), Some("specific"));

        let mut b = FormatterRegistry::new();
        b.register(general, Box::new(Tagged("general")));
        b.register(specific, Box::new(Tagged("specific")));
        assert_eq!(render(&b, "Semaphore_Control").as_deref(), Some("general"));
    }

    #[test]
    fn test_partial_match_requires_anchoring() {
        let mut registry = FormatterRegistry::new();
        registry.register(Regex::new("^rtems_id$").unwrap(), Box::new(Tagged("id")));
        assert!(registry.resolve("rtems_id_list").is_none());
        assert_eq!(render(&registry, "rtems_id").as_deref(), Some("id"));
    }
}
