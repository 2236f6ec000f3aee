//! Default value formatters.
//!
//! The standard printer set covering the supercore value types (ids, names,
//! object headers, thread states) and the classic API types (attribute
//! sets, semaphores). `default_registry` builds the table explicitly, in a
//! fixed order, for the dispatch engine to borrow.

pub mod classic;
pub mod supercore;

use crate::id::IdLayout;
use crate::registry::FormatterRegistry;
use regex::Regex;

fn anchored(type_name: &str) -> Regex {
    Regex::new(&format!("^{type_name}$")).expect("valid type-name predicate")
}

/// Build the default formatter registry for a target with the given id
/// layout. Registration order is the resolution precedence.
pub fn default_registry(layout: IdLayout) -> FormatterRegistry {
    let mut registry = FormatterRegistry::new();
    registry.register(anchored("rtems_id"), Box::new(supercore::IdFormatter::new(layout)));
    registry.register(anchored("Objects_Id"), Box::new(supercore::IdFormatter::new(layout)));
    registry.register(anchored("Objects_Name"), Box::new(supercore::NameFormatter));
    registry.register(anchored("Objects_Control"), Box::new(supercore::ControlFormatter));
    registry.register(anchored("States_Control"), Box::new(supercore::StateFormatter));
    registry.register(anchored("rtems_attribute"), Box::new(classic::AttributeFormatter));
    registry.register(anchored("Semaphore_Control"), Box::new(classic::SemaphoreFormatter));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_covers_standard_types() {
        let registry = default_registry(IdLayout::classic_32());
        for name in [
            "rtems_id",
            "Objects_Id",
            "Objects_Name",
            "Objects_Control",
            "States_Control",
            "rtems_attribute",
            "Semaphore_Control",
        ] {
            assert!(registry.resolve(name).is_some(), "no formatter for {name}");
        }
        assert!(registry.resolve("Thread_Control").is_none());
    }
}
