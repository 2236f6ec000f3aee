//! Classic API value formatters: attribute sets and semaphores.

use crate::dispatch::{Scope, TypedValue};
use crate::registry::ValueFormatter;
use anyhow::Result;

// Classic rtems_attribute bits.
const ATTR_FLOATING_POINT: u32 = 0x01;
const ATTR_GLOBAL: u32 = 0x02;
const ATTR_PRIORITY: u32 = 0x04;
const ATTR_SEMAPHORE_CLASS: u32 = 0x30;
const ATTR_BINARY_SEMAPHORE: u32 = 0x10;
const ATTR_SIMPLE_BINARY_SEMAPHORE: u32 = 0x20;
const ATTR_INHERIT_PRIORITY: u32 = 0x40;
const ATTR_PRIORITY_CEILING: u32 = 0x80;

// Semaphore_Control, 32-bit classic build. Offsets follow the 16-byte
// Objects_Control header and may vary across kernel versions.
pub(crate) const SEM_ATTRIBUTE_OFFSET: u64 = 0x10;
pub(crate) const SEM_COUNT_OFFSET: u64 = 0x14;
pub(crate) const SEM_HOLDER_OFFSET: u64 = 0x18;
pub(crate) const SEM_NEST_OFFSET: u64 = 0x1C;

/// Decode an attribute set into its flag names.
pub fn decode_attributes(mask: u32) -> String {
    let mut names = Vec::new();
    names.push(if mask & ATTR_GLOBAL != 0 { "GLOBAL" } else { "LOCAL" });
    names.push(if mask & ATTR_PRIORITY != 0 { "PRIORITY" } else { "FIFO" });
    match mask & ATTR_SEMAPHORE_CLASS {
        ATTR_BINARY_SEMAPHORE => names.push("BINARY"),
        ATTR_SIMPLE_BINARY_SEMAPHORE => names.push("SIMPLE-BINARY"),
        _ => names.push("COUNTING"),
    }
    if mask & ATTR_INHERIT_PRIORITY != 0 {
        names.push("INHERIT-PRIORITY");
    }
    if mask & ATTR_PRIORITY_CEILING != 0 {
        names.push("PRIORITY-CEILING");
    }
    if mask & ATTR_FLOATING_POINT != 0 {
        names.push("FLOATING-POINT");
    }
    names.join(",")
}

/// Renders an `rtems_attribute` word.
pub struct AttributeFormatter;

impl ValueFormatter for AttributeFormatter {
    fn format(&self, scope: &mut Scope<'_>, value: &TypedValue) -> Result<String> {
        let mask = scope.mem.read_word_32(value.address)?;
        Ok(decode_attributes(mask))
    }
}

/// Renders a `Semaphore_Control`: object header, attributes, and count.
/// Re-enters the engine for the embedded header and attribute values, which
/// makes a semaphore render three dispatch levels deep.
pub struct SemaphoreFormatter;

impl ValueFormatter for SemaphoreFormatter {
    fn format(&self, scope: &mut Scope<'_>, value: &TypedValue) -> Result<String> {
        let header = scope
            .dispatch(&TypedValue::new("Objects_Control", value.address))?
            .unwrap_or_else(|| format!("object@0x{:08X}", value.address));
        let attributes = scope
            .dispatch(&TypedValue::new("rtems_attribute", value.address + SEM_ATTRIBUTE_OFFSET))?
            .unwrap_or_else(|| "?".to_string());
        let count = scope.mem.read_word_32(value.address + SEM_COUNT_OFFSET)?;
        Ok(format!("{header} attr:{attributes} count:{count}"))
    }
}
