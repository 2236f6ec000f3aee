//! Supercore value formatters: object ids, packed names, object headers,
//! and thread state sets.

use crate::dispatch::{Scope, TypedValue};
use crate::id::{IdLayout, ObjectId};
use crate::registry::ValueFormatter;
use anyhow::Result;

// Objects_Control: Chain_Node next/previous (8 bytes), then id and name.
pub(crate) const CONTROL_ID_OFFSET: u64 = 0x08;
pub(crate) const CONTROL_NAME_OFFSET: u64 = 0x0C;

/// Renders an `rtems_id` / `Objects_Id` word as its decoded fields.
pub struct IdFormatter {
    layout: IdLayout,
}

impl IdFormatter {
    pub fn new(layout: IdLayout) -> Self {
        Self { layout }
    }
}

impl ValueFormatter for IdFormatter {
    fn format(&self, scope: &mut Scope<'_>, value: &TypedValue) -> Result<String> {
        let raw = scope.mem.read_word_32(value.address)?;
        let id = ObjectId::decode(raw, self.layout);
        Ok(format!(
            "0x{:08X} [api:{} class:{} node:{} index:{}]",
            id.value(),
            id.api_name(),
            id.class_name(),
            id.node(),
            id.index()
        ))
    }
}

/// Renders a classic `Objects_Name`: four ASCII characters packed MSB-first.
pub struct NameFormatter;

pub(crate) fn unpack_name(raw: u32) -> String {
    raw.to_be_bytes()
        .iter()
        .map(|&b| if (0x20..0x7F).contains(&b) { b as char } else { '.' })
        .collect()
}

impl ValueFormatter for NameFormatter {
    fn format(&self, scope: &mut Scope<'_>, value: &TypedValue) -> Result<String> {
        let raw = scope.mem.read_word_32(value.address)?;
        Ok(format!("'{}' (0x{raw:08X})", unpack_name(raw)))
    }
}

/// Renders an `Objects_Control` header by re-dispatching its embedded id
/// and name fields.
pub struct ControlFormatter;

impl ValueFormatter for ControlFormatter {
    fn format(&self, scope: &mut Scope<'_>, value: &TypedValue) -> Result<String> {
        let id = scope
            .dispatch(&TypedValue::new("Objects_Id", value.address + CONTROL_ID_OFFSET))?
            .unwrap_or_else(|| "?".to_string());
        let name = scope
            .dispatch(&TypedValue::new("Objects_Name", value.address + CONTROL_NAME_OFFSET))?
            .unwrap_or_else(|| "?".to_string());
        Ok(format!("name:{name} id:{id}"))
    }
}

// Classic States_Control bits. Zero is READY.
const STATE_FLAGS: &[(u32, &str)] = &[
    (0x0000_0001, "DORMANT"),
    (0x0000_0002, "SUSPENDED"),
    (0x0000_0004, "TRANSIENT"),
    (0x0000_0008, "DELAYING"),
    (0x0000_0010, "WAITING-FOR-TIME"),
    (0x0000_0020, "WAITING-FOR-BUFFER"),
    (0x0000_0040, "WAITING-FOR-SEGMENT"),
    (0x0000_0080, "WAITING-FOR-MESSAGE"),
    (0x0000_0100, "WAITING-FOR-EVENT"),
    (0x0000_0200, "WAITING-FOR-SEMAPHORE"),
    (0x0000_0400, "WAITING-FOR-MUTEX"),
    (0x0000_0800, "WAITING-FOR-CONDITION-VARIABLE"),
    (0x0000_1000, "WAITING-FOR-JOIN-AT-EXIT"),
    (0x0000_2000, "WAITING-FOR-RPC-REPLY"),
    (0x0000_4000, "WAITING-FOR-PERIOD"),
    (0x0000_8000, "WAITING-FOR-SIGNAL"),
    (0x0001_0000, "WAITING-FOR-BARRIER"),
    (0x0002_0000, "WAITING-FOR-RWLOCK"),
];

/// Decode a state mask into its flag names.
pub fn decode_states(mask: u32) -> String {
    if mask == 0 {
        return "READY".to_string();
    }
    let mut names: Vec<String> = STATE_FLAGS
        .iter()
        .filter(|(bit, _)| mask & bit != 0)
        .map(|(_, name)| (*name).to_string())
        .collect();
    let known: u32 = STATE_FLAGS.iter().map(|(bit, _)| bit).sum();
    if mask & !known != 0 {
        names.push(format!("0x{:X}", mask & !known));
    }
    names.join(",")
}

/// Renders a `States_Control` word.
pub struct StateFormatter;

impl ValueFormatter for StateFormatter {
    fn format(&self, scope: &mut Scope<'_>, value: &TypedValue) -> Result<String> {
        let mask = scope.mem.read_word_32(value.address)?;
        Ok(decode_states(mask))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpack_name() {
        assert_eq!(unpack_name(0x5345_4D31), "SEM1");
        assert_eq!(unpack_name(0x5549_3120), "UI1 ");
        // Non-printable bytes render as dots.
        assert_eq!(unpack_name(0x0041_0042), ".A.B");
    }

    #[test]
    fn test_decode_states() {
        assert_eq!(decode_states(0), "READY");
        assert_eq!(decode_states(0x0200), "WAITING-FOR-SEMAPHORE");
        assert_eq!(decode_states(0x0002 | 0x0008), "SUSPENDED,DELAYING");
        // Bits outside the known set are reported raw, not dropped.
        assert_eq!(decode_states(0x0010_0000), "0x100000");
    }
}
