//! Object identifier codec.
//!
//! An RTEMS object id packs api, class, node, and table index into one 32-bit
//! word. The exact bit positions are an ABI contract of the target kernel
//! build, so the codec is parametric over an [`IdLayout`] instead of baking
//! the numbers in; `IdLayout::classic_32()` is the published 32-bit classic
//! profile and the default.

use serde::{Deserialize, Serialize};

/// One bit field within a packed identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitField {
    /// Bit position of the field's least significant bit.
    pub shift: u32,
    /// Field width in bits.
    pub width: u32,
}

impl BitField {
    /// Extract this field from a raw identifier word. Fields shifted past
    /// the word, like zero-width fields, extract as zero; layout files are
    /// data and must not be able to panic the codec.
    pub fn extract(&self, raw: u32) -> u32 {
        if self.shift >= 32 {
            return 0;
        }
        let mask = if self.width >= 32 { u32::MAX } else { (1u32 << self.width) - 1 };
        (raw >> self.shift) & mask
    }
}

/// Bit-field layout of a packed object identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdLayout {
    /// API namespace field.
    pub api: BitField,
    /// Object class field.
    pub class: BitField,
    /// Node number field.
    pub node: BitField,
    /// Table index field.
    pub index: BitField,
}

impl IdLayout {
    /// The published 32-bit classic layout: index in bits 0..16, node in
    /// 16..24, api in 24..27, class in 27..32.
    pub fn classic_32() -> Self {
        Self {
            api: BitField { shift: 24, width: 3 },
            class: BitField { shift: 27, width: 5 },
            node: BitField { shift: 16, width: 8 },
            index: BitField { shift: 0, width: 16 },
        }
    }

    /// The 16-bit id layout used by small classic builds: index in bits 0..8,
    /// api in 8..11, class in 11..16, no node field.
    pub fn classic_16() -> Self {
        Self {
            api: BitField { shift: 8, width: 3 },
            class: BitField { shift: 11, width: 5 },
            node: BitField { shift: 16, width: 0 },
            index: BitField { shift: 0, width: 8 },
        }
    }
}

impl Default for IdLayout {
    fn default() -> Self {
        Self::classic_32()
    }
}

/// A decoded object identifier.
///
/// Only the raw word and the layout are stored; `api()`, `class()`, `node()`,
/// and `index()` recompute their projection on every call, so re-deriving a
/// field always yields the same value. Decoding is total: any bit pattern
/// decodes, whether or not it names a live object. Validity is a semantic
/// question answered by the information table, not by this codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectId {
    raw: u32,
    layout: IdLayout,
}

impl ObjectId {
    /// Decode a raw identifier word. Never fails.
    pub fn decode(raw: u32, layout: IdLayout) -> Self {
        Self { raw, layout }
    }

    /// API namespace number.
    pub fn api(&self) -> u32 {
        self.layout.api.extract(self.raw)
    }

    /// Object class number within the API.
    pub fn class(&self) -> u32 {
        self.layout.class.extract(self.raw)
    }

    /// Node number (0 on single-node builds).
    pub fn node(&self) -> u32 {
        self.layout.node.extract(self.raw)
    }

    /// 1-based table index.
    pub fn index(&self) -> u32 {
        self.layout.index.extract(self.raw)
    }

    /// The raw identifier word.
    pub fn value(&self) -> u32 {
        self.raw
    }

    /// Human-readable API name of this id.
    pub fn api_name(&self) -> &'static str {
        api_name(self.api())
    }

    /// Human-readable class name of this id.
    pub fn class_name(&self) -> &'static str {
        class_name(self.api(), self.class())
    }
}

/// Name of an API namespace number. Unknown numbers render as `"unknown"`.
pub fn api_name(api: u32) -> &'static str {
    match api {
        1 => "internal",
        2 => "classic",
        3 => "posix",
        4 => "itron",
        _ => "unknown",
    }
}

/// Name of a class number within an API namespace.
pub fn class_name(api: u32, class: u32) -> &'static str {
    match (api, class) {
        (1, 1) => "threads",
        (1, 2) => "mutexes",
        (2, 1) => "tasks",
        (2, 2) => "timers",
        (2, 3) => "semaphores",
        (2, 4) => "message_queues",
        (2, 5) => "partitions",
        (2, 6) => "regions",
        (2, 7) => "ports",
        (2, 8) => "periods",
        (2, 9) => "extensions",
        (2, 10) => "barriers",
        (3, 1) => "threads",
        (3, 2) => "keys",
        (3, 3) => "interrupts",
        (3, 5) => "message_queues",
        (3, 6) => "mutexes",
        (3, 7) => "semaphores",
        (3, 8) => "condition_variables",
        (3, 9) => "timers",
        (3, 10) => "barriers",
        (3, 11) => "spinlocks",
        (3, 12) => "rwlocks",
        _ => "unknown",
    }
}

/// The closed set of classic object kinds backed by a display adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Task,
    Timer,
    Semaphore,
    MessageQueue,
    Partition,
    Region,
    Barrier,
}

impl ObjectKind {
    /// Classify a decoded (api, class) pair. `None` means no adapter exists
    /// for the pair; callers report that as `UnknownObjectKind`.
    pub fn classify(api: u32, class: u32) -> Option<Self> {
        if api != 2 {
            return None;
        }
        match class {
            1 => Some(ObjectKind::Task),
            2 => Some(ObjectKind::Timer),
            3 => Some(ObjectKind::Semaphore),
            4 => Some(ObjectKind::MessageQueue),
            5 => Some(ObjectKind::Partition),
            6 => Some(ObjectKind::Region),
            10 => Some(ObjectKind::Barrier),
            _ => None,
        }
    }

    /// API namespace number for this kind (all classic).
    pub fn api_value(&self) -> u32 {
        2
    }

    /// Class number for this kind.
    pub fn class_value(&self) -> u32 {
        match self {
            ObjectKind::Task => 1,
            ObjectKind::Timer => 2,
            ObjectKind::Semaphore => 3,
            ObjectKind::MessageQueue => 4,
            ObjectKind::Partition => 5,
            ObjectKind::Region => 6,
            ObjectKind::Barrier => 10,
        }
    }

    /// Class name as used in reports, e.g. `semaphores`.
    pub fn class_name(&self) -> &'static str {
        class_name(self.api_value(), self.class_value())
    }

    /// C control-structure type name for records of this kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            ObjectKind::Task => "Thread_Control",
            ObjectKind::Timer => "Timer_Control",
            ObjectKind::Semaphore => "Semaphore_Control",
            ObjectKind::MessageQueue => "Message_queue_Control",
            ObjectKind::Partition => "Partition_Control",
            ObjectKind::Region => "Region_Control",
            ObjectKind::Barrier => "Barrier_Control",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_32_projections() {
        let layout = IdLayout::classic_32();
        // api=classic(2), class=semaphores(3), node=1, index=2
        let raw = (3u32 << 27) | (2 << 24) | (1 << 16) | 2;
        let id = ObjectId::decode(raw, layout);
        assert_eq!(id.api(), 2);
        assert_eq!(id.class(), 3);
        assert_eq!(id.node(), 1);
        assert_eq!(id.index(), 2);
        assert_eq!(id.value(), raw);
        assert_eq!(id.api_name(), "classic");
        assert_eq!(id.class_name(), "semaphores");
    }

    #[test]
    fn test_decode_is_total_and_deterministic() {
        let layout = IdLayout::classic_32();
        for raw in [0u32, 1, 0xDEAD_BEEF, u32::MAX, 0x8000_0001] {
            let id = ObjectId::decode(raw, layout);
            // Repeated projections of the same raw word never differ.
            assert_eq!(id.api(), id.api());
            assert_eq!(id.class(), id.class());
            assert_eq!(id.node(), id.node());
            assert_eq!(id.index(), id.index());
        }
    }

    #[test]
    fn test_out_of_range_field_extracts_zero() {
        assert_eq!(BitField { shift: 32, width: 4 }.extract(u32::MAX), 0);
        assert_eq!(BitField { shift: 63, width: 32 }.extract(0xDEAD_BEEF), 0);
        // classic_16 has a zero-width node field
        let id = ObjectId::decode(0xFFFF, IdLayout::classic_16());
        assert_eq!(id.node(), 0);
    }

    #[test]
    fn test_unknown_names() {
        assert_eq!(api_name(0), "unknown");
        assert_eq!(api_name(7), "unknown");
        assert_eq!(class_name(2, 31), "unknown");
    }

    #[test]
    fn test_classify_closed_table() {
        assert_eq!(ObjectKind::classify(2, 3), Some(ObjectKind::Semaphore));
        assert_eq!(ObjectKind::classify(2, 10), Some(ObjectKind::Barrier));
        // ports have no adapter
        assert_eq!(ObjectKind::classify(2, 7), None);
        // posix semaphores have no adapter
        assert_eq!(ObjectKind::classify(3, 7), None);
    }

    #[test]
    fn test_classify_round_trips_class_value() {
        for kind in [
            ObjectKind::Task,
            ObjectKind::Timer,
            ObjectKind::Semaphore,
            ObjectKind::MessageQueue,
            ObjectKind::Partition,
            ObjectKind::Region,
            ObjectKind::Barrier,
        ] {
            assert_eq!(ObjectKind::classify(kind.api_value(), kind.class_value()), Some(kind));
        }
    }

    #[test]
    fn test_layout_deserializes_from_json() {
        let json = r#"{
            "api":   { "shift": 24, "width": 3 },
            "class": { "shift": 27, "width": 5 },
            "node":  { "shift": 16, "width": 8 },
            "index": { "shift": 0,  "width": 16 }
        }"#;
        let layout: IdLayout = serde_json::from_str(json).unwrap();
        assert_eq!(layout, IdLayout::classic_32());
    }
}
