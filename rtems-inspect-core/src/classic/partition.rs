//! Partition display adapter.

use super::{dispatch_or_hex, header_line, Displayable};
use crate::dispatch::{Scope, TypedValue};
use crate::info::ObjectRecord;
use anyhow::Result;

// Partition_Control, 32-bit classic build.
const STARTING_ADDRESS_OFFSET: u64 = 0x10;
const LENGTH_OFFSET: u64 = 0x14;
const BUFFER_SIZE_OFFSET: u64 = 0x18;
const ATTRIBUTE_OFFSET: u64 = 0x1C;
const USED_BLOCKS_OFFSET: u64 = 0x20;

pub struct PartitionAdapter {
    record: ObjectRecord,
}

impl PartitionAdapter {
    pub fn new(record: ObjectRecord) -> Self {
        Self { record }
    }
}

impl Displayable for PartitionAdapter {
    fn show(&self, scope: &mut Scope<'_>, verbose: bool) -> Result<String> {
        let base = self.record.address;
        let header = header_line(scope, &self.record)?;
        let start = scope.mem.read_word_32(base + STARTING_ADDRESS_OFFSET)?;
        let length = scope.mem.read_word_32(base + LENGTH_OFFSET)?;
        let buffer_size = scope.mem.read_word_32(base + BUFFER_SIZE_OFFSET)?;
        let used = scope.mem.read_word_32(base + USED_BLOCKS_OFFSET)?;

        let mut report = format!(
            "partition {header}\n  area: 0x{start:08X} length {length}\n  buffer size: {buffer_size}\n  used blocks: {used}"
        );
        if verbose {
            let attributes = dispatch_or_hex(
                scope,
                &TypedValue::new("rtems_attribute", base + ATTRIBUTE_OFFSET),
            )?;
            report.push_str(&format!("\n  attributes: {attributes}"));
        }
        Ok(report)
    }
}
