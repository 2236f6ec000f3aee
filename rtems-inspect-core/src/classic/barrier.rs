//! Barrier display adapter.

use super::{header_line, Displayable};
use crate::dispatch::Scope;
use crate::info::ObjectRecord;
use anyhow::Result;

// Barrier_Control, 32-bit classic build. A zero maximum count means the
// barrier is manually released.
const ATTRIBUTE_OFFSET: u64 = 0x10;
const MAX_COUNT_OFFSET: u64 = 0x14;
const WAITING_OFFSET: u64 = 0x18;

pub struct BarrierAdapter {
    record: ObjectRecord,
}

impl BarrierAdapter {
    pub fn new(record: ObjectRecord) -> Self {
        Self { record }
    }
}

impl Displayable for BarrierAdapter {
    fn show(&self, scope: &mut Scope<'_>, verbose: bool) -> Result<String> {
        let base = self.record.address;
        let header = header_line(scope, &self.record)?;
        let max_count = scope.mem.read_word_32(base + MAX_COUNT_OFFSET)?;
        let waiting = scope.mem.read_word_32(base + WAITING_OFFSET)?;

        let release = if max_count == 0 {
            "manual release".to_string()
        } else {
            format!("automatic release at {max_count}")
        };
        let mut report =
            format!("barrier {header}\n  {release}\n  waiting threads: {waiting}");
        if verbose {
            let attributes = scope.mem.read_word_32(base + ATTRIBUTE_OFFSET)?;
            report.push_str(&format!("\n  attribute set: 0x{attributes:08X}"));
        }
        Ok(report)
    }
}
