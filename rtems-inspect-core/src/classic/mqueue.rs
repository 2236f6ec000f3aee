//! Message queue display adapter.

use super::{dispatch_or_hex, header_line, Displayable};
use crate::dispatch::{Scope, TypedValue};
use crate::info::ObjectRecord;
use anyhow::Result;

// Message_queue_Control, 32-bit classic build.
const ATTRIBUTE_OFFSET: u64 = 0x10;
const MAX_PENDING_OFFSET: u64 = 0x14;
const PENDING_OFFSET: u64 = 0x18;
const MAX_MESSAGE_SIZE_OFFSET: u64 = 0x1C;

pub struct MessageQueueAdapter {
    record: ObjectRecord,
}

impl MessageQueueAdapter {
    pub fn new(record: ObjectRecord) -> Self {
        Self { record }
    }
}

impl Displayable for MessageQueueAdapter {
    fn show(&self, scope: &mut Scope<'_>, verbose: bool) -> Result<String> {
        let base = self.record.address;
        let header = header_line(scope, &self.record)?;
        let pending = scope.mem.read_word_32(base + PENDING_OFFSET)?;
        let max_pending = scope.mem.read_word_32(base + MAX_PENDING_OFFSET)?;

        let mut report = format!(
            "message queue {header}\n  pending: {pending} of {max_pending}"
        );
        if verbose {
            let attributes = dispatch_or_hex(
                scope,
                &TypedValue::new("rtems_attribute", base + ATTRIBUTE_OFFSET),
            )?;
            let max_size = scope.mem.read_word_32(base + MAX_MESSAGE_SIZE_OFFSET)?;
            report.push_str(&format!(
                "\n  attributes: {attributes}\n  maximum message size: {max_size}"
            ));
        }
        Ok(report)
    }
}
