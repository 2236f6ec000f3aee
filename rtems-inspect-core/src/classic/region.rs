//! Region display adapter.

use super::{header_line, Displayable};
use crate::dispatch::Scope;
use crate::info::ObjectRecord;
use anyhow::Result;

// Region_Control, 32-bit classic build.
const STARTING_ADDRESS_OFFSET: u64 = 0x10;
const LENGTH_OFFSET: u64 = 0x14;
const PAGE_SIZE_OFFSET: u64 = 0x18;
const MAX_SEGMENT_SIZE_OFFSET: u64 = 0x1C;
const USED_BLOCKS_OFFSET: u64 = 0x24;

pub struct RegionAdapter {
    record: ObjectRecord,
}

impl RegionAdapter {
    pub fn new(record: ObjectRecord) -> Self {
        Self { record }
    }
}

impl Displayable for RegionAdapter {
    fn show(&self, scope: &mut Scope<'_>, verbose: bool) -> Result<String> {
        let base = self.record.address;
        let header = header_line(scope, &self.record)?;
        let start = scope.mem.read_word_32(base + STARTING_ADDRESS_OFFSET)?;
        let length = scope.mem.read_word_32(base + LENGTH_OFFSET)?;
        let used = scope.mem.read_word_32(base + USED_BLOCKS_OFFSET)?;

        let mut report = format!(
            "region {header}\n  area: 0x{start:08X} length {length}\n  used blocks: {used}"
        );
        if verbose {
            let page_size = scope.mem.read_word_32(base + PAGE_SIZE_OFFSET)?;
            let max_segment = scope.mem.read_word_32(base + MAX_SEGMENT_SIZE_OFFSET)?;
            report.push_str(&format!(
                "\n  page size: {page_size}\n  maximum segment size: {max_segment}"
            ));
        }
        Ok(report)
    }
}
