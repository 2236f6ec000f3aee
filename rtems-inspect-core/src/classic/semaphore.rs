//! Semaphore display adapter.

use super::{dispatch_or_hex, header_line, Displayable};
use crate::dispatch::{Scope, TypedValue};
use crate::formatters::classic::{
    SEM_ATTRIBUTE_OFFSET, SEM_COUNT_OFFSET, SEM_HOLDER_OFFSET, SEM_NEST_OFFSET,
};
use crate::info::ObjectRecord;
use anyhow::Result;

pub struct SemaphoreAdapter {
    record: ObjectRecord,
}

impl SemaphoreAdapter {
    pub fn new(record: ObjectRecord) -> Self {
        Self { record }
    }
}

impl Displayable for SemaphoreAdapter {
    fn show(&self, scope: &mut Scope<'_>, verbose: bool) -> Result<String> {
        let base = self.record.address;
        let header = header_line(scope, &self.record)?;
        let attributes = dispatch_or_hex(
            scope,
            &TypedValue::new("rtems_attribute", base + SEM_ATTRIBUTE_OFFSET),
        )?;
        let count = scope.mem.read_word_32(base + SEM_COUNT_OFFSET)?;

        let mut report = format!("semaphore {header}\n  attributes: {attributes}\n  count: {count}");
        if verbose {
            let holder = dispatch_or_hex(
                scope,
                &TypedValue::new("rtems_id", base + SEM_HOLDER_OFFSET),
            )?;
            let nest = scope.mem.read_word_32(base + SEM_NEST_OFFSET)?;
            report.push_str(&format!("\n  holder: {holder} nest: {nest}"));
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DispatchContext;
    use crate::formatters::default_registry;
    use crate::id::IdLayout;
    use crate::info::{InfoTableLayout, ObjectInfoTable};
    use crate::mock;

    #[test]
    fn test_semaphore_report() {
        let (mut mem, symbols) = mock::sample_kernel();
        let registry = default_registry(IdLayout::classic_32());
        let mut info = ObjectInfoTable::new(InfoTableLayout::default());
        let mut ctx = DispatchContext::new();
        let mut scope = Scope {
            registry: &registry,
            mem: &mut mem,
            info: &mut info,
            symbols: &symbols,
            ctx: &mut ctx,
        };

        let record =
            ObjectRecord { address: 0x0020_0000, type_name: "Semaphore_Control".to_string() };
        let adapter = SemaphoreAdapter::new(record);
        let report = adapter.show(&mut scope, true).unwrap();

        assert!(report.contains("'SEM1'"), "{report}");
        assert!(report.contains("LOCAL,PRIORITY,BINARY"), "{report}");
        assert!(report.contains("count: 0"), "{report}");
        assert!(report.contains("nest: 1"), "{report}");

        let terse = SemaphoreAdapter::new(ObjectRecord {
            address: 0x0020_0000,
            type_name: "Semaphore_Control".to_string(),
        })
        .show(&mut scope, false)
        .unwrap();
        assert!(!terse.contains("holder"), "{terse}");
    }
}
