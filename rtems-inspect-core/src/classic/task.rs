//! Task display adapter.

use super::{dispatch_or_hex, header_line, Displayable};
use crate::dispatch::{Scope, TypedValue};
use crate::info::ObjectRecord;
use anyhow::Result;

// Thread_Control, 32-bit classic build, after the 16-byte Objects_Control
// header. May vary by kernel version and configuration.
const STATE_OFFSET: u64 = 0x10;
const CURRENT_PRIORITY_OFFSET: u64 = 0x14;
const REAL_PRIORITY_OFFSET: u64 = 0x18;
const RESOURCE_COUNT_OFFSET: u64 = 0x1C;
const CPU_TIME_OFFSET: u64 = 0x20;

pub struct TaskAdapter {
    record: ObjectRecord,
}

impl TaskAdapter {
    pub fn new(record: ObjectRecord) -> Self {
        Self { record }
    }
}

impl Displayable for TaskAdapter {
    fn show(&self, scope: &mut Scope<'_>, verbose: bool) -> Result<String> {
        let base = self.record.address;
        let header = header_line(scope, &self.record)?;
        let state = dispatch_or_hex(
            scope,
            &TypedValue::new("States_Control", base + STATE_OFFSET),
        )?;
        let priority = scope.mem.read_word_32(base + CURRENT_PRIORITY_OFFSET)?;

        let mut report =
            format!("task {header}\n  state: {state}\n  priority: {priority}");
        if verbose {
            let real_priority = scope.mem.read_word_32(base + REAL_PRIORITY_OFFSET)?;
            let resources = scope.mem.read_word_32(base + RESOURCE_COUNT_OFFSET)?;
            let cpu_time = scope.mem.read_word_32(base + CPU_TIME_OFFSET)?;
            report.push_str(&format!(
                "\n  real priority: {real_priority}\n  resources held: {resources}\n  cpu time used: {cpu_time}"
            ));
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
    fn test_task_report_states() {
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

        let ready = TaskAdapter::new(ObjectRecord {
            address: 0x0020_1000,
            type_name: "Thread_Control".to_string(),
        })
        .show(&mut scope, false)
        .unwrap();
        assert!(ready.contains("'UI1 '"), "{ready}");
        assert!(ready.contains("state: READY"), "{ready}");
        assert!(ready.contains("priority: 5"), "{ready}");

        let blocked = TaskAdapter::new(ObjectRecord {
            address: 0x0020_1100,
            type_name: "Thread_Control".to_string(),
        })
        .show(&mut scope, false)
        .unwrap();
        assert!(blocked.contains("WAITING-FOR-SEMAPHORE"), "{blocked}");
    }
}
