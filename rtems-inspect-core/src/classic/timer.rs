//! Timer display adapter.

use super::{header_line, Displayable};
use crate::dispatch::Scope;
use crate::info::ObjectRecord;
use anyhow::Result;

// Timer_Control, 32-bit classic build: the watchdog sits right after the
// object header.
const WATCHDOG_STATE_OFFSET: u64 = 0x10;
const INITIAL_OFFSET: u64 = 0x14;
const REMAINING_OFFSET: u64 = 0x18;

fn watchdog_state(raw: u32) -> &'static str {
    match raw {
        0 => "inactive",
        1 => "being inserted",
        2 => "active",
        3 => "remove pending",
        _ => "unknown",
    }
}

pub struct TimerAdapter {
    record: ObjectRecord,
}

impl TimerAdapter {
    pub fn new(record: ObjectRecord) -> Self {
        Self { record }
    }
}

impl Displayable for TimerAdapter {
    fn show(&self, scope: &mut Scope<'_>, verbose: bool) -> Result<String> {
        let base = self.record.address;
        let header = header_line(scope, &self.record)?;
        let state = scope.mem.read_word_32(base + WATCHDOG_STATE_OFFSET)?;
        let initial = scope.mem.read_word_32(base + INITIAL_OFFSET)?;

        let mut report = format!(
            "timer {header}\n  state: {}\n  interval: {initial} ticks",
            watchdog_state(state)
        );
        if verbose {
            let remaining = scope.mem.read_word_32(base + REMAINING_OFFSET)?;
            report.push_str(&format!("\n  remaining: {remaining} ticks"));
        }
        Ok(report)
    }
}
