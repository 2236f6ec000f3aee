//! Operator command batch semantics against the sample kernel image.

use rtems_inspect_core::mock;
use rtems_inspect_core::{InspectError, Inspector, SymbolManager};

fn inspector() -> Inspector<mock::MockTarget> {
    let (mem, symbols) = mock::sample_kernel();
    Inspector::new(mem, symbols)
}

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_object_batch_stops_at_first_malformed_argument() {
    let mut insp = inspector();
    let mut out = Vec::new();

    // A valid id, then a malformed argument, then another valid id that
    // must never be attempted.
    let batch = args(&[&format!("0x{:08X}", mock::SEM1_ID), "abc", &format!("{}", mock::TASK1_ID)]);
    let err = insp.object_command(&batch, false, &mut out).unwrap_err();

    assert!(matches!(err, InspectError::MalformedArgument(ref a) if a == "abc"));
    // The first argument rendered fully: header line plus report.
    assert_eq!(out.len(), 2);
    assert!(out[0].starts_with("API:classic Class:semaphores"));
    assert!(out[1].contains("'SEM1'"), "{}", out[1]);
    // Nothing from the third argument.
    assert!(!out.iter().any(|l| l.contains("UI1")));
}

#[test]
fn test_object_invalid_identifier_aborts_batch() {
    let mut insp = inspector();
    let mut out = Vec::new();

    let batch = args(&["0xDEADBEEF", &format!("0x{:08X}", mock::SEM1_ID)]);
    let err = insp.object_command(&batch, false, &mut out).unwrap_err();

    assert!(matches!(err, InspectError::InvalidIdentifier(0xDEAD_BEEF)));
    assert!(out.is_empty());
}

#[test]
fn test_unknown_kind_is_reported_and_batch_continues() {
    let mut insp = inspector();
    let mut out = Vec::new();

    let batch = args(&[&format!("0x{:08X}", mock::PORT1_ID), &format!("0x{:08X}", mock::SEM2_ID)]);
    insp.object_command(&batch, false, &mut out).unwrap();

    assert_eq!(out.len(), 4);
    assert!(out[0].contains("Class:ports"), "{}", out[0]);
    assert!(out[1].contains("no display adapter for classic/ports"), "{}", out[1]);
    assert!(out[2].contains("Class:semaphores"), "{}", out[2]);
    assert!(out[3].contains("'SEM2'"), "{}", out[3]);
}

#[test]
fn test_semaphore_index_boundaries() {
    let mut insp = inspector();

    let mut out = Vec::new();
    let err = insp.semaphore_command(&args(&["0"]), false, &mut out).unwrap_err();
    assert!(matches!(err, InspectError::IndexOutOfRange { index: 0, class: "semaphores" }));

    let above = (mock::SEM_COUNT + 1).to_string();
    let err = insp.semaphore_command(&args(&[&above]), false, &mut out).unwrap_err();
    assert!(matches!(err, InspectError::IndexOutOfRange { .. }));
    assert!(out.is_empty());

    insp.semaphore_command(&args(&["1"]), false, &mut out).unwrap();
    insp.semaphore_command(&args(&[&mock::SEM_COUNT.to_string()]), false, &mut out).unwrap();
    assert_eq!(out.len(), 2);
    assert!(out[0].contains("'SEM1'"), "{}", out[0]);
    assert!(out[1].contains("'SEM2'"), "{}", out[1]);
}

#[test]
fn test_index_batch_stops_at_first_out_of_range() {
    let mut insp = inspector();
    let mut out = Vec::new();

    let err = insp.task_command(&args(&["1", "9", "2"]), false, &mut out).unwrap_err();
    assert!(matches!(err, InspectError::IndexOutOfRange { index: 9, class: "tasks" }));
    // Task 1 rendered, task 2 never attempted.
    assert_eq!(out.len(), 1);
    assert!(out[0].contains("'UI1 '"), "{}", out[0]);
}

#[test]
fn test_round_trip_id_and_index_render_identically() {
    let mut by_id_out = Vec::new();
    inspector()
        .object_command(&args(&[&format!("0x{:08X}", mock::SEM1_ID)]), true, &mut by_id_out)
        .unwrap();

    let mut by_index_out = Vec::new();
    inspector().semaphore_command(&args(&["1"]), true, &mut by_index_out).unwrap();

    // The by-id path adds its decode line; the rendered report must match.
    assert_eq!(by_id_out[1], by_index_out[0]);
}

#[test]
fn test_mqueue_command_reports_pending() {
    let mut insp = inspector();
    let mut out = Vec::new();
    insp.mqueue_command(&args(&["1"]), true, &mut out).unwrap();
    assert!(out[0].contains("'MQ1 '"), "{}", out[0]);
    assert!(out[0].contains("pending: 2 of 16"), "{}", out[0]);
    assert!(out[0].contains("maximum message size: 64"), "{}", out[0]);
}

#[test]
fn test_every_adapter_kind_renders_via_object_command() {
    let mut insp = inspector();
    let mut out = Vec::new();
    let batch = args(&[
        &format!("0x{:08X}", mock::TASK1_ID),
        &format!("0x{:08X}", mock::TIMER1_ID),
        &format!("0x{:08X}", mock::SEM1_ID),
        &format!("0x{:08X}", mock::MQ1_ID),
        &format!("0x{:08X}", mock::PART1_ID),
        &format!("0x{:08X}", mock::REGION1_ID),
        &format!("0x{:08X}", mock::BARRIER1_ID),
    ]);
    insp.object_command(&batch, true, &mut out).unwrap();

    // Seven header lines and seven reports.
    assert_eq!(out.len(), 14);
    assert!(out[3].contains("timer"), "{}", out[3]);
    assert!(out[3].contains("interval: 100 ticks"), "{}", out[3]);
    assert!(out[9].contains("buffer size: 128"), "{}", out[9]);
    assert!(out[11].contains("region"), "{}", out[11]);
    assert!(out[13].contains("manual release"), "{}", out[13]);
    assert!(out[13].contains("waiting threads: 2"), "{}", out[13]);
}

#[test]
fn test_cache_invalidated_even_when_command_fails() {
    let mut insp = inspector();
    let before = insp.generation();
    let mut out = Vec::new();
    let _ = insp.object_command(&args(&["bogus"]), false, &mut out);
    assert!(insp.generation() > before);
    assert_eq!(insp.depth(), 0);
}

#[test]
fn test_missing_symbols_surface_as_target_fault() {
    let (mem, _) = mock::sample_kernel();
    let mut insp = Inspector::new(mem, SymbolManager::new());
    let mut out = Vec::new();
    let err = insp.semaphore_command(&args(&["1"]), false, &mut out).unwrap_err();
    assert!(matches!(err, InspectError::Target(_)));
}
