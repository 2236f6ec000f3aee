use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rtems_inspect_core::mock;
use rtems_inspect_core::{IdLayout, Inspector, ObjectId, TypedValue};

fn bench_id_decode(c: &mut Criterion) {
    let layout = IdLayout::classic_32();
    c.bench_function("id_decode", |b| {
        b.iter(|| {
            let id = ObjectId::decode(black_box(mock::SEM1_ID), layout);
            black_box((id.api(), id.class(), id.node(), id.index()))
        })
    });
}

fn bench_registry_resolution(c: &mut Criterion) {
    let (mem, symbols) = mock::sample_kernel();
    let mut insp = Inspector::new(mem, symbols);
    let value = TypedValue::new("Semaphore_Control", 0x0020_0000);
    c.bench_function("dispatch_semaphore_tree", |b| {
        b.iter(|| {
            let _ = black_box(insp.dispatch_value(black_box(&value)));
        })
    });
}

fn bench_object_command(c: &mut Criterion) {
    let (mem, symbols) = mock::sample_kernel();
    let mut insp = Inspector::new(mem, symbols);
    let args = vec![format!("0x{:08X}", mock::SEM1_ID)];
    c.bench_function("object_command", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            let _ = black_box(insp.object_command(&args, false, &mut out));
            black_box(out)
        })
    });
}

criterion_group!(benches, bench_id_decode, bench_registry_resolution, bench_object_command);
criterion_main!(benches);
