use criterion::{Criterion, black_box, criterion_group, criterion_main};

use jericho_harness::verify::{extract_demos, normalize, run_checks};

fn synthetic_capture() -> Vec<u8> {
    let mut raw = Vec::new();
    raw.extend_from_slice(b"[BOOT] JerichoOS v0.1.0 Starting...\n");
    for i in 0..2000u32 {
        raw.extend_from_slice(format!("[INFO] scheduler tick {}\n", i).as_bytes());
        if i % 400 == 0 {
            raw.push(0x00);
            raw.extend_from_slice(b"\x1b[2J");
        }
    }
    for id in 1..=5u32 {
        raw.extend_from_slice(format!("[DEMO {}] Scenario {} (detail) COMPLETE\n", id, id).as_bytes());
    }
    raw.extend_from_slice(b"Delivered 100 messages to subscriber\n");
    raw.extend_from_slice(b"All WASM Demos Complete\n");
    raw
}

fn bench_normalize(c: &mut Criterion) {
    let raw = synthetic_capture();
    c.bench_function("normalize_capture", |b| {
        b.iter(|| normalize(black_box(&raw)))
    });
}

fn bench_extract_and_checks(c: &mut Criterion) {
    let raw = synthetic_capture();
    let normalized = normalize(&raw);
    c.bench_function("extract_demos", |b| {
        b.iter(|| extract_demos(black_box(&normalized), 5))
    });
    c.bench_function("run_checks", |b| {
        b.iter(|| run_checks(black_box(&normalized)))
    });
}

criterion_group!(benches, bench_normalize, bench_extract_and_checks);
criterion_main!(benches);
