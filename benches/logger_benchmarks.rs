//! Criterion benchmarks for leveled_logger

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use leveled_logger::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use std::thread;

/// Benchmarks use discarding writers so only formatting and dispatch count
fn discarding_logs(flags: Flags) -> Logs {
    let mut builder = Logs::builder();
    for level in Severity::ALL {
        builder = builder.writer(level, DiscardWriter::new(), format!("[{}] ", level.label()), flags);
    }
    builder.build()
}

// ============================================================================
// Dispatch Benchmarks
// ============================================================================

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    group.throughput(Throughput::Elements(1));

    let unconfigured = Logs::new();
    group.bench_function("discarded_level", |b| {
        b.iter(|| unconfigured.infof(black_box(format_args!("Info message"))));
    });

    let logs = discarding_logs(Flags::NONE);
    group.bench_function("printf_no_header", |b| {
        b.iter(|| logs.infof(format_args!("request {} took {}ms", black_box(42), black_box(7))));
    });

    group.bench_function("logger_handle", |b| {
        b.iter(|| black_box(logs.info_logger()));
    });

    group.finish();
}

// ============================================================================
// Header Benchmarks
// ============================================================================

fn bench_headers(c: &mut Criterion) {
    let mut group = c.benchmark_group("headers");
    group.throughput(Throughput::Elements(1));

    for (name, flags) in [
        ("none", Flags::NONE),
        ("std", Flags::STD),
        ("std_shortfile", Flags::STD | Flags::SHORT_FILE),
        ("micro_utc_longfile", Flags::STD | Flags::MICROSECONDS | Flags::UTC | Flags::LONG_FILE),
    ] {
        let logs = discarding_logs(flags);
        group.bench_with_input(BenchmarkId::from_parameter(name), &logs, |b, logs| {
            b.iter(|| logs.warnf(black_box(format_args!("Warning message"))));
        });
    }

    group.finish();
}

// ============================================================================
// Serialization Benchmarks
// ============================================================================

#[derive(Serialize)]
struct Request<'a> {
    method: &'a str,
    path: &'a str,
    status: u16,
    elapsed_ms: f64,
}

fn bench_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialization");
    group.throughput(Throughput::Elements(1));

    let logs = discarding_logs(Flags::NONE);

    group.bench_function("tuple", |b| {
        b.iter(|| logs.info(&(black_box("user"), black_box(42), black_box(true))));
    });

    let request = Request {
        method: "GET",
        path: "/api/v1/items",
        status: 200,
        elapsed_ms: 3.25,
    };
    group.bench_function("struct", |b| {
        b.iter(|| logs.info(black_box(&request)));
    });

    group.finish();
}

// ============================================================================
// Broadcast Benchmarks
// ============================================================================

fn bench_broadcast(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadcast");
    group.throughput(Throughput::Elements(Severity::COUNT as u64));

    let logs = discarding_logs(Flags::STD);
    group.bench_function("allf", |b| {
        b.iter(|| logs.allf(black_box(format_args!("to every level"))));
    });

    group.finish();
}

// ============================================================================
// Concurrent Logging Benchmarks
// ============================================================================

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");

    for threads in [2usize, 4, 8] {
        let per_thread = 1000usize;
        group.throughput(Throughput::Elements((threads * per_thread) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            let logs = Arc::new(discarding_logs(Flags::NONE));
            b.iter(|| {
                let handles: Vec<_> = (0..threads)
                    .map(|t| {
                        let logs = Arc::clone(&logs);
                        thread::spawn(move || {
                            for i in 0..per_thread {
                                let _ = logs.infof(format_args!("thread {} message {}", t, i));
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    let _ = handle.join();
                }
            });
        });
    }

    group.finish();
}

// ============================================================================
// Configuration Benchmarks
// ============================================================================

fn bench_configuration(c: &mut Criterion) {
    let mut group = c.benchmark_group("configuration");

    let document = r#"{
        "critical": {"kind": "discard", "prefix": "[CRITICAL] ", "flag": 3},
        "error": {"kind": "discard", "prefix": "[ERROR] ", "flag": "log.Ldate|log.Ltime"},
        "info": {"kind": "discard", "prefix": "[INFO] "}
    }"#;

    group.bench_function("parse_json", |b| {
        b.iter(|| Config::from_json_str(black_box(document)));
    });

    let logs = Logs::new();
    let config = Config::from_json_str(document).expect("valid document");
    group.bench_function("apply", |b| {
        b.iter(|| logs.apply_config(black_box(&config)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_dispatch,
    bench_headers,
    bench_serialization,
    bench_broadcast,
    bench_concurrent_logging,
    bench_configuration,
);

criterion_main!(benches);
