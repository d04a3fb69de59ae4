use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use intcode::interpreter::engine::Computer;
use intcode::memory::Word;
use intcode::pipeline::Pipeline;

/// Counts the input value down to zero, then outputs it
const COUNTDOWN: [Word; 12] = [3, 100, 1001, 100, -1, 100, 1005, 100, 2, 4, 100, 99];

const FEEDBACK: [Word; 29] = [
    3, 26, 1001, 26, -4, 26, 3, 27, 1002, 27, 2, 27, 1, 27, 26, 27, 4, 27, 1001, 28, -1, 28, 1005,
    28, 6, 99, 0, 0, 5,
];

fn run_countdown(computer: &mut Computer, n: Word) -> Vec<Word> {
    computer.reset();
    computer.push_input(n);
    computer.run().expect("countdown failed");
    computer.drain_output()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("reset", |b| {
        let mut computer = Computer::new(&FEEDBACK[..]);
        b.iter(|| computer.reset())
    });

    for n in [1_000, 100_000] {
        let mut group = c.benchmark_group(format!("countdown_{}", n));
        let mut computer = Computer::new(&COUNTDOWN[..]);

        // IN, then ADD + JNZ per iteration, then OUT + HLT
        let cycles = 2 * n as u64 + 3;
        group.throughput(Throughput::Elements(cycles));
        group.bench_function("run", |b| {
            b.iter(|| run_countdown(&mut computer, black_box(n)))
        });
        group.finish();
    }

    let mut group = c.benchmark_group("pipeline");
    group.bench_function("feedback", |b| {
        b.iter(|| {
            let mut pipeline = Pipeline::new(&FEEDBACK[..], 5).expect("pipeline failed");
            pipeline
                .set_phases(black_box(&[9, 8, 7, 6, 5]))
                .expect("phase setup failed");
            pipeline.run_feedback(0).expect("feedback failed")
        })
    });
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
