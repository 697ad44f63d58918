use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gitsay::security::CommandGuard;

const COMMANDS: &[(&str, &str)] = &[
    ("safe_status", "git status"),
    ("safe_commit", "git commit -m 'fix: handle empty input; add tests'"),
    ("destructive_push", "git push --force-with-lease origin main"),
    ("combined_flags", "git clean -fdx"),
    ("unknown", "git bisect start HEAD v1.0"),
    ("rejected_chain", "git add . && git commit"),
];

fn bench_guard_check(c: &mut Criterion) {
    let guard = CommandGuard::new();
    let mut group = c.benchmark_group("guard_check");

    for (label, command) in COMMANDS {
        let tokens = shlex::split(command).unwrap_or_default();
        group.bench_with_input(BenchmarkId::new("command", label), &tokens, |b, tokens| {
            b.iter(|| guard.check(black_box(tokens)))
        });
    }

    group.finish();
}

fn bench_guard_construction(c: &mut Criterion) {
    c.bench_function("guard_new", |b| b.iter(CommandGuard::new));
}

criterion_group!(benches, bench_guard_check, bench_guard_construction);
criterion_main!(benches);
