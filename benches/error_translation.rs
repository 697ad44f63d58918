use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gitsay::config::settings::ConfigError;
use gitsay::error_translation::{translate_app_error, translate_git_output};
use gitsay::llm::{LLMError, SynthesisError};
use gitsay::{AppError, GitError};
use std::time::Duration;

// Representative stderr from failed git commands
const GIT_OUTPUTS: &[(&str, &str)] = &[
    ("no_upstream", "fatal: The current branch feature has no upstream branch."),
    ("merge_conflict", "CONFLICT (content): Merge conflict in file.txt"),
    ("pathspec", "error: pathspec 'input.rs' did not match any file(s) known to git"),
    ("nothing_to_commit", "nothing to commit, working tree clean"),
    ("non_fast_forward", " ! [rejected]        main -> main (non-fast-forward)"),
    ("authentication", "fatal: Authentication failed for 'https://example.com/repo.git/'"),
    ("unmatched", "fatal: something nobody has seen before"),
];

fn bench_translate_git_output(c: &mut Criterion) {
    let mut group = c.benchmark_group("translate_git_output");

    for (label, stderr) in GIT_OUTPUTS {
        group.bench_with_input(BenchmarkId::new("pattern", label), stderr, |b, stderr| {
            b.iter(|| translate_git_output(black_box(stderr)))
        });
    }

    group.finish();
}

fn bench_translate_app_error(c: &mut Criterion) {
    let errors = vec![
        AppError::Git(GitError::NotARepository),
        AppError::Config(ConfigError::InvalidValue("model must not be empty".to_string())),
        AppError::Llm(LLMError::MissingApiKey("ANTHROPIC_API_KEY".to_string())),
        AppError::Synthesis(SynthesisError::Timeout(Duration::from_secs(30))),
        AppError::Synthesis(SynthesisError::InvalidInput),
    ];

    c.bench_function("translate_app_error_all", |b| {
        b.iter(|| {
            for error in &errors {
                black_box(translate_app_error(black_box(error)));
            }
        })
    });
}

criterion_group!(benches, bench_translate_git_output, bench_translate_app_error);
criterion_main!(benches);
