use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use quill_core::{Buffer, CommentConfig, LineEnding};

fn large_text(line_count: usize) -> String {
    let mut out = String::with_capacity(line_count * 64);
    for i in 0..line_count {
        out.push_str(&format!(
            "{i:06} the quick brown fox jumps over the lazy dog (quill benchmark line)\n"
        ));
    }
    // Remove the final '\n' to avoid creating an extra trailing empty line.
    out.pop();
    out
}

fn bench_large_file_open(c: &mut Criterion) {
    let text = large_text(50_000);
    c.bench_function("large_file_open/50k_lines", |b| {
        b.iter(|| {
            let buffer =
                Buffer::from_reader("bench.txt", black_box(text.as_bytes()), "utf-8", LineEnding::Auto)
                    .unwrap();
            black_box(buffer.lines_len());
        })
    });
}

fn bench_typing_in_middle(c: &mut Criterion) {
    let text = large_text(50_000);
    c.bench_function("typing_middle/100_inserts", |b| {
        b.iter_batched(
            || Buffer::from_text("bench.txt", &text),
            |mut buffer| {
                let row = buffer.lines_len() / 2;
                let mut col = 10;
                for _ in 0..100 {
                    col = buffer.insert(row, col, "x").unwrap().col;
                }
                black_box(buffer.version());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_byte_index_round_trip(c: &mut Criterion) {
    let text = large_text(50_000);
    let buffer = Buffer::from_text("bench.txt", &text);
    c.bench_function("byte_index/index_round_trip", |b| {
        b.iter(|| {
            let offset = buffer.byte_index(black_box(25_000), 12).unwrap();
            black_box(buffer.index(offset).unwrap());
        })
    });
}

fn bench_search(c: &mut Criterion) {
    let text = large_text(50_000);
    let buffer = Buffer::from_text("bench.txt", &text);
    c.bench_function("search/literal_50k_lines", |b| {
        b.iter(|| black_box(buffer.search(black_box("lazy dog")).len()))
    });
}

fn bench_toggle_comments(c: &mut Criterion) {
    let text = large_text(5_000);
    let config = CommentConfig::line("//");
    c.bench_function("toggle_line_comments/5k_lines", |b| {
        b.iter_batched(
            || Buffer::from_text("bench.rs", &text),
            |mut buffer| {
                let last = buffer.lines_len() - 1;
                buffer.toggle_line_comments(0, last, &config).unwrap();
                black_box(buffer.version());
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_large_file_open,
    bench_typing_in_middle,
    bench_byte_index_round_trip,
    bench_search,
    bench_toggle_comments
);
criterion_main!(benches);
