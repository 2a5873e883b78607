use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};
use ytsearch_mcp::downloader::progress::parse_progress_line;
use ytsearch_mcp::search::parsers::{parse_formats, parse_video, parse_video_details};
use ytsearch_mcp::utils::validators::sanitize_filename;

fn full_info() -> Value {
    let formats: Vec<Value> = (0..40)
        .map(|i| {
            json!({
                "format_id": i.to_string(),
                "ext": if i % 2 == 0 { "mp4" } else { "webm" },
                "resolution": format!("{}x{}", 640 + i * 16, 360 + i * 9),
                "filesize": 1_000_000 + i * 50_000,
                "format_note": "DASH video"
            })
        })
        .collect();

    json!({
        "id": "dQw4w9WgXcQ",
        "title": "Rick Astley - Never Gonna Give You Up",
        "duration": 212,
        "view_count": 1_400_000_000u64,
        "like_count": 15_000_000,
        "channel": "Rick Astley",
        "timestamp": 1_256_428_800,
        "description": "The official video",
        "tags": ["rick astley", "never gonna give you up", "80s"],
        "thumbnails": [{"url": "small.jpg"}, {"url": "large.jpg"}],
        "formats": formats
    })
}

fn benchmark_info_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Info Dictionary Parsing");
    let info = full_info();

    group.bench_function("parse_video", |b| b.iter(|| parse_video(black_box(&info))));

    group.bench_function("parse_video_details", |b| {
        b.iter(|| parse_video_details(black_box(&info)))
    });

    group.bench_function("parse_formats_40", |b| {
        b.iter(|| parse_formats(black_box(&info)))
    });

    group.finish();
}

fn benchmark_progress_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("Progress Line Parsing");
    let lines = [
        ("downloading", "[download]  45.3% of 125.50MiB at 2.50MiB/s ETA 00:30"),
        ("destination", "[download] Destination: /tmp/Never Gonna Give You Up.f137.mp4"),
        ("merger", "[Merger] Merging formats into \"/tmp/Never Gonna Give You Up.mp4\""),
        ("noise", "[youtube] dQw4w9WgXcQ: Downloading webpage"),
    ];

    for (name, line) in lines {
        group.bench_function(name, |b| b.iter(|| parse_progress_line(black_box(line))));
    }

    group.finish();
}

fn benchmark_sanitize_filename(c: &mut Criterion) {
    let mut group = c.benchmark_group("Filename Sanitization");

    group.bench_function("simple", |b| {
        b.iter(|| sanitize_filename(black_box("video title")))
    });

    group.bench_function("invalid_chars", |b| {
        b.iter(|| sanitize_filename(black_box("What? <Live> at \"Wembley\" | 1987")))
    });

    let long_name = "a".repeat(500) + ".mp4";
    group.bench_function("long", |b| {
        b.iter(|| sanitize_filename(black_box(&long_name)))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_info_parsing,
    benchmark_progress_lines,
    benchmark_sanitize_filename
);
criterion_main!(benches);
