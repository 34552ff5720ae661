// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Knine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Knine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use knine::command::classify;
use knine::navigator::breadcrumbs;
use knine::render::escape_html;

// Group names (`command.classify`, `navigator.breadcrumbs`, `render.escape_html`) and case IDs
// stay stable so results remain comparable across refactors.
fn benches_command(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("command.classify");
        for (case_id, input) in [
            ("chat", "what did the quarterly report say about churn?"),
            ("search", "/search vector database tuning"),
            ("ingest_many", "/ingest /srv/docs/a.md /srv/docs/b.md /srv/docs/c.md /srv/notes"),
            ("stats", "  /stats  "),
        ] {
            group.throughput(Throughput::Bytes(input.len() as u64));
            group.bench_function(case_id, |b| b.iter(|| classify(black_box(input))));
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("navigator.breadcrumbs");
        let deep = format!("/{}", (0..32).map(|idx| format!("dir{idx}")).collect::<Vec<_>>().join("/"));
        for (case_id, path) in [
            ("posix_short", "/srv/docs".to_owned()),
            ("windows", r"C:\Users\k9\Documents\projects\knine".to_owned()),
            ("posix_deep", deep),
        ] {
            group.bench_function(case_id, move |b| b.iter(|| breadcrumbs(black_box(&path)).len()));
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("render.escape_html");
        let plain = "fn main() { println!(\"hello\"); }\n".repeat(64);
        let markup = "<div class=\"x\">a & b 'c'</div>\n".repeat(64);
        for (case_id, text) in [("plain", plain), ("markup_heavy", markup)] {
            group.throughput(Throughput::Bytes(text.len() as u64));
            group.bench_function(case_id, move |b| b.iter(|| escape_html(black_box(&text)).len()));
        }
        group.finish();
    }
}

criterion_group!(benches, benches_command);
criterion_main!(benches);
