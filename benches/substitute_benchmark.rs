//! Benchmarks for docfill substitution performance.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use docfill::{ReplacementMap, RewriteOptions};
use std::io::Cursor;

/// Body XML with `paragraph_count` paragraphs, each holding two placeholders.
fn create_body(paragraph_count: usize) -> String {
    let mut content = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>"#,
    );

    for i in 0..paragraph_count {
        content.push_str(&format!(
            r#"
    <w:p>
      <w:r>
        <w:t>Paragraph {} for {{{{customer}}}} about {{{{topic_{}}}}}.</w:t>
      </w:r>
    </w:p>"#,
            i,
            i % 10
        ));
    }

    content.push_str(
        r#"
  </w:body>
</w:document>"#,
    );
    content
}

/// Creates a synthetic DOCX template with the given number of paragraphs.
fn create_test_docx(paragraph_count: usize) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let mut buffer = Vec::new();
    let mut zip = ZipWriter::new(Cursor::new(&mut buffer));

    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#,
    )
    .unwrap();

    zip.start_file("word/media/image1.png", options).unwrap();
    zip.write_all(&vec![0x5a; 64 * 1024]).unwrap();

    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(create_body(paragraph_count).as_bytes())
        .unwrap();

    zip.finish().unwrap();
    buffer
}

fn replacements() -> ReplacementMap {
    let mut map = ReplacementMap::new();
    map.insert("customer".to_string(), "Ada Lovelace".to_string());
    for i in 0..5 {
        map.insert(format!("topic_{}", i), format!("topic number {}", i));
    }
    map
}

/// Benchmark raw body substitution at various sizes.
fn bench_substitute(c: &mut Criterion) {
    let mut group = c.benchmark_group("substitute");
    let map = replacements();

    for para_count in [10, 100, 1000].iter() {
        let body = create_body(*para_count);

        group.throughput(Throughput::Bytes(body.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("paragraphs", para_count),
            &body,
            |b, body| {
                b.iter(|| docfill::substitute(black_box(body.as_bytes()), &map));
            },
        );
    }

    group.finish();
}

/// Benchmark full package rewriting.
fn bench_rewrite(c: &mut Criterion) {
    let mut group = c.benchmark_group("rewrite");
    let map = replacements();
    let options = RewriteOptions::default();

    for para_count in [10, 100, 1000].iter() {
        let data = create_test_docx(*para_count);

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("paragraphs", para_count),
            &data,
            |b, data| {
                b.iter(|| {
                    let _ = docfill::rewrite_bytes(black_box(data), &map, &options);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_substitute, bench_rewrite);
criterion_main!(benches);
