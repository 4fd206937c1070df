//! Benchmarks for the per-frame sprite cache paths.
//!
//! Every visible cell resolves its key each frame, so the hit path dominates.
//! Sizes chosen to match real usage:
//!
//! - **80x24**: Classic terminal (ssh, tmux panes).
//! - **240x80**: Full-screen 4K terminal.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use oriterm_atlas::{
    AtlasLimits, CellFlags, CellGlyph, GlyphAtlasCache, RenderingKey,
};

/// Terminal sizes that represent real usage.
const SIZES: [(usize, usize); 2] = [
    (80, 24),  // Classic VT100.
    (240, 80), // Full-screen 4K.
];

fn cache() -> GlyphAtlasCache {
    let mut cache = GlyphAtlasCache::new(AtlasLimits {
        max_texture_size: 8192,
        max_array_len: 256,
    });
    cache.set_layout(9, 18);
    cache
}

/// A screen of mostly ASCII with every 20th cell a CJK wide char + spacer.
fn screen(cols: usize, lines: usize) -> Vec<CellGlyph> {
    let mut cells = Vec::with_capacity(cols * lines);
    for line in 0..lines {
        let mut col = 0;
        while col < cols {
            if col % 20 == 19 && col + 1 < cols {
                cells.push(CellGlyph::new('好').with_flags(CellFlags::WIDE_CHAR));
                cells.push(CellGlyph::new(' ').with_flags(CellFlags::WIDE_CHAR_SPACER));
                col += 2;
            } else {
                let ch = (b'a' + ((col + line) % 26) as u8) as char;
                let flags = if line % 5 == 0 { CellFlags::BOLD } else { CellFlags::empty() };
                cells.push(CellGlyph::new(ch).with_flags(flags));
                col += 1;
            }
        }
    }
    cells
}

fn resolve_screen(cache: &mut GlyphAtlasCache, cells: &[CellGlyph]) {
    let mut prev = None;
    for cell in cells {
        let key = RenderingKey::for_cell(cell, prev);
        black_box(cache.resolve(key).ok());
        prev = Some(cell);
    }
}

fn bench_resolve_warm(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_warm");
    for (cols, lines) in SIZES {
        let cells = screen(cols, lines);
        let mut cache = cache();
        resolve_screen(&mut cache, &cells);
        cache.drain_dirty();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{cols}x{lines}")),
            &cells,
            |b, cells| b.iter(|| resolve_screen(&mut cache, cells)),
        );
    }
    group.finish();
}

fn bench_cold_frame(c: &mut Criterion) {
    // Font size change: layout reset, then a full screen of misses and a drain.
    let mut group = c.benchmark_group("cold_frame");
    for (cols, lines) in SIZES {
        let cells = screen(cols, lines);
        let mut cache = cache();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{cols}x{lines}")),
            &cells,
            |b, cells| {
                b.iter(|| {
                    cache.set_layout(9, 18);
                    resolve_screen(&mut cache, cells);
                    black_box(cache.drain_dirty().len())
                });
            },
        );
    }
    group.finish();
}

fn bench_clean_drain(c: &mut Criterion) {
    let mut cache = cache();
    cache.drain_dirty();
    c.bench_function("drain_clean", |b| b.iter(|| black_box(cache.drain_dirty())));
}

criterion_group!(benches, bench_resolve_warm, bench_cold_frame, bench_clean_drain);
criterion_main!(benches);
