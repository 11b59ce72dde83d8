use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ttf_read::{
    tables::cmap::Cmap4,
    types::{GlyphId, NullPen},
    Font, FontData, FontRead,
};

fn cmap_lookup(c: &mut Criterion) {
    let data = ttf_test_data::cmap::mixed_cmap4();
    let cmap = Cmap4::read(FontData::new(&data)).unwrap();
    c.bench_function("cmap4_lookup_bmp", |b| {
        b.iter(|| {
            for codepoint in 0..=0xFFFFu32 {
                black_box(cmap.map_codepoint(codepoint));
            }
        })
    });
}

fn decode_and_draw(c: &mut Criterion) {
    let data = ttf_test_data::simple_font();
    let font = Font::parse(&data).unwrap();
    // the last glyph is a cycle and always fails
    let glyph_count = font.num_glyphs() - 1;
    c.bench_function("decode_and_draw", |b| {
        b.iter(|| {
            for gid in 0..glyph_count {
                let glyph = font.decode_glyph(GlyphId::new(gid)).unwrap();
                glyph.draw(&mut NullPen);
            }
        })
    });
    c.bench_function("decode_cycle", |b| {
        b.iter(|| black_box(font.decode_glyph(GlyphId::new(glyph_count))))
    });
}

criterion_group!(benches, cmap_lookup, decode_and_draw);
criterion_main!(benches);
