#![no_main]
use libfuzzer_sys::fuzz_target;

use ttf_read::{types::GlyphId, Font};

fuzz_target!(|data: &[u8]| {
    if let Ok(font) = Font::parse(data) {
        for ch in ['A', 'g', ' ', '\u{FFFF}'] {
            let _ = font.lookup_glyph_index(ch as u32);
        }
        for gid in 0..font.num_glyphs().min(64) {
            let gid = GlyphId::new(gid);
            let _ = font.advance_width(gid);
            let _ = font.left_side_bearing(gid);
            if let Ok(glyph) = font.decode_glyph(gid) {
                let mut commands = Vec::new();
                glyph.draw(&mut commands);
            }
        }
    };
});
