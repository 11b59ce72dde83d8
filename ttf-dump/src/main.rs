//! Print the contents of a TrueType font.
//!
//! With no options this lists the table directory. Set `RUST_LOG=debug` to
//! see what the decoder skips or tolerates.

use ttf_read::{
    tables::glyf::{Glyph, SimpleGlyphFlags},
    types::{GlyphId, PenCommand},
    Font, FontBuffer,
};

fn main() -> Result<(), Error> {
    env_logger::init();
    let args = flags::Args::from_env().map_err(|e| Error(e.to_string()))?;
    let buffer = FontBuffer::load(&args.input)
        .map_err(|e| Error(format!("failed to read {}: {e}", args.input.display())))?;
    log::debug!("read {} bytes from {}", buffer.as_bytes().len(), args.input.display());
    let font = buffer.parse().map_err(Error::new)?;

    let mut printed = false;
    if args.list {
        list_tables(&font);
        printed = true;
    }
    if args.metrics {
        print_metrics(&font);
        printed = true;
    }
    if args.cmap {
        print_cmap(&font)?;
        printed = true;
    }
    if let Some(text) = &args.chars {
        print_chars(&font, text);
        printed = true;
    }
    if let Some(gid) = args.glyph {
        print_glyph(&font, GlyphId::new(gid), args.path)?;
        printed = true;
    }
    if !printed {
        list_tables(&font);
    }
    Ok(())
}

fn list_tables(font: &Font) {
    println!("Tag  Offset  Length  Checksum");
    println!("-------------------------------");

    let offset_pad = get_offset_width(font);

    for record in font.table_directory().table_records() {
        println!(
            "{0} 0x{1:02$X} {3:8} 0x{4:08X} ",
            record.tag(),
            record.offset(),
            offset_pad,
            record.length(),
            record.checksum()
        );
    }
}

fn get_offset_width(font: &Font) -> usize {
    // pick how much padding we use for offsets based on the max offset in directory
    let max_off = font
        .table_directory()
        .table_records()
        .iter()
        .map(|rec| rec.offset())
        .max()
        .unwrap_or_default();
    hex_width(max_off)
}

fn hex_width(val: u32) -> usize {
    match val {
        0..=0xffff => 4usize,
        0x10000..=0xffff_ff => 6,
        0x1000000.. => 8,
    }
}

fn print_metrics(font: &Font) {
    let head = font.head();
    let bbox = head.bbox();
    println!("unitsPerEm:   {}", font.units_per_em());
    println!("numGlyphs:    {}", font.num_glyphs());
    println!("fontRevision: {}", head.font_revision());
    println!(
        "bbox:         [{}, {}, {}, {}]",
        bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max
    );
    println!(
        "locaFormat:   {}",
        if head.is_long_loca() { "long" } else { "short" }
    );
    match font.vertical_metrics() {
        Ok(metrics) => {
            println!("ascender:     {}", metrics.ascender);
            println!("descender:    {}", metrics.descender);
            println!("lineGap:      {}", metrics.line_gap);
            println!("advanceMax:   {}", metrics.advance_width_max);
        }
        Err(e) => println!("hhea:         {e}"),
    }
}

fn print_cmap(font: &Font) -> Result<(), Error> {
    let cmap = font.cmap().map_err(Error::new)?;
    let record = cmap.selected_record();
    println!(
        "subtable: platform {} encoding {}, {} segments",
        record.platform_id(),
        record.encoding_id(),
        cmap.subtable().seg_count()
    );
    for (codepoint, gid) in cmap.subtable().iter() {
        println!("U+{codepoint:04X} {gid}");
    }
    Ok(())
}

fn print_chars(font: &Font, text: &str) {
    for ch in text.chars() {
        let gid = font.lookup_glyph_index(ch as u32);
        println!(
            "{:?} U+{:04X} {gid} advance {}",
            ch,
            ch as u32,
            font.advance_width(gid)
        );
    }
}

fn print_glyph(font: &Font, gid: GlyphId, as_path: bool) -> Result<(), Error> {
    let glyph = font.decode_glyph(gid).map_err(Error::new)?;
    let bbox = glyph.bbox();
    println!(
        "{gid}: {} contours, {} points, bbox [{}, {}, {}, {}], advance {}",
        glyph.num_contours(),
        glyph.num_points(),
        bbox.x_min,
        bbox.y_min,
        bbox.x_max,
        bbox.y_max,
        font.advance_width(gid)
    );
    if let Glyph::Composite(composite) = &glyph {
        for component in composite.components() {
            let transform = component.transform;
            println!(
                "  component {} offset ({}, {}) matrix [{} {} {} {}] flags 0x{:04X}",
                component.glyph,
                component.offset.x,
                component.offset.y,
                transform.xx,
                transform.yx,
                transform.xy,
                transform.yy,
                component.flags.bits()
            );
        }
    }
    if as_path {
        let mut commands: Vec<PenCommand> = Vec::new();
        glyph.draw(&mut commands);
        for command in commands {
            println!("  {}", format_command(&command));
        }
    } else {
        for (i, contour) in glyph.contours().enumerate() {
            println!("  contour {i}");
            for point in contour {
                let flag = if point.on_curve {
                    SimpleGlyphFlags::ON_CURVE_POINT.bits()
                } else {
                    0
                };
                println!("    {:6} {:6} {}", point.x, point.y, flag);
            }
        }
    }
    Ok(())
}

fn format_command(command: &PenCommand) -> String {
    match command {
        PenCommand::MoveTo { x, y } => format!("M {x} {y}"),
        PenCommand::LineTo { x, y } => format!("L {x} {y}"),
        PenCommand::QuadTo { cx0, cy0, x, y } => format!("Q {cx0} {cy0} {x} {y}"),
        PenCommand::Close => "Z".to_string(),
    }
}

#[derive(Debug, Clone)]
struct Error(String);

impl Error {
    fn new(t: impl std::fmt::Display) -> Self {
        Self(t.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for Error {}

mod flags {
    use std::path::PathBuf;

    xflags::xflags! {
        /// Inspect a TrueType font
        cmd args {
            /// Path to the font file
            required input: PathBuf
            /// List the table directory
            optional -l, --list
            /// Print the global metrics
            optional -m, --metrics
            /// Print every codepoint mapped by the cmap
            optional --cmap
            /// Print the glyph and advance of each character in the text
            optional -c, --chars text: String
            /// Print the outline of a glyph
            optional -g, --glyph gid: u16
            /// With --glyph, print path commands rather than points
            optional -p, --path
        }
    }
}
