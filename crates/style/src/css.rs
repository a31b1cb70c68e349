//! Stylesheet text for the HTML report, generated from the identity table so
//! the emitted classes and the restyled package share one source of truth.
use crate::identity::{IdentityTable, TextStyle};
use crate::page::PageGeometry;
use std::fmt::Write;

/// Rendered images never grow taller than this; pagination measures against it.
pub const IMAGE_MAX_HEIGHT_PX: f32 = 300.0;
/// Vertical margin above and below an image container.
pub const IMAGE_MARGIN_PX: f32 = 16.0;

/// A font file shipped next to the report, referenced by relative path.
struct FontFace {
    family: &'static str,
    path: &'static str,
    format: &'static str,
    weight: u16,
}

const FONT_FACES: &[FontFace] = &[
    FontFace { family: "FH Lecturis", path: "fonts/FHLecturis_BSCustom_Regular.otf", format: "opentype", weight: 400 },
    FontFace { family: "FH Lecturis", path: "fonts/FHLecturis_BSCustom_Bold.otf", format: "opentype", weight: 700 },
    FontFace { family: "FH Lecturis", path: "fonts/FHLecturis_BSCustom_Light.otf", format: "opentype", weight: 300 },
    FontFace { family: "Helvetica Neue", path: "fonts/HelveticaNeue/HelveticaNeue-Light-08.ttf", format: "truetype", weight: 300 },
    FontFace { family: "Helvetica Neue", path: "fonts/HelveticaNeue/HelveticaNeue-01.ttf", format: "truetype", weight: 400 },
    FontFace { family: "Helvetica Neue", path: "fonts/HelveticaNeue/HelveticaNeue-Medium-11.ttf", format: "truetype", weight: 500 },
];

/// `@font-face` declarations for every brand font file.
pub fn font_faces() -> String {
    let mut out = String::new();
    for face in FONT_FACES {
        let _ = writeln!(
            out,
            "@font-face {{ font-family: '{}'; src: url('{}') format('{}'); font-weight: {}; font-style: normal; }}",
            face.family, face.path, face.format, face.weight
        );
    }
    out
}

fn text_rule(out: &mut String, selector: &str, style: &TextStyle, generic: &str) {
    let _ = writeln!(
        out,
        "{selector} {{ font-family: {}; font-size: {}pt; font-weight: {}; color: {}; line-height: {}; margin: {}pt 0 {}pt 0; }}",
        style.family.css_stack(generic),
        style.size_pt,
        style.weight.numeric_value(),
        style.color,
        style.line_height,
        style.space_before_pt,
        style.space_after_pt,
    );
}

/// The complete report stylesheet, font faces included.
pub fn stylesheet(identity: &IdentityTable, page: &PageGeometry) -> String {
    let mut out = font_faces();
    let palette = &identity.palette;

    let _ = writeln!(out, "@page {{ size: {}mm {}mm; margin: 0; }}", page.width_mm, page.height_mm);
    let _ = writeln!(out, "* {{ box-sizing: border-box; }}");
    let _ = writeln!(out, "body {{ margin: 0; background: #f4f4f4; }}");
    let _ = writeln!(
        out,
        ".page, .cover-page, .back-page {{ position: relative; width: {w}mm; height: {h}mm; padding: {m}mm; margin: 0 auto 10mm auto; background: white; overflow: hidden; page-break-after: always; }}",
        w = page.width_mm,
        h = page.height_mm,
        m = page.margin_mm,
    );
    let _ = writeln!(out, ".page-content {{ height: {}mm; }}", page.content_budget_mm);
    let _ = writeln!(
        out,
        ".page-footer {{ position: absolute; left: {m}mm; right: {m}mm; bottom: 10mm; display: flex; justify-content: space-between; align-items: center; }}",
        m = page.margin_mm,
    );
    let _ = writeln!(out, ".page-footer img {{ height: 18px; }}");
    text_rule(&mut out, ".page-number", &identity.page_number, "sans-serif");

    text_rule(&mut out, "h1", &identity.heading1, "serif");
    text_rule(&mut out, "h2", &identity.heading2, "serif");
    text_rule(&mut out, "h3", &identity.heading3, "serif");
    text_rule(&mut out, "h3.pseudo-heading", &identity.pseudo_heading, "serif");
    text_rule(&mut out, "p, td", &identity.body, "sans-serif");
    text_rule(&mut out, ".label", &identity.label, "sans-serif");
    let _ = writeln!(out, ".label {{ display: block; text-transform: uppercase; letter-spacing: 0.08em; }}");
    let _ = writeln!(out, "p.data-label {{ font-weight: 500; margin-bottom: 4px; }}");
    let _ = writeln!(out, "h4.instruction-header {{ font-size: 11pt; color: {}; margin: 16px 0 8px 0; }}", palette.primary);
    let _ = writeln!(out, "a.link {{ color: {}; text-decoration: underline; }}", palette.accent);

    let _ = writeln!(
        out,
        ".list-item {{ padding-left: 20px; margin: 0 0 12px 0; }} .list-item.list-continued {{ margin-top: -4px; }} .arrow {{ color: {}; margin-left: -20px; display: inline-block; width: 20px; }}",
        identity.list.glyph_color,
    );

    let hl = &identity.highlight;
    let _ = writeln!(
        out,
        ".highlight-box {{ background: {}; border-left: {}pt solid {}; padding: 16px 20px; margin: 24px 0; }} .highlight-box p:last-child {{ margin-bottom: 0; }}",
        hl.fill,
        hl.border.size_eighths as f32 / 8.0,
        hl.border.color,
    );
    let _ = writeln!(out, ".highlight-box.continued::before {{ content: '(fortsat)'; font-size: 8pt; color: {}; }}", palette.accent);

    text_rule(&mut out, "pre", &identity.code, "monospace");
    let _ = writeln!(
        out,
        "pre {{ background: {}; padding: 16px 20px; margin: 16px 0; white-space: pre-wrap; }} pre.continued::before {{ content: '(fortsat)'; display: block; color: {}; }}",
        palette.background, palette.accent,
    );
    let _ = writeln!(
        out,
        ".instruction-section {{ background: {bg}; padding: 0 20px; }} .instruction-first {{ padding-top: 16px; margin-top: 16px; }} .instruction-last, .instruction-only {{ padding-bottom: 16px; margin-bottom: 16px; }} .instruction-section pre {{ padding: 0; margin: 0; }}",
        bg = palette.background,
    );

    let table = &identity.table;
    let _ = writeln!(out, "table {{ width: 100%; border-collapse: collapse; margin: 16px 0; }}");
    text_rule(&mut out, "th", &table.header, "sans-serif");
    let _ = writeln!(
        out,
        "th {{ text-align: left; border-bottom: {}pt solid {}; padding: 8px; }} td {{ font-size: {}pt; border-bottom: {}pt solid {}; padding: 8px; margin: 0; }}",
        table.header_rule.size_eighths as f32 / 8.0,
        table.header_rule.color,
        table.cell.size_pt,
        table.row_rule.size_eighths as f32 / 8.0,
        table.row_rule.color,
    );
    let _ = writeln!(out, "table.continued::before {{ content: '(tabel fortsat)'; font-size: 8pt; color: {}; }}", palette.accent);

    let _ = writeln!(
        out,
        ".image-container {{ margin: {IMAGE_MARGIN_PX}px 0; line-height: 0; }} .image-container img {{ display: block; margin: 0 auto; max-width: 100%; max-height: {IMAGE_MAX_HEIGHT_PX}px; object-fit: contain; }}"
    );
    let _ = writeln!(out, ".toc-heading {{ margin-top: 0; }}");
    let _ = writeln!(
        out,
        ".toc-entry {{ display: flex; justify-content: space-between; padding: 8px 0; line-height: 1.5; margin: 0; border-bottom: 0.5pt solid {}; }} .toc-level-2 {{ padding-left: 20px; }} .toc-level-3 {{ padding-left: 40px; font-size: 9pt; }}",
        palette.background,
    );

    let _ = writeln!(
        out,
        ".cover-page, .back-page {{ background: {}; color: white; display: flex; flex-direction: column; justify-content: space-between; }} .cover-caption {{ letter-spacing: 0.2em; color: white; }} .cover-line {{ width: 60px; height: 3px; background: {}; margin: 16px 0; }} .cover-title {{ color: white; }} .cover-description, .cover-date {{ color: white; }} .cover-footer {{ display: flex; justify-content: space-between; align-items: center; }}",
        palette.primary, palette.accent,
    );
    let _ = writeln!(
        out,
        ".cover-content {{ margin-top: 60mm; }} .cover-decorations div {{ position: absolute; border-radius: 50%; background: {a}; opacity: 0.15; }} .cover-decorations .deco-1 {{ width: 120mm; height: 120mm; right: -40mm; top: -30mm; }} .cover-decorations .deco-2 {{ width: 60mm; height: 60mm; right: 30mm; top: 70mm; }} .cover-decorations .deco-3 {{ width: 30mm; height: 30mm; right: 15mm; bottom: 40mm; }} .cover-logo img {{ height: 25px; filter: brightness(0) invert(1); }}",
        a = palette.accent,
    );
    let _ = writeln!(out, "@media print {{ body {{ background: none; }} .page, .cover-page, .back-page {{ margin: 0; }} }}");
    out
}
