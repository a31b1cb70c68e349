mod common;

use common::{DocxBuilder, TestResult, init_logging};
use docstage::{
    AppConfig, Block, ConvertOptions, DocxPackage, EstimatingMeasurer, PipelineError, SourceError, convert_to_html,
    extract_paragraphs_for_analysis, restyle_document,
};
use docstage_types::Color;
use pretty_assertions::assert_eq;

fn report() -> DocxBuilder {
    DocxBuilder::new()
        .heading(1, "Kvartalsrapport")
        .paragraph("Dato: 1. april")
        .heading(1, "1. Indledning")
        .paragraph("Kvartalet bød på stabil drift og færre hændelser end forventet.")
        .heading(2, "1.1 Omfang")
        .paragraph("• Alle produktionssystemer")
        .paragraph("Anbefaling: Vi foreslår at udvide overvågningen til også at omfatte de nye integrationer i næste kvartal.")
        .table(&[&["System", "Oppetid"], &["Web", "99,9 %"]])
        .heading(1, "Bilag")
        .paragraph("Rådata findes i arkivet.")
}

#[test]
fn converts_a_package_from_disk() -> TestResult {
    init_logging();
    let file = report().write_temp()?;
    let package = DocxPackage::open(file.path())?;
    let blocks = package.read_blocks()?;
    assert_eq!(blocks.len(), 10);

    let config = AppConfig::default();
    let measurer = EstimatingMeasurer::new(config.identity.clone());
    let output = convert_to_html(&blocks, &ConvertOptions::new(), &measurer, &config);

    assert_eq!(output.title, "Kvartalsrapport");
    assert!(output.html.contains("<h1>1. Indledning</h1>"));
    assert!(output.html.contains("<h2>1\u{2009}.1 Omfang</h2>"));
    assert!(output.html.contains(r#"<div class="highlight-box"><p>Anbefaling:"#));
    assert!(output.html.contains("<th>System</th>"));
    assert!(!output.html.contains("Dato: 1. april"));
    assert_eq!(output.toc.len(), 3);
    Ok(())
}

#[test]
fn restyling_keeps_structure_and_applies_the_identity() -> TestResult {
    init_logging();
    let package = DocxPackage::from_bytes(report().build())?;
    let config = AppConfig::default();
    let bytes = restyle_document(&package, &config)?;

    let original = package.read_blocks()?;
    let restyled = DocxPackage::from_bytes(bytes)?.read_blocks()?;
    assert_eq!(restyled.len(), original.len());
    assert!(matches!(restyled[7], Block::Table(_)));

    let primary = config.identity.palette.primary;
    let heading = restyled[2].as_paragraph().expect("heading paragraph");
    assert_eq!(heading.style.as_deref(), Some("Heading 1"));
    assert_eq!(heading.runs[0].size_pt, Some(32.0));
    assert_eq!(heading.runs[0].color, Some(primary));
    assert_eq!(heading.runs[0].font.as_deref(), Some("FH Lecturis"));

    let item = restyled[5].as_paragraph().expect("list paragraph");
    assert_eq!(item.text(), "→ Alle produktionssystemer");
    assert_eq!(item.runs[0].color, Some(config.identity.palette.accent));

    let callout = restyled[6].as_paragraph().expect("callout paragraph");
    assert_eq!(callout.format.shading, Some(Color::rgb(0xee, 0xf2, 0xff)));
    assert_eq!(callout.format.space_before_pt, Some(10.0));

    let body = restyled[3].as_paragraph().expect("body paragraph");
    assert_eq!(body.runs[0].size_pt, Some(10.0));
    assert_eq!(body.runs[0].font.as_deref(), Some("Helvetica Neue"));
    Ok(())
}

#[test]
fn restyling_promotes_large_bold_text_to_headings() -> TestResult {
    let package = DocxPackage::from_bytes(DocxBuilder::new().sized("Stor overskrift", 26.0).sized("Mindre", 18.0).build())?;
    let bytes = restyle_document(&package, &AppConfig::default())?;
    let blocks = DocxPackage::from_bytes(bytes)?.read_blocks()?;

    let styles: Vec<Option<&str>> =
        blocks.iter().filter_map(Block::as_paragraph).map(|p| p.style.as_deref()).collect();
    assert_eq!(styles, vec![Some("Heading 1"), Some("Heading 2")]);
    Ok(())
}

#[test]
fn restyling_twice_changes_nothing_more() -> TestResult {
    let config = AppConfig::default();
    let once = restyle_document(&DocxPackage::from_bytes(report().build())?, &config)?;
    let once_pkg = DocxPackage::from_bytes(once)?;
    let twice = restyle_document(&once_pkg, &config)?;

    let first = once_pkg.read_blocks()?;
    let second = DocxPackage::from_bytes(twice)?.read_blocks()?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn analysis_lists_body_paragraphs_only() -> TestResult {
    let package = DocxPackage::from_bytes(
        DocxBuilder::new()
            .heading(1, "Titel")
            .styled("TOC1", "Indledning\t2")
            .paragraph("3")
            .paragraph("Første rigtige afsnit.")
            .table(&[&["A", "B"]])
            .paragraph("Andet afsnit.")
            .build(),
    )?;
    let found = extract_paragraphs_for_analysis(&package.read_blocks()?);
    let summary: Vec<(usize, &str)> = found.iter().map(|p| (p.index, p.text.as_str())).collect();
    assert_eq!(summary, vec![(3, "Første rigtige afsnit."), (4, "Andet afsnit.")]);

    let json = serde_json::to_value(&found)?;
    assert_eq!(json[0]["preview"], "Første rigtige afsnit.");
    Ok(())
}

#[test]
fn missing_input_is_an_io_error() {
    let err = DocxPackage::open("/definitely/not/here.docx").err().expect("open must fail");
    assert!(matches!(err, SourceError::Io(_)));

    let wrapped: PipelineError = err.into();
    assert!(wrapped.to_string().starts_with("Reading the document failed"));
}

#[test]
fn non_zip_input_is_rejected() {
    let err = DocxPackage::from_bytes(b"plain text".to_vec()).err().expect("not a package");
    assert!(matches!(err, SourceError::Zip(_)));
}
