mod common;

use common::fixtures::{CONCLUSION, TITLE, heading, long_report, para, sample_report, table};
use common::{TestResult, init_logging};
use docstage::{AppConfig, Block, ConvertOptions, EstimatingMeasurer, Fragment, HtmlOutput, Measure, check_quality, convert_to_html};
use docstage_types::ImageRef;
use pretty_assertions::assert_eq;

fn convert(blocks: &[Block], options: &ConvertOptions) -> HtmlOutput {
    init_logging();
    let config = AppConfig::default();
    let measurer = EstimatingMeasurer::new(config.identity.clone());
    convert_to_html(blocks, options, &measurer, &config)
}

#[test]
fn report_has_cover_toc_and_numbered_pages() {
    let output = convert(&sample_report(), &ConvertOptions::new().with_date("Februar 2025"));

    assert_eq!(output.title, TITLE);
    assert!(output.html.contains(&format!(r#"<h1 class="cover-title">{TITLE}</h1>"#)));
    assert!(output.html.contains(r#"<span class="cover-date">Februar 2025</span>"#));
    assert!(output.html.contains(r#"<p class="cover-caption">RAPPORT</p>"#));

    assert_eq!(output.pages.len(), 4);
    assert_eq!(output.html.matches(r#"<div class="page">"#).count(), 4);
    for page in &output.pages {
        let number = format!(r#"<span class="page-number">{}</span>"#, page.number);
        assert!(output.html.contains(&number), "missing footer for page {}", page.number);
    }

    let toc: Vec<(&str, Option<usize>)> = output.toc.iter().map(|e| (e.text.as_str(), e.page)).collect();
    assert_eq!(
        toc,
        vec![
            ("1. Indledning", Some(2)),
            ("1.1 Baggrund", Some(2)),
            ("2. Resultater", Some(3)),
            ("2.1 Hvordan måler vi?", Some(3)),
            ("Bilag", Some(4)),
        ]
    );
    assert!(output.html.contains(r#"<span class="toc-page-number">3</span>"#));
}

#[test]
fn title_block_and_source_toc_stay_out_of_the_body() {
    let output = convert(&sample_report(), &ConvertOptions::new());
    let body = &output.html[output.html.find("</style>").unwrap_or(0)..];

    assert_eq!(body.matches(TITLE).count(), 1, "only the cover shows the title");
    assert!(!body.contains("Udarbejdet af"));
    assert!(!body.contains("Version 1.2"));
    assert!(!body.contains("Indledning\t2"));
}

#[test]
fn chapters_get_labels_except_appendices() {
    let output = convert(&sample_report(), &ConvertOptions::new());
    let chapter = &output.pages[1].fragments;
    assert!(matches!(&chapter[0], Fragment::Label { text } if text == "Indledning"));

    let appendix = &output.pages[3].fragments;
    assert!(matches!(&appendix[0], Fragment::Heading { level: 1, .. }));
}

#[test]
fn roles_render_with_their_classes() {
    let html = convert(&sample_report(), &ConvertOptions::new()).html;
    assert!(html.contains(r#"<div class="highlight-box"><p>Konklusion:"#));
    assert!(html.contains(r#"<p class="list-item"><span class="arrow">→</span> Første punkt om oppetid</p>"#));
    assert!(html.contains(r#"<p class="list-item list-continued"><span class="arrow">→</span> Andet punkt"#));
    assert!(html.contains("<tr><th>Måned</th><th>Oppetid</th></tr>"));
    assert!(html.contains("<h2>2\u{2009}.1 Hvordan måler vi?</h2>"));
}

#[test]
fn callouts_become_highlight_boxes() {
    let text = "Driften har i hele perioden levet op til de aftalte serviceniveauer, også i de travleste uger omkring årsskiftet.";
    let blocks = vec![heading(1, "Rapport"), heading(1, "Status"), para(text)];

    let plain = convert(&blocks, &ConvertOptions::new()).html;
    assert!(!plain.contains(r#"<div class="highlight-box">"#));

    let boxed = convert(&blocks, &ConvertOptions::new().with_callouts([&text[..60]])).html;
    assert!(boxed.contains(r#"<div class="highlight-box"><p>Driften har"#));
}

#[test]
fn back_page_is_optional() {
    let without = convert(&sample_report(), &ConvertOptions::new());
    assert!(!without.html.contains(r#"<div class="back-page">"#));

    let with = convert(&sample_report(), &ConvertOptions::new().with_caption("analyse").with_back_page(true));
    let back = with.html.find(r#"<div class="back-page">"#).expect("back page");
    let last_page = with.html.rfind(r#"<div class="page">"#).expect("content page");
    assert!(last_page < back);
    assert_eq!(with.html.matches("ANALYSE").count(), 2);
}

#[test]
fn long_documents_respect_the_page_budget() {
    let output = convert(&long_report(3, 12), &ConvertOptions::new());
    assert!(!output.stats.capped);
    assert!(output.pages.len() > 6, "got {} pages", output.pages.len());

    let config = AppConfig::default();
    let measurer = EstimatingMeasurer::new(config.identity.clone());
    let budget = config.page.content_budget_px();
    let width = config.page.content_width_px();
    for page in &output.pages {
        let used: f32 = page.fragments.iter().map(|f| measurer.height(f, width)).sum();
        assert!(
            used <= budget + 0.01 || page.fragments.len() == 1,
            "page {} holds {used:.1}px of {budget:.1}px",
            page.number
        );
    }

    let numbers: Vec<usize> = output.pages.iter().map(|p| p.number).collect();
    assert_eq!(numbers, (1..=output.pages.len()).collect::<Vec<_>>());
}

#[test]
fn tall_images_are_measured_within_the_page() {
    let config = AppConfig::default();
    let picture = |cx: u64, cy: u64| {
        Block::Image(ImageRef {
            rel_id: "rId7".into(),
            content_type: Some("image/png".into()),
            extent_emu: Some((cx, cy)),
            bytes: vec![0x89, b'P', b'N', b'G'],
            ..Default::default()
        })
    };
    let mut blocks = vec![heading(1, TITLE), heading(1, "1. Figurer"), picture(600, 2_400)];
    blocks.extend((1..=12).map(|n| para(&format!("Afsnit {n} efter figuren beskriver målingerne i detaljer."))));
    blocks.push(picture(600, 100));

    let output = convert(&blocks, &ConvertOptions::new());
    let measurer = EstimatingMeasurer::new(config.identity.clone());
    let budget = config.page.content_budget_px();
    let width = config.page.content_width_px();
    for page in &output.pages {
        let used: f32 = page.fragments.iter().map(|f| measurer.height(f, width)).sum();
        assert!(used <= budget + 0.01, "page {} holds {used:.1}px of {budget:.1}px", page.number);
    }
    assert!(output.html.contains("max-height: 300px; object-fit: contain;"));

    let images: Vec<f32> = output
        .pages
        .iter()
        .flat_map(|p| &p.fragments)
        .filter(|f| f.kind() == "image")
        .map(|f| measurer.height(f, width))
        .collect();
    assert_eq!(images.len(), 2);
    assert!(images[1] < images[0]);
}

#[test]
fn every_toc_entry_resolves_in_a_long_document() {
    let output = convert(&long_report(3, 12), &ConvertOptions::new());
    assert_eq!(output.toc.len(), 12);
    assert!(output.toc.iter().all(|e| e.page.is_some()));

    let pages: Vec<usize> = output.toc.iter().filter_map(|e| e.page).collect();
    assert!(pages.windows(2).all(|w| w[0] <= w[1]), "{pages:?}");
}

#[test]
fn converted_report_passes_the_quality_check() -> TestResult {
    let blocks = sample_report();
    let output = convert(&blocks, &ConvertOptions::new());
    let report = check_quality(&blocks, &output.html);

    assert!(report.is_clean(), "{report}");
    assert_eq!(report.source.h1, report.output.h1);
    assert_eq!(report.source.h2, report.output.h2);
    assert_eq!(report.source.tables, 1);
    assert_eq!(report.output.tables, 1);

    let json = serde_json::to_value(&report)?;
    assert!(json["issues"].as_array().is_some_and(|a| a.is_empty()));
    Ok(())
}

#[test]
fn tables_split_across_pages_pass_the_quality_check() {
    let rows: Vec<[String; 2]> = std::iter::once(["Dag".to_string(), "Hændelser".to_string()])
        .chain((1..=80).map(|n| [format!("Dag {n}"), format!("{} registrerede", n % 7)]))
        .collect();
    let row_refs: Vec<[&str; 2]> = rows.iter().map(|[a, b]| [a.as_str(), b.as_str()]).collect();
    let row_slices: Vec<&[&str]> = row_refs.iter().map(|r| &r[..]).collect();
    let blocks = vec![heading(1, TITLE), heading(1, "1. Hændelseslog"), table(&row_slices)];

    let output = convert(&blocks, &ConvertOptions::new());
    assert!(output.html.contains(r#"<table class="continued">"#));
    let report = check_quality(&blocks, &output.html);

    assert_eq!((report.source.tables, report.output.tables), (1, 1));
    assert!(report.warnings.iter().all(|w| !w.starts_with("Tables")), "{report}");
    assert_eq!(report.text.difference, 0, "{report}");
}

#[test]
fn highlight_in_body_does_not_hide_words_from_qc() {
    let blocks = vec![heading(1, "Rapport"), heading(1, "Status"), para(CONCLUSION), para(CONCLUSION)];
    let output = convert(&blocks, &ConvertOptions::new());
    let report = check_quality(&blocks, &output.html);
    assert_eq!(report.text.difference, 0, "{report}");
}
