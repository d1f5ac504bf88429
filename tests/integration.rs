//! Integration tests for the exam paper pipeline.
//!
//! These tests exercise the full path from JSON input to PDF output.
//! They verify:
//! - Both payload shapes deserialize
//! - Questions render in array order whatever their numbers
//! - Nothing is drawn below the bottom margin
//! - Every page after the first carries exactly one running header
//! - Page breaks happen at the right places and resume at the right anchor
//! - Regenerating a paper revokes the previous display handle

use doclin_paper::layout::page_break::BreakEvent;
use doclin_paper::layout::{BlockKind, DrawCommand, LayoutPage};
use doclin_paper::*;

// ─── Helpers ────────────────────────────────────────────────────

fn layout_json(json: &str) -> PaperLayout {
    layout_with(json, PaperConfig::default())
}

fn layout_with(json: &str, config: PaperConfig) -> PaperLayout {
    let paper = ExamPaper::from_json(json).unwrap();
    LayoutEngine::new(config).unwrap().layout(&paper)
}

/// A first page with nothing but the masthead, ending at y = 127.
fn bare_config() -> PaperConfig {
    PaperConfig::from_json(r#"{"instructions": [], "compulsory_note": "", "marks_note": ""}"#).unwrap()
}

fn texts(page: &LayoutPage, kind: BlockKind) -> Vec<(f64, f64, String)> {
    page.texts(kind)
        .map(|e| (e.x, e.y, e.text().unwrap_or("").to_string()))
        .collect()
}

fn find_text<'a>(layout: &'a PaperLayout, text: &str) -> Option<(usize, &'a doclin_paper::layout::LayoutElement)> {
    layout.pages.iter().enumerate().find_map(|(i, page)| {
        page.elements
            .iter()
            .find(|e| e.text() == Some(text))
            .map(|e| (i, e))
    })
}

fn question_titles(layout: &PaperLayout) -> Vec<String> {
    layout
        .pages
        .iter()
        .flat_map(|p| p.texts(BlockKind::Question))
        .filter_map(|e| e.text())
        .filter(|t| t.starts_with("Question"))
        .map(str::to_string)
        .collect()
}

fn filler_questions(count: usize) -> String {
    (1..=count)
        .map(|n| {
            format!(
                r#"{{"number": {n}, "total_marks": 6, "parts": [
                    {{"number": "i", "marks": 3, "description": "Explain the working of an electric motor with the help of a labelled diagram and state two of its uses."}},
                    {{"number": "ii", "marks": 3, "question": "Answer the following:", "sub_parts": [
                        {{"letter": "(a)", "question": "Define power."}},
                        {{"letter": "(b)", "question": "State its SI unit."}}
                    ]}}
                ]}}"#
            )
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.len() > 50, "PDF too small to be valid");
    assert!(bytes.starts_with(b"%PDF-1.7"), "Missing PDF header");
    assert!(bytes.windows(5).any(|w| w == b"%%EOF"), "Missing %%EOF marker");
    assert!(bytes.windows(4).any(|w| w == b"xref"), "Missing xref table");
    assert!(bytes.windows(7).any(|w| w == b"trailer"), "Missing trailer");
}

fn inflate_streams(bytes: &[u8]) -> String {
    let mut out = String::new();
    let mut rest = bytes;
    while let Some(start) = find_bytes(rest, b"stream\n") {
        let body = &rest[start + 7..];
        let Some(end) = find_bytes(body, b"\nendstream") else { break };
        if let Ok(data) = miniz_oxide::inflate::decompress_to_vec_zlib(&body[..end]) {
            out.push_str(&String::from_utf8_lossy(&data));
        }
        rest = &body[end + b"\nendstream".len()..];
    }
    out
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn count_pages(bytes: &[u8]) -> usize {
    String::from_utf8_lossy(bytes).matches("/Type /Page ").count()
}

// ─── Input shapes ───────────────────────────────────────────────

#[test]
fn test_nested_and_flat_payloads_agree() {
    let nested = r#"{
        "exam": {"subject": "Physics", "paper_code": "PHY", "year": 2023},
        "sections": [{"name": "Section A", "questions": [{"number": 1, "total_marks": 4}]}]
    }"#;
    let flat = r#"{
        "subject": "Physics", "paper_code": "PHY", "year": 2023,
        "sections": [{"name": "Section A", "questions": [{"number": 1, "total_marks": 4}]}]
    }"#;
    let a = layout_json(nested);
    let b = layout_json(flat);
    assert_eq!(a.page_count(), b.page_count());
    assert_eq!(question_titles(&a), question_titles(&b));
    assert_eq!(a.pages[0].elements, b.pages[0].elements);
}

#[test]
fn test_missing_sections_renders_front_page_only() {
    let layout = layout_json(r#"{"subject": "Physics", "sections": null}"#);
    assert_eq!(layout.page_count(), 1);
    assert!(layout.breaks.is_empty());
    assert!(question_titles(&layout).is_empty());
}

// ─── Properties ─────────────────────────────────────────────────

#[test]
fn test_questions_render_in_array_order() {
    let numbers = [1, 2, 3, 8, 9, 4, 5, 6, 7];
    let questions: Vec<String> = numbers
        .iter()
        .map(|n| {
            format!(
                r#"{{"number": {n}, "total_marks": 5, "parts": [{{"number": "i", "marks": 5, "description": "Describe an experiment to verify Ohm's law. Draw the circuit diagram used and state the precautions you would take."}}]}}"#
            )
        })
        .collect();
    let json = format!(
        r#"{{"subject": "Physics", "sections": [{{"name": "A", "questions": [{}]}}]}}"#,
        questions.join(",")
    );
    let layout = layout_json(&json);
    let expected: Vec<String> = numbers.iter().map(|n| format!("Question {n}")).collect();
    assert_eq!(question_titles(&layout), expected);
}

#[test]
fn test_nothing_drawn_below_bottom_limit() {
    let json = format!(
        r#"{{"subject": "Physics", "paper_code": "PHY", "year": 2023, "sections": [
            {{"name": "A", "marks": 40, "questions": [{}]}},
            {{"name": "B", "marks": 40, "instruction": "Attempt any four.", "questions": [{}]}}
        ]}}"#,
        filler_questions(14),
        filler_questions(9)
    );
    let layout = layout_json(&json);
    assert!(layout.page_count() > 3);
    let limit = PaperConfig::default().geometry.bottom_limit();
    for page in &layout.pages {
        for element in &page.elements {
            let bottom = match element.draw {
                DrawCommand::Rect { .. } => element.y + element.height,
                _ => element.y,
            };
            assert!(
                bottom <= limit + 1e-9,
                "page {}: {:?} drawn at {:.2} below {limit}",
                page.number,
                element.kind,
                bottom
            );
        }
    }
}

#[test]
fn test_one_running_header_per_continuation_page() {
    let json = format!(
        r#"{{"subject": "Physics", "paper_code": "PHY", "year": 2023, "sections": [
            {{"name": "A", "questions": [{}]}},
            {{"name": "B", "questions": [{}]}}
        ]}}"#,
        filler_questions(12),
        filler_questions(4)
    );
    let layout = layout_json(&json);
    assert!(layout.page_count() > 2);
    assert_eq!(layout.breaks.len() + 1, layout.page_count());

    assert!(texts(&layout.pages[0], BlockKind::RunningHeader).is_empty());
    assert!(!texts(&layout.pages[0], BlockKind::FirstPageHeader).is_empty());

    for page in &layout.pages[1..] {
        let header = texts(page, BlockKind::RunningHeader);
        let labels: Vec<&str> = header.iter().map(|(_, _, t)| t.as_str()).collect();
        let number = page.number.to_string();
        assert_eq!(labels, vec!["T23 PHY", number.as_str(), "Turn Over"]);
        assert!(header.iter().all(|(_, y, _)| *y == 15.0));
        assert!(texts(page, BlockKind::FirstPageHeader).is_empty());
    }
}

#[test]
fn test_sub_part_indent_depends_on_description() {
    let json = r#"{"subject": "Physics", "sections": [{"name": "A", "questions": [
        {"number": 1, "parts": [
            {"number": "i", "description": "Read the passage.", "sub_parts": [{"letter": "(a)", "question": "First."}]},
            {"number": "ii", "question": "Ignored.", "sub_parts": [{"letter": "(b)", "question": "Second."}]}
        ]}
    ]}]}"#;
    let layout = layout_json(json);
    let (_, with_description) = find_text(&layout, "(a)").unwrap();
    let (_, without_description) = find_text(&layout, "(b)").unwrap();
    assert_eq!(with_description.x, 28.0);
    assert_eq!(without_description.x, 32.0);
    assert_eq!(find_text(&layout, "First.").unwrap().1.x, 38.0);
    assert_eq!(find_text(&layout, "Second.").unwrap().1.x, 42.0);
    // Question text yields to sub-parts.
    assert!(find_text(&layout, "Ignored.").is_none());
}

#[test]
fn test_empty_part_renders_label_with_fixed_height() {
    let json = r#"{"subject": "Physics", "sections": [{"name": "A", "questions": [
        {"number": 1, "parts": [{"number": "i"}]},
        {"number": 2}
    ]}]}"#;
    let layout = layout_json(json);
    let parts = texts(&layout.pages[0], BlockKind::Part);
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].2, "(i)");

    let (_, first) = find_text(&layout, "Question 1").unwrap();
    let (_, second) = find_text(&layout, "Question 2").unwrap();
    // title 7, label 5, gap 3, part trailing 3, question trailing 5
    assert_eq!(second.y - first.y, 23.0);
}

// ─── Scenarios ──────────────────────────────────────────────────

const SCENARIO_A: &str = r#"{
    "exam": {"subject": "Physics", "paper_code": "PHY", "year": 2023},
    "sections": [{"name": "Section A", "marks": 15, "questions": [
        {"number": 1, "total_marks": 15, "parts": [
            {"number": "a", "marks": 5, "description": "Explain X"}
        ]}
    ]}]
}"#;

#[test]
fn test_single_question_shares_front_page() {
    let layout = layout_json(SCENARIO_A);
    assert_eq!(layout.page_count(), 1);
    assert!(layout.breaks.is_empty());

    let question = texts(&layout.pages[0], BlockKind::Question);
    assert_eq!(question[0].2, "Question 1");
    assert_eq!(question[0].0, 20.0);
    assert_eq!(question[1].2, "[15]");
    assert_eq!(question[0].1, question[1].1);
    let (_, total) = find_text(&layout, "[15]").unwrap();
    assert!((total.x + total.width - 190.0).abs() < 1e-9);

    let part = texts(&layout.pages[0], BlockKind::Part);
    let labels: Vec<&str> = part.iter().map(|(_, _, t)| t.as_str()).collect();
    assert_eq!(labels, vec!["(a)", "[5]", "Explain X"]);
    assert!(part.iter().all(|(_, y, _)| *y == part[0].1));
}

#[test]
fn test_crowded_front_page_pushes_first_section() {
    let extra: Vec<String> = (1..=10)
        .map(|i| format!(r#""Additional instruction number {i}.""#))
        .collect();
    let json = format!(
        r#"{{"exam": {{"subject": "Physics", "paper_code": "PHY", "year": 2023, "additional_instructions": [{}]}},
            "sections": [{{"name": "Section A", "questions": [
                {{"number": 1, "total_marks": 15, "parts": [{{"number": "a", "marks": 5, "description": "Explain X"}}]}}
            ]}}]}}"#,
        extra.join(",")
    );
    let layout = layout_json(&json);
    assert_eq!(layout.page_count(), 2);
    assert_eq!(layout.breaks.len(), 1);
    let BreakEvent { page, cause, needed, .. } = layout.breaks[0];
    assert_eq!(page, 2);
    assert_eq!(cause, BlockKind::SectionHeading);
    assert_eq!(needed, 80.0);

    let heading = texts(&layout.pages[1], BlockKind::SectionHeading);
    assert_eq!(heading[0].2, "SECTION A");
    assert_eq!(heading[0].1, 25.0);
}

#[test]
fn test_sub_parts_break_with_compact_header() {
    // Nine label-only parts move the cursor from 148 to 247; the tenth part's
    // sub-parts then start at 255 and the fourth one no longer fits.
    let mut parts: Vec<String> = (1..=9).map(|n| format!(r#"{{"number": {n}}}"#)).collect();
    let subs: Vec<String> = (1..=5)
        .map(|i| format!(r#"{{"letter": "({i})", "question": "State the law of reflection."}}"#))
        .collect();
    parts.push(format!(r#"{{"number": 10, "sub_parts": [{}]}}"#, subs.join(",")));
    let json = format!(
        r#"{{"subject": "Physics", "paper_code": "PHY", "year": 2023, "sections": [{{"questions": [
            {{"number": 1, "parts": [{}]}}
        ]}}]}}"#,
        parts.join(",")
    );
    let layout = layout_with(&json, bare_config());

    assert_eq!(layout.page_count(), 2);
    assert_eq!(layout.breaks[0].cause, BlockKind::SubPart);

    let labels = |page: &LayoutPage| -> Vec<String> {
        texts(page, BlockKind::SubPart)
            .into_iter()
            .filter(|(_, _, t)| t.starts_with('('))
            .map(|(_, _, t)| t)
            .collect()
    };
    assert_eq!(labels(&layout.pages[0]), vec!["(1)", "(2)", "(3)"]);
    assert_eq!(labels(&layout.pages[1]), vec!["(4)", "(5)"]);

    // Part labels (1)..(10) share text with the sub-part labels.
    let page_two = texts(&layout.pages[1], BlockKind::SubPart);
    let fourth = &page_two[0];
    assert_eq!(fourth.2, "(4)");
    assert_eq!((fourth.0, fourth.1), (32.0, 25.0));
    let (part_page, part_label) = find_text(&layout, "(4)").unwrap();
    assert_eq!((part_page, part_label.kind), (0, BlockKind::Part));

    let header = texts(&layout.pages[1], BlockKind::RunningHeader);
    assert_eq!(header.len(), 3);
    assert!(header.iter().all(|(_, y, _)| *y == 15.0));
    assert!(texts(&layout.pages[1], BlockKind::FirstPageHeader).is_empty());
}

#[test]
fn test_blank_instructions_advance_small_gap() {
    let config = PaperConfig::from_json(r#"{"instructions": ["First rule.", "", "", "Second rule."]}"#).unwrap();
    let layout = layout_with(r#"{"subject": "Physics"}"#, config);
    let instructions = texts(&layout.pages[0], BlockKind::Instruction);
    let first = instructions.iter().find(|(_, _, t)| t == "First rule.").unwrap();
    let second = instructions.iter().find(|(_, _, t)| t == "Second rule.").unwrap();
    // one line of 5, then 3 for each blank entry
    assert_eq!(second.1 - first.1, 11.0);
}

#[test]
fn test_regeneration_revokes_previous_handle() {
    let mut session = ViewerSession::new(LayoutEngine::new(PaperConfig::default()).unwrap());
    let first = session.generate_json(SCENARIO_A).unwrap();
    let first_label = first.to_string();
    assert!(first_label.starts_with("blob:doclin/"));
    assert!(session.resolve(&first).is_some());

    let second = session.generate_json(SCENARIO_A).unwrap();
    assert!(session.resolve(&first).is_none());
    assert!(session.resolve(&second).is_some());
    assert_ne!(first_label, second.to_string());
    assert_eq!(session.current(), Some(&second));
}

// ─── PDF output ─────────────────────────────────────────────────

#[test]
fn test_render_json_end_to_end() {
    let bytes = render_json(SCENARIO_A).unwrap();
    assert_valid_pdf(&bytes);
    let content = inflate_streams(&bytes);
    assert!(content.contains("(Question 1) Tj"));
    assert!(content.contains("(Explain X) Tj"));
    assert!(content.contains("(This Paper consists of 1 printed pages.) Tj"));
    assert!(content.contains("(PHYSICS) Tj"));
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("/Times-Bold"));
    assert!(text.contains("/Times-Italic"));
}

#[test]
fn test_page_count_matches_layout() {
    let json = format!(
        r#"{{"subject": "Physics", "year": 2023, "sections": [{{"name": "A", "questions": [{}]}}]}}"#,
        filler_questions(20)
    );
    let paper = ExamPaper::from_json(&json).unwrap();
    let artifact = render_artifact(&paper, PaperConfig::default()).unwrap();
    assert!(artifact.page_count > 1);
    assert_valid_pdf(&artifact.bytes);
    assert_eq!(count_pages(&artifact.bytes), artifact.page_count);
    let notice = format!("(This Paper consists of {} printed pages.) Tj", artifact.page_count);
    assert!(inflate_streams(&artifact.bytes).contains(&notice));
}

#[test]
fn test_artifact_file_name() {
    let paper = ExamPaper::from_json(r#"{"exam": {"subject": "Physics", "year": 2023}}"#).unwrap();
    let artifact = render_artifact(&paper, PaperConfig::default()).unwrap();
    assert_eq!(artifact.file_name, "Physics_2023_Paper.pdf");
}

#[test]
fn test_helvetica_config() {
    let config = PaperConfig::from_json(r#"{"font_family": "Helvetica"}"#).unwrap();
    let bytes = render_with_config(&ExamPaper::default(), config).unwrap();
    assert_valid_pdf(&bytes);
    assert!(String::from_utf8_lossy(&bytes).contains("/Helvetica"));
}

#[test]
fn test_layout_serializes_for_tooling() {
    let json = layout_json(SCENARIO_A).to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["pages"].as_array().map(Vec::len), Some(1));
}
