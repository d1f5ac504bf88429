//! Block renderers.
//!
//! One method per document block. Each one asks for its height first, then
//! draws at the cursor and advances it. Heights asked for are the larger of
//! a fixed minimum and the block's measured height, so a block never runs
//! past the bottom limit unless it is taller than a whole page, in which
//! case its lines flow onto the next page one at a time.

use super::page_break::{decide_break, BreakAnchor, BreakDecision};
use super::{BlockKind, DrawCommand, LayoutElement, PageStack};
use crate::config::{PageGeometry, PaperConfig};
use crate::font::FontContext;
use crate::model::{non_empty, truthy_label, ExamPaper, PartBody, PreparedPart, Question, Section};
use crate::style::{TextAlign, TextStyle};
use crate::text::{BrokenLine, TextLayout, MM_PER_PT};

const HEADER_TEXT: TextStyle = TextStyle::plain(9.0);
const BODY_TEXT: TextStyle = TextStyle::plain(10.0);
const TITLE_TEXT: TextStyle = TextStyle::bold(11.0);
const SUBJECT_TEXT: TextStyle = TextStyle::bold(16.0);
const PAPER_NAME_TEXT: TextStyle = TextStyle::italic(12.0);
const DIAGRAM_TEXT: TextStyle = TextStyle::italic(9.0);

const QUESTION_MIN: f64 = 20.0;
const PART_MIN: f64 = 15.0;
const SUB_PART_MIN: f64 = 10.0;
const OPTION_MIN: f64 = 6.0;
const DIAGRAM_MIN: f64 = 30.0;
const INSTRUCTION_MIN: f64 = 8.0;
/// Room the first section needs to share the page with the paper header.
const SECTION_SHARE_MIN: f64 = 80.0;

/// Spacing entry in the instruction list.
const BLANK_INSTRUCTION_GAP: f64 = 3.0;
const PART_INDENT: f64 = 12.0;
const OPTION_INDENT: f64 = 8.0;
const DIAGRAM_WIDTH: f64 = 80.0;
const DIAGRAM_HEIGHT: f64 = 25.0;
const STROKE_WIDTH: f64 = 0.3;

/// Label and text x offsets (from the margin) of sub-parts. Sub-parts nest
/// one step less deep when the parent part has a description.
fn sub_part_indents(has_description: bool) -> (f64, f64) {
    if has_description {
        (8.0, 18.0)
    } else {
        (12.0, 22.0)
    }
}

pub(crate) struct Blocks<'a> {
    pub(crate) config: &'a PaperConfig,
    pub(crate) fonts: &'a FontContext,
    pub(crate) text: &'a TextLayout,
    /// Paper code as printed in headers.
    pub(crate) header_code: String,
}

impl Blocks<'_> {
    fn geometry(&self) -> PageGeometry {
        self.config.geometry
    }

    fn line_height(&self) -> f64 {
        self.config.geometry.line_height
    }

    fn wrap(&self, text: &str, max_width: f64, style: TextStyle) -> Vec<BrokenLine> {
        self.text.wrap(self.fonts, text, max_width, &style)
    }

    fn lines_height(&self, lines: &[BrokenLine]) -> f64 {
        lines.len() as f64 * self.line_height()
    }

    // ─── Drawing primitives ─────────────────────────────────────

    /// Place one line of text with its anchor at `x`. Empty text draws
    /// nothing.
    #[allow(clippy::too_many_arguments)]
    fn text_at(
        &self,
        stack: &mut PageStack,
        text: &str,
        x: f64,
        y: f64,
        align: TextAlign,
        style: TextStyle,
        kind: BlockKind,
    ) {
        if text.is_empty() {
            return;
        }
        let width = self.text.measure_width(self.fonts, text, &style);
        let left = match align {
            TextAlign::Left => x,
            TextAlign::Center => x - width / 2.0,
            TextAlign::Right => x - width,
        };
        stack.push(LayoutElement {
            x: left,
            y,
            width,
            height: style.font_size * MM_PER_PT,
            kind,
            draw: DrawCommand::Text {
                text: text.to_string(),
                style,
                align,
            },
        });
    }

    fn text(
        &self,
        stack: &mut PageStack,
        text: &str,
        x: f64,
        align: TextAlign,
        style: TextStyle,
        kind: BlockKind,
    ) {
        let y = stack.cursor.y();
        self.text_at(stack, text, x, y, align, style, kind);
    }

    /// Horizontal rule across the content width at the cursor.
    fn rule(&self, stack: &mut PageStack, kind: BlockKind) {
        let g = self.geometry();
        stack.push(LayoutElement {
            x: g.margin,
            y: stack.cursor.y(),
            width: g.max_width,
            height: 0.0,
            kind,
            draw: DrawCommand::Rule {
                line_width: STROKE_WIDTH,
            },
        });
    }

    /// Draw wrapped lines from the cursor down, one line height each.
    /// The first line is assumed to fit; later lines break onto a new page
    /// if they have to.
    #[allow(clippy::too_many_arguments)]
    fn flow(
        &self,
        stack: &mut PageStack,
        lines: &[BrokenLine],
        x: f64,
        align: TextAlign,
        style: TextStyle,
        kind: BlockKind,
        anchor: BreakAnchor,
    ) {
        let line_height = self.line_height();
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                self.ensure_space(stack, line_height, anchor, kind);
            }
            self.text(stack, &line.text, x, align, style, kind);
            stack.cursor.advance(line_height);
        }
    }

    // ─── Page breaks ────────────────────────────────────────────

    /// Break to a new page if `needed` doesn't fit.
    fn ensure_space(&self, stack: &mut PageStack, needed: f64, anchor: BreakAnchor, cause: BlockKind) {
        if decide_break(&stack.cursor, needed) == BreakDecision::MoveToNextPage {
            self.start_page(stack, anchor, cause, needed);
        }
    }

    fn start_page(&self, stack: &mut PageStack, anchor: BreakAnchor, cause: BlockKind, needed: f64) {
        let resume_y = anchor.resume_y(&self.config.geometry);
        stack.add_page(resume_y, cause, needed);
        self.running_header(stack);
    }

    /// Paper code left, page number centred, continuation marker right.
    fn running_header(&self, stack: &mut PageStack) {
        let g = self.geometry();
        let page = stack.current_page().to_string();
        let kind = BlockKind::RunningHeader;
        self.text_at(stack, &self.header_code, g.margin, g.header_y, TextAlign::Left, HEADER_TEXT, kind);
        self.text_at(stack, &page, g.center_x(), g.header_y, TextAlign::Center, HEADER_TEXT, kind);
        self.text_at(
            stack,
            &self.config.continuation_marker,
            g.content_right(),
            g.header_y,
            TextAlign::Right,
            HEADER_TEXT,
            kind,
        );
    }

    // ─── Blocks ─────────────────────────────────────────────────

    /// Page-1 masthead, instructions and notes.
    pub(crate) fn first_page_header(&self, stack: &mut PageStack, paper: &ExamPaper) {
        let g = self.geometry();
        let meta = &paper.meta;
        let kind = BlockKind::FirstPageHeader;

        self.text(stack, &self.config.print_notice, g.margin, TextAlign::Left, HEADER_TEXT, kind);
        stack.cursor.advance(15.0);

        self.text(stack, &self.header_code, g.margin, TextAlign::Left, HEADER_TEXT, kind);
        self.text(
            stack,
            &self.config.continuation_marker,
            g.content_right(),
            TextAlign::Right,
            HEADER_TEXT,
            kind,
        );
        stack.cursor.advance(15.0);

        self.text(stack, &self.config.copyright, g.center_x(), TextAlign::Center, HEADER_TEXT, kind);
        stack.cursor.advance(15.0);

        if let Some(subject) = non_empty(&meta.subject) {
            self.text(stack, &subject.to_uppercase(), g.center_x(), TextAlign::Center, SUBJECT_TEXT, kind);
        }
        stack.cursor.advance(10.0);

        if let Some(name) = non_empty(&meta.paper_name) {
            let name = format!("({name})");
            self.text(stack, &name, g.center_x(), TextAlign::Center, PAPER_NAME_TEXT, kind);
        }
        stack.cursor.advance(6.0);
        self.rule(stack, kind);
        stack.cursor.advance(9.0);

        if let Some(marks) = &meta.maximum_marks {
            let line = format!("Maximum Marks: {marks}");
            self.text(stack, &line, g.center_x(), TextAlign::Center, TextStyle::plain(11.0), kind);
        }
        stack.cursor.advance(6.0);

        if let Some(time) = non_empty(&meta.time_allowed) {
            let line = format!("Time allowed: {time}");
            self.text(stack, &line, g.center_x(), TextAlign::Center, TITLE_TEXT, kind);
        }
        if let Some(reading) = non_empty(&meta.reading_time) {
            stack.cursor.advance(6.0);
            let line = format!("Reading time: {reading}");
            self.text(stack, &line, g.center_x(), TextAlign::Center, TextStyle::italic(11.0), kind);
        }
        stack.cursor.advance(12.0);

        let instructions = self
            .config
            .instructions
            .iter()
            .chain(meta.additional_instructions.iter());
        for entry in instructions {
            if entry.is_empty() {
                stack.cursor.advance(BLANK_INSTRUCTION_GAP);
                continue;
            }
            self.paragraph(stack, entry, BODY_TEXT);
        }

        stack.cursor.advance(2.0);
        self.ensure_space(stack, self.line_height(), BreakAnchor::Margin, BlockKind::Instruction);
        self.rule(stack, kind);
        stack.cursor.advance(7.0);

        self.paragraph(stack, &self.config.compulsory_note, TextStyle::bold(10.0));
        self.paragraph(stack, &self.config.marks_note, TextStyle::italic(10.0));

        stack.cursor.advance(2.0);
        self.ensure_space(stack, self.line_height(), BreakAnchor::Margin, BlockKind::Instruction);
        self.rule(stack, kind);
        stack.cursor.advance(8.0);
    }

    /// One wrapped instruction paragraph at the left margin.
    fn paragraph(&self, stack: &mut PageStack, text: &str, style: TextStyle) {
        if text.is_empty() {
            return;
        }
        let g = self.geometry();
        let lines = self.wrap(text, g.max_width, style);
        let needed = INSTRUCTION_MIN.max(self.lines_height(&lines));
        self.ensure_space(stack, needed, BreakAnchor::Margin, BlockKind::Instruction);
        self.flow(
            stack,
            &lines,
            g.margin,
            TextAlign::Left,
            style,
            BlockKind::Instruction,
            BreakAnchor::Margin,
        );
    }

    /// `"<NAME> (<marks> Marks)"` and the optional instruction.
    ///
    /// Only the first section may share a page, and only with enough room
    /// left; every other section starts a new page.
    pub(crate) fn section_heading(&self, stack: &mut PageStack, section: &Section, first: bool) {
        let g = self.geometry();
        let kind = BlockKind::SectionHeading;

        let shares_page = first && stack.cursor.remaining() >= SECTION_SHARE_MIN;
        if !shares_page {
            self.start_page(stack, BreakAnchor::Section, kind, SECTION_SHARE_MIN);
        }

        let name = non_empty(&section.name).unwrap_or("").to_uppercase();
        let title = match truthy_label(&section.marks) {
            Some(marks) if name.is_empty() => format!("({marks} Marks)"),
            Some(marks) => format!("{name} ({marks} Marks)"),
            None => name,
        };
        self.text(stack, &title, g.center_x(), TextAlign::Center, TITLE_TEXT, kind);
        stack.cursor.advance(6.0);

        if let Some(instruction) = non_empty(&section.instruction) {
            let style = TextStyle::italic(10.0);
            let lines = self.wrap(&format!("({instruction})"), g.max_width, style);
            self.ensure_space(stack, self.lines_height(&lines), BreakAnchor::Compact, kind);
            self.flow(stack, &lines, g.center_x(), TextAlign::Center, style, kind, BreakAnchor::Compact);
        }
        stack.cursor.advance(8.0);
    }

    /// `"Question <n>"` left, `"[<total>]"` right, instruction, then parts.
    pub(crate) fn question(&self, stack: &mut PageStack, question: &Question) {
        let g = self.geometry();
        let kind = BlockKind::Question;

        let instruction = non_empty(&question.instruction)
            .map(|text| self.wrap(text, g.max_width, BODY_TEXT));
        let measured = 7.0
            + instruction
                .as_ref()
                .map_or(0.0, |lines| self.lines_height(lines) + 3.0);
        self.ensure_space(stack, QUESTION_MIN.max(measured), BreakAnchor::Compact, kind);

        let title = match &question.number {
            Some(number) => format!("Question {number}"),
            None => "Question".to_string(),
        };
        self.text(stack, &title, g.margin, TextAlign::Left, TITLE_TEXT, kind);
        if let Some(total) = truthy_label(&question.total_marks) {
            self.text(stack, &format!("[{total}]"), g.content_right(), TextAlign::Right, BODY_TEXT, kind);
        }
        stack.cursor.advance(7.0);

        if let Some(lines) = &instruction {
            self.flow(stack, lines, g.margin, TextAlign::Left, BODY_TEXT, kind, BreakAnchor::Compact);
            stack.cursor.advance(3.0);
        }

        for part in question.prepared_parts() {
            self.part(stack, &part);
        }
        stack.cursor.advance(5.0);
    }

    /// Label line with inline body, then sub-parts, options and diagram.
    pub(crate) fn part(&self, stack: &mut PageStack, part: &PreparedPart) {
        let g = self.geometry();
        let kind = BlockKind::Part;

        let body_lines = match &part.body {
            PartBody::Description(text) | PartBody::Question(text) => {
                Some(self.wrap(text, g.max_width - PART_INDENT, BODY_TEXT))
            }
            PartBody::LabelOnly => None,
        };
        let label_block = match (&body_lines, &part.label) {
            (Some(lines), _) => self.lines_height(lines),
            (None, Some(_)) => self.line_height(),
            (None, None) => 0.0,
        };
        self.ensure_space(stack, PART_MIN.max(label_block), BreakAnchor::Compact, kind);

        if label_block > 0.0 {
            if let Some(label) = &part.label {
                self.text(stack, &format!("({label})"), g.margin, TextAlign::Left, BODY_TEXT, kind);
            }
            if let Some(marks) = &part.marks {
                self.text(stack, &format!("[{marks}]"), g.content_right(), TextAlign::Right, BODY_TEXT, kind);
            }
            match &body_lines {
                Some(lines) => self.flow(
                    stack,
                    lines,
                    g.margin + PART_INDENT,
                    TextAlign::Left,
                    BODY_TEXT,
                    kind,
                    BreakAnchor::Compact,
                ),
                None => stack.cursor.advance(self.line_height()),
            }
            stack.cursor.advance(3.0);
        }

        if !part.sub_parts.is_empty() {
            self.sub_parts(stack, part);
        }
        if !part.options.is_empty() {
            self.options(stack, &part.options);
        }
        if part.diagram {
            self.diagram(stack);
        }
        stack.cursor.advance(3.0);
    }

    fn sub_parts(&self, stack: &mut PageStack, part: &PreparedPart) {
        let g = self.geometry();
        let kind = BlockKind::SubPart;
        let (label_offset, text_offset) = sub_part_indents(part.has_description);
        let width = g.max_width - text_offset;
        let last = part.sub_parts.len().saturating_sub(1);

        for (i, sub_part) in part.sub_parts.iter().enumerate() {
            let lines = self.wrap(&sub_part.text, width, BODY_TEXT);
            let needed = SUB_PART_MIN.max(self.lines_height(&lines));
            self.ensure_space(stack, needed, BreakAnchor::Compact, kind);

            self.text(stack, &sub_part.label, g.margin + label_offset, TextAlign::Left, BODY_TEXT, kind);
            if let Some(marks) = &sub_part.marks {
                self.text(stack, &format!("[{marks}]"), g.content_right(), TextAlign::Right, BODY_TEXT, kind);
            }
            self.flow(
                stack,
                &lines,
                g.margin + text_offset,
                TextAlign::Left,
                BODY_TEXT,
                kind,
                BreakAnchor::Compact,
            );
            stack.cursor.advance(if i == last { 2.0 } else { 1.0 });
        }
    }

    fn options(&self, stack: &mut PageStack, options: &[String]) {
        let g = self.geometry();
        let kind = BlockKind::OptionLine;
        for option in options {
            let lines = self.wrap(option, g.max_width - PART_INDENT, BODY_TEXT);
            let needed = OPTION_MIN.max(self.lines_height(&lines));
            self.ensure_space(stack, needed, BreakAnchor::Margin, kind);
            self.flow(
                stack,
                &lines,
                g.margin + OPTION_INDENT,
                TextAlign::Left,
                BODY_TEXT,
                kind,
                BreakAnchor::Margin,
            );
        }
        stack.cursor.advance(3.0);
    }

    /// Empty 80x25 box with an italic "[Diagram]" label.
    fn diagram(&self, stack: &mut PageStack) {
        let g = self.geometry();
        let kind = BlockKind::Diagram;
        self.ensure_space(stack, DIAGRAM_MIN, BreakAnchor::Margin, kind);
        stack.cursor.advance(2.0);

        let x = g.margin + OPTION_INDENT;
        let y = stack.cursor.y();
        stack.push(LayoutElement {
            x,
            y,
            width: DIAGRAM_WIDTH,
            height: DIAGRAM_HEIGHT,
            kind,
            draw: DrawCommand::Rect {
                line_width: STROKE_WIDTH,
            },
        });
        self.text_at(
            stack,
            "[Diagram]",
            x + DIAGRAM_WIDTH / 2.0,
            y + 13.0,
            TextAlign::Center,
            DIAGRAM_TEXT,
            kind,
        );
        stack.cursor.advance(28.0);
    }
}
