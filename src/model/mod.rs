//! # Exam Paper Model
//!
//! The input representation for the layout engine: an exam paper is a list
//! of sections, each holding questions, which hold parts, which hold
//! sub-parts, multiple-choice options and an optional diagram placeholder.
//!
//! The model is deliberately forgiving. Papers come from an AI generator via
//! a REST API, so numbers arrive as strings or floats, arrays are sometimes
//! `null`, and flags are whatever JSON value the generator felt like. Every
//! field is optional and nothing is validated against the totals; a missing
//! array simply means there is nothing to render.
//!
//! Two payload shapes are accepted: the API shape `{ "exam": {...},
//! "sections": [...] }` and a flat shape with the paper fields at the top
//! level next to `sections`.

use crate::error::PaperError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// A complete exam paper ready for layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExamPaper {
    #[serde(flatten)]
    pub meta: ExamMeta,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub sections: Vec<Section>,
}

/// Paper-level fields printed on the first page and in the PDF info.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExamMeta {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub paper_name: Option<String>,
    #[serde(default)]
    pub paper_code: Option<String>,
    #[serde(default)]
    pub maximum_marks: Option<Label>,
    #[serde(default)]
    pub time_allowed: Option<String>,
    #[serde(default)]
    pub reading_time: Option<String>,
    #[serde(default)]
    pub year: Option<Label>,
    #[serde(default)]
    pub board: Option<String>,
    /// Extra instructions appended after the configured page-1 list.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub additional_instructions: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub marks: Option<Label>,
    #[serde(default)]
    pub instruction: Option<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Question {
    /// Display label. Not necessarily the position in the section.
    #[serde(default)]
    pub number: Option<Label>,
    #[serde(default)]
    pub total_marks: Option<Label>,
    #[serde(default)]
    pub instruction: Option<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub parts: Vec<Part>,

    // A question without parts may carry its own body.
    #[serde(default, alias = "question_text")]
    pub question: Option<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub options: Vec<McqOption>,
    #[serde(default)]
    pub diagram: Flag,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub number: Option<Label>,
    #[serde(default)]
    pub marks: Option<Label>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "question_text")]
    pub question: Option<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub options: Vec<McqOption>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub sub_parts: Vec<SubPart>,
    #[serde(default)]
    pub diagram: Flag,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubPart {
    #[serde(default)]
    pub letter: Option<Label>,
    #[serde(default, alias = "question_text")]
    pub question: Option<String>,
    #[serde(default)]
    pub marks: Option<Label>,
}

/// One multiple-choice option.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct McqOption {
    #[serde(default)]
    pub option_letter: Option<Label>,
    #[serde(default)]
    pub text: Option<String>,
}

/// A display label that may arrive as an integer, a float or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Label {
    /// Zero, NaN and the empty string count as "not set".
    pub fn is_truthy(&self) -> bool {
        match self {
            Label::Int(n) => *n != 0,
            Label::Float(f) => *f != 0.0 && !f.is_nan(),
            Label::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Int(n) => write!(f, "{n}"),
            // whole floats print without a fraction: 3.0 -> "3"
            Label::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e15 => {
                write!(f, "{}", *x as i64)
            }
            Label::Float(x) => write!(f, "{x}"),
            Label::Text(s) => f.write_str(s),
        }
    }
}

/// A JSON value read for its truthiness only.
///
/// `true`, objects, arrays, non-empty strings and non-zero numbers are set;
/// `false`, `null`, `0`, `""` and a missing field are not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Flag(pub bool);

impl<'de> Deserialize<'de> for Flag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let set = match &value {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        };
        Ok(Flag(set))
    }
}

fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn non_empty(text: &Option<String>) -> Option<&str> {
    text.as_deref().filter(|s| !s.is_empty())
}

pub(crate) fn truthy_label(label: &Option<Label>) -> Option<String> {
    label.as_ref().filter(|l| l.is_truthy()).map(Label::to_string)
}

impl ExamPaper {
    /// Parse either payload shape.
    pub fn from_json(json: &str) -> Result<Self, PaperError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(mut value: Value) -> Result<Self, PaperError> {
        if let Some(object) = value.as_object_mut() {
            if let Some(exam) = object.remove("exam") {
                let meta: ExamMeta = if exam.is_null() {
                    ExamMeta::default()
                } else {
                    serde_json::from_value(exam)?
                };
                let sections = match object.remove("sections") {
                    Some(v) if !v.is_null() => serde_json::from_value(v)?,
                    _ => Vec::new(),
                };
                return Ok(ExamPaper { meta, sections });
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Download file name: `<subject>_<year>_Paper.pdf`.
    pub fn file_name(&self) -> String {
        let subject = non_empty(&self.meta.subject).unwrap_or("Exam");
        let year = truthy_label(&self.meta.year).unwrap_or_else(|| "Paper".to_string());
        let raw = format!("{subject}_{year}_Paper.pdf");
        raw.chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c if c.is_whitespace() => '_',
                c => c,
            })
            .collect()
    }

    /// Paper code as printed in page headers: `T<yy> <code>`.
    ///
    /// The prefix uses the last two digits of the exam year and is dropped
    /// when the year is unknown.
    pub fn header_code(&self) -> String {
        let code = non_empty(&self.meta.paper_code).unwrap_or("");
        let digits: Option<String> = self.meta.year.as_ref().and_then(|y| {
            let s = y.to_string();
            let d: Vec<char> = s.chars().filter(|c| c.is_ascii_digit()).collect();
            (d.len() >= 2).then(|| d[d.len() - 2..].iter().collect())
        });
        match digits {
            Some(yy) if code.is_empty() => format!("T{yy}"),
            Some(yy) => format!("T{yy} {code}"),
            None => code.to_string(),
        }
    }
}

// ─── Prepared parts ─────────────────────────────────────────────

/// What a part prints next to its label. Decided once, before layout.
#[derive(Debug, Clone, PartialEq)]
pub enum PartBody {
    /// `description` wins whenever it is set.
    Description(String),
    /// The part's own question text, only when it has no sub-parts.
    Question(String),
    /// Only the label line; sub-parts carry the content.
    LabelOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSubPart {
    pub label: String,
    pub text: String,
    pub marks: Option<String>,
}

/// A part reduced to exactly what the layout engine draws.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedPart {
    pub label: Option<String>,
    pub marks: Option<String>,
    pub body: PartBody,
    /// Sub-part indentation nests under a description.
    pub has_description: bool,
    /// Sub-parts with an empty body are dropped.
    pub sub_parts: Vec<PreparedSubPart>,
    /// Option lines, already formatted as `"<letter> <text>"`.
    pub options: Vec<String>,
    pub diagram: bool,
}

impl Part {
    pub fn prepare(&self) -> PreparedPart {
        let description = non_empty(&self.description);
        let body = match (description, non_empty(&self.question)) {
            (Some(d), _) => PartBody::Description(d.to_string()),
            (None, Some(q)) if self.sub_parts.is_empty() => PartBody::Question(q.to_string()),
            _ => PartBody::LabelOnly,
        };

        PreparedPart {
            label: truthy_label(&self.number),
            marks: truthy_label(&self.marks),
            body,
            has_description: description.is_some(),
            sub_parts: self.sub_parts.iter().filter_map(SubPart::prepare).collect(),
            options: self.options.iter().map(McqOption::line).collect(),
            diagram: self.diagram.0,
        }
    }
}

impl SubPart {
    fn prepare(&self) -> Option<PreparedSubPart> {
        let text = non_empty(&self.question)?;
        Some(PreparedSubPart {
            label: self.letter.as_ref().map(Label::to_string).unwrap_or_default(),
            text: text.to_string(),
            marks: truthy_label(&self.marks),
        })
    }
}

impl McqOption {
    pub fn line(&self) -> String {
        let letter = self.option_letter.as_ref().map(Label::to_string).unwrap_or_default();
        let text = self.text.as_deref().unwrap_or("");
        match (letter.is_empty(), text.is_empty()) {
            (true, _) => text.to_string(),
            (false, true) => letter,
            (false, false) => format!("{letter} {text}"),
        }
    }
}

impl Question {
    /// Parts in document order. A question with no parts but its own body
    /// becomes a single unlabelled part.
    pub fn prepared_parts(&self) -> Vec<PreparedPart> {
        if !self.parts.is_empty() {
            return self.parts.iter().map(Part::prepare).collect();
        }
        if non_empty(&self.question).is_none() && self.options.is_empty() && !self.diagram.0 {
            return Vec::new();
        }
        let own = Part {
            question: self.question.clone(),
            options: self.options.clone(),
            diagram: self.diagram,
            ..Part::default()
        };
        vec![own.prepare()]
    }
}
