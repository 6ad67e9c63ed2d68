//! Resume Field Parser: pattern and entity based extraction of profile
//! attributes from raw resume text.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::readiness::scoring::round2;
use crate::resume::annotator::TextAnnotator;
use crate::store::ProfileUpdate;

/// Vocabulary matched case-insensitively as plain substrings of the text.
pub const SKILL_VOCABULARY: &[&str] = &[
    "python",
    "java",
    "django",
    "react",
    "sql",
    "data analysis",
    "machine learning",
    "web development",
    "javascript",
    "html",
    "css",
    "c++",
    "aws",
    "git",
    "full stack",
    "node js",
    "mongodb",
    "azure",
    "docker",
    "kubernetes",
    "tableau",
    "power bi",
    "spring boot",
    "rest api",
    "api",
    "testing",
    "ai/ml",
    "neural networks",
    "devops",
    "cloud computing",
    "r programming",
    "linux",
    "typescript",
];

const EXPERIENCE_KEYWORDS: &[&str] = &["experience", "worked at", "software engineer", "project"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedFields {
    pub skills: BTreeSet<String>,
    pub education: BTreeSet<String>,
    pub experience: BTreeSet<String>,
    pub phone_number: Option<String>,
    pub cgpa: Option<f64>,
    pub backlogs: Option<u32>,
}

impl ParsedFields {
    /// Profile update carrying only what was actually extracted. Empty sets
    /// and unset values leave the stored profile untouched.
    pub fn to_profile_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            skills: join_non_empty(&self.skills, ", "),
            education: join_non_empty(&self.education, "\n"),
            experience: join_non_empty(&self.experience, "\n"),
            phone_number: self.phone_number.clone(),
            cgpa: self.cgpa,
            backlogs: self.backlogs.and_then(|b| i32::try_from(b).ok()),
        }
    }
}

fn join_non_empty(items: &BTreeSet<String>, sep: &str) -> Option<String> {
    if items.is_empty() {
        None
    } else {
        Some(items.iter().cloned().collect::<Vec<_>>().join(sep))
    }
}

macro_rules! static_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).expect(concat!("valid regex: ", $pattern)))
        }
    };
}

static_regex!(cgpa_re, r"(?i)(cgpa|gpa|score|percentage)\D*(\d\.\d{1,2}|\d{2,3})");
static_regex!(backlogs_re, r"(?i)(backlogs|arrears|backlog|arrear)\D*(\d+)");
static_regex!(
    backlogs_count_first_re,
    r"(?i)(?:^|[^\d.])(\d+)[ \t]*(?:backlogs|arrears|backlog|arrear)"
);
static_regex!(degree_re, r"(?i)\b(b\.?tech|m\.?tech|bachelor|master|ph\.?d)\b");
static_regex!(indian_mobile_re, r"\b(?:\+91[\s-]?)?[6789]\d{9}\b");
static_regex!(
    generic_phone_re,
    r"\b(?:\+?\d{1,3}[-. ]?)?\(?\d{3}\)?[-. ]?\d{3}[-. ]?\d{4}\b"
);

/// Extracts structured fields from raw resume text.
///
/// With no annotator (model unavailable) every field is left empty, including
/// the purely regex-driven ones.
pub fn parse_resume_text(text: &str, annotator: Option<&dyn TextAnnotator>) -> ParsedFields {
    let Some(annotator) = annotator else {
        return ParsedFields::default();
    };

    ParsedFields {
        skills: extract_skills(text),
        education: extract_education(text, annotator),
        experience: extract_experience(text, annotator),
        phone_number: extract_phone(text),
        cgpa: extract_cgpa(text),
        backlogs: extract_backlogs(text),
    }
}

/// First `cgpa|gpa|score|percentage` token followed by a number. Bare digit
/// captures (2–3 digits, no decimal point) are divided by 10, so "85" reads as
/// 8.5. Values outside 0–10 are discarded.
pub fn extract_cgpa(text: &str) -> Option<f64> {
    let raw = cgpa_re().captures(text)?.get(2)?.as_str();
    let mut value = raw.parse::<f64>().ok()?;
    if !raw.contains('.') {
        value /= 10.0;
    }
    (0.0..=10.0).contains(&value).then(|| round2(value))
}

/// Backlog count. "Backlogs: 2" is tried first; "2 backlogs" on one line is
/// the fallback when no number follows the token.
pub fn extract_backlogs(text: &str) -> Option<u32> {
    let count = backlogs_re()
        .captures(text)
        .and_then(|c| c.get(2))
        .or_else(|| backlogs_count_first_re().captures(text).and_then(|c| c.get(1)))?;
    count.as_str().parse::<u32>().ok()
}

pub fn extract_skills(text: &str) -> BTreeSet<String> {
    let lower = text.to_lowercase();
    SKILL_VOCABULARY
        .iter()
        .filter(|skill| lower.contains(*skill))
        .map(|skill| capitalize(skill))
        .collect()
}

fn extract_education(text: &str, annotator: &dyn TextAnnotator) -> BTreeSet<String> {
    annotator
        .org_entities(text)
        .into_iter()
        .filter(|ent| {
            let lower = ent.to_lowercase();
            lower.contains("university") || lower.contains("college") || degree_re().is_match(ent)
        })
        .collect()
}

fn extract_experience(text: &str, annotator: &dyn TextAnnotator) -> BTreeSet<String> {
    annotator
        .sentences(text)
        .into_iter()
        .filter(|sentence| {
            let lower = sentence.to_lowercase();
            EXPERIENCE_KEYWORDS.iter().any(|k| lower.contains(k))
        })
        .collect()
}

/// Indian mobile number first, then a generic international pattern.
pub fn extract_phone(text: &str) -> Option<String> {
    indian_mobile_re()
        .find(text)
        .or_else(|| generic_phone_re().find(text))
        .map(|m| m.as_str().to_string())
}

/// Upper-cases the first character and lower-cases the rest.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
