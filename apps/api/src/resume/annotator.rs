//! Text annotation seam used by the resume field parser.
//!
//! Two capabilities: organisation entities and sentence segmentation. The
//! default backend is a rule-based annotator driven by a small marker lexicon
//! (`AnnotatorModel`). The model is loaded once at startup; if loading fails
//! the annotator is unavailable for the life of the process and resume
//! parsing returns empty fields.

use std::path::Path;
use std::sync::{Arc, OnceLock};

use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub trait TextAnnotator: Send + Sync {
    /// Spans the annotator recognises as organisations (ORG entities).
    fn org_entities(&self, text: &str) -> Vec<String>;
    /// Sentence segmentation of the whole text.
    fn sentences(&self, text: &str) -> Vec<String>;
}

/// Process-wide annotator handle. `None` = model unavailable.
pub type SharedAnnotator = Option<Arc<dyn TextAnnotator>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatorModel {
    /// Lower-case words that mark a capitalised span as an organisation.
    pub org_markers: Vec<String>,
    /// Lower-case degree tokens, also tagged as organisations.
    #[serde(default)]
    pub degree_markers: Vec<String>,
}

const BUILTIN_ORG_MARKERS: &[&str] = &[
    "university",
    "college",
    "institute",
    "school",
    "academy",
    "polytechnic",
    "inc",
    "ltd",
    "llc",
    "llp",
    "corporation",
    "corp",
    "company",
    "technologies",
    "solutions",
    "systems",
    "labs",
    "limited",
];

const BUILTIN_DEGREE_MARKERS: &[&str] = &[
    "b.tech", "btech", "m.tech", "mtech", "bachelor", "master", "ph.d", "phd",
];

/// Lower-case words allowed inside a capitalised span.
const CONNECTORS: &[&str] = &["of", "and", "for", "the", "in", "&"];

impl AnnotatorModel {
    pub fn builtin() -> Self {
        Self {
            org_markers: BUILTIN_ORG_MARKERS.iter().map(|s| s.to_string()).collect(),
            degree_markers: BUILTIN_DEGREE_MARKERS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read annotator model {}", path.display()))?;
        let mut model: AnnotatorModel = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid annotator model {}", path.display()))?;
        if model.org_markers.is_empty() {
            bail!("Annotator model {} has no org_markers", path.display());
        }
        for marker in model
            .org_markers
            .iter_mut()
            .chain(model.degree_markers.iter_mut())
        {
            *marker = marker.to_lowercase();
        }
        Ok(model)
    }
}

/// Loads the annotator once at startup.
pub fn load_annotator(model_path: Option<&Path>) -> SharedAnnotator {
    let model = match model_path {
        None => AnnotatorModel::builtin(),
        Some(path) => match AnnotatorModel::from_file(path) {
            Ok(model) => model,
            Err(e) => {
                warn!("Text annotator unavailable, resume parsing disabled: {e:#}");
                return None;
            }
        },
    };
    info!(
        "Text annotator ready ({} org markers, {} degree markers)",
        model.org_markers.len(),
        model.degree_markers.len()
    );
    Some(Arc::new(HeuristicAnnotator::new(model)))
}

// ────────────────────────────────────────────────────────────────────────────
// HeuristicAnnotator
// ────────────────────────────────────────────────────────────────────────────

/// Rule-based annotator.
///
/// Entities: runs of capitalised words (allowing lower-case connectors such as
/// "of" and "and") within a line, kept when a word is an org or degree marker.
///
/// Sentences: every line is split after `.`, `!` or `?` when followed by
/// whitespace. Lines are never joined.
pub struct HeuristicAnnotator {
    model: AnnotatorModel,
}

impl HeuristicAnnotator {
    pub fn new(model: AnnotatorModel) -> Self {
        Self { model }
    }

    fn is_org_span(&self, span: &str) -> bool {
        span.split_whitespace().any(|word| {
            let word = word
                .trim_end_matches(|c: char| c == ',' || c == ';' || c == ':')
                .to_lowercase();
            let bare = word.trim_end_matches('.');
            self.model.org_markers.iter().any(|m| m == bare)
                || self
                    .model
                    .degree_markers
                    .iter()
                    .any(|m| *m == word || m == bare)
        })
    }
}

fn capitalised_span_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"[A-Z](?:[A-Za-z0-9&'\-]|\.[A-Za-z])*(?:[ \t]+(?:of|and|for|the|in|&|[A-Z](?:[A-Za-z0-9&'\-]|\.[A-Za-z])*))*",
        )
        .expect("valid capitalised span regex")
    })
}

fn trim_connectors(span: &str) -> &str {
    let mut span = span.trim_end();
    loop {
        let Some((head, last)) = span.rsplit_once(char::is_whitespace) else {
            return span;
        };
        if CONNECTORS.contains(&last) {
            span = head.trim_end();
        } else {
            return span;
        }
    }
}

impl TextAnnotator for HeuristicAnnotator {
    fn org_entities(&self, text: &str) -> Vec<String> {
        let mut entities = Vec::new();
        for line in text.lines() {
            for m in capitalised_span_re().find_iter(line) {
                let span = trim_connectors(m.as_str());
                if self.is_org_span(span) {
                    entities.push(span.to_string());
                }
            }
        }
        entities
    }

    fn sentences(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        for line in text.lines() {
            let mut start = 0;
            let mut chars = line.char_indices().peekable();
            while let Some((idx, c)) = chars.next() {
                if !matches!(c, '.' | '!' | '?') {
                    continue;
                }
                let at_break = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
                if at_break {
                    let end = idx + c.len_utf8();
                    push_sentence(&mut sentences, &line[start..end]);
                    start = end;
                }
            }
            push_sentence(&mut sentences, &line[start..]);
        }
        sentences
    }
}

fn push_sentence(out: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
}
