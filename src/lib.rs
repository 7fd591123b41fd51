use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};
use vader_sentiment::SentimentIntensityAnalyzer;

pub mod error;
pub mod fetch;

pub use error::{Error, FetchError, Result};
pub use fetch::{extract_text, FetchConfig, HttpFetcher, PageFetcher};

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisInput {
    pub text: String,
    pub keyword: String,
}

impl AnalysisInput {
    pub fn new(text: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyword: keyword.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.text.is_empty() {
            return Err(Error::EmptyText);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KeywordStats {
    pub count: usize,
    pub word_count: usize,
    /// Percentage, unrounded.
    pub density: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureCheck {
    pub has_headings: bool,
    pub has_meta_title: bool,
    pub meta_title_text: Option<String>,
    pub has_meta_description: bool,
    pub meta_description_text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IntentCategory {
    Informational,
    Transactional,
    Navigational,
    Commercial,
    Unclassified,
}

/// Per-bucket phrase hits. Each phrase contributes at most one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IntentCounts {
    pub informational: usize,
    pub transactional: usize,
    pub navigational: usize,
    pub commercial: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDetails {
    pub keyword: String,
    pub keyword_stats: KeywordStats,
    pub sentiment_score: f64,
    pub sentiment: Sentiment,
    pub structure: StructureCheck,
    pub classification: Option<IntentCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub findings: Vec<String>,
    /// Absent when the analysis was aborted (see [`Report::error`]).
    pub details: Option<ReportDetails>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Suggestion {
    KeywordInTitle,
    KeywordInMetaDescription,
    KeywordInFirstWords,
    KeywordInHeadings,
    NaturalUsage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UrlAnalysis {
    pub report: Report,
    pub suggestions: Vec<Suggestion>,
}

// ---------------------------------------------------------------------------
// Hyperparameters
// ---------------------------------------------------------------------------

struct Hyperparameters {
    sentiment_positive_min: f64,
    sentiment_negative_max: f64,
    optimal_density_label: &'static str,
    first_words_window: usize,
}

static HP: Hyperparameters = Hyperparameters {
    sentiment_positive_min: 0.05,
    sentiment_negative_max: -0.05,
    optimal_density_label: "1-2%",
    first_words_window: 100,
};

/// Evaluation order doubles as the tie-break order.
static INTENT_BUCKETS: [(IntentCategory, &[&str]); 4] = [
    (
        IntentCategory::Informational,
        &["what is", "how to", "guide", "tutorial"],
    ),
    (
        IntentCategory::Transactional,
        &["buy", "purchase", "order", "subscribe"],
    ),
    (
        IntentCategory::Navigational,
        &["home", "about", "contact", "login"],
    ),
    (
        IntentCategory::Commercial,
        &["product", "service", "pricing", "offer"],
    ),
];

// ---------------------------------------------------------------------------
// Compiled patterns
// ---------------------------------------------------------------------------

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<h[1-3]>").unwrap());

static META_TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<title>(.*?)</title>").unwrap());

static META_DESCRIPTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<meta name="description" content="(.*?)""#).unwrap());

// ---------------------------------------------------------------------------
// Sentiment model
// ---------------------------------------------------------------------------

static SENTIMENT_MODEL: Lazy<SentimentIntensityAnalyzer<'static>> = Lazy::new(|| {
    debug!("loading sentiment lexicon");
    SentimentIntensityAnalyzer::new()
});

pub fn init_sentiment() {
    Lazy::force(&SENTIMENT_MODEL);
}

pub fn sentiment_compound(text: &str) -> f64 {
    if text.trim().is_empty() {
        return 0.0;
    }
    let scores = SENTIMENT_MODEL.polarity_scores(text);
    let score = |key: &str| scores.get(key).copied().unwrap_or(0.0);

    // No lexicon hits: punctuation emphasis alone must not tip the score.
    if score("pos") == 0.0 && score("neg") == 0.0 {
        return 0.0;
    }
    score("compound").clamp(-1.0, 1.0)
}

impl Sentiment {
    pub fn from_compound(score: f64) -> Self {
        if score >= HP.sentiment_positive_min {
            Sentiment::Positive
        } else if score <= HP.sentiment_negative_max {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Analyzers
// ---------------------------------------------------------------------------

fn word_count(text: &str) -> usize {
    WORD_RE.find_iter(text).count()
}

pub fn count_and_density(text: &str, keyword: &str) -> KeywordStats {
    let lowered = text.to_lowercase();
    let count = if keyword.is_empty() {
        0
    } else {
        lowered.matches(keyword.to_lowercase().as_str()).count()
    };

    let words = word_count(&lowered);
    let density = if words > 0 {
        count as f64 / words as f64 * 100.0
    } else {
        0.0
    };

    KeywordStats {
        count,
        word_count: words,
        density,
    }
}

pub fn check_structure(text: &str) -> StructureCheck {
    let has_headings = HEADING_RE.is_match(&text.to_lowercase());

    let first_capture = |re: &Regex| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    };
    let meta_title_text = first_capture(&META_TITLE_RE);
    let meta_description_text = first_capture(&META_DESCRIPTION_RE);

    StructureCheck {
        has_headings,
        has_meta_title: meta_title_text.is_some(),
        meta_title_text,
        has_meta_description: meta_description_text.is_some(),
        meta_description_text,
    }
}

pub fn intent_counts(text: &str) -> IntentCounts {
    let lowered = text.to_lowercase();
    let hits = |phrases: &[&str]| phrases.iter().filter(|p| lowered.contains(**p)).count();

    let mut counts = IntentCounts::default();
    for &(category, phrases) in INTENT_BUCKETS.iter() {
        let n = hits(phrases);
        match category {
            IntentCategory::Informational => counts.informational = n,
            IntentCategory::Transactional => counts.transactional = n,
            IntentCategory::Navigational => counts.navigational = n,
            IntentCategory::Commercial => counts.commercial = n,
            IntentCategory::Unclassified => {}
        }
    }
    counts
}

impl IntentCounts {
    pub fn get(&self, category: IntentCategory) -> usize {
        match category {
            IntentCategory::Informational => self.informational,
            IntentCategory::Transactional => self.transactional,
            IntentCategory::Navigational => self.navigational,
            IntentCategory::Commercial => self.commercial,
            IntentCategory::Unclassified => 0,
        }
    }

    fn max(&self) -> usize {
        self.informational
            .max(self.transactional)
            .max(self.navigational)
            .max(self.commercial)
    }
}

/// Bucket with the most phrase hits; ties go to the earliest bucket.
///
/// With zero hits everywhere the first bucket still matches the maximum, so
/// this returns `Informational` and never reaches `Unclassified`.
pub fn classify(text: &str) -> IntentCategory {
    let counts = intent_counts(text);
    let max = counts.max();
    let category = INTENT_BUCKETS
        .iter()
        .map(|(category, _)| *category)
        .find(|category| counts.get(*category) == max)
        .unwrap_or(IntentCategory::Unclassified);
    debug!(?counts, ?category, "classified page intent");
    category
}

impl fmt::Display for IntentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IntentCategory::Informational => "Informational",
            IntentCategory::Transactional => "Transactional",
            IntentCategory::Navigational => "Navigational",
            IntentCategory::Commercial => "Commercial",
            IntentCategory::Unclassified => "Unclassified",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

pub fn build_report(input: &AnalysisInput) -> Report {
    let keyword = &input.keyword;

    let stats = count_and_density(&input.text, keyword);
    debug!(?stats, "keyword stats");

    let sentiment_score = sentiment_compound(&input.text);
    let sentiment = Sentiment::from_compound(sentiment_score);
    debug!(sentiment_score, %sentiment, "sentiment");

    let structure = check_structure(&input.text);
    debug!(?structure, "structure check");

    let headings = if structure.has_headings {
        "Proper headings (H1, H2, H3) are used."
    } else {
        "Proper headings (H1, H2, H3) are not used."
    };
    let meta_title = if structure.has_meta_title {
        "Meta title is defined."
    } else {
        "Meta title is missing."
    };
    let meta_description = if structure.has_meta_description {
        "Meta description is defined."
    } else {
        "Meta description is missing."
    };

    let findings = vec![
        format!("1. Keyword '{keyword}' appears {} times.", stats.count),
        format!(
            "2. Keyword Density for '{keyword}': {:.2}% (Optimal: {}).",
            stats.density, HP.optimal_density_label
        ),
        format!("3. Sentiment Analysis Result: {sentiment}"),
        format!("4. {headings}"),
        format!("5. {meta_title}\n   {meta_description}"),
    ];

    Report {
        findings,
        details: Some(ReportDetails {
            keyword: keyword.clone(),
            keyword_stats: stats,
            sentiment_score,
            sentiment,
            structure,
            classification: None,
        }),
    }
}

impl Report {
    pub fn error(message: impl fmt::Display) -> Self {
        Self {
            findings: vec![format!("Error: {message}")],
            details: None,
        }
    }

    pub fn with_classification(mut self, category: IntentCategory) -> Self {
        self.findings.push(format!("Page Classification: {category}"));
        if let Some(details) = self.details.as_mut() {
            details.classification = Some(category);
        }
        self
    }

    pub fn is_error(&self) -> bool {
        self.details.is_none()
    }

    pub fn rendered(&self) -> String {
        self.findings.join("\n")
    }
}

// ---------------------------------------------------------------------------
// Suggestions
// ---------------------------------------------------------------------------

impl Suggestion {
    /// Fixed slot in the suggestion list, kept even when earlier slots are skipped.
    pub fn number(self) -> usize {
        match self {
            Suggestion::KeywordInTitle => 1,
            Suggestion::KeywordInMetaDescription => 2,
            Suggestion::KeywordInFirstWords => 3,
            Suggestion::KeywordInHeadings => 4,
            Suggestion::NaturalUsage => 5,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Suggestion::KeywordInTitle => {
                "Consider adding the primary keyword to the document title."
            }
            Suggestion::KeywordInMetaDescription => {
                "Consider adding the primary keyword to the meta description."
            }
            Suggestion::KeywordInFirstWords => {
                "Consider using the primary keyword within the first 100 words of the content."
            }
            Suggestion::KeywordInHeadings => {
                "Consider using the primary keyword in subheadings (H1, H2, H3)."
            }
            Suggestion::NaturalUsage => {
                "Consider using the primary keyword naturally throughout the content."
            }
        }
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.message())
    }
}

fn keyword_between(prefix: &str, keyword: &str, suffix: &str, haystack: &str) -> bool {
    let pattern = format!("{prefix}.*{}.*{suffix}", regex::escape(keyword));
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(haystack),
        Err(err) => {
            warn!(%err, "could not compile keyword pattern");
            false
        }
    }
}

/// Advice derived from the rendered report text.
///
/// The scans run over the report lines, not the page, so the title, meta
/// description and heading checks only see markup quoted back in a finding.
pub fn build_suggestions(rendered_report: &str, keyword: &str) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    if !keyword_between("<title>", keyword, "</title>", rendered_report) {
        suggestions.push(Suggestion::KeywordInTitle);
    }

    if !keyword_between(
        r#"<meta name="description" content=""#,
        keyword,
        "\"",
        rendered_report,
    ) {
        suggestions.push(Suggestion::KeywordInMetaDescription);
    }

    let wc = word_count(rendered_report);
    if wc > 0
        && wc <= HP.first_words_window
        && !rendered_report
            .to_lowercase()
            .contains(&keyword.to_lowercase())
    {
        suggestions.push(Suggestion::KeywordInFirstWords);
    }

    if !keyword_between("<h[1-3]>", keyword, "</h[1-3]>", rendered_report) {
        suggestions.push(Suggestion::KeywordInHeadings);
    }

    suggestions.push(Suggestion::NaturalUsage);
    suggestions
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn analyze_text(input: &AnalysisInput) -> Result<Report> {
    input.validate()?;
    Ok(build_report(input))
}

/// A fetch failure yields a single `Error:` line and no suggestions.
pub fn analyze_url<F: PageFetcher + ?Sized>(fetcher: &F, url: &str, keyword: &str) -> UrlAnalysis {
    let html = match fetcher.fetch(url) {
        Ok(html) => html,
        Err(err) => {
            warn!(url, %err, "page analysis aborted");
            return UrlAnalysis {
                report: Report::error(err),
                suggestions: Vec::new(),
            };
        }
    };

    let text = extract_text(&html);
    let report = build_report(&AnalysisInput::new(text.as_str(), keyword));
    let report = report.with_classification(classify(&text));
    let suggestions = build_suggestions(&report.rendered(), keyword);

    UrlAnalysis {
        report,
        suggestions,
    }
}
