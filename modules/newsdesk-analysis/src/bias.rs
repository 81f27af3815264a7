use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Instant;

use newsdesk_common::Direction;
use regex::Regex;
use serde::Serialize;
use serde_json::json;

use crate::lexicon::Lexicon;

/// Informal cues: contractions, slang, exclamation density. Formal cues:
/// attribution verbs and passive-voice markers. Neither list is recoverable
/// from the distilled spec; these are a reasonable stand-in documented as
/// an Open Question resolution.
static INFORMAL_CUES: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    vec![
        "gonna", "wanna", "kinda", "y'know", "lol", "omg", "sobrang", "grabe",
        "talaga", "pala",
    ]
});

static FORMAL_CUES: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    vec![
        "according to", "stated", "reported", "was said to", "is believed to",
        "has been", "have been",
    ]
});

static GOVERNANCE_TERMS: LazyLock<Vec<&'static str>> =
    LazyLock::new(|| vec!["congress", "senate", "malacañang", "malacanang", "department of", "bureau of"]);

const KEYWORD_WEIGHT: f64 = 0.6;
const SOURCE_WEIGHT: f64 = 0.1;
const LANGUAGE_WEIGHT: f64 = 0.1;
const SENTIMENT_WEIGHT: f64 = 0.2;
const SOURCE_PATTERN_PRIOR: f64 = 0.05;
const LANGUAGE_INFORMAL: f64 = 0.2;
const LANGUAGE_FORMAL: f64 = -0.1;
const SENTIMENT_GATE: f64 = 0.3;
const DIRECTION_GATE: f64 = 0.1;

#[derive(Debug, Clone, Serialize)]
pub struct BiasResult {
    pub direction: Direction,
    pub bias_score: f64,
    pub confidence: f64,
    pub pro_gov_score: f64,
    pub pro_opp_score: f64,
    pub neutral_score: f64,
    pub keyword_score: f64,
    pub source_pattern: f64,
    pub language_patterns: f64,
    pub sentiment_context: f64,
    pub keyword_matches: HashMap<String, u32>,
    pub processing_time_ms: i32,
}

impl BiasResult {
    /// Bit-exact shape required by §6: `direction`, `keyword_matches`,
    /// `processing_time_ms`, and an `analysis_components` breakdown.
    pub fn model_metadata(&self, lexicon_version: &str) -> serde_json::Value {
        json!({
            "direction": self.direction.as_str(),
            "keyword_matches": self.keyword_matches,
            "processing_time_ms": self.processing_time_ms,
            "analysis_components": {
                "keyword_score": self.keyword_score,
                "source_pattern": self.source_pattern,
                "language_patterns": self.language_patterns,
                "sentiment_context": self.sentiment_context,
                "version": lexicon_version,
            },
        })
    }
}

/// Score `text` for political bias against `lexicon`, using `compound`
/// (the article's sentiment compound from [`crate::sentiment::analyze`])
/// as the `sentiment_context` term in §4.10's formula.
pub fn analyze(text: &str, lexicon: &Lexicon, compound: f64) -> BiasResult {
    let start = Instant::now();
    let lower = text.to_lowercase();

    let mut keyword_matches: HashMap<String, u32> = HashMap::new();
    let mut pro_gov_score = 0.0;
    let mut pro_opp_score = 0.0;
    let mut neutral_score = 0.0;
    let mut total_matches: u32 = 0;

    for category in lexicon.categories.keys() {
        let terms = &lexicon.categories[category];
        let weight = lexicon.weight_for(category);
        let count = count_category_terms(&lower, terms);
        if count > 0 {
            keyword_matches.insert(category.clone(), count);
            total_matches += count;
            let contribution = count as f64 * weight;
            if category.starts_with("pro_gov_") {
                pro_gov_score += contribution;
            } else if category.starts_with("pro_opp_") {
                pro_opp_score += contribution;
            } else {
                neutral_score += contribution;
            }
        }
    }

    let keyword_score = (pro_gov_score.max(pro_opp_score) / (total_matches.max(1) as f64)).min(1.0);
    let sentiment_context = if compound.abs() > SENTIMENT_GATE { compound.abs() } else { 0.0 };
    let language_patterns = language_pattern_score(&lower);
    let source_pattern = if GOVERNANCE_TERMS.iter().any(|t| lower.contains(t)) {
        SOURCE_PATTERN_PRIOR
    } else {
        0.0
    };

    let bias_score = KEYWORD_WEIGHT * keyword_score
        + SOURCE_WEIGHT * source_pattern
        + LANGUAGE_WEIGHT * language_patterns.abs()
        + SENTIMENT_WEIGHT * sentiment_context;

    let direction = if pro_gov_score > pro_opp_score && bias_score > DIRECTION_GATE {
        Direction::ProGovernment
    } else if pro_opp_score > pro_gov_score && bias_score > DIRECTION_GATE {
        Direction::ProOpposition
    } else {
        Direction::Neutral
    };

    let confidence = (bias_score + total_matches as f64 / 20.0).min(1.0);

    BiasResult {
        direction,
        bias_score,
        confidence,
        pro_gov_score,
        pro_opp_score,
        neutral_score,
        keyword_score,
        source_pattern,
        language_patterns,
        sentiment_context,
        keyword_matches,
        processing_time_ms: start.elapsed().as_millis() as i32,
    }
}

fn language_pattern_score(lower: &str) -> f64 {
    let informal = INFORMAL_CUES.iter().filter(|c| lower.contains(**c)).count()
        + lower.matches('!').count();
    let formal = FORMAL_CUES.iter().filter(|c| lower.contains(**c)).count();

    if informal > formal {
        LANGUAGE_INFORMAL
    } else if formal > informal {
        LANGUAGE_FORMAL
    } else {
        0.0
    }
}

/// Count matches for one category's terms, longest-first, masking each
/// matched span before shorter terms are tried (§4.10: "Sort terms per
/// category by descending length before matching to prefer longer
/// matches"). Without this, a nested shorter term (e.g. `"marcos"` inside
/// an already-counted `"marcos administration"`) would be double-counted.
fn count_category_terms(haystack: &str, terms: &[String]) -> u32 {
    let mut sorted: Vec<&String> = terms.iter().collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut masked = haystack.to_string();
    let mut count = 0u32;
    for term in sorted {
        let spans = find_term_spans(&masked, term);
        count += spans.len() as u32;
        masked = mask_spans(&masked, &spans);
    }
    count
}

fn find_term_spans(haystack: &str, term: &str) -> Vec<(usize, usize)> {
    if term.contains(' ') {
        haystack
            .match_indices(term)
            .map(|(i, m)| (i, i + m.len()))
            .collect()
    } else {
        word_boundary_regex(term)
            .map(|re| re.find_iter(haystack).map(|m| (m.start(), m.end())).collect())
            .unwrap_or_default()
    }
}

/// Replace matched byte spans with `#` filler of identical byte length so
/// later (shorter) terms can no longer match inside them, while every
/// unmatched byte keeps its original offset for subsequent scans.
fn mask_spans(text: &str, spans: &[(usize, usize)]) -> String {
    let mut bytes = text.as_bytes().to_vec();
    for &(start, end) in spans {
        for b in &mut bytes[start..end] {
            *b = b'#';
        }
    }
    String::from_utf8(bytes).expect("masking preserves UTF-8 validity")
}

fn word_boundary_regex(term: &str) -> Option<Regex> {
    Regex::new(&format!(r"\b{}\b", regex::escape(term))).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pro_government_terms_skew_direction() {
        let lexicon = Lexicon::default_builtin();
        let text = "President Marcos and the Marcos administration announced a new program.";
        let result = analyze(text, &lexicon, 0.0);
        assert_eq!(result.direction, Direction::ProGovernment);
        assert!(result.pro_gov_score > result.pro_opp_score);
    }

    #[test]
    fn pro_opposition_terms_skew_direction() {
        let lexicon = Lexicon::default_builtin();
        let text = "Critics say the Duterte administration was corrupt and a failure.";
        let result = analyze(text, &lexicon, 0.0);
        assert_eq!(result.direction, Direction::ProOpposition);
    }

    #[test]
    fn text_without_keyword_hits_is_neutral() {
        let lexicon = Lexicon::default_builtin();
        let result = analyze("The weather today is sunny with a light breeze.", &lexicon, 0.0);
        assert_eq!(result.direction, Direction::Neutral);
        assert_eq!(result.bias_score, 0.0);
    }

    #[test]
    fn strong_sentiment_raises_bias_score_via_sentiment_context() {
        let lexicon = Lexicon::default_builtin();
        let neutral_compound = analyze("Marcos administration update.", &lexicon, 0.0);
        let strong_compound = analyze("Marcos administration update.", &lexicon, 0.9);
        assert!(strong_compound.bias_score > neutral_compound.bias_score);
    }

    #[test]
    fn confidence_never_exceeds_one() {
        let lexicon = Lexicon::default_builtin();
        let text = "marcos ".repeat(100);
        let result = analyze(&text, &lexicon, 1.0);
        assert!(result.confidence <= 1.0);
    }

    #[test]
    fn nested_shorter_term_is_not_double_counted() {
        // §8 scenario 6: "Marcos administration" x1, "successful" x1 ->
        // pro_gov_current_admin:1, not 2 from also counting the "marcos"
        // substring inside the longer phrase.
        let lexicon = Lexicon::default_builtin();
        let text = "The Marcos administration announced a successful program.";
        let result = analyze(text, &lexicon, 0.0);
        assert_eq!(result.keyword_matches.get("pro_gov_current_admin"), Some(&1));
        assert_eq!(result.keyword_matches.get("pro_gov_positive_terms"), Some(&1));
        assert_eq!(result.direction, Direction::ProGovernment);
    }

    #[test]
    fn single_word_terms_respect_word_boundaries() {
        let lexicon = Lexicon::default_builtin();
        // "marcosian" must not match the single-word term "marcos".
        let result = analyze("this is marcosian in style", &lexicon, 0.0);
        assert!(!result.keyword_matches.contains_key("pro_gov_current_admin"));
    }
}
