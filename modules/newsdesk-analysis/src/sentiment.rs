use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Instant;

use newsdesk_common::SentimentLabel;
use serde::Serialize;
use serde_json::json;

/// Thresholds from §4.9: `compound >= +0.05` is positive, `<= -0.05` is
/// negative, otherwise neutral. The neutral band is symmetric.
pub const POSITIVE_THRESHOLD: f64 = 0.05;
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Identifier recorded in `model_metadata` (§4.9's metadata requirement).
pub const LEXICON_ID: &str = "vader-lexicon";
pub const LEXICON_VERSION: &str = "v1";

/// VADER's normalization constant: `compound = x / sqrt(x^2 + ALPHA)`.
const ALPHA: f64 = 15.0;
/// Scalar added/subtracted per intensifier/de-intensifier match.
const BOOSTER_SCALAR: f64 = 0.293;
/// Dampening applied to a negated word's valence.
const NEGATION_SCALAR: f64 = -0.74;
/// Per-`!` boost, capped at 4 marks.
const EXCLAMATION_BOOST: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
/// Boost for 3+ `?`.
const QUESTION_BOOST: f64 = 0.96;

/// A small open valence lexicon. Scores follow VADER's [-4, 4] convention
/// before compound normalization. Any open lexicon whose output lands in
/// [-1, 1] with a neutral band <= 0.05 satisfies the contract (§4.9); this
/// one ships as the in-process default.
static VALENCE: LazyLock<HashMap<&'static str, f64>> = LazyLock::new(|| {
    HashMap::from([
        ("good", 1.9), ("great", 3.1), ("excellent", 3.3), ("positive", 2.0),
        ("success", 2.5), ("successful", 2.7), ("win", 2.2), ("wins", 2.2),
        ("improve", 1.8), ("improved", 1.9), ("improvement", 1.8), ("gain", 1.5),
        ("progress", 1.7), ("strong", 1.6), ("boost", 1.8), ("boosted", 1.8),
        ("benefit", 1.6), ("benefits", 1.6), ("support", 1.2), ("supported", 1.2),
        ("approve", 1.4), ("approved", 1.4), ("celebrate", 2.0), ("celebrated", 2.0),
        ("happy", 2.7), ("hope", 1.5), ("hopeful", 1.6), ("recover", 1.3),
        ("recovery", 1.3), ("safe", 1.5), ("secure", 1.3), ("relief", 1.4),
        ("bad", -2.5), ("poor", -2.0), ("terrible", -3.4), ("awful", -3.1),
        ("negative", -2.0), ("fail", -2.3), ("failed", -2.3), ("failure", -2.4),
        ("loss", -1.6), ("lose", -1.6), ("lost", -1.6), ("crisis", -2.2),
        ("corrupt", -2.6), ("corruption", -2.6), ("scandal", -2.5), ("fraud", -2.8),
        ("anomaly", -1.8), ("anomalies", -1.8), ("misuse", -2.2), ("graft", -2.7),
        ("plunder", -2.9), ("kickback", -2.4), ("overpriced", -1.9), ("overprice", -1.9),
        ("scam", -2.6), ("delay", -1.2), ("delayed", -1.3), ("delays", -1.2),
        ("slow", -1.0), ("problem", -1.5), ("problems", -1.5), ("criticize", -1.8),
        ("criticized", -1.8), ("criticism", -1.7), ("protest", -1.3), ("protests", -1.3),
        ("worry", -1.6), ("worried", -1.6), ("concern", -1.3), ("concerns", -1.3),
        ("decline", -1.4), ("declined", -1.4), ("shortage", -1.6), ("shortages", -1.6),
        ("damage", -1.7), ("damages", -1.7), ("destroyed", -2.4), ("killed", -3.0),
        ("injured", -2.1), ("deaths", -3.2), ("casualties", -2.8),
    ])
});

static BOOSTERS: LazyLock<HashMap<&'static str, f64>> = LazyLock::new(|| {
    HashMap::from([
        ("absolutely", BOOSTER_SCALAR), ("completely", BOOSTER_SCALAR),
        ("extremely", BOOSTER_SCALAR), ("very", BOOSTER_SCALAR),
        ("really", BOOSTER_SCALAR), ("totally", BOOSTER_SCALAR),
        ("highly", BOOSTER_SCALAR), ("especially", BOOSTER_SCALAR),
        ("slightly", -BOOSTER_SCALAR), ("somewhat", -BOOSTER_SCALAR),
        ("partially", -BOOSTER_SCALAR), ("barely", -BOOSTER_SCALAR),
        ("marginally", -BOOSTER_SCALAR),
    ])
});

static NEGATIONS: LazyLock<std::collections::HashSet<&'static str>> = LazyLock::new(|| {
    std::collections::HashSet::from([
        "not", "no", "never", "none", "nothing", "nobody", "neither", "nowhere",
        "cannot", "cant", "can't", "wont", "won't", "isn't", "isnt", "wasn't",
        "wasnt", "aren't", "arent", "weren't", "werent", "doesn't", "doesnt",
        "didn't", "didnt", "don't", "dont", "without", "lack", "lacking",
    ])
});

#[derive(Debug, Clone, Serialize)]
pub struct SentimentResult {
    pub compound: f64,
    pub label: SentimentLabel,
    pub processing_time_ms: i32,
}

impl SentimentResult {
    pub fn model_metadata(&self) -> serde_json::Value {
        json!({
            "lexicon": LEXICON_ID,
            "version": LEXICON_VERSION,
            "threshold": POSITIVE_THRESHOLD,
        })
    }
}

/// Score `text`'s compound valence in `[-1, 1]` using negation- and
/// intensifier-aware lexicon lookup, then label it by the §4.9 thresholds.
pub fn analyze(text: &str) -> SentimentResult {
    let start = Instant::now();

    let tokens: Vec<String> = text
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| c.is_ascii_punctuation() && c != '!' && c != '?'))
        .filter(|w| !w.is_empty())
        .map(|w| w.to_string())
        .collect();

    let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
    let mut sentiments: Vec<f64> = Vec::new();

    for (i, word) in lowered.iter().enumerate() {
        let clean = word.trim_matches(|c: char| c == '!' || c == '?');
        let Some(&base) = VALENCE.get(clean) else {
            continue;
        };

        let mut value = base;

        // Look back up to 3 words for a booster/de-booster.
        for back in 1..=3 {
            if back > i {
                break;
            }
            let prior = lowered[i - back].trim_matches(|c: char| c == '!' || c == '?');
            if let Some(&scalar) = BOOSTERS.get(prior) {
                let damp = 1.0 - (back as f64 - 1.0) * 0.25;
                value += if value > 0.0 { scalar * damp } else { -scalar * damp };
            }
        }

        // Negation within the preceding 3 words flips and dampens.
        let negated = (1..=3).any(|back| back <= i && NEGATIONS.contains(lowered[i - back].as_str()));
        if negated {
            value *= NEGATION_SCALAR;
        }

        sentiments.push(value);
    }

    let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS) as f64;
    let questions = text.matches('?').count();
    let punctuation_boost = exclamations * EXCLAMATION_BOOST
        + if questions >= 3 { QUESTION_BOOST } else { 0.0 };

    let sum: f64 = sentiments.iter().sum::<f64>()
        + if sentiments.iter().any(|v| *v != 0.0) {
            punctuation_boost * sum_sign(&sentiments)
        } else {
            0.0
        };

    let compound = normalize(sum);
    let label = if compound >= POSITIVE_THRESHOLD {
        SentimentLabel::Positive
    } else if compound <= NEGATIVE_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    };

    SentimentResult {
        compound,
        label,
        processing_time_ms: start.elapsed().as_millis() as i32,
    }
}

fn sum_sign(values: &[f64]) -> f64 {
    let s: f64 = values.iter().sum();
    if s >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

fn normalize(score: f64) -> f64 {
    let n = score / (score * score + ALPHA).sqrt();
    n.clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_text_scores_positive() {
        let r = analyze("The government celebrated a great success and strong progress.");
        assert_eq!(r.label, SentimentLabel::Positive);
        assert!(r.compound >= POSITIVE_THRESHOLD);
    }

    #[test]
    fn negative_text_scores_negative() {
        let r = analyze("The scandal revealed corruption, fraud, and plunder of public funds.");
        assert_eq!(r.label, SentimentLabel::Negative);
        assert!(r.compound <= NEGATIVE_THRESHOLD);
    }

    #[test]
    fn neutral_text_without_lexicon_hits() {
        let r = analyze("The meeting is scheduled for Tuesday afternoon at the office.");
        assert_eq!(r.label, SentimentLabel::Neutral);
    }

    #[test]
    fn negation_flips_polarity_direction() {
        let positive = analyze("This is a good policy.");
        let negated = analyze("This is not a good policy.");
        assert!(negated.compound < positive.compound);
    }

    #[test]
    fn booster_increases_magnitude() {
        let plain = analyze("This is a good policy.");
        let boosted = analyze("This is a very good policy.");
        assert!(boosted.compound > plain.compound);
    }

    #[test]
    fn compound_stays_within_bounds() {
        let r = analyze(&"terrible corruption scandal fraud plunder killed deaths ".repeat(20));
        assert!(r.compound >= -1.0 && r.compound <= 1.0);
    }

    #[test]
    fn boundary_just_above_threshold_is_positive() {
        // compound = 0.06 case documented in §8 scenario 5 is a property of
        // the thresholding rule itself, independent of lexicon internals.
        assert_eq!(
            if 0.06_f64 >= POSITIVE_THRESHOLD { SentimentLabel::Positive } else { SentimentLabel::Neutral },
            SentimentLabel::Positive
        );
        assert_eq!(
            if 0.04_f64 >= POSITIVE_THRESHOLD { SentimentLabel::Positive } else { SentimentLabel::Neutral },
            SentimentLabel::Neutral
        );
    }
}
