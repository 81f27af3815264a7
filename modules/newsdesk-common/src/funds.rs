use regex::Regex;
use std::sync::LazyLock;

/// Version recorded alongside `is_funds` at insert time; bump when the
/// term sets or the decision rule below change.
pub const CLASSIFIER_VERSION: &str = "funds_v1";

// Substring matching, same as the reference term lists these are grounded
// on — most terms deliberately have no trailing word boundary so that
// "fund" also matches "funds"/"funding" and "allocation" matches
// "allocations". `php` is the one term narrow enough to need both
// boundaries, or it would match inside unrelated words.
static MONEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(fund|budget|appropriation|allocation|disbursement|audit|coa|\bphp\b|billion|million|trillion|peso)")
        .unwrap()
});

static PUBLIC_SECTOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(dpwh|dbm|coa|comelec|dilg|doh|deped|dotr|senate|house|congress|solon|lawmaker|\bbill\b|malaca[nñ]ang|palace|president|vice president|ombudsman|philippine government|ph government)")
        .unwrap()
});

static CORRUPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(pork|kickback|anomaly|graft|plunder|misuse|overprice|overpriced|scam|whistleblower)")
        .unwrap()
});

static SPORTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(basketball|volleyball|football|soccer|nba|pba|uaap|ncaa|tournament|match|game|coach|player|club)")
        .unwrap()
});

static CRIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(shabu|buy-bust|drug|narcotics|illegal drugs|anti-drug|meth|pdea)").unwrap()
});

static DISASTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(earthquake|typhoon|hurricane|natural disaster|magnitude|aftershock|tsunami|landslide|volcano|eruption|storm|cyclone|tornado|flash flood|flooding incident)")
        .unwrap()
});

static DAMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(damage|destroyed|collapsed|injured|killed|deaths|casualties|evacuated|displaced|affected|victims|property damage)")
        .unwrap()
});

/// NER entity label exposed by an optional augmentation hook (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityLabel {
    Org,
    Money,
    Gpe,
    Law,
}

#[derive(Debug, Clone, Copy)]
pub struct Entity {
    pub label: EntityLabel,
    pub confidence: f64,
}

/// Pluggable NER augmentation for the classifier. No implementation ships
/// in this crate — callers that want NER-backed confirmation/veto provide
/// their own hook.
pub trait NerHook: Send + Sync {
    fn entities(&self, text: &str) -> Vec<Entity>;
}

/// `Classifier = Pure(rule) | Augmented(rule, ner_hook)` (§9).
pub enum FundsClassifier {
    Pure,
    Augmented(Box<dyn NerHook>),
}

impl FundsClassifier {
    pub fn classify(&self, title: &str, content: Option<&str>) -> bool {
        let regex_decision = classify_regex(title, content);
        match self {
            FundsClassifier::Pure => regex_decision,
            FundsClassifier::Augmented(hook) => {
                let text = joined_text(title, content);
                let entities = hook.entities(&text);
                let confident = entities.iter().find(|e| e.confidence > 0.6);
                if let Some(e) = confident {
                    return matches!(e.label, EntityLabel::Org | EntityLabel::Money | EntityLabel::Law);
                }
                if regex_decision {
                    let weak = entities.iter().any(|e| e.confidence < 0.5);
                    if weak {
                        return false;
                    }
                }
                regex_decision
            }
        }
    }
}

fn joined_text(title: &str, content: Option<&str>) -> String {
    format!("{title}\n{}", content.unwrap_or(""))
}

/// Pure, referentially transparent `is_funds` rule (§4.3). Same inputs
/// always produce the same output.
pub fn classify_regex(title: &str, content: Option<&str>) -> bool {
    let text = joined_text(title, content);
    if text.trim().is_empty() {
        return false;
    }

    let disaster_match = DISASTER_RE.find(&text);
    let veto = SPORTS_RE.is_match(&text) || CRIME_RE.is_match(&text) || DAMAGE_RE.is_match(&text)
        || disaster_match.is_some();

    let has_money = MONEY_RE.is_match(&text);
    let has_public_sector = PUBLIC_SECTOR_RE.is_match(&text);
    let has_corruption = CORRUPTION_RE.is_match(&text);
    let positive = has_money && (has_public_sector || has_corruption);

    if !veto {
        return positive;
    }

    // Edge case: a disaster cue participated in the veto, but a public-sector
    // or corruption cue appears independently of that disaster mention —
    // the veto does not apply and the positive rule stands.
    if disaster_match.is_some() && positive {
        let independent = independent_of_span(&PUBLIC_SECTOR_RE, &text, disaster_match)
            || independent_of_span(&CORRUPTION_RE, &text, disaster_match);
        if independent {
            return true;
        }
    }

    false
}

fn independent_of_span(re: &Regex, text: &str, exclude: Option<regex::Match>) -> bool {
    let exclude_range = exclude.map(|m| (m.start(), m.end()));
    re.find_iter(text).any(|m| match exclude_range {
        Some((s, e)) => m.start() >= e || m.end() <= s,
        None => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn funds_positive_money_and_public_sector() {
        assert!(classify_regex(
            "DPWH allocates P5 billion for flood control projects",
            Some("The Department of Public Works and Highways announced the allocation for infrastructure projects in Manila.")
        ));
    }

    #[test]
    fn money_alone_without_public_sector_is_false() {
        assert!(!classify_regex(
            "Lotto jackpot hits 500 million pesos this week",
            None
        ));
    }

    #[test]
    fn billion_does_not_spuriously_match_bill() {
        // "billion" must not satisfy the public-sector half via a
        // boundary-less match on "bill" inside it.
        assert!(!classify_regex(
            "Company secures 10 billion funding round",
            None
        ));
        assert!(!classify_regex("Lotto jackpot hits 5 billion pesos", None));
    }

    #[test]
    fn philippines_mention_alone_is_not_a_public_sector_cue() {
        assert!(!classify_regex(
            "Tourists spend a billion pesos in the Philippines this year",
            Some("Filipino travel agencies reported record bookings.")
        ));
    }

    #[test]
    fn disaster_veto_wins_even_with_millions() {
        assert!(!classify_regex(
            "Magnitude 6 earthquake damages houses worth millions in Bohol",
            None
        ));
    }

    #[test]
    fn sports_veto() {
        assert!(!classify_regex("PBA coach signs million-peso contract", None));
    }

    #[test]
    fn crime_veto() {
        assert!(!classify_regex(
            "Buy-bust operation nets shabu worth millions",
            Some("DPWH officials were not involved.")
        ));
    }

    #[test]
    fn disaster_with_independent_corruption_cue_is_true() {
        assert!(classify_regex(
            "Typhoon relief funds misused, says audit",
            None
        ));
    }

    #[test]
    fn disaster_without_independent_cue_is_false() {
        assert!(!classify_regex(
            "Typhoon brings millions in damage to coastal towns",
            None
        ));
    }

    #[test]
    fn empty_text_is_false() {
        assert!(!classify_regex("", None));
        assert!(!classify_regex("   ", Some("   ")));
    }

    #[test]
    fn is_pure() {
        let a = classify_regex("DPWH budget hearing", Some("congress approved the appropriation"));
        let b = classify_regex("DPWH budget hearing", Some("congress approved the appropriation"));
        assert_eq!(a, b);
    }
}
