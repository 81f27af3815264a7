use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Weighted term sets for the political-bias analyzer (§3 Lexicon, §4.10).
/// Categories are named `pro_gov_*`, `pro_opp_*`, `neutral_*` by
/// convention; the weight map keys on the category's suffix (e.g.
/// `current_admin`, `administration`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lexicon {
    pub version: String,
    pub categories: HashMap<String, Vec<String>>,
    pub weights: HashMap<String, f64>,
}

impl Lexicon {
    /// Built-in default, used when no lexicon file is configured. Terms
    /// are stored sorted longest-first per category, matching what
    /// `bias::count_category_terms` re-sorts into before masking matched
    /// spans (§4.10's "prefer longer matches" rule).
    pub fn default_builtin() -> Self {
        let mut categories = HashMap::new();
        categories.insert(
            "pro_gov_current_admin".to_string(),
            sorted(vec![
                "marcos administration",
                "bongbong marcos",
                "president marcos",
                "marcos",
                "pbbm",
            ]),
        );
        categories.insert(
            "pro_gov_administration".to_string(),
            sorted(vec![
                "the administration",
                "malacañang",
                "malacanang",
                "palace",
                "executive branch",
            ]),
        );
        categories.insert(
            "pro_gov_policies".to_string(),
            sorted(vec![
                "build better more",
                "economic recovery program",
                "administration's program",
                "government program",
            ]),
        );
        categories.insert(
            "pro_gov_positive_terms".to_string(),
            sorted(vec![
                "successful", "achievement", "progress", "effective leadership",
                "commendable", "praised",
            ]),
        );
        categories.insert(
            "pro_opp_current_admin".to_string(),
            sorted(vec!["duterte administration", "former president duterte", "duterte"]),
        );
        categories.insert(
            "pro_opp_administration".to_string(),
            sorted(vec!["opposition bloc", "minority bloc", "opposition lawmakers"]),
        );
        categories.insert(
            "pro_opp_policies".to_string(),
            sorted(vec!["failed policy", "broken promise", "mismanagement"]),
        );
        categories.insert(
            "pro_opp_negative_terms".to_string(),
            sorted(vec![
                "incompetent", "corrupt", "failure", "criticized", "condemned", "scandal",
            ]),
        );
        categories.insert(
            "neutral_attribution".to_string(),
            sorted(vec!["according to", "said in a statement", "reported"]),
        );

        let weights = HashMap::from([
            ("current_admin".to_string(), 0.4),
            ("administration".to_string(), 0.3),
            ("policies".to_string(), 0.2),
            ("positive_terms".to_string(), 0.1),
            ("negative_terms".to_string(), 0.1),
            ("attribution".to_string(), 0.1),
        ]);

        Self {
            version: "political_lexicon_v1".to_string(),
            categories,
            weights,
        }
    }

    pub fn weight_for(&self, category: &str) -> f64 {
        let suffix = category
            .trim_start_matches("pro_gov_")
            .trim_start_matches("pro_opp_")
            .trim_start_matches("neutral_");
        self.weights.get(suffix).copied().unwrap_or(0.1)
    }

    pub fn pro_gov_categories(&self) -> impl Iterator<Item = &String> {
        self.categories.keys().filter(|k| k.starts_with("pro_gov_"))
    }

    pub fn pro_opp_categories(&self) -> impl Iterator<Item = &String> {
        self.categories.keys().filter(|k| k.starts_with("pro_opp_"))
    }

    pub fn neutral_categories(&self) -> impl Iterator<Item = &String> {
        self.categories.keys().filter(|k| k.starts_with("neutral_"))
    }
}

fn sorted(terms: Vec<&str>) -> Vec<String> {
    let mut v: Vec<String> = terms.into_iter().map(String::from).collect();
    v.sort_by(|a, b| b.len().cmp(&a.len()));
    v
}

/// Process-wide, read-mostly lexicon state (§3 ownership, §5 shared
/// resources). `reload()` builds a new [`Lexicon`] off to the side and
/// atomically swaps the pointer — readers via [`LexiconLoader::current`]
/// never observe a half-built lexicon.
pub struct LexiconLoader {
    path: Option<PathBuf>,
    current: ArcSwap<Lexicon>,
}

impl LexiconLoader {
    /// Load from `path` if given, else fall back to the built-in default.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let lexicon = match path {
            Some(p) => read_lexicon_file(p)?,
            None => Lexicon::default_builtin(),
        };
        Ok(Self {
            path: path.map(PathBuf::from),
            current: ArcSwap::from_pointee(lexicon),
        })
    }

    pub fn current(&self) -> Arc<Lexicon> {
        self.current.load_full()
    }

    /// Re-read the configured file (or rebuild the built-in default if
    /// none was configured) and swap it in. Copy-on-write: concurrent
    /// readers keep using the old snapshot until this completes.
    pub fn reload(&self) -> Result<()> {
        let lexicon = match &self.path {
            Some(p) => read_lexicon_file(p)?,
            None => Lexicon::default_builtin(),
        };
        self.current.store(Arc::new(lexicon));
        Ok(())
    }
}

fn read_lexicon_file(path: &Path) -> Result<Lexicon> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| AnalysisError::Lexicon(format!("reading {}: {e}", path.display())))?;
    serde_json::from_str(&data).map_err(|e| AnalysisError::Lexicon(format!("parsing {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_builtin_is_sorted_longest_first() {
        let lexicon = Lexicon::default_builtin();
        let terms = &lexicon.categories["pro_gov_current_admin"];
        for pair in terms.windows(2) {
            assert!(pair[0].len() >= pair[1].len());
        }
    }

    #[test]
    fn weight_lookup_strips_category_prefix() {
        let lexicon = Lexicon::default_builtin();
        assert_eq!(lexicon.weight_for("pro_gov_current_admin"), 0.4);
        assert_eq!(lexicon.weight_for("pro_opp_current_admin"), 0.4);
    }

    #[test]
    fn reload_without_path_rebuilds_default() {
        let loader = LexiconLoader::load(None).unwrap();
        let before = loader.current();
        loader.reload().unwrap();
        let after = loader.current();
        assert_eq!(before.version, after.version);
    }

    #[test]
    fn missing_file_errors() {
        let err = LexiconLoader::load(Some(Path::new("/nonexistent/lexicon.json")));
        assert!(err.is_err());
    }
}
