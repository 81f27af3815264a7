pub mod bias;
pub mod error;
pub mod lexicon;
pub mod runner;
pub mod sentiment;

pub use bias::BiasResult;
pub use error::{AnalysisError, Result};
pub use lexicon::{Lexicon, LexiconLoader};
pub use runner::{AnalysisOutcome, AnalysisRunner, POLITICAL_MODEL_VERSION, SENTIMENT_MODEL_VERSION};
pub use sentiment::SentimentResult;
