//! Binary toxicity classifier for short texts.
//!
//! Trains a TF-IDF + logistic regression pipeline on a labeled TSV dataset,
//! saves it next to the executable and reloads it to score single texts or
//! whole files.
//!
//! ```no_run
//! let prediction = toxicity_classifier::predict("U want to get more?")?;
//! println!("{} ({})", prediction.label(), prediction.probability);
//! # Ok::<(), toxicity_classifier::Error>(())
//! ```

pub mod analyzer;
pub mod config;
pub mod data;
pub mod error;
pub mod featurizer;
pub mod metrics;
pub mod model;
pub mod paths;

pub use analyzer::{predict, predict_with_config, SentimentAnalyzer, TrainReport};
pub use config::Settings;
pub use data::SentimentIssue;
pub use error::{Error, Result};
pub use model::{SentimentModel, SentimentPrediction};
pub use paths::resolve_absolute_path;
