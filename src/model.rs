//! The trained pipeline: text featurizer followed by a logistic regression.

use crate::config::{FeaturesConfig, TrainerConfig};
use crate::data::{SentimentIssue, LABEL_COLUMN, TEXT_COLUMN};
use crate::error::{Error, Result};
use crate::featurizer::TextFeaturizer;
use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_logistic::{FittedLogisticRegression, LogisticRegression};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{debug, info};

pub const MODEL_FORMAT_VERSION: u32 = 1;

const DECISION_THRESHOLD: f64 = 0.5;

/// Result of scoring one text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentPrediction {
    /// `true` when the text is classified as toxic
    pub prediction: bool,
    /// Probability of being toxic, in `[0, 1]`
    pub probability: f64,
    /// Raw margin of the linear model
    pub score: f64,
}

impl SentimentPrediction {
    pub fn label(&self) -> &'static str {
        if self.prediction {
            "Toxic"
        } else {
            "Non Toxic"
        }
    }
}

pub struct SentimentModel {
    featurizer: TextFeaturizer,
    classifier: FittedLogisticRegression<f64, bool>,
}

#[derive(Serialize)]
struct ModelFileRef<'a> {
    format_version: u32,
    schema: Vec<String>,
    featurizer: &'a TextFeaturizer,
    classifier: &'a FittedLogisticRegression<f64, bool>,
}

#[derive(Deserialize)]
struct ModelFile {
    format_version: u32,
    schema: Vec<String>,
    featurizer: TextFeaturizer,
    classifier: FittedLogisticRegression<f64, bool>,
}

fn expected_schema() -> Vec<String> {
    vec![TEXT_COLUMN.to_string(), LABEL_COLUMN.to_string()]
}

impl SentimentModel {
    pub fn fit(
        train: &[SentimentIssue],
        features: &FeaturesConfig,
        trainer: &TrainerConfig,
    ) -> Result<Self> {
        if train.is_empty() {
            return Err(Error::Training("training set is empty".into()));
        }
        let positives = train.iter().filter(|issue| issue.label).count();
        if positives == 0 || positives == train.len() {
            return Err(Error::Training(
                "training set must contain both toxic and non-toxic rows".into(),
            ));
        }

        let texts: Vec<&str> = train.iter().map(|issue| issue.text.as_str()).collect();
        let featurizer = TextFeaturizer::fit(&texts, features)?;

        let records = featurizer.transform_batch(&texts)?;
        let targets: Array1<bool> = train.iter().map(|issue| issue.label).collect();
        let dataset = Dataset::new(records, targets);

        info!(
            "Fitting logistic regression on {} rows x {} features ({} toxic)",
            train.len(),
            featurizer.dimension(),
            positives
        );

        let classifier = LogisticRegression::default()
            .alpha(trainer.alpha)
            .max_iterations(trainer.max_iterations)
            .gradient_tolerance(trainer.gradient_tolerance)
            .fit(&dataset)
            .map_err(|e: linfa_logistic::error::Error| Error::Training(e.to_string()))?;

        Ok(SentimentModel {
            featurizer,
            classifier,
        })
    }

    pub fn predict(&self, issue: &SentimentIssue) -> Result<SentimentPrediction> {
        self.predict_text(&issue.text)
    }

    pub fn predict_text(&self, text: &str) -> Result<SentimentPrediction> {
        Ok(self.predict_many(&[text])?[0])
    }

    /// Scores every text with a single featurization pass.
    pub fn predict_many<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<SentimentPrediction>> {
        let features = self.featurizer.transform_batch(texts)?;
        Ok(self.score(&features))
    }

    fn score(&self, features: &Array2<f64>) -> Vec<SentimentPrediction> {
        let labels: Array1<bool> = self.classifier.predict(features);
        let probabilities = self.classifier.predict_probabilities(features);
        let margins = features.dot(self.classifier.params()) + self.classifier.intercept();

        labels
            .iter()
            .zip(probabilities.iter())
            .zip(margins.iter())
            .map(|((&label, &p), &margin)| {
                // linfa's positive class is the first label seen in training, not necessarily `true`.
                let positive_is_toxic = (p >= DECISION_THRESHOLD) == label;
                SentimentPrediction {
                    prediction: label,
                    probability: if positive_is_toxic { p } else { 1.0 - p },
                    score: if positive_is_toxic { margin } else { -margin },
                }
            })
            .collect()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = ModelFileRef {
            format_version: MODEL_FORMAT_VERSION,
            schema: expected_schema(),
            featurizer: &self.featurizer,
            classifier: &self.classifier,
        };
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, &file)?;

        debug!("Wrote model to {}", path.display());
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let file: ModelFile = serde_json::from_reader(reader)
            .map_err(|e| Error::Model(format!("{}: {}", path.display(), e)))?;

        if file.format_version != MODEL_FORMAT_VERSION {
            return Err(Error::SchemaMismatch(format!(
                "model format version {} (expected {})",
                file.format_version, MODEL_FORMAT_VERSION
            )));
        }
        if file.schema != expected_schema() {
            return Err(Error::SchemaMismatch(format!(
                "model columns {:?} (expected {:?})",
                file.schema,
                expected_schema()
            )));
        }

        debug!(
            "Loaded model from {} ({} features)",
            path.display(),
            file.featurizer.dimension()
        );
        Ok(SentimentModel {
            featurizer: file.featurizer,
            classifier: file.classifier,
        })
    }
}
