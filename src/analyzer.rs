//! Training and prediction workflows, printed the way the console tool reports them.

use crate::config::{default_config_path, Settings};
use crate::data::{self, SentimentIssue};
use crate::error::Result;
use crate::metrics::BinaryClassificationMetrics;
use crate::model::{SentimentModel, SentimentPrediction};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

pub const SAMPLE_STATEMENT: &str = "U want to get more?";

#[derive(Debug, Clone)]
pub struct TrainReport {
    pub model_path: PathBuf,
    pub metrics: BinaryClassificationMetrics,
    pub train_rows: usize,
    pub test_rows: usize,
    pub sample: SentimentPrediction,
}

pub struct SentimentAnalyzer {
    settings: Settings,
}

impl SentimentAnalyzer {
    pub fn new(settings: Settings) -> Self {
        SentimentAnalyzer { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn train(&self) -> Result<TrainReport> {
        self.train_to(&mut io::stdout().lock())
    }

    /// Load, split, fit, evaluate, save, then score [`SAMPLE_STATEMENT`] with
    /// the in-memory model.
    pub fn train_to<W: Write>(&self, out: &mut W) -> Result<TrainReport> {
        let dataset_path = self.settings.dataset_path()?;
        let model_path = self.settings.model_path()?;
        let started = Instant::now();

        let issues = data::load_dataset(&dataset_path)?;
        let (train, test) = data::train_test_split(
            issues,
            self.settings.data.test_fraction,
            self.settings.data.seed,
        );

        let model = SentimentModel::fit(&train, &self.settings.features, &self.settings.trainer)?;
        info!("Training finished in {:.2}s", started.elapsed().as_secs_f64());

        let metrics = evaluate(&model, &test)?;
        info!(
            "Test accuracy {:.2}%, AUC {:.2}%",
            metrics.accuracy * 100.0,
            metrics.auc * 100.0
        );
        writeln!(out, "{}", metrics)?;

        model.save(&model_path)?;
        writeln!(out, "The model is saved to {}", model_path.display())?;

        let sample = model.predict(&SentimentIssue::unlabeled(SAMPLE_STATEMENT))?;
        writeln!(out, "=============== Single Prediction  ===============")?;
        writeln!(out, "{}", format_prediction(SAMPLE_STATEMENT, &sample))?;

        Ok(TrainReport {
            model_path,
            metrics,
            train_rows: train.len(),
            test_rows: test.len(),
            sample,
        })
    }

    pub fn predict_one(&self, text: &str) -> Result<SentimentPrediction> {
        self.predict_one_to(text, &mut io::stdout().lock())
    }

    /// Loads the saved model on every call and scores `text`.
    pub fn predict_one_to<W: Write>(&self, text: &str, out: &mut W) -> Result<SentimentPrediction> {
        let model = self.load_model()?;
        let prediction = model.predict(&SentimentIssue::unlabeled(text))?;
        writeln!(out, "{}", format_prediction(text, &prediction))?;
        Ok(prediction)
    }

    pub fn predict_batch<P: AsRef<Path>>(&self, path: P) -> Result<Vec<SentimentPrediction>> {
        self.predict_batch_to(path, &mut io::stdout().lock())
    }

    /// Loads the model once and prints one result line per input line, in order.
    pub fn predict_batch_to<P: AsRef<Path>, W: Write>(
        &self,
        path: P,
        out: &mut W,
    ) -> Result<Vec<SentimentPrediction>> {
        let model = self.load_model()?;
        let lines = data::read_lines(path.as_ref())?;
        debug!("Scoring {} lines from {}", lines.len(), path.as_ref().display());

        writeln!(out, "=============== Prediction(s)  ===============")?;
        let predictions = model.predict_many(&lines)?;
        for (line, prediction) in lines.iter().zip(&predictions) {
            writeln!(out, "{}", format_prediction(line, prediction))?;
        }

        Ok(predictions)
    }

    fn load_model(&self) -> Result<SentimentModel> {
        let model_path = self.settings.model_path()?;
        debug!("Loading model from {}", model_path.display());
        SentimentModel::load(&model_path)
    }
}

/// Scores `text` with the model named by `sentiment.toml` next to the executable.
pub fn predict(text: &str) -> Result<SentimentPrediction> {
    predict_with_config(default_config_path()?, text)
}

/// Scores `text` with the model named by the settings file at `config_path`,
/// falling back to the default settings when the file does not exist.
pub fn predict_with_config<P: AsRef<Path>>(config_path: P, text: &str) -> Result<SentimentPrediction> {
    let settings = Settings::load_or_default(config_path)?;
    SentimentAnalyzer::new(settings).predict_one(text)
}

pub fn format_prediction(text: &str, prediction: &SentimentPrediction) -> String {
    format!(
        "Text: {} | Prediction: {} sentiment | Probability of being toxic: {} ",
        text,
        prediction.label(),
        prediction.probability
    )
}

fn evaluate(model: &SentimentModel, test: &[SentimentIssue]) -> Result<BinaryClassificationMetrics> {
    let texts: Vec<&str> = test.iter().map(|issue| issue.text.as_str()).collect();
    let outcomes: Vec<(bool, f64)> = test
        .iter()
        .zip(model.predict_many(&texts)?)
        .map(|(issue, prediction)| (issue.label, prediction.probability))
        .collect();
    BinaryClassificationMetrics::evaluate(&outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_toxic_line() {
        let prediction = SentimentPrediction {
            prediction: true,
            probability: 0.75,
            score: 1.1,
        };
        assert_eq!(
            format_prediction("go away", &prediction),
            "Text: go away | Prediction: Toxic sentiment | Probability of being toxic: 0.75 "
        );
    }

    #[test]
    fn formats_non_toxic_line() {
        let prediction = SentimentPrediction {
            prediction: false,
            probability: 0.125,
            score: -1.9,
        };
        assert_eq!(
            format_prediction("nice edit", &prediction),
            "Text: nice edit | Prediction: Non Toxic sentiment | Probability of being toxic: 0.125 "
        );
    }

    #[test]
    fn predict_one_without_model_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.model.model_path = dir.path().join("missing.json").display().to_string();

        let mut out = Vec::new();
        let result = SentimentAnalyzer::new(settings).predict_one_to("hello", &mut out);
        assert!(result.is_err());
        assert!(out.is_empty());
    }
}
