//! Binary classification metrics computed on the held-out split.

use crate::error::{Error, Result};
use linfa::dataset::Pr;
use linfa::metrics::{BinaryClassification, ToConfusionMatrix};
use ndarray::Array1;
use std::fmt;

const LOG_LOSS_EPSILON: f64 = 1e-15;

// linfa reports binary precision, recall and F1 for the smallest label.
const TOXIC_CLASS: usize = 0;
const NON_TOXIC_CLASS: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryClassificationMetrics {
    pub accuracy: f64,
    pub auc: f64,
    pub f1_score: f64,
    pub precision: f64,
    pub recall: f64,
    pub log_loss: f64,
    pub positive_count: usize,
    pub negative_count: usize,
}

impl BinaryClassificationMetrics {
    /// Evaluates `(label, probability_of_toxic)` pairs at a 0.5 threshold.
    pub fn evaluate(outcomes: &[(bool, f64)]) -> Result<Self> {
        if outcomes.is_empty() {
            return Err(Error::Evaluation("no rows to evaluate".into()));
        }

        let class = |toxic: bool| if toxic { TOXIC_CLASS } else { NON_TOXIC_CLASS };
        let truth: Array1<usize> = outcomes.iter().map(|&(label, _)| class(label)).collect();
        let predicted: Array1<usize> = outcomes.iter().map(|&(_, p)| class(p >= 0.5)).collect();
        let cm = predicted
            .confusion_matrix(truth.view())
            .map_err(|e| Error::Evaluation(e.to_string()))?;

        let labels: Vec<bool> = outcomes.iter().map(|&(label, _)| label).collect();
        let positive_count = labels.iter().filter(|&&label| label).count();

        // AUC is undefined unless both classes are present
        let auc = if positive_count == 0 || positive_count == labels.len() {
            0.0
        } else {
            let probabilities: Vec<Pr> =
                outcomes.iter().map(|&(_, p)| Pr::new(p as f32)).collect();
            probabilities
                .as_slice()
                .roc(labels.as_slice())
                .map_err(|e| Error::Evaluation(e.to_string()))?
                .area_under_curve() as f64
        };

        Ok(BinaryClassificationMetrics {
            accuracy: cm.accuracy() as f64,
            auc,
            f1_score: cm.f1_score() as f64,
            precision: cm.precision() as f64,
            recall: cm.recall() as f64,
            log_loss: log_loss(outcomes),
            positive_count,
            negative_count: outcomes.len() - positive_count,
        })
    }
}

fn log_loss(outcomes: &[(bool, f64)]) -> f64 {
    let total: f64 = outcomes
        .iter()
        .map(|&(label, probability)| {
            let p = probability.clamp(LOG_LOSS_EPSILON, 1.0 - LOG_LOSS_EPSILON);
            if label {
                -p.ln()
            } else {
                -(1.0 - p).ln()
            }
        })
        .sum();
    total / outcomes.len() as f64
}

impl fmt::Display for BinaryClassificationMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "*************************************************************")?;
        writeln!(f, "*       Metrics for binary classification model")?;
        writeln!(f, "*------------------------------------------------------------")?;
        writeln!(f, "*       Accuracy: {:.2}%", self.accuracy * 100.0)?;
        writeln!(f, "*       Area Under Curve:      {:.2}%", self.auc * 100.0)?;
        writeln!(f, "*       F1Score:  {:.2}%", self.f1_score * 100.0)?;
        writeln!(f, "*       Log loss:  {:.4}", self.log_loss)?;
        writeln!(f, "*       Precision:  {:.2}%", self.precision * 100.0)?;
        writeln!(f, "*       Recall:  {:.2}%", self.recall * 100.0)?;
        writeln!(
            f,
            "*       Test rows: {} toxic / {} non toxic",
            self.positive_count, self.negative_count
        )?;
        write!(f, "*************************************************************")
    }
}
