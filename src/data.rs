use crate::error::{Error, Result};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

pub const LABEL_COLUMN: &str = "Label";
pub const TEXT_COLUMN: &str = "Text";

/// One labeled row of the dataset, or an unlabeled input when scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentIssue {
    pub label: bool,
    pub text: String,
}

impl SentimentIssue {
    pub fn unlabeled<S: Into<String>>(text: S) -> Self {
        SentimentIssue {
            label: false,
            text: text.into(),
        }
    }
}

/// Reads a tab-separated dataset with a header row containing `Label` and `Text`.
///
/// Other columns are ignored. Fields are taken verbatim, quotes included.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Vec<SentimentIssue>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let label_idx = column_index(&headers, LABEL_COLUMN)?;
    let text_idx = column_index(&headers, TEXT_COLUMN)?;

    let mut issues = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let label = record
            .get(label_idx)
            .ok_or_else(|| Error::Dataset(format!("line {}: missing {} column", line, LABEL_COLUMN)))?;
        let label = parse_label(label)
            .ok_or_else(|| Error::Dataset(format!("line {}: invalid label {:?}", line, label)))?;
        let text = record
            .get(text_idx)
            .ok_or_else(|| Error::Dataset(format!("line {}: missing {} column", line, TEXT_COLUMN)))?;

        issues.push(SentimentIssue {
            label,
            text: text.to_string(),
        });
    }

    if issues.is_empty() {
        return Err(Error::Dataset(format!("{} contains no rows", path.display())));
    }

    info!("Loaded {} rows from {}", issues.len(), path.display());
    Ok(issues)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| Error::Dataset(format!("header has no {} column", name)))
}

fn parse_label(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

/// Shuffles with a seeded RNG and holds out `round(n * test_fraction)` rows.
///
/// Returns `(train, test)`. With two or more rows both halves are non-empty.
pub fn train_test_split(
    mut issues: Vec<SentimentIssue>,
    test_fraction: f64,
    seed: u64,
) -> (Vec<SentimentIssue>, Vec<SentimentIssue>) {
    let mut rng = StdRng::seed_from_u64(seed);
    issues.shuffle(&mut rng);

    let n = issues.len();
    let mut n_test = (n as f64 * test_fraction).round() as usize;
    if n >= 2 {
        n_test = n_test.clamp(1, n - 1);
    } else {
        n_test = n_test.min(n);
    }

    let train = issues.split_off(n_test);
    debug!("Split {} rows into {} train / {} test", n, train.len(), issues.len());
    (train, issues)
}

/// Lines of a plain text file in order, with any trailing `\r` removed.
pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect())
}
