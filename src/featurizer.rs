//! TF-IDF text featurization backed by `linfa-preprocessing`.

use crate::config::FeaturesConfig;
use crate::error::{Error, Result};
use linfa_preprocessing::tf_idf_vectorization::{FittedTfIdfVectorizer, TfIdfVectorizer};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fitted word n-gram TF-IDF vectorizer producing dense rows.
///
/// Text is lowercased and split into words of two or more characters before
/// n-grams are built.
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextFeaturizer {
    vectorizer: FittedTfIdfVectorizer,
}

impl TextFeaturizer {
    /// Fits vocabulary and IDF weights on `documents`.
    pub fn fit<S: AsRef<str>>(documents: &[S], config: &FeaturesConfig) -> Result<Self> {
        let vectorizer = TfIdfVectorizer::default()
            .convert_to_lowercase(true)
            .n_gram_range(1, config.ngram_max.max(1))
            .max_features(Some(config.max_features))
            .fit(&to_array(documents))
            .map_err(|e| Error::Featurization(e.to_string()))?;

        debug!(
            "Fitted featurizer on {} documents, {} terms",
            documents.len(),
            vectorizer.nentries()
        );
        Ok(TextFeaturizer { vectorizer })
    }

    pub fn dimension(&self) -> usize {
        self.vectorizer.nentries()
    }

    pub fn vocabulary(&self) -> &[String] {
        self.vectorizer.vocabulary()
    }

    /// One dense row per document, in input order.
    pub fn transform_batch<S: AsRef<str>>(&self, documents: &[S]) -> Result<Array2<f64>> {
        let sparse = self.vectorizer.transform(&to_array(documents));
        Ok(sparse.to_dense())
    }
}

fn to_array<S: AsRef<str>>(documents: &[S]) -> Array1<String> {
    documents.iter().map(|d| d.as_ref().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max_features: usize, ngram_max: usize) -> FeaturesConfig {
        FeaturesConfig {
            max_features,
            ngram_max,
        }
    }

    #[test]
    fn lowercases_vocabulary() {
        let featurizer =
            TextFeaturizer::fit(&["You STUPID troll", "nice edit"], &config(100, 1)).unwrap();
        let vocabulary = featurizer.vocabulary();
        assert!(vocabulary.iter().any(|t| t == "stupid"));
        assert!(!vocabulary.iter().any(|t| t == "STUPID"));
    }

    #[test]
    fn bigrams_extend_the_vocabulary() {
        let docs = ["you stupid troll", "thanks for the edit", "stupid edit"];
        let unigrams = TextFeaturizer::fit(&docs, &config(100, 1)).unwrap();
        let bigrams = TextFeaturizer::fit(&docs, &config(100, 2)).unwrap();
        assert!(bigrams.dimension() > unigrams.dimension());
    }

    #[test]
    fn vocabulary_is_capped() {
        let docs = ["aa bb cc dd", "ee ff gg", "aa ee hh"];
        let featurizer = TextFeaturizer::fit(&docs, &config(3, 1)).unwrap();
        assert!(featurizer.dimension() <= 3);
    }

    #[test]
    fn weights_only_terms_present_in_the_text() {
        let featurizer = TextFeaturizer::fit(
            &["hello there friend", "go away troll", "hello troll"],
            &config(100, 1),
        )
        .unwrap();

        let matrix = featurizer.transform_batch(&["hello troll", "go away"]).unwrap();
        assert_eq!(matrix.shape(), &[2, featurizer.dimension()]);
        for (idx, term) in featurizer.vocabulary().iter().enumerate() {
            let expected = term == "hello" || term == "troll";
            assert_eq!(matrix[[0, idx]] > 0.0, expected, "term {}", term);
        }
        assert!(matrix.iter().all(|&x| x >= 0.0));
    }

    #[test]
    fn unknown_or_empty_text_is_zero_row() {
        let featurizer =
            TextFeaturizer::fit(&["hello there", "goodbye now"], &config(100, 1)).unwrap();

        let matrix = featurizer.transform_batch(&["", "zzz qqq"]).unwrap();
        assert!(matrix.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn survives_a_serde_round_trip() {
        let featurizer =
            TextFeaturizer::fit(&["nice work", "bad troll", "nice troll"], &config(100, 2)).unwrap();
        let json = serde_json::to_string(&featurizer).unwrap();
        let restored: TextFeaturizer = serde_json::from_str(&json).unwrap();

        let before = featurizer.transform_batch(&["nice troll"]).unwrap();
        let after = restored.transform_batch(&["nice troll"]).unwrap();
        assert_eq!(before, after);
    }
}
