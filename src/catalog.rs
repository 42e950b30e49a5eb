//! Word list and celebration phrases
//!
//! Both lists are loaded once at startup and never change afterwards.
//! Sessions only see the catalog through [`WordSource`], so tests can pin
//! the word that gets picked.

use rand::Rng;
use std::path::{Path, PathBuf};

/// Used when the phrase file is missing or empty
pub const DEFAULT_CELEBRATION_PHRASES: &[&str] = &[
    "Вау, это было потрясающе!",
    "Невероятно!",
    "Отличная работа!",
    "Браво!",
    "Ты просто гений!",
    "Как тебе это удалось?",
    "Фантастически!",
    "Потрясающее угадывание!",
];

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Word catalog is empty")]
    EmptyCatalog,

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A word together with its position in the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    pub index: usize,
}

/// Anything that can hand out secret words and celebration phrases
pub trait WordSource: Send + Sync {
    /// Uniform pick over all words
    fn select_random(&self) -> Result<Word, CatalogError>;

    /// Uniform pick over all words except `exclude_index`.
    /// With a single word the exclusion cannot hold and that word is returned.
    fn select_random_excluding(&self, exclude_index: usize) -> Result<Word, CatalogError>;

    fn pick_celebration_phrase(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct WordCatalog {
    words: Vec<String>,
    celebration_phrases: Vec<String>,
}

impl WordCatalog {
    /// Build a catalog from in-memory lists. Blank entries are dropped and the
    /// rest trimmed. An empty phrase list falls back to the defaults.
    pub fn new(words: Vec<String>, celebration_phrases: Vec<String>) -> Result<Self, CatalogError> {
        let words = clean(words);
        if words.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }

        let mut celebration_phrases = clean(celebration_phrases);
        if celebration_phrases.is_empty() {
            tracing::warn!("No celebration phrases given, using built-in set");
            celebration_phrases = DEFAULT_CELEBRATION_PHRASES
                .iter()
                .map(|p| p.to_string())
                .collect();
        }

        Ok(Self {
            words,
            celebration_phrases,
        })
    }

    /// Load newline-delimited lists from disk. The phrase file is optional.
    pub fn load(words_path: &Path, phrases_path: &Path) -> Result<Self, CatalogError> {
        let words = std::fs::read_to_string(words_path).map_err(|source| CatalogError::Io {
            path: words_path.to_path_buf(),
            source,
        })?;

        let phrases = match std::fs::read_to_string(phrases_path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    "Phrase file {} not readable ({}), using built-in phrases",
                    phrases_path.display(),
                    e
                );
                String::new()
            }
        };

        let catalog = Self::new(split_lines(&words), split_lines(&phrases))?;
        tracing::info!(
            words = catalog.words.len(),
            phrases = catalog.celebration_phrases.len(),
            "Word catalog loaded"
        );
        Ok(catalog)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn celebration_phrases(&self) -> &[String] {
        &self.celebration_phrases
    }

    fn word_at(&self, index: usize) -> Word {
        Word {
            text: self.words[index].clone(),
            index,
        }
    }
}

impl WordSource for WordCatalog {
    fn select_random(&self) -> Result<Word, CatalogError> {
        if self.words.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }
        let index = rand::rng().random_range(0..self.words.len());
        Ok(self.word_at(index))
    }

    fn select_random_excluding(&self, exclude_index: usize) -> Result<Word, CatalogError> {
        let len = self.words.len();
        match len {
            0 => Err(CatalogError::EmptyCatalog),
            1 => Ok(self.word_at(0)),
            _ if exclude_index >= len => self.select_random(),
            _ => {
                // Draw among the other len - 1 slots, then skip over the excluded one
                let drawn = rand::rng().random_range(0..len - 1);
                let index = if drawn >= exclude_index {
                    drawn + 1
                } else {
                    drawn
                };
                Ok(self.word_at(index))
            }
        }
    }

    fn pick_celebration_phrase(&self) -> String {
        let index = rand::rng().random_range(0..self.celebration_phrases.len());
        self.celebration_phrases[index].clone()
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

fn clean(entries: Vec<String>) -> Vec<String> {
    entries
        .into_iter()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect()
}
