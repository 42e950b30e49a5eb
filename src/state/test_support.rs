use crate::catalog::{CatalogError, Word, WordSource};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Word source with a scripted sequence of picks
pub struct FixedWords {
    words: Vec<String>,
    picks: Mutex<VecDeque<usize>>,
    /// Draws left before every pick fails; None means unlimited
    budget: Mutex<Option<usize>>,
}

impl FixedWords {
    pub const PHRASE: &'static str = "Браво!";

    /// `picks` are served in order by `select_random`, then index 0 forever
    pub fn new(words: &[&str], picks: &[usize]) -> Self {
        Self {
            words: words.iter().map(|w| w.to_string()).collect(),
            picks: Mutex::new(picks.iter().copied().collect()),
            budget: Mutex::new(None),
        }
    }

    /// Like `new`, but every pick after the first `draws` fails
    pub fn failing_after(words: &[&str], picks: &[usize], draws: usize) -> Self {
        let source = Self::new(words, picks);
        *source.budget.lock().unwrap() = Some(draws);
        source
    }

    /// A source whose every pick fails
    pub fn exhausted() -> Self {
        Self::new(&[], &[])
    }

    fn draw(&self) -> Result<(), CatalogError> {
        if self.words.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }
        let mut budget = self.budget.lock().unwrap();
        match budget.as_mut() {
            Some(0) => Err(CatalogError::EmptyCatalog),
            Some(left) => {
                *left -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn word_at(&self, index: usize) -> Word {
        Word {
            text: self.words[index].clone(),
            index,
        }
    }
}

impl WordSource for FixedWords {
    fn select_random(&self) -> Result<Word, CatalogError> {
        self.draw()?;
        let index = self.picks.lock().unwrap().pop_front().unwrap_or(0);
        Ok(self.word_at(index))
    }

    fn select_random_excluding(&self, exclude_index: usize) -> Result<Word, CatalogError> {
        self.draw()?;
        let index = (0..self.words.len())
            .find(|i| *i != exclude_index)
            .unwrap_or(0);
        Ok(self.word_at(index))
    }

    fn pick_celebration_phrase(&self) -> String {
        Self::PHRASE.to_string()
    }
}
