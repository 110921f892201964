//! Cloze word bank and blank placements.
//!
//! Each canonical answer becomes one token, so a passage whose blanks share
//! an answer has several interchangeable tokens with the same word. A token
//! sits in at most one blank; the bank shows the tokens that sit in none.

use crate::cloze;
use crate::error::PlacementError;

/// Placement state for one cloze question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordBank {
    /// Token id is the index into this list.
    words: Vec<String>,
    /// One slot per blank, holding a token id.
    slots: Vec<Option<usize>>,
}

impl WordBank {
    /// A bank with one token per canonical word and one empty slot per blank.
    pub fn new(words: Vec<String>) -> Self {
        let slots = vec![None; words.len()];
        Self { words, slots }
    }

    /// A bank for a cloze passage.
    pub fn from_text(text: &str) -> Self {
        Self::new(cloze::extract_answers(text))
    }

    /// Number of blanks.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Canonical words, one per token.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// The word currently in `blank`, if any.
    pub fn slot(&self, blank: usize) -> Option<&str> {
        self.slots
            .get(blank)
            .copied()
            .flatten()
            .map(|token| self.words[token].as_str())
    }

    /// Put `word` into `blank`.
    ///
    /// A token of `word` still in the bank is used first. If every token of
    /// `word` is already placed, the one in another blank moves, leaving that
    /// blank empty. Whatever sat in `blank` goes back to the bank.
    pub fn place(&mut self, word: &str, blank: usize) -> Result<(), PlacementError> {
        self.check_blank(blank)?;
        if self.slot(blank) == Some(word) {
            return Ok(());
        }
        let token = self
            .unplaced_token(word)
            .or_else(|| self.placed_token(word, blank))
            .ok_or_else(|| PlacementError::UnknownWord(word.to_string()))?;
        self.move_token(token, blank);
        Ok(())
    }

    /// Put a specific token into `blank`, vacating its previous blank.
    pub fn place_token(&mut self, token: usize, blank: usize) -> Result<(), PlacementError> {
        self.check_blank(blank)?;
        if token >= self.words.len() {
            return Err(PlacementError::TokenOutOfRange {
                index: token,
                len: self.words.len(),
            });
        }
        self.move_token(token, blank);
        Ok(())
    }

    /// Put `word` into the first empty blank. Returns the blank used, or
    /// `None` when every blank is filled.
    pub fn fill_next(&mut self, word: &str) -> Result<Option<usize>, PlacementError> {
        let Some(blank) = self.slots.iter().position(Option::is_none) else {
            return Ok(None);
        };
        self.place(word, blank)?;
        Ok(Some(blank))
    }

    /// Empty `blank`, returning its word to the bank.
    pub fn clear(&mut self, blank: usize) -> Option<String> {
        let token = self.slots.get_mut(blank)?.take()?;
        Some(self.words[token].clone())
    }

    /// Words not in any blank, in token order.
    pub fn available(&self) -> Vec<&str> {
        self.available_tokens()
            .into_iter()
            .map(|token| self.words[token].as_str())
            .collect()
    }

    /// Ids of the tokens not in any blank.
    pub fn available_tokens(&self) -> Vec<usize> {
        (0..self.words.len())
            .filter(|&token| !self.is_placed(token))
            .collect()
    }

    /// The cloze answer to submit: one entry per blank, `""` when empty.
    pub fn answers(&self) -> Vec<String> {
        (0..self.slots.len())
            .map(|blank| self.slot(blank).unwrap_or_default().to_string())
            .collect()
    }

    /// Number of filled blanks.
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    fn check_blank(&self, blank: usize) -> Result<(), PlacementError> {
        if blank < self.slots.len() {
            Ok(())
        } else {
            Err(PlacementError::BlankOutOfRange {
                index: blank,
                len: self.slots.len(),
            })
        }
    }

    fn is_placed(&self, token: usize) -> bool {
        self.slots.contains(&Some(token))
    }

    fn unplaced_token(&self, word: &str) -> Option<usize> {
        (0..self.words.len()).find(|&token| self.words[token] == word && !self.is_placed(token))
    }

    fn placed_token(&self, word: &str, except_blank: usize) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|&(blank, _)| blank != except_blank)
            .find_map(|(_, slot)| slot.filter(|&token| self.words[token] == word))
    }

    fn move_token(&mut self, token: usize, blank: usize) {
        for slot in self.slots.iter_mut() {
            if *slot == Some(token) {
                *slot = None;
            }
        }
        self.slots[blank] = Some(token);
    }
}
