//! Item-to-category placements for categorize questions.
//!
//! Works like the cloze word bank: every item label is a token, duplicate
//! labels are separate tokens, and a token sits in at most one category.

use serde_json::{Map, Value};

use crate::error::PlacementError;
use crate::model::CategorizeContent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBoard {
    items: Vec<String>,
    categories: Vec<String>,
    /// Item tokens per category, in the order they were dropped.
    assigned: Vec<Vec<usize>>,
}

impl CategoryBoard {
    pub fn new(items: Vec<String>, categories: Vec<String>) -> Self {
        let assigned = vec![Vec::new(); categories.len()];
        Self {
            items,
            categories,
            assigned,
        }
    }

    pub fn from_content(content: &CategorizeContent) -> Self {
        Self::new(content.items.clone(), content.categories.clone())
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Drop `item` into `category`, taking it out of any other category.
    ///
    /// An uncategorized token with that label is used first. Categories are
    /// matched by label; with repeated labels the first one wins.
    pub fn assign(&mut self, item: &str, category: &str) -> Result<(), PlacementError> {
        let target = self
            .categories
            .iter()
            .position(|c| c == category)
            .ok_or_else(|| PlacementError::UnknownCategory(category.to_string()))?;
        if !self.items.iter().any(|i| i == item) {
            return Err(PlacementError::UnknownWord(item.to_string()));
        }

        let token = self
            .unassigned_tokens()
            .into_iter()
            .find(|&t| self.items[t] == item)
            .or_else(|| {
                self.assigned
                    .iter()
                    .enumerate()
                    .filter(|&(c, _)| c != target)
                    .flat_map(|(_, tokens)| tokens.iter().copied())
                    .find(|&t| self.items[t] == item)
            });

        // every token with this label is already in the target category
        let Some(token) = token else {
            return Ok(());
        };
        self.remove_token(token);
        self.assigned[target].push(token);
        Ok(())
    }

    /// Move one token of `item` back to the uncategorized pool. Returns the
    /// category it left.
    pub fn unassign(&mut self, item: &str) -> Option<String> {
        let (category, position) = self.assigned.iter().enumerate().find_map(|(c, tokens)| {
            tokens
                .iter()
                .position(|&t| self.items[t] == item)
                .map(|p| (c, p))
        })?;
        self.assigned[category].remove(position);
        Some(self.categories[category].clone())
    }

    /// Items not yet in any category, in item order.
    pub fn uncategorized(&self) -> Vec<&str> {
        self.unassigned_tokens()
            .into_iter()
            .map(|t| self.items[t].as_str())
            .collect()
    }

    /// Items currently in `category`.
    pub fn in_category(&self, category: &str) -> Vec<&str> {
        self.categories
            .iter()
            .position(|c| c == category)
            .map(|c| {
                self.assigned[c]
                    .iter()
                    .map(|&t| self.items[t].as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_complete(&self) -> bool {
        self.unassigned_tokens().is_empty()
    }

    /// The categorize answer to submit: category label to item labels.
    /// Empty categories are left out.
    pub fn answer(&self) -> Map<String, Value> {
        let mut answer = Map::new();
        for (c, tokens) in self.assigned.iter().enumerate() {
            if tokens.is_empty() {
                continue;
            }
            let labels = tokens.iter().map(|&t| Value::from(self.items[t].as_str()));
            match answer.get_mut(&self.categories[c]) {
                Some(Value::Array(existing)) => existing.extend(labels),
                _ => {
                    answer.insert(self.categories[c].clone(), Value::Array(labels.collect()));
                }
            }
        }
        answer
    }

    fn unassigned_tokens(&self) -> Vec<usize> {
        (0..self.items.len())
            .filter(|t| !self.assigned.iter().any(|tokens| tokens.contains(t)))
            .collect()
    }

    fn remove_token(&mut self, token: usize) {
        for tokens in self.assigned.iter_mut() {
            tokens.retain(|&t| t != token);
        }
    }
}
