//! Task categories derived from titles.
//!
//! The category of a task is the lowercased first word of its title. Short
//! words ("a", "to", ...) are ignored. Counts keep first-seen order so that
//! ties in the ranking resolve to the category encountered first.

use crate::libs::task::Task;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

pub fn category_of(title: &str, min_length: usize) -> Option<String> {
    let token = title.split_whitespace().next()?.to_lowercase();
    (token.chars().count() >= min_length).then_some(token)
}

/// Insertion-ordered frequency table.
#[derive(Debug, Default)]
struct CategoryTally {
    entries: Vec<CategoryCount>,
    index: HashMap<String, usize>,
}

impl CategoryTally {
    fn add(&mut self, category: String) {
        match self.index.get(&category) {
            Some(&position) => self.entries[position].count += 1,
            None => {
                self.index.insert(category.clone(), self.entries.len());
                self.entries.push(CategoryCount { category, count: 1 });
            }
        }
    }

    /// Entries by descending count; the sort is stable, so ties keep first-seen order.
    fn ranked(mut self, limit: usize) -> Vec<CategoryCount> {
        self.entries.sort_by(|a, b| b.count.cmp(&a.count));
        self.entries.truncate(limit);
        self.entries
    }
}

pub fn top_categories(tasks: &[Task], limit: usize, min_length: usize) -> Vec<CategoryCount> {
    let mut tally = CategoryTally::default();
    for category in tasks.iter().filter_map(|task| category_of(&task.title, min_length)) {
        tally.add(category);
    }
    tally.ranked(limit)
}
