use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const VOCABULARY: &str = include_str!("english.txt");

// Configuration for word generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordGenOptions {
    pub count: usize,
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for WordGenOptions {
    fn default() -> Self {
        Self { count: 250, min_length: 3, max_length: 8 }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WordGenError {
    #[error("word count must be at least 1")]
    EmptyCount,
    #[error("no practice words between {min} and {max} characters")]
    NoWordsInRange { min: usize, max: usize },
}

// A word set rendered for the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Words {
    Joined(String),
    List(Vec<String>),
}

async_graphql::scalar!(
    Words,
    "WordList",
    "Practice words, either joined into a single string or as an ordered list"
);

// An ordered list of generated practice words
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSet {
    words: Vec<String>,
}

impl WordSet {
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn joined(&self, separator: &str) -> String {
        self.words.join(separator)
    }

    // Joined string when a separator is given, otherwise the plain sequence
    pub fn render(&self, join: Option<&str>) -> Words {
        match join {
            Some(separator) => Words::Joined(self.joined(separator)),
            None => Words::List(self.words.clone()),
        }
    }
}

// Draws random practice words from the embedded vocabulary
#[derive(Debug, Clone)]
pub struct WordGenerator {
    options: WordGenOptions,
    pool: Vec<&'static str>,
}

impl WordGenerator {
    pub fn new(options: WordGenOptions) -> Result<Self, WordGenError> {
        if options.count == 0 {
            return Err(WordGenError::EmptyCount);
        }

        let mut pool: Vec<&'static str> = VOCABULARY
            .split_whitespace()
            .filter(|word| {
                let length = word.chars().count();
                length >= options.min_length && length <= options.max_length
            })
            .collect();
        pool.sort_unstable();
        pool.dedup();

        if pool.is_empty() {
            return Err(WordGenError::NoWordsInRange { min: options.min_length, max: options.max_length });
        }

        Ok(Self { options, pool })
    }

    // Generate `count` words, drawn uniformly with replacement
    pub fn generate(&self) -> WordSet {
        let mut rng = rand::thread_rng();
        let words = (0..self.options.count)
            .filter_map(|_| self.pool.choose(&mut rng))
            .map(|word| word.to_string())
            .collect();
        WordSet::new(words)
    }
}
