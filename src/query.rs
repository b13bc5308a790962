use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// What the user is looking for: a make plus an optional model or year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    make: String,
    model_or_year: String,
}

impl SearchQuery {
    /// Create a query, rejecting an empty make
    ///
    /// Surrounding whitespace is trimmed from both parts. An empty
    /// `model_or_year` means the search covers every model of the make.
    pub fn new(make: &str, model_or_year: &str) -> Result<Self, ConfigError> {
        let make = make.trim();
        if make.is_empty() {
            return Err(ConfigError::EmptyMake);
        }

        Ok(Self {
            make: make.to_string(),
            model_or_year: model_or_year.trim().to_string(),
        })
    }

    pub fn make(&self) -> &str {
        &self.make
    }

    /// Model or year, `None` when unset
    pub fn model_or_year(&self) -> Option<&str> {
        if self.model_or_year.is_empty() {
            None
        } else {
            Some(&self.model_or_year)
        }
    }

    /// Path segment naming the search, `make` or `make-model`
    pub fn slug(&self) -> String {
        match self.model_or_year() {
            Some(model) => format!("{}-{}", self.make, model),
            None => self.make.clone(),
        }
    }
}
