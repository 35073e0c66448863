//! Result-count display strings.

use serde::{Deserialize, Serialize};

/// Token in the `other` message replaced by the result count.
pub const COUNT_TOKEN: &str = "#";

/// The four fixed display strings shown in the search metadata line.
///
/// Loaded once with the settings and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Messages {
    /// Shown before any search and after clearing the input
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Zero results
    #[serde(default = "default_none")]
    pub none: String,

    /// Exactly one result
    #[serde(default = "default_one")]
    pub one: String,

    /// Two or more results; contains [`COUNT_TOKEN`]
    #[serde(default = "default_other")]
    pub other: String,
}

fn default_placeholder() -> String {
    "Type to start searching".to_string()
}

fn default_none() -> String {
    "No results found".to_string()
}

fn default_one() -> String {
    "1 result found".to_string()
}

fn default_other() -> String {
    "# results found".to_string()
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            placeholder: default_placeholder(),
            none: default_none(),
            one: default_one(),
            other: default_other(),
        }
    }
}

impl Messages {
    /// Summary line for a result count.
    ///
    /// 0 selects `none`, 1 selects `one`, anything larger selects `other`
    /// with every count token replaced.
    pub fn summary(&self, count: u64) -> String {
        match count {
            0 => self.none.clone(),
            1 => self.one.clone(),
            n => self.other.replace(COUNT_TOKEN, &n.to_string()),
        }
    }

    /// Validate message templates.
    pub fn validate(&self) -> Result<(), String> {
        if !self.other.contains(COUNT_TOKEN) {
            return Err(format!(
                "messages.other must contain the count token '{}'",
                COUNT_TOKEN
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_cardinality() {
        let messages = Messages::default();
        assert_eq!(messages.summary(0), "No results found");
        assert_eq!(messages.summary(1), "1 result found");
        assert_eq!(messages.summary(5), "5 results found");
    }

    #[test]
    fn test_summary_replaces_custom_token_position() {
        let messages = Messages {
            other: "Treffer: #".to_string(),
            ..Messages::default()
        };
        assert_eq!(messages.summary(42), "Treffer: 42");
    }

    #[test]
    fn test_validate_requires_token() {
        let mut messages = Messages::default();
        assert!(messages.validate().is_ok());

        messages.other = "many results".to_string();
        assert!(messages.validate().is_err());
    }
}
