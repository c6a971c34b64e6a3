/// Skill vocabulary offered by the autocomplete, from the source dataset.
pub const SKILL_VOCABULARY: &[&str] = &[
    "Python",
    "Advanced computing",
    "Programming",
    "Computational systems",
    "Coding",
    "Cloud computing",
    "Databases",
    "Data management",
    "Data engineering",
    "Data mining",
    "Data formats",
    "Linked data",
    "Information extraction",
    "Stream processing",
    "Enterprise process",
    "Business intelligence",
    "Data anonymisation",
    "Semantics",
    "Schema",
    "Data licensing",
    "Data quality",
    "Data governance",
    "Data science",
    "Big data",
    "Open data",
    "Machine learning",
    "Social network analysis",
    "Inference",
    "Reasoning",
    "Process mining",
    "Linear algebra",
    "Calculus",
    "Mathematics",
    "Statistics",
    "Probability",
    "RStudio",
    "Data analytics",
    "Data analysis",
    "Data visualisation",
    "Infographics",
    "Interaction",
    "Data mapping",
    "Data stories",
    "Data journalism",
    "D3js",
    "Tableau",
];

/// Multi-select tag input over a fixed vocabulary with token-prefix
/// autocompletion: an entry matches when any of its whitespace-separated
/// tokens starts with the query, case-insensitive.
pub struct TagSearch {
    vocabulary: Vec<String>,
    query: String,
    /// Index into the current suggestion list
    cursor: usize,
    tags: Vec<String>,
}

impl TagSearch {
    pub fn new(vocabulary: &[&str]) -> Self {
        Self {
            vocabulary: vocabulary.iter().map(|s| s.to_string()).collect(),
            query: String::new(),
            cursor: 0,
            tags: Vec::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Entries matching the current query, minus already selected tags.
    /// An empty query matches nothing (the input is passive until typed in).
    pub fn suggestions(&self) -> Vec<&str> {
        if self.query.is_empty() {
            return Vec::new();
        }
        let query = self.query.to_ascii_lowercase();
        self.vocabulary
            .iter()
            .filter(|entry| !self.tags.iter().any(|t| t == *entry))
            .filter(|entry| {
                entry
                    .split_whitespace()
                    .any(|token| token.to_ascii_lowercase().starts_with(&query))
            })
            .map(String::as_str)
            .collect()
    }

    /// Suggestion under the cursor, if any.
    pub fn highlighted(&self) -> Option<String> {
        let suggestions = self.suggestions();
        if suggestions.is_empty() {
            return None;
        }
        Some(suggestions[self.cursor % suggestions.len()].to_string())
    }

    pub fn cursor(&self) -> usize {
        let len = self.suggestions().len();
        if len == 0 {
            0
        } else {
            self.cursor % len
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.cursor = 0;
    }

    /// Backspace: trims the query, or pops the newest tag when the query is
    /// already empty. Returns true if the tag set changed.
    pub fn backspace(&mut self) -> bool {
        if self.query.pop().is_some() {
            self.cursor = 0;
            return false;
        }
        self.tags.pop().is_some()
    }

    /// Cycle the suggestion cursor.
    pub fn next_suggestion(&mut self) {
        let len = self.suggestions().len();
        if len > 0 {
            self.cursor = (self.cursor + 1) % len;
        }
    }

    /// Accept the highlighted suggestion as a tag. Duplicates cannot occur
    /// since selected tags are excluded from the suggestions. Returns true
    /// if a tag was added.
    pub fn accept(&mut self) -> bool {
        let Some(tag) = self.highlighted() else {
            return false;
        };
        self.tags.push(tag);
        self.query.clear();
        self.cursor = 0;
        true
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_prefix_matching() {
        let mut search = TagSearch::new(SKILL_VOCABULARY);
        for c in "min".chars() {
            search.push_char(c);
        }
        let suggestions = search.suggestions();
        // "Data mining" and "Process mining" match on their second token
        assert!(suggestions.contains(&"Data mining"));
        assert!(suggestions.contains(&"Process mining"));
        assert!(!suggestions.contains(&"Python"));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let mut search = TagSearch::new(SKILL_VOCABULARY);
        for c in "PYTH".chars() {
            search.push_char(c);
        }
        assert_eq!(search.suggestions(), vec!["Python"]);
    }

    #[test]
    fn test_empty_query_suggests_nothing() {
        let search = TagSearch::new(SKILL_VOCABULARY);
        assert!(search.suggestions().is_empty());
        assert!(search.highlighted().is_none());
    }

    #[test]
    fn test_accept_adds_tag_and_clears_query() {
        let mut search = TagSearch::new(SKILL_VOCABULARY);
        for c in "stat".chars() {
            search.push_char(c);
        }
        assert!(search.accept());
        assert_eq!(search.tags(), &["Statistics".to_string()]);
        assert_eq!(search.query(), "");
    }

    #[test]
    fn test_selected_tags_are_not_suggested_again() {
        let mut search = TagSearch::new(SKILL_VOCABULARY);
        for c in "python".chars() {
            search.push_char(c);
        }
        search.accept();
        for c in "python".chars() {
            search.push_char(c);
        }
        assert!(search.suggestions().is_empty());
        assert!(!search.accept());
        assert_eq!(search.tags().len(), 1);
    }

    #[test]
    fn test_cursor_cycles_suggestions() {
        let mut search = TagSearch::new(&["Data mining", "Data science", "Databases"]);
        for c in "data".chars() {
            search.push_char(c);
        }
        assert_eq!(search.suggestions().len(), 3);
        assert_eq!(search.highlighted().as_deref(), Some("Data mining"));
        search.next_suggestion();
        assert_eq!(search.highlighted().as_deref(), Some("Data science"));
        search.next_suggestion();
        search.next_suggestion();
        assert_eq!(search.highlighted().as_deref(), Some("Data mining"));
    }

    #[test]
    fn test_backspace_pops_tag_when_query_empty() {
        let mut search = TagSearch::new(SKILL_VOCABULARY);
        for c in "tableau".chars() {
            search.push_char(c);
        }
        search.accept();
        assert_eq!(search.tags().len(), 1);
        assert!(search.backspace());
        assert!(search.tags().is_empty());
        assert!(!search.backspace());
    }
}
