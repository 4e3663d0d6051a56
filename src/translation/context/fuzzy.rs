/*!
 * Fuzzy matching for glossary terms.
 *
 * Provides Levenshtein distance-based fuzzy matching to find glossary terms
 * even when there are minor typos or variations in the source text.
 */

/// Fuzzy matcher using Levenshtein distance
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    /// Default threshold for fuzzy matching (0.0-1.0, higher = stricter)
    default_threshold: f32,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self {
            default_threshold: 0.8,
        }
    }
}

impl FuzzyMatcher {
    /// Create a new fuzzy matcher with custom threshold
    pub fn new(threshold: f32) -> Self {
        Self {
            default_threshold: threshold.clamp(0.0, 1.0),
        }
    }

    /// Check if text fuzzy-matches a term within the threshold
    ///
    /// Returns true if the similarity is at or above the threshold.
    pub fn matches(&self, text: &str, term: &str, threshold: Option<f32>) -> bool {
        let thresh = threshold.unwrap_or(self.default_threshold);
        self.similarity(text, term) >= thresh
    }

    /// Calculate similarity between two strings (0.0-1.0)
    ///
    /// Uses normalized Levenshtein distance.
    pub fn similarity(&self, a: &str, b: &str) -> f32 {
        if a.is_empty() && b.is_empty() {
            return 1.0;
        }
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }

        let a_lower = a.to_lowercase();
        let b_lower = b.to_lowercase();

        let distance = levenshtein_distance(&a_lower, &b_lower);
        let max_len = a_lower.len().max(b_lower.len());

        1.0 - (distance as f32 / max_len as f32)
    }

    /// Find the best matching term from a list
    ///
    /// Returns the term with highest similarity above threshold, if any.
    pub fn find_best_match<'a>(&self, text: &str, terms: &[&'a str], threshold: Option<f32>) -> Option<&'a str> {
        let thresh = threshold.unwrap_or(self.default_threshold);
        let mut best_match: Option<(&str, f32)> = None;

        for term in terms {
            let sim = self.similarity(text, term);
            if sim >= thresh {
                if let Some((_, best_sim)) = best_match {
                    if sim > best_sim {
                        best_match = Some((term, sim));
                    }
                } else {
                    best_match = Some((term, sim));
                }
            }
        }

        best_match.map(|(term, _)| term)
    }

    /// Find all terms that match within threshold
    pub fn find_all_matches<'a>(&self, text: &str, terms: &[&'a str], threshold: Option<f32>) -> Vec<(&'a str, f32)> {
        let thresh = threshold.unwrap_or(self.default_threshold);

        terms
            .iter()
            .filter_map(|term| {
                let sim = self.similarity(text, term);
                if sim >= thresh {
                    Some((*term, sim))
                } else {
                    None
                }
            })
            .collect()
    }
}

/// Calculate Levenshtein distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    // Use two-row optimization for space efficiency
    let mut prev_row: Vec<usize> = (0..=b_len).collect();
    let mut curr_row: Vec<usize> = vec![0; b_len + 1];

    for i in 1..=a_len {
        curr_row[0] = i;

        for j in 1..=b_len {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };

            curr_row[j] = (prev_row[j] + 1)                  // deletion
                .min(curr_row[j - 1] + 1)                    // insertion
                .min(prev_row[j - 1] + cost);                // substitution
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_len]
}


