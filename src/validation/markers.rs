/*!
 * Marker validation for batch translation responses.
 *
 * This module validates that the <<ENTRY_X>> markers used in batch
 * translations are correctly preserved in the AI response, enabling
 * proper splitting of translated text back into individual entries.
 */

use anyhow::{Result, anyhow};
use log::debug;
use regex::Regex;
use once_cell::sync::Lazy;

/// Regex for matching entry markers
static ENTRY_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<<ENTRY_(\d+)>>").expect("Invalid entry marker regex")
});

/// End marker constant
const END_MARKER: &str = "<<END>>";

/// Marker validation result
#[derive(Debug, Clone)]
pub struct MarkerValidationResult {
    /// Whether all markers are present
    pub all_present: bool,
    /// Expected marker indices
    pub expected_indices: Vec<usize>,
    /// Found marker indices
    pub found_indices: Vec<usize>,
    /// Missing marker indices
    pub missing_indices: Vec<usize>,
    /// Whether end marker is present
    pub end_marker_present: bool,
    /// Markers found out of order
    pub out_of_order: bool,
    /// Error message if validation failed
    pub error_message: Option<String>,
}

impl MarkerValidationResult {
    /// Check if validation passed (all markers present and in order)
    pub fn passed(&self) -> bool {
        self.all_present && self.end_marker_present && !self.out_of_order
    }

    /// Create a passing result
    pub fn success(expected_count: usize) -> Self {
        let indices: Vec<usize> = (0..expected_count).collect();
        Self {
            all_present: true,
            expected_indices: indices.clone(),
            found_indices: indices,
            missing_indices: vec![],
            end_marker_present: true,
            out_of_order: false,
            error_message: None,
        }
    }

    /// Create a failing result
    pub fn failure(
        expected_indices: Vec<usize>,
        found_indices: Vec<usize>,
        end_marker_present: bool,
        error_message: String,
    ) -> Self {
        let missing: Vec<usize> = expected_indices
            .iter()
            .filter(|i| !found_indices.contains(i))
            .copied()
            .collect();

        Self {
            all_present: missing.is_empty(),
            expected_indices,
            found_indices,
            missing_indices: missing,
            end_marker_present,
            out_of_order: false,
            error_message: Some(error_message),
        }
    }
}

/// Marker validator for batch translation responses
pub struct MarkerValidator;

impl MarkerValidator {
    /// Validate that all expected markers are present in the response
    ///
    /// # Arguments
    /// * `response` - The translated response text
    /// * `expected_count` - The number of entries expected (0-indexed markers)
    ///
    /// # Returns
    /// * `MarkerValidationResult` with validation details
    pub fn validate(response: &str, expected_count: usize) -> MarkerValidationResult {
        if expected_count == 0 {
            return MarkerValidationResult::success(0);
        }

        let expected_indices: Vec<usize> = (0..expected_count).collect();

        // Find all markers in the response
        let found_indices: Vec<usize> = ENTRY_MARKER_REGEX
            .captures_iter(response)
            .filter_map(|cap| cap.get(1).and_then(|m| m.as_str().parse().ok()))
            .collect();

        // Check for end marker
        let end_marker_present = response.contains(END_MARKER);

        // Check for missing markers
        let missing_indices: Vec<usize> = expected_indices
            .iter()
            .filter(|i| !found_indices.contains(i))
            .copied()
            .collect();

        // Check for correct order
        let mut sorted_found = found_indices.clone();
        sorted_found.sort();
        let out_of_order = found_indices != sorted_found;

        let all_present = missing_indices.is_empty();

        let error_message = if !all_present {
            Some(format!(
                "Missing markers: {:?}",
                missing_indices
            ))
        } else if !end_marker_present {
            Some("Missing <<END>> marker".to_string())
        } else if out_of_order {
            Some("Markers found out of order".to_string())
        } else {
            None
        };

        debug!(
            "Marker validation: expected={}, found={}, missing={}, end_marker={}",
            expected_count,
            found_indices.len(),
            missing_indices.len(),
            end_marker_present
        );

        MarkerValidationResult {
            all_present,
            expected_indices,
            found_indices,
            missing_indices,
            end_marker_present,
            out_of_order,
            error_message,
        }
    }

    /// Extract text between markers for a specific entry index
    ///
    /// # Arguments
    /// * `response` - The full response text
    /// * `entry_index` - The entry index to extract
    /// * `total_entries` - Total number of entries in the batch
    ///
    /// # Returns
    /// * The text between markers, or an error if markers not found
    pub fn extract_entry_text(
        response: &str,
        entry_index: usize,
        total_entries: usize,
    ) -> Result<String> {
        let start_marker = format!("<<ENTRY_{}>>", entry_index);
        let end_marker = if entry_index == total_entries - 1 {
            END_MARKER.to_string()
        } else {
            format!("<<ENTRY_{}>>", entry_index + 1)
        };

        // Find start position
        let start_pos = response
            .find(&start_marker)
            .ok_or_else(|| anyhow!("Start marker not found: {}", start_marker))?;

        let content_start = start_pos + start_marker.len();

        // Find end position
        let end_pos = response[content_start..]
            .find(&end_marker)
            .map(|pos| pos + content_start)
            .ok_or_else(|| anyhow!("End marker not found: {}", end_marker))?;

        // Extract and trim the content
        let content = response[content_start..end_pos].trim().to_string();

        Ok(content)
    }

    /// Attempt to recover entries from a partially corrupted response
    ///
    /// This tries to extract as many entries as possible even if some markers
    /// are missing or corrupted.
    ///
    /// # Arguments
    /// * `response` - The response text
    /// * `expected_count` - Number of expected entries
    ///
    /// # Returns
    /// * Vector of (index, text) tuples for successfully extracted entries
    pub fn recover_entries(response: &str, expected_count: usize) -> Vec<(usize, String)> {
        let mut recovered = Vec::new();

        for i in 0..expected_count {
            if let Ok(text) = Self::extract_entry_text(response, i, expected_count) {
                if !text.is_empty() {
                    recovered.push((i, text));
                }
            }
        }

        debug!(
            "Recovered {}/{} entries from response",
            recovered.len(),
            expected_count
        );

        recovered
    }

    /// Check if a response appears to be truncated
    ///
    /// Signs of truncation:
    /// - Missing end marker
    /// - Last entry marker has no content after it
    /// - Response ends mid-sentence
    pub fn is_truncated(response: &str, expected_count: usize) -> bool {
        // Missing end marker is a strong indicator
        if !response.contains(END_MARKER) {
            return true;
        }

        // Check if we have all expected markers
        let validation = Self::validate(response, expected_count);
        if !validation.all_present {
            return true;
        }

        false
    }
}


