/*!
 * Speaker tracking for dialogue translation.
 *
 * This module provides speaker detection and tracking for dialogue-heavy subtitles:
 * - Pattern-based speaker detection (e.g., "NAME: dialogue")
 * - Speaker continuity tracking across entries
 * - Character name extraction
 */

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::translation::document::DocumentEntry;

/// Pattern for detecting speaker labels at the start of text.
/// Matches patterns like "JOHN:", "Mary:", "DR. SMITH:", "[NARRATOR]:"
static SPEAKER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\[)?([A-Z][A-Za-z\s\.]+?)(?:\])?:\s*").expect("Invalid speaker regex")
});

/// Pattern for detecting stage directions/sound effects.
static SOUND_EFFECT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[.+\]$|^\(.+\)$").expect("Invalid sound effect regex")
});

/// Configuration for speaker tracking.
#[derive(Debug, Clone)]
pub struct SpeakerConfig {
    /// Minimum times a name must appear to be considered a speaker
    pub min_occurrences: usize,

    /// Whether to detect implicit speaker changes (no label)
    pub detect_implicit_changes: bool,

    /// Maximum gap (in entries) to maintain speaker continuity
    pub continuity_gap: usize,
}

impl Default for SpeakerConfig {
    fn default() -> Self {
        Self {
            min_occurrences: 2,
            detect_implicit_changes: false,
            continuity_gap: 3,
        }
    }
}

impl SpeakerConfig {
    /// Create a strict config that requires more evidence.
    pub fn strict() -> Self {
        Self {
            min_occurrences: 3,
            detect_implicit_changes: false,
            continuity_gap: 1,
        }
    }

    /// Create a lenient config that detects more speakers.
    pub fn lenient() -> Self {
        Self {
            min_occurrences: 1,
            detect_implicit_changes: true,
            continuity_gap: 5,
        }
    }
}

/// Detected speaker information.
#[derive(Debug, Clone)]
pub struct DetectedSpeaker {
    /// Speaker name/label
    pub name: String,

    /// Entry IDs where this speaker appears
    pub entry_ids: Vec<usize>,

    /// Number of times this speaker appears
    pub occurrence_count: usize,
}

/// Speaker tracking statistics.
#[derive(Debug, Clone, Default)]
pub struct SpeakerStats {
    /// Total entries analyzed
    pub entries_analyzed: usize,

    /// Entries with detected speakers
    pub entries_with_speakers: usize,

    /// Number of unique speakers detected
    pub unique_speakers: usize,

    /// Sound effects/stage directions found
    pub sound_effects_found: usize,
}

/// Speaker tracker for dialogue-aware translation.
#[derive(Debug)]
pub struct SpeakerTracker {
    config: SpeakerConfig,
}

impl SpeakerTracker {
    /// Create a new speaker tracker with the given configuration.
    pub fn new(config: SpeakerConfig) -> Self {
        Self { config }
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(SpeakerConfig::default())
    }

    /// Detect speakers in a collection of entries.
    ///
    /// This method analyzes entries and updates their speaker field
    /// based on detected patterns.
    pub fn detect_speakers(&self, entries: &mut [DocumentEntry]) -> SpeakerStats {
        let mut stats = SpeakerStats {
            entries_analyzed: entries.len(),
            ..Default::default()
        };

        // First pass: detect explicit speaker labels
        let mut speaker_counts: HashMap<String, Vec<usize>> = HashMap::new();

        for entry in entries.iter() {
            if is_sound_effect(&entry.original_text) {
                stats.sound_effects_found += 1;
                continue;
            }

            if let Some(speaker) = extract_speaker(&entry.original_text) {
                speaker_counts
                    .entry(speaker.clone())
                    .or_default()
                    .push(entry.id);
            }
        }

        // Filter to speakers that meet minimum occurrence threshold
        let valid_speakers: HashMap<String, Vec<usize>> = speaker_counts
            .into_iter()
            .filter(|(_, ids)| ids.len() >= self.config.min_occurrences)
            .collect();

        stats.unique_speakers = valid_speakers.len();

        // Second pass: assign speakers to entries
        for entry in entries.iter_mut() {
            if is_sound_effect(&entry.original_text) {
                continue;
            }

            if let Some(speaker) = extract_speaker(&entry.original_text) {
                if valid_speakers.contains_key(&speaker) {
                    entry.speaker = Some(speaker);
                    stats.entries_with_speakers += 1;
                }
            }
        }

        // Third pass (optional): propagate speakers to unlabeled entries
        if self.config.detect_implicit_changes {
            self.propagate_speakers(entries, &mut stats);
        }

        stats
    }

    /// Propagate speaker labels to nearby unlabeled entries.
    fn propagate_speakers(&self, entries: &mut [DocumentEntry], stats: &mut SpeakerStats) {
        let mut last_speaker: Option<String> = None;
        let mut gap_count = 0;

        for entry in entries.iter_mut() {
            if entry.speaker.is_some() {
                last_speaker = entry.speaker.clone();
                gap_count = 0;
            } else if last_speaker.is_some() && gap_count < self.config.continuity_gap {
                // Only propagate if entry looks like dialogue (no special markers)
                if !is_sound_effect(&entry.original_text) && looks_like_dialogue(&entry.original_text) {
                    entry.speaker = last_speaker.clone();
                    stats.entries_with_speakers += 1;
                }
                gap_count += 1;
            } else {
                // Reset continuity
                last_speaker = None;
                gap_count = 0;
            }
        }
    }

    /// Get a list of all detected speakers from entries.
    pub fn get_speakers(&self, entries: &[DocumentEntry]) -> Vec<DetectedSpeaker> {
        let mut speaker_map: HashMap<String, Vec<usize>> = HashMap::new();

        for entry in entries {
            if let Some(ref speaker) = entry.speaker {
                speaker_map
                    .entry(speaker.clone())
                    .or_default()
                    .push(entry.id);
            }
        }

        speaker_map
            .into_iter()
            .map(|(name, entry_ids)| DetectedSpeaker {
                name,
                occurrence_count: entry_ids.len(),
                entry_ids,
            })
            .collect()
    }

    /// Extract speaker names from entries (without modifying them).
    pub fn extract_speaker_names(&self, entries: &[DocumentEntry]) -> Vec<String> {
        let mut names: HashMap<String, usize> = HashMap::new();

        for entry in entries {
            if let Some(speaker) = extract_speaker(&entry.original_text) {
                *names.entry(speaker).or_insert(0) += 1;
            }
        }

        names
            .into_iter()
            .filter(|(_, count)| *count >= self.config.min_occurrences)
            .map(|(name, _)| name)
            .collect()
    }

    /// Get configuration.
    pub fn config(&self) -> &SpeakerConfig {
        &self.config
    }
}

impl Default for SpeakerTracker {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Extract speaker name from text if present.
fn extract_speaker(text: &str) -> Option<String> {
    SPEAKER_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1).map(|m| m.as_str().trim().to_string()))
}

/// Check if text appears to be a sound effect or stage direction.
fn is_sound_effect(text: &str) -> bool {
    SOUND_EFFECT_PATTERN.is_match(text.trim())
}

/// Check if text looks like dialogue (not a sound effect or technical marker).
fn looks_like_dialogue(text: &str) -> bool {
    let trimmed = text.trim();

    // Not empty
    if trimmed.is_empty() {
        return false;
    }

    // Not a sound effect
    if is_sound_effect(trimmed) {
        return false;
    }

    // Not all caps technical text (like "SCENE 5" or "END")
    if trimmed.len() < 20 && trimmed == trimmed.to_uppercase() && !trimmed.contains(' ') {
        return false;
    }

    true
}


