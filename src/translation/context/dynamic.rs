/*!
 * Dynamic window sizing for adaptive context management.
 *
 * This module provides intelligent window sizing that adapts to:
 * - Scene boundaries: Avoid splitting scenes across batches
 * - Entry complexity: Larger batches for simple entries, smaller for complex
 * - Document position: More context at beginnings of scenes
 */

use crate::translation::document::{DocumentEntry, Scene};

/// Configuration for dynamic window sizing.
#[derive(Debug, Clone)]
pub struct DynamicWindowConfig {
    /// Minimum batch size (entries)
    pub min_batch_size: usize,

    /// Maximum batch size (entries)
    pub max_batch_size: usize,

    /// Target tokens per batch (soft limit)
    pub target_tokens: usize,

    /// Whether to respect scene boundaries
    pub respect_scene_boundaries: bool,

    /// Lookahead multiplier for scene detection
    pub lookahead_factor: f32,
}

impl Default for DynamicWindowConfig {
    fn default() -> Self {
        Self {
            min_batch_size: 5,
            max_batch_size: 25,
            target_tokens: 2000,
            respect_scene_boundaries: true,
            lookahead_factor: 1.5,
        }
    }
}

impl DynamicWindowConfig {
    /// Create a config for simple, fast processing.
    pub fn fast() -> Self {
        Self {
            min_batch_size: 10,
            max_batch_size: 30,
            target_tokens: 3000,
            respect_scene_boundaries: false,
            lookahead_factor: 1.0,
        }
    }

    /// Create a config for high-quality, scene-aware processing.
    pub fn quality() -> Self {
        Self {
            min_batch_size: 3,
            max_batch_size: 15,
            target_tokens: 1500,
            respect_scene_boundaries: true,
            lookahead_factor: 2.0,
        }
    }
}

/// Dynamic window sizer that calculates optimal batch sizes.
#[derive(Debug)]
pub struct DynamicWindowSizer {
    config: DynamicWindowConfig,
}

impl DynamicWindowSizer {
    /// Create a new dynamic window sizer with the given configuration.
    pub fn new(config: DynamicWindowConfig) -> Self {
        Self { config }
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(DynamicWindowConfig::default())
    }

    /// Calculate the optimal batch size for the current position.
    ///
    /// Returns the number of entries to include in the next batch.
    pub fn calculate_optimal_size(
        &self,
        entries: &[DocumentEntry],
        position: usize,
        scenes: Option<&[Scene]>,
    ) -> usize {
        if position >= entries.len() {
            return 0;
        }

        let remaining = entries.len() - position;

        // Start with target size based on complexity
        let complexity_size = self.size_by_complexity(&entries[position..]);

        // Adjust for scene boundaries if enabled
        let scene_adjusted = if self.config.respect_scene_boundaries {
            if let Some(scenes) = scenes {
                self.adjust_for_scenes(position, complexity_size, scenes, remaining)
            } else {
                complexity_size
            }
        } else {
            complexity_size
        };

        // Clamp to configured bounds
        scene_adjusted
            .max(self.config.min_batch_size)
            .min(self.config.max_batch_size)
            .min(remaining)
    }

    /// Calculate batch size based on entry complexity.
    fn size_by_complexity(&self, entries: &[DocumentEntry]) -> usize {
        let mut token_estimate = 0;
        let mut count = 0;

        for entry in entries.iter().take(self.config.max_batch_size) {
            let entry_tokens = estimate_tokens(&entry.original_text);
            if token_estimate + entry_tokens > self.config.target_tokens && count >= self.config.min_batch_size {
                break;
            }
            token_estimate += entry_tokens;
            count += 1;
        }

        count.max(self.config.min_batch_size)
    }

    /// Adjust batch size to respect scene boundaries.
    fn adjust_for_scenes(
        &self,
        position: usize,
        initial_size: usize,
        scenes: &[Scene],
        remaining: usize,
    ) -> usize {
        // Find the current scene
        let current_scene = scenes.iter().find(|s| {
            position >= s.start_entry_id && position <= s.end_entry_id
        });

        let Some(scene) = current_scene else {
            return initial_size;
        };

        // Calculate entries until scene end
        let entries_to_scene_end = scene.end_entry_id.saturating_sub(position) + 1;

        // If we can fit the rest of the scene, do it
        if entries_to_scene_end <= self.config.max_batch_size && entries_to_scene_end >= self.config.min_batch_size {
            return entries_to_scene_end.min(remaining);
        }

        // If initial size would end mid-scene, try to find a better boundary
        let end_position = position + initial_size;
        if end_position > scene.start_entry_id && end_position <= scene.end_entry_id {
            // We'd end in the middle of the scene
            // Option 1: Extend to scene end if not too big
            if entries_to_scene_end <= (self.config.max_batch_size as f32 * self.config.lookahead_factor) as usize {
                return entries_to_scene_end.min(remaining).min(self.config.max_batch_size);
            }
            // Option 2: Keep initial size (scene is too long)
        }

        initial_size
    }

    /// Get entries to include in the lookahead based on scenes.
    pub fn calculate_lookahead(
        &self,
        entries: &[DocumentEntry],
        batch_end: usize,
        scenes: Option<&[Scene]>,
        base_lookahead: usize,
    ) -> usize {
        if batch_end >= entries.len() {
            return 0;
        }

        let remaining = entries.len() - batch_end;

        if !self.config.respect_scene_boundaries {
            return base_lookahead.min(remaining);
        }

        // Find if the next entries are in a new scene
        if let Some(scenes) = scenes {
            let next_scene = scenes.iter().find(|s| {
                batch_end >= s.start_entry_id && batch_end <= s.end_entry_id
            });

            if let Some(scene) = next_scene {
                // Include entries to the end of the scene in lookahead
                let entries_to_scene_end = scene.end_entry_id.saturating_sub(batch_end) + 1;
                return entries_to_scene_end.min(remaining).min(base_lookahead * 2);
            }
        }

        base_lookahead.min(remaining)
    }

    /// Get the configuration.
    pub fn config(&self) -> &DynamicWindowConfig {
        &self.config
    }
}

impl Default for DynamicWindowSizer {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Estimate token count for text (rough approximation).
fn estimate_tokens(text: &str) -> usize {
    // Rough estimate: ~4 chars per token for English
    // Adjust for languages with different character densities
    let char_count = text.chars().count();
    char_count.div_ceil(4)
}


