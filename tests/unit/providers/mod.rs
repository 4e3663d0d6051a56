/*!
 * Unit tests for provider implementations
 */

// Provider unit tests
pub mod anthropic_test;
pub mod ollama_test;
pub mod openai_test; 