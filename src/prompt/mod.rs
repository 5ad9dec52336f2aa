/// Whole-prompt placeholder expansion
pub mod expander;
/// Comma normalization of expanded prompts
pub mod normalize;
/// Placeholder detection
pub mod scanner;
