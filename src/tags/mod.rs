/// Condition expressions over tag groups
pub mod condition;
/// Typed tag documents and their YAML form
pub mod document;
/// Per-group sampling and weight transforms
pub mod sampler;
