//! Rule-based classification of individual file changes.

pub mod classifier;
pub mod matchers;

pub use classifier::{classify, classify_all, ChangeClassification, Classifier};
pub use matchers::{default_matchers, Finding, FindingCategory, Matcher, PatchContext, Route};
