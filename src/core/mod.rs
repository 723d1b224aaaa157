//! Link classification: internal, external, or mailto.

mod classifier;
mod link;

pub use classifier::{LinkClassifier, build_domain_pattern};
pub use link::{ALLOWED_SCHEMES, LinkKind, has_external_scheme, is_mailto};
