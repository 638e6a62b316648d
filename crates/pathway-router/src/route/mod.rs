//! Route templates: parsing, matching and precedence
//!
//! Contains pure functional components:
//! - `pattern` classifies single segments and matches them against tokens
//! - `parser` builds whole templates and validates cross-segment rules
//! - `matcher` runs the route matching algorithm for one template
//! - `precedence` orders templates and detects ambiguous pairs

pub mod matcher;
pub mod parser;
pub mod pattern;
pub mod precedence;

// Re-export commonly used types
pub use matcher::{match_template, match_tokens};
pub use parser::{parse_template, parse_template_with, RouteTemplate};
pub use pattern::{classify_segment, SegmentMatch, TemplateSegment};
pub use precedence::{check_ambiguity, compare_templates};
