pub mod answer_composer;
pub mod grading_service;
pub mod proximity_matcher;
pub mod region_builder;
pub mod report_writer;
pub mod warn_writer;

pub use answer_composer::{AnswerGraphComposer, ComposedPage, LinkKind, MatchLink};
pub use grading_service::{grade_results, strip_non_digits};
pub use proximity_matcher::{AnchorMatch, ProximityMatcher};
pub use region_builder::build_regions;
pub use report_writer::ReportWriter;
pub use warn_writer::WarnWriter;
