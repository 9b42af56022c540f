//! Output artifacts for the mail summary: the counts CSV and the two PNG
//! line charts.

pub mod chart;
pub mod fonts;
pub mod report;
pub mod themes;
