//! Command-line glue between parsed arguments and the release finisher

pub mod orchestration;
