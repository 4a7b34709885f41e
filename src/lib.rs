pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod git;
pub mod model;
pub mod submit;
pub mod upload;
pub mod vcs;
