// tweetmood: emotion analysis of recent tweets about a topic
//
// This is the library root. Each module corresponds to one stage of the
// analysis pipeline or to the plumbing around it.

pub mod acquisition;
pub mod config;
pub mod emotion;
pub mod error;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod scoring;
pub mod status;
pub mod text;

#[cfg(feature = "web")]
pub mod web;
