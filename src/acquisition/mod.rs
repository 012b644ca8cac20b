// Tweet acquisition: trait-based abstraction over where raw texts come from.
//
// TweetSource defines the interface. ProcessBridge supervises the external
// fetch script; CannedSource returns fixed outcomes for tests and dry runs.
// Neither ever returns an error: every failure becomes FetchOutcome::NoData.

pub mod canned;
pub mod process;
pub mod traits;
