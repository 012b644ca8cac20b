// Scoring: turns decoded emotion labels into per-topic statistics.

pub mod aggregate;
