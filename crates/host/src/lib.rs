mod host;

pub use host::{MatchHost, RunResult};
