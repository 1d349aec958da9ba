//! Definition of CLI arguments + its option parameters
use std::fmt;
use std::str::FromStr;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "twitter-datapipeline",
    about = "Pull tweets matching a keyword and land them as CSV in S3"
)]
pub struct CommandLineArgs {
    /// Keyword/hashtag to search for
    pub search: String,

    /// Number of tweets to be pulled. Default is 200.
    #[structopt(short, long, default_value = "200")]
    pub count: usize,

    /// Mode of running
    #[structopt(long, default_value = "local", possible_values = &["local", "remote"])]
    pub env: RunEnv,
}

/// Where credentials come from: the per-user config file or the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEnv {
    Local,
    Remote,
}

impl FromStr for RunEnv {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "local" => Ok(RunEnv::Local),
            "remote" => Ok(RunEnv::Remote),
            other => Err(anyhow::anyhow!("Unknown environment: {}", other)),
        }
    }
}

impl fmt::Display for RunEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunEnv::Local => write!(f, "local"),
            RunEnv::Remote => write!(f, "remote"),
        }
    }
}
