//! Settings resolution and the immutable per-run configuration
//! Section/key names of the config file are shared with the deployment
//! tooling and must stay as they are
use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use ini::{Ini, Properties};

use crate::cli::{CommandLineArgs, RunEnv};

/// Per-user credential file in the home directory
pub const CONFIG_FILE_NAME: &str = ".pipeline.conf";
const DEFAULT_AWS_REGION: &str = "us-east-1";

/// Everything needed to construct the two clients
#[derive(Debug)]
pub struct Settings {
    pub aws: AwsSettings,
    pub twitter: TwitterSettings,
}

#[derive(Debug)]
pub struct AwsSettings {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket_name: String,
    pub region: String,
}

/// OAuth1 credential set for calling the search API as a user
#[derive(Debug)]
pub struct TwitterSettings {
    pub api_key: String,
    pub key_secret: String,
    pub access_token: String,
    pub token_secret: String,
}

impl Settings {
    /// Resolve credentials for the selected environment
    /// * `local` reads `~/.pipeline.conf`
    /// * `remote` reads like-named upper-case environment variables
    pub fn load(env_mode: RunEnv) -> Result<Self> {
        match env_mode {
            RunEnv::Local => {
                let config_file = find_default_config_file()
                    .ok_or_else(|| anyhow!("Failed to find config file."))?;
                Self::from_config_file(&config_file)
            }
            RunEnv::Remote => Self::from_environment(),
        }
    }

    pub fn from_config_file(config_path: &Path) -> Result<Self> {
        let credentials = Ini::load_from_file(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let aws = section(&credentials, "aws")?;
        let twitter = section(&credentials, "twitter")?;

        Ok(Settings {
            aws: AwsSettings {
                access_key_id: get_key(aws, "aws", "aws_access_key_id")?,
                secret_access_key: get_key(aws, "aws", "aws_secret_access_key")?,
                bucket_name: get_key(aws, "aws", "aws_bucket_name")?,
                region: aws
                    .get("aws_region")
                    .unwrap_or(DEFAULT_AWS_REGION)
                    .to_string(),
            },
            twitter: TwitterSettings {
                api_key: get_key(twitter, "twitter", "twitter_api_key")?,
                key_secret: get_key(twitter, "twitter", "twitter_key_secret")?,
                access_token: get_key(twitter, "twitter", "twitter_access_token")?,
                token_secret: get_key(twitter, "twitter", "twitter_token_secret")?,
            },
        })
    }

    fn from_environment() -> Result<Self> {
        Ok(Settings {
            aws: AwsSettings {
                access_key_id: required_env("AWS_ACCESS_KEY_ID")?,
                secret_access_key: required_env("AWS_SECRET_ACCESS_KEY")?,
                bucket_name: required_env("AWS_BUCKET_NAME")?,
                region: env::var("AWS_REGION").unwrap_or_else(|_| DEFAULT_AWS_REGION.to_string()),
            },
            twitter: TwitterSettings {
                api_key: required_env("TWITTER_API_KEY")?,
                key_secret: required_env("TWITTER_KEY_SECRET")?,
                access_token: required_env("TWITTER_ACCESS_TOKEN")?,
                token_secret: required_env("TWITTER_TOKEN_SECRET")?,
            },
        })
    }
}

/// Immutable parameters of one run, kept separate from the constructed clients
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub search_term: String,
    pub requested_count: usize,
    pub object_key: String,
}

impl RunConfig {
    /// * timestamp: run timestamp formatted as `%Y%m%d%H%M%S`, also used for
    ///   the log file name
    pub fn new(args: &CommandLineArgs, timestamp: &str) -> Result<Self> {
        if args.search.trim().is_empty() {
            return Err(anyhow!("Search term must not be empty"));
        }
        if args.count == 0 {
            return Err(anyhow!("--count must be greater than zero"));
        }
        Ok(RunConfig {
            search_term: args.search.clone(),
            requested_count: args.count,
            object_key: format!("twitter_search_data_{}.csv", timestamp),
        })
    }
}

fn section<'a>(credentials: &'a Ini, name: &str) -> Result<&'a Properties> {
    credentials
        .section(Some(name))
        .ok_or_else(|| anyhow!("Missing section [{}] in config file", name))
}

fn get_key(properties: &Properties, section_name: &str, key: &str) -> Result<String> {
    properties
        .get(key)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Missing key {} in section [{}]", key, section_name))
}

fn required_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| anyhow!("Environment variable {} is not set", name))
}

/// Get the default path of the credential file
/// It assumes you have read permission in your home dir
fn find_default_config_file() -> Option<PathBuf> {
    home::home_dir().map(|mut path| {
        path.push(CONFIG_FILE_NAME);
        path
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::{RunConfig, Settings};
    use crate::cli::{CommandLineArgs, RunEnv};

    fn temp_config(content: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("pipeline-conf-{}.ini", uuid::Uuid::new_v4()));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_settings_from_config_file() {
        let path = temp_config(
            "[aws]\n\
             aws_access_key_id = AKIAEXAMPLE\n\
             aws_secret_access_key = aws-secret\n\
             aws_bucket_name = tweet-landing\n\
             \n\
             [twitter]\n\
             twitter_api_key = consumer-key\n\
             twitter_key_secret = consumer-secret\n\
             twitter_access_token = access-token\n\
             twitter_token_secret = token-secret\n",
        );
        let settings = Settings::from_config_file(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(settings.aws.access_key_id, "AKIAEXAMPLE");
        assert_eq!(settings.aws.bucket_name, "tweet-landing");
        assert_eq!(settings.aws.region, "us-east-1");
        assert_eq!(settings.twitter.api_key, "consumer-key");
        assert_eq!(settings.twitter.token_secret, "token-secret");
    }

    #[test]
    fn missing_key_is_an_error() {
        let path = temp_config("[aws]\naws_access_key_id = AKIAEXAMPLE\n");
        let result = Settings::from_config_file(&path);
        fs::remove_file(&path).ok();
        assert_eq!(result.is_err(), true);
    }

    #[test]
    fn run_config_derives_object_key() {
        let args = CommandLineArgs {
            search: "rustlang".to_string(),
            count: 200,
            env: RunEnv::Local,
        };
        let run_config = RunConfig::new(&args, "20260806120000").unwrap();
        assert_eq!(
            run_config.object_key,
            "twitter_search_data_20260806120000.csv"
        );
        assert_eq!(run_config.search_term, "rustlang");
        assert_eq!(run_config.requested_count, 200);
    }

    #[test]
    fn run_config_rejects_zero_count() {
        let args = CommandLineArgs {
            search: "rustlang".to_string(),
            count: 0,
            env: RunEnv::Local,
        };
        assert_eq!(RunConfig::new(&args, "20260806120000").is_err(), true);
    }
}
