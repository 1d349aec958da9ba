//! Twitter API Client
//! It calls the v1.1 search API and carries the OAuth1 request signing
//! Define it as trait and implement it for the testability(using mock)
use std::{
    collections::BTreeMap,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use anyhow::Result;
use log::{debug, info};
use url::Url;
use uuid::Uuid;

use crate::config::TwitterSettings;
use crate::twitter_object::SearchResponse;

/// Number of statuses requested per search page, the API maximum
pub const PAGE_SIZE: usize = 100;

const OAUTH_SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

/// Twitter Client
/// It needs to know the endpoint and all required credentials
pub struct TwitterClient {
    agent: ureq::Agent,
    server: Url,
    credential: TwitterSettings,
}

#[cfg(test)]
use mockall::{automock, predicate::*};
#[cfg_attr(test, automock)]
pub trait TwitterClientTrait {
    fn new(credential: TwitterSettings) -> Self;
    fn search_page(&self, search_term: &str, max_id: Option<u64>) -> Result<SearchResponse>;
}

impl TwitterClientTrait for TwitterClient {
    /// Constructs new Twitter Client
    /// * credential: OAuth1 user-context credential set from [`crate::config::Settings`]
    fn new(credential: TwitterSettings) -> Self {
        let server = match Url::parse("https://api.twitter.com") {
            Ok(url) => url,
            Err(_) => panic!("API Endpoints is not valid."),
        };
        let agent: ureq::Agent = ureq::AgentBuilder::new()
            .timeout_read(Duration::from_secs(10))
            .timeout_write(Duration::from_secs(5))
            .build();

        info!("Created twitter api client");
        TwitterClient {
            agent,
            server,
            credential,
        }
    }

    /// Retrieve one page of search results, up to [`PAGE_SIZE`] statuses
    /// * search_term: keyword/hashtag to search for
    /// * max_id: upper id bound, the page returned ends at or below this id.
    ///   `None` requests the most recent page.
    fn search_page(&self, search_term: &str, max_id: Option<u64>) -> Result<SearchResponse> {
        let request_url = self.server.join("1.1/search/tweets.json")?;

        let page_size = PAGE_SIZE.to_string();
        let max_id_value = max_id.map(|id| id.to_string());
        let mut query: Vec<(&str, &str)> = vec![
            ("q", search_term),
            ("count", &page_size),
            ("tweet_mode", "extended"),
        ];
        if let Some(value) = &max_id_value {
            query.push(("max_id", value));
        }

        let authorization = self.authorization_header("GET", &request_url, &query)?;

        let mut request = self
            .agent
            .request_url("GET", &request_url)
            .set("Authorization", &authorization);
        for (key, value) in &query {
            request = request.query(key, value);
        }

        let response = request.call()?;
        let search_response: SearchResponse = serde_json::from_reader(response.into_reader())?;
        debug!("Got: {} tweets", search_response.statuses.len());
        Ok(search_response)
    }
}

impl TwitterClient {
    /// Build the OAuth1 `Authorization` header for one signed request
    /// The signature base string covers every query and oauth parameter
    fn authorization_header(
        &self,
        request_method: &str,
        request_url: &Url,
        query: &[(&str, &str)],
    ) -> Result<String> {
        let oauth_nonce = Uuid::new_v4().to_string();
        let oauth_timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)?
            .as_secs()
            .to_string();
        let oauth_params: [(&str, &str); 6] = [
            ("oauth_consumer_key", &self.credential.api_key),
            ("oauth_nonce", &oauth_nonce),
            ("oauth_signature_method", OAUTH_SIGNATURE_METHOD),
            ("oauth_timestamp", &oauth_timestamp),
            ("oauth_token", &self.credential.access_token),
            ("oauth_version", OAUTH_VERSION),
        ];

        let mut parameters: Vec<(&str, &str)> = query.to_vec();
        parameters.extend_from_slice(&oauth_params);
        let signature_data = signature_data(&parameters);

        let signing_key = format!(
            "{}&{}",
            percent_encode(&self.credential.key_secret),
            percent_encode(&self.credential.token_secret)
        );
        let joined_signature_data = format!(
            "{}&{}&{}",
            request_method,
            percent_encode(request_url.as_str()),
            percent_encode(&signature_data)
        );
        let hmac_digest =
            hmacsha1::hmac_sha1(signing_key.as_bytes(), joined_signature_data.as_bytes());
        let signature = base64::encode(hmac_digest);

        Ok(format!(
            "OAuth oauth_consumer_key={},oauth_nonce={},oauth_signature={},oauth_signature_method={},oauth_timestamp={},oauth_token={},oauth_version={}",
            self.credential.api_key,
            oauth_nonce,
            percent_encode(&signature),
            OAUTH_SIGNATURE_METHOD,
            oauth_timestamp,
            self.credential.access_token,
            OAUTH_VERSION
        ))
    }
}

/// Join percent-encoded parameters, sorted by key, into the signature data
fn signature_data(parameters: &[(&str, &str)]) -> String {
    let sorted: BTreeMap<&str, String> = parameters
        .iter()
        .map(|(key, value)| (*key, percent_encode(value)))
        .collect();
    sorted
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<String>>()
        .join("&")
}

// https://rust-lang-nursery.github.io/rust-cookbook/encoding/strings.html#percent-encode-a-string
fn percent_encode(input: &str) -> String {
    url::form_urlencoded::byte_serialize(input.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::{percent_encode, signature_data};

    #[test]
    fn signature_data_sorts_and_encodes_parameters() {
        let parameters = [
            ("q", "#rust lang"),
            ("tweet_mode", "extended"),
            ("count", "100"),
            ("oauth_nonce", "abc"),
        ];
        assert_eq!(
            signature_data(&parameters),
            "count=100&oauth_nonce=abc&q=%23rust+lang&tweet_mode=extended"
        );
    }

    #[test]
    fn percent_encode_escapes_reserved_characters() {
        assert_eq!(percent_encode("a&b=c"), "a%26b%3Dc");
        assert_eq!(percent_encode("plain"), "plain");
    }
}
