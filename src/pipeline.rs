//! Run pipeline: paginated extraction, CSV serialization and the landing upload
//! pub methods are expected to call from [`#main`]
use anyhow::{anyhow, Result};
use log::{error, info};

use crate::config::RunConfig;
use crate::storage_client::StorageClientTrait;
use crate::twitter_client::{TwitterClientTrait, PAGE_SIZE};
use crate::twitter_object::TweetRecord;

/// Immutable search parameters of one run
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub search_term: String,
    pub requested_count: usize,
}

/// Result of the single put against the landing bucket
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub succeeded: bool,
    pub http_status: u16,
    pub object_key: String,
}

/// Run the whole pipeline: extract, serialize, upload
///
/// Fetch failures propagate and nothing is uploaded. A failure raised by the
/// upload call itself is caught here, logged and turned into a failed
/// outcome, it never propagates further. The caller decides what the
/// process exit status should be.
pub fn run(
    tw_client: &impl TwitterClientTrait,
    storage: &impl StorageClientTrait,
    run_config: &RunConfig,
) -> Result<UploadOutcome> {
    let request = SearchRequest {
        search_term: run_config.search_term.clone(),
        requested_count: run_config.requested_count,
    };
    let records = extract(tw_client, &request)?;

    let outcome = match upload(storage, &run_config.object_key, &records) {
        Ok(outcome) => outcome,
        Err(error) => {
            error!("Pipeline failed. Error: {}", error);
            UploadOutcome {
                succeeded: false,
                http_status: 0,
                object_key: run_config.object_key.clone(),
            }
        }
    };
    Ok(outcome)
}

/// Pull up to `ceil(requested_count / PAGE_SIZE)` pages and flatten them
///
/// The page math asks the API for whole pages rather than an exact item
/// count: the final page is not truncated, so the delivered total can exceed
/// `requested_count`, and a short or empty page ends the run early. Records
/// keep the upstream order, page by page, item by item.
pub fn extract(
    tw_client: &impl TwitterClientTrait,
    request: &SearchRequest,
) -> Result<Vec<TweetRecord>> {
    let page_count = page_count_for(request.requested_count);
    info!("Getting tweets using search word: {}", request.search_term);

    let mut records: Vec<TweetRecord> = Vec::new();
    let mut max_id: Option<u64> = None;
    for _ in 0..page_count {
        let page = tw_client.search_page(&request.search_term, max_id)?;
        if page.statuses.is_empty() {
            break;
        }
        // v1.1 cursor convention: the next page ends strictly below the
        // lowest id seen so far
        max_id = page
            .statuses
            .iter()
            .map(|status| status.id)
            .min()
            .map(|lowest| lowest.saturating_sub(1));
        for status in &page.statuses {
            records.push(TweetRecord::from_status(status));
        }
    }

    info!("Extracted {} tweets.", records.len());
    Ok(records)
}

/// Serialize the records as CSV and put them under the `landing/` prefix
///
/// A non-200 status is reported in the outcome without an error; only a
/// failure of the put call itself surfaces as `Err`
pub fn upload(
    storage: &impl StorageClientTrait,
    object_key: &str,
    records: &[TweetRecord],
) -> Result<UploadOutcome> {
    info!("Uploading data into S3 bucket - {}", storage.bucket_name());

    let body = to_csv(records)?;
    let status = storage.put_object(&format!("landing/{}", object_key), body.as_bytes())?;

    let outcome = UploadOutcome {
        succeeded: status == 200,
        http_status: status,
        object_key: object_key.to_string(),
    };
    if outcome.succeeded {
        info!("File {} uploaded successfully", object_key);
    } else {
        error!("Upload failed. Status: {}", status);
    }
    Ok(outcome)
}

/// ceil(requested_count / PAGE_SIZE)
fn page_count_for(requested_count: usize) -> usize {
    requested_count.div_ceil(PAGE_SIZE)
}

/// Header row comes from the [`TweetRecord`] field order, no index column
fn to_csv(records: &[TweetRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    let buffer = writer
        .into_inner()
        .map_err(|error| anyhow!("CSV buffer error: {}", error))?;
    Ok(String::from_utf8(buffer)?)
}
