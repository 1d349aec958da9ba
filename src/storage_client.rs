//! Object store client for the landing bucket
//! Define it as trait and implement it for the testability(using mock)
use anyhow::Result;
use log::info;
use s3::creds::Credentials;
use s3::region::Region;
use s3::Bucket;

use crate::config::AwsSettings;

/// S3 client wrapper around one target bucket
pub struct S3StorageClient {
    bucket: Bucket,
}

#[cfg(test)]
use mockall::{automock, predicate::*};
#[cfg_attr(test, automock)]
pub trait StorageClientTrait {
    fn bucket_name(&self) -> String;
    /// Put one object and return the HTTP status code of the call
    fn put_object(&self, object_path: &str, body: &[u8]) -> Result<u16>;
}

impl S3StorageClient {
    pub fn new(settings: &AwsSettings) -> Result<Self> {
        let region: Region = settings.region.parse()?;
        let credentials = Credentials::new(
            Some(&settings.access_key_id),
            Some(&settings.secret_access_key),
            None,
            None,
            None,
        )?;
        let bucket = Bucket::new(&settings.bucket_name, region, credentials)?;

        info!("Created S3 client");
        Ok(S3StorageClient { bucket })
    }
}

impl StorageClientTrait for S3StorageClient {
    fn bucket_name(&self) -> String {
        self.bucket.name()
    }

    fn put_object(&self, object_path: &str, body: &[u8]) -> Result<u16> {
        let response = self.bucket.put_object(object_path, body)?;
        Ok(response.status_code())
    }
}
