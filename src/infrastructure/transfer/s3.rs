//! S3 transfer client using the AWS SDK

use std::io::SeekFrom;
use std::path::Path;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use aws_sdk_s3::Client;
use futures::{stream, StreamExt, TryStreamExt};
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::domain::transfer::{
    ObjectStoreTransferClient, TransferError, TransferReceipt, TransferRequest,
};

use super::parts::{effective_part_size, plan_parts, PartSpec};

/// Connection settings for the S3 client
#[derive(Debug, Clone, Default)]
pub struct S3TransferConfig {
    /// Region override; the default AWS chain is used when absent
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible stores (enables path-style addressing)
    pub endpoint: Option<String>,
}

/// SDK failures all come from the storage provider side: service errors,
/// authentication, timeouts and connection problems.
fn provider_error<E>(operation: &str, err: SdkError<E>) -> TransferError
where
    E: std::error::Error + Send + Sync + 'static,
{
    TransferError::provider_with_source(
        format!("{} failed: {}", operation, DisplayErrorContext(&err)),
        err,
    )
}

/// Reads one part of the source file
async fn read_part(path: &Path, part: PartSpec) -> Result<Vec<u8>, TransferError> {
    let mut file = tokio::fs::File::open(path).await?;
    file.seek(SeekFrom::Start(part.offset)).await?;

    let mut buffer = vec![0u8; part.length as usize];
    file.read_exact(&mut buffer).await?;

    Ok(buffer)
}

/// Uploads files to S3, switching to multipart above one part size
#[derive(Debug, Clone)]
pub struct S3TransferClient {
    client: Client,
}

impl S3TransferClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from the ambient AWS configuration plus overrides
    pub async fn from_config(config: &S3TransferConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }

        let shared = loader.load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);

        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self::new(Client::from_conf(builder.build()))
    }

    async fn put_single(&self, request: &TransferRequest) -> Result<TransferReceipt, TransferError> {
        let data = tokio::fs::read(&request.source_path).await?;
        let bytes = data.len() as u64;

        let output = self
            .client
            .put_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| provider_error("PutObject", e))?;

        Ok(TransferReceipt {
            bucket: request.bucket.clone(),
            key: request.key.clone(),
            bytes,
            parts: 1,
            e_tag: output.e_tag().map(str::to_string),
        })
    }

    async fn put_multipart(
        &self,
        request: &TransferRequest,
        cancel: &CancellationToken,
    ) -> Result<TransferReceipt, TransferError> {
        let create = self
            .client
            .create_multipart_upload()
            .bucket(&request.bucket)
            .key(&request.key)
            .send();

        // Nothing to abort yet if cancellation wins here
        let created = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransferError::cancelled()),
            result = create => result.map_err(|e| provider_error("CreateMultipartUpload", e)),
        }?;

        let upload_id = created
            .upload_id()
            .ok_or_else(|| TransferError::provider("CreateMultipartUpload returned no upload id"))?
            .to_string();

        let plan = plan_parts(request.content_length, request.part_size);
        debug!(upload_id = %upload_id, parts = plan.len(), "Multipart upload created");

        let uploaded = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransferError::cancelled()),
            result = self.upload_parts(request, &upload_id, &plan) => result,
        };

        let parts = match uploaded {
            Ok(parts) => parts,
            Err(err) => {
                self.abort(request, &upload_id).await;
                return Err(err);
            }
        };

        let part_count = parts.len();
        let completed = CompletedMultipartUpload::builder()
            .set_parts(Some(parts))
            .build();

        let complete = self
            .client
            .complete_multipart_upload()
            .bucket(&request.bucket)
            .key(&request.key)
            .upload_id(&upload_id)
            .multipart_upload(completed)
            .send();

        let finished = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransferError::cancelled()),
            result = complete => result.map_err(|e| provider_error("CompleteMultipartUpload", e)),
        };

        let output = match finished {
            Ok(output) => output,
            Err(err) => {
                self.abort(request, &upload_id).await;
                return Err(err);
            }
        };

        Ok(TransferReceipt {
            bucket: request.bucket.clone(),
            key: request.key.clone(),
            bytes: request.content_length,
            parts: part_count,
            e_tag: output.e_tag().map(str::to_string),
        })
    }

    async fn upload_parts(
        &self,
        request: &TransferRequest,
        upload_id: &str,
        plan: &[PartSpec],
    ) -> Result<Vec<CompletedPart>, TransferError> {
        let mut parts: Vec<CompletedPart> = stream::iter(plan.iter().copied())
            .map(|part| self.upload_part(request, upload_id, part))
            .buffer_unordered(request.concurrency.max(1))
            .try_collect()
            .await?;

        parts.sort_by_key(|p| p.part_number());
        Ok(parts)
    }

    async fn upload_part(
        &self,
        request: &TransferRequest,
        upload_id: &str,
        part: PartSpec,
    ) -> Result<CompletedPart, TransferError> {
        let data = read_part(&request.source_path, part).await?;

        let output = self
            .client
            .upload_part()
            .bucket(&request.bucket)
            .key(&request.key)
            .upload_id(upload_id)
            .part_number(part.number)
            .content_length(part.length as i64)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| provider_error("UploadPart", e))?;

        debug!(part = part.number, bytes = part.length, "Part uploaded");

        Ok(CompletedPart::builder()
            .set_e_tag(output.e_tag().map(str::to_string))
            .part_number(part.number)
            .build())
    }

    /// Best-effort cleanup so the provider does not keep orphaned parts
    async fn abort(&self, request: &TransferRequest, upload_id: &str) {
        if let Err(e) = self
            .client
            .abort_multipart_upload()
            .bucket(&request.bucket)
            .key(&request.key)
            .upload_id(upload_id)
            .send()
            .await
        {
            warn!(
                key = %request.key,
                upload_id = %upload_id,
                error = %DisplayErrorContext(&e),
                "Failed to abort multipart upload, orphaned parts may remain"
            );
        }
    }
}

#[async_trait]
impl ObjectStoreTransferClient for S3TransferClient {
    #[instrument(skip_all, fields(bucket = %request.bucket, key = %request.key))]
    async fn upload(
        &self,
        request: &TransferRequest,
        cancel: CancellationToken,
    ) -> Result<TransferReceipt, TransferError> {
        let part_size = effective_part_size(request.content_length, request.part_size);

        if request.content_length <= part_size {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(TransferError::cancelled()),
                result = self.put_single(request) => result,
            }
        } else {
            self.put_multipart(request, &cancel).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transfer::FailureKind;
    use crate::infrastructure::transfer::parts::MIN_PART_SIZE;
    use aws_sdk_s3::config::retry::RetryConfig;
    use aws_sdk_s3::config::{Credentials, Region};
    use std::io::Write;
    use std::path::PathBuf;

    fn unreachable_client() -> S3TransferClient {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("test", "test", None, None, "static"))
            .endpoint_url("http://127.0.0.1:1")
            .force_path_style(true)
            .retry_config(RetryConfig::disabled())
            .build();

        S3TransferClient::new(Client::from_conf(config))
    }

    fn request_for(path: PathBuf, content_length: u64) -> TransferRequest {
        TransferRequest {
            source_path: path,
            bucket: "extratos".to_string(),
            key: "contas/testfile.txt".to_string(),
            content_length,
            part_size: 8 * 1024 * 1024,
            concurrency: 2,
        }
    }

    #[tokio::test]
    async fn test_read_part_reads_requested_slice() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"0123456789").unwrap();

        let part = PartSpec {
            number: 2,
            offset: 4,
            length: 3,
        };
        let data = read_part(file.path(), part).await.unwrap();

        assert_eq!(data, b"456");
    }

    #[tokio::test]
    async fn test_read_part_past_end_is_generic_failure() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"short").unwrap();

        let part = PartSpec {
            number: 1,
            offset: 0,
            length: 64,
        };
        let err = read_part(file.path(), part).await.unwrap_err();

        assert_eq!(err.kind(), FailureKind::Generic);
    }

    #[tokio::test]
    async fn test_missing_source_is_generic_failure() {
        let dir = tempfile::tempdir().unwrap();
        let request = request_for(dir.path().join("missing.txt"), 10);

        let err = unreachable_client()
            .upload(&request, CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), FailureKind::Generic);
    }

    #[tokio::test]
    async fn test_cancelled_before_start_is_generic_failure() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"conteudo").unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = unreachable_client()
            .upload(&request_for(file.path().to_path_buf(), 8), cancel)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), FailureKind::Generic);
        assert_eq!(err.message(), "transfer cancelled");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_provider_failure() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"conteudo").unwrap();

        let err = unreachable_client()
            .upload(&request_for(file.path().to_path_buf(), 8), CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), FailureKind::Provider);
        assert!(err.message().starts_with("PutObject failed"));
    }

    /// Sparse file one MiB above the minimum part size, so `upload` goes multipart
    fn multipart_source() -> (tempfile::NamedTempFile, TransferRequest) {
        let file = tempfile::NamedTempFile::new().unwrap();
        let length = MIN_PART_SIZE + 1024 * 1024;
        file.as_file().set_len(length).unwrap();

        let mut request = request_for(file.path().to_path_buf(), length);
        request.part_size = MIN_PART_SIZE;

        (file, request)
    }

    #[tokio::test]
    async fn test_multipart_create_failure_is_provider_failure() {
        let (_file, request) = multipart_source();
        let part_size = effective_part_size(request.content_length, request.part_size);
        assert!(request.content_length > part_size);

        let err = unreachable_client()
            .upload(&request, CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), FailureKind::Provider);
        assert!(err.message().starts_with("CreateMultipartUpload failed"));
    }

    #[tokio::test]
    async fn test_multipart_cancelled_before_create_is_generic_failure() {
        let (_file, request) = multipart_source();

        let cancel = CancellationToken::new();
        cancel.cancel();

        // The token is checked before CreateMultipartUpload, so no provider call is made
        let err = unreachable_client().upload(&request, cancel).await.unwrap_err();

        assert_eq!(err.kind(), FailureKind::Generic);
        assert_eq!(err.message(), "transfer cancelled");
    }
}
