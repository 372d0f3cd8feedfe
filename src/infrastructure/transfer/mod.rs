//! Object store transfer infrastructure

mod gateway;
mod logger;
pub mod parts;
mod s3;

pub use gateway::{UploadGateway, UploadGatewayConfig, DEFAULT_CONCURRENCY, DEFAULT_PART_SIZE};
pub use logger::TracingTransferLogger;
pub use s3::{S3TransferClient, S3TransferConfig};
