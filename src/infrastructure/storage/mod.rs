pub mod blob_store;
pub mod s3_blob_store;

pub use blob_store::BlobStore;
pub use s3_blob_store::S3BlobStore;
