pub mod download;
pub mod file_service;
pub mod upload;

pub use download::RetrievalMerger;
pub use file_service::FileService;
pub use upload::{ChunkFailure, UploadCoordinator, UploadReport};
