pub mod bucket_repo;
pub mod id_source;
pub mod kv_store;

pub use bucket_repo::{BucketRepository, RecordId};
pub use id_source::IdSource;
pub use kv_store::KvStore;
