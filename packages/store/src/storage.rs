//! # Key-value storage seam
//!
//! [`StateStorage`] is the shape of device key-value storage: string keys,
//! string (JSON) values, async access. Every store is persisted through it by
//! [`crate::persist::Persisted`], so the same store logic runs against memory
//! ([`crate::MemoryStore`]) or the filesystem ([`crate::FileStore`]).

use crate::error::Result;

/// Async trait for reading and writing persisted state blobs.
pub trait StateStorage {
    fn get_item(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>>>;
    fn set_item(
        &self,
        key: &str,
        value: String,
    ) -> impl std::future::Future<Output = Result<()>>;
    fn remove_item(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<()>>;
}
