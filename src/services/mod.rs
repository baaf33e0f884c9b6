//! External collaborators: the identity provider and the object store.

pub mod oauth;
pub mod storage;

pub use oauth::{ExternalIdentity, GoogleOAuth, IdentityProvider, OAuthError};
pub use storage::{BlobStore, S3Storage, StorageError};
