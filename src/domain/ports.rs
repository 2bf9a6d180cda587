use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::entities::BearerCredential;
use crate::domain::errors::SheetsError;

// Raw cell grid as returned by the range-read API.
pub type Grid = Vec<Vec<String>>;

// How a spreadsheet call is authorized.
#[derive(Clone, Copy, Debug)]
pub enum Access<'a> {
    // Read-only API key from configuration.
    ApiKey,
    Bearer(&'a BearerCredential),
}

// One entry of a batch update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeUpdate {
    pub range: String,
    pub values: Grid,
}

// Port for the external spreadsheet used by the repositories.
#[async_trait]
pub trait SheetsGateway: Send + Sync {
    async fn read_range(&self, range: &str, access: Access<'_>) -> Result<Grid, SheetsError>;
    async fn write_range(
        &self,
        range: &str,
        values: Grid,
        access: Access<'_>,
    ) -> Result<(), SheetsError>;
    async fn batch_write(
        &self,
        updates: Vec<RangeUpdate>,
        access: Access<'_>,
    ) -> Result<(), SheetsError>;
}

// Port for minting write credentials. Implementations must not cache.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn acquire_write_credential(&self) -> Result<BearerCredential, SheetsError>;
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_epoch_seconds(&self) -> u64;
}

// Shared handles held in the app state forward to the inner implementation.
#[async_trait]
impl<T: SheetsGateway + ?Sized> SheetsGateway for Arc<T> {
    async fn read_range(&self, range: &str, access: Access<'_>) -> Result<Grid, SheetsError> {
        (**self).read_range(range, access).await
    }

    async fn write_range(
        &self,
        range: &str,
        values: Grid,
        access: Access<'_>,
    ) -> Result<(), SheetsError> {
        (**self).write_range(range, values, access).await
    }

    async fn batch_write(
        &self,
        updates: Vec<RangeUpdate>,
        access: Access<'_>,
    ) -> Result<(), SheetsError> {
        (**self).batch_write(updates, access).await
    }
}

#[async_trait]
impl<T: CredentialProvider + ?Sized> CredentialProvider for Arc<T> {
    async fn acquire_write_credential(&self) -> Result<BearerCredential, SheetsError> {
        (**self).acquire_write_credential().await
    }
}
