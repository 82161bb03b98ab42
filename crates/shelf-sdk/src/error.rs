use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("store error: {0}")]
    Store(#[from] shelf_store::StoreError),

    #[error("persist error: {0}")]
    Persist(#[from] shelf_persist::PersistError),
}

pub type SdkResult<T> = Result<T, SdkError>;
