use crate::{error::RegistrarResult, store::Storage};

#[derive(Clone, Debug)]
pub struct RegistrarState<S> {
    storage: S,
}

impl<S: Storage> RegistrarState<S> {
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// One session per request, released when dropped.
    pub async fn get_session(&self) -> RegistrarResult<S::Session> {
        self.storage.open_session().await
    }

    pub async fn sensible_shutdown(&self) {
        self.storage.close().await;
    }
}
