use crate::domain::model::{Buyer, CallOrder, NewCallOrder};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn auth_token(&self) -> Option<&str>;
    fn request_timeout(&self) -> Duration;
    fn page_size(&self) -> usize;
    fn filter_debounce(&self) -> Duration;
    fn breadcrumb_max_items(&self) -> usize;
    fn toast_capacity(&self) -> usize;
    fn export_dir(&self) -> &str;
}

/// What the call-order wizard needs from the backend.
#[async_trait]
pub trait CallOrderBackend: Send + Sync {
    async fn search_buyers(&self, query: &str) -> Result<Vec<Buyer>>;
    async fn submit_call_order(&self, order: &NewCallOrder) -> Result<CallOrder>;
}
