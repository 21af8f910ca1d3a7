use anyhow::Result;
use async_trait::async_trait;

use crate::token_info::TokenInfo;

/// Source of the bearer token for a single Graph request.
#[async_trait(?Send)]
pub trait TokenRetriever {
    async fn retrieve(&self) -> Result<TokenInfo>;
}
