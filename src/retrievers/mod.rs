pub mod client_credentials_retriever;
pub mod token_retriever;
