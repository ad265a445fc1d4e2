pub mod refresh_token;
pub mod token;
pub mod token_cache;
