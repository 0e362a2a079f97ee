pub mod cost;
pub mod finding;
pub mod history;
pub mod lesion;
pub mod metrics;
pub mod request;
pub mod response;
pub mod settings;
pub mod token_count;
