pub mod items_service;
pub mod normalizer;
pub mod query_builder;

pub use items_service::ItemsService;
pub use normalizer::Normalizer;
pub use query_builder::QueryBuilder;
