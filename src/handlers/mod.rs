pub mod context;
pub mod generate;
pub mod models;

pub use context::RequestContext;
pub use generate::handle_generate;
pub use models::handle_list_models;
