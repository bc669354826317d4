mod server;
mod validation_rule;

pub use server::Server;
pub use validation_rule::ValidationRule;
