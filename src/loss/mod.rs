pub mod bce;
pub mod mse;
pub mod task_type;

pub use bce::BceLoss;
pub use mse::MseLoss;
pub use task_type::TaskType;
