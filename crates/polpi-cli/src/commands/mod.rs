pub mod investment;
pub mod mortgage;
