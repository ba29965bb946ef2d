pub mod amortization;
pub mod assumptions;
pub mod formatting;
pub mod investment;
pub mod projection;
