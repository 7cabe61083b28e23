pub mod order;
pub mod statement;
