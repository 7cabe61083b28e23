pub mod clock;
pub mod pagination;
pub mod pointer;
pub mod value;
