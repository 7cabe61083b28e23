pub mod cursor;
pub mod nav;
