pub mod map;
pub mod panels;
pub mod plot;
pub mod table;
