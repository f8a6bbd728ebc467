pub mod history;
pub mod instrument;
pub mod raw_bar;
