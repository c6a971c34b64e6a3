pub mod app;
pub mod braille;
pub mod charts;
pub mod data;
pub mod map;
pub mod search;
pub mod ui;
