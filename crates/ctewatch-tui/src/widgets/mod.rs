pub mod bar;
pub mod ring;
pub mod series;
