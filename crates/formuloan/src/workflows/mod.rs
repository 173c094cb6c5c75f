pub mod prequal;
