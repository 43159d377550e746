pub mod columns;
pub mod dataset;
pub mod filter;
pub mod views;
