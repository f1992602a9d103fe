pub mod auth;
pub mod kpis;
pub mod records;
pub mod render;
pub mod review;
pub mod utils;
