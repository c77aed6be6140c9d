pub mod income;
pub mod sales;
