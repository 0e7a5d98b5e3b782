pub mod api;
pub mod auth;
pub mod ballot;
pub mod election;
pub mod otp;
pub mod results;
pub mod statistics;
