mod token;
mod user;

pub use token::AuthTokens;
pub use user::{Admin, UserProfile, UserType, Voter};
