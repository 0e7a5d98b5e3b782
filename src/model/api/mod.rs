//! Wire types for the VoteXpert REST API.
//!
//! Request bodies serialise to exactly what the server expects; response
//! bodies keep only the fields the client acts upon. The `success` flag is
//! checked during response normalisation and never reaches these types.

pub mod admin;
pub mod auth;
pub mod voting;
