//! Protocol data model: request envelopes, result envelopes, local errors

#![allow(dead_code)]

mod error;
mod redactor;
mod request;
mod response;

pub use error::*;
pub use redactor::*;
pub use request::*;
pub use response::*;
