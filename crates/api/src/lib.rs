#![forbid(unsafe_code)]

mod client;
mod item;
mod response;

pub use client::ApiClient;
pub use item::{RawEntry, TrashItem};
pub use response::{AckResponse, ListResponse, PurgeOutcome, PurgeResponse};
