pub mod client;
pub mod error;
pub mod parse;
pub mod types;

pub use client::PickupClient;
pub use error::FetchError;
pub use types::{PickupMessageResponse, PickupStore};
