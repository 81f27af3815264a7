pub mod bridge;
pub mod client;
pub mod error;
pub mod message;

pub use bridge::TriggerBridge;
pub use client::QueueClient;
pub use error::{QueueError, Result};
pub use message::QueueMessage;
