//! Domain entities - objects carried by gateway and REST payloads

mod channel;
mod message;
mod user;

pub use channel::{Channel, ChannelType, Overwrite};
pub use message::{Message, MessageReference};
pub use user::User;
