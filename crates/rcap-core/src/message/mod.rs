pub mod model;

pub use model::{Message, MessageFilters, NewMessage, Recipient, Reply, Sender};
