pub mod controller;
pub mod gateway;

pub use controller::{ChatController, ChatState, QuickAction, UserPrompter};
pub use gateway::{DocumentGateway, DocumentUpload, HttpGateway, TransportResult};
