//! Guest chat: the widget's reply pipeline.

mod errors;
mod generate_response;

pub use errors::ChatError;
pub use generate_response::{
    ChatSettings, GenerateResponseCommand, GenerateResponseHandler, GenerateResponseResult,
};
