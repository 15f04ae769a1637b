mod model_router;
mod openai_client;

pub use model_router::ModelRouter;
pub use openai_client::{ModelEndpoint, OpenAiChatClient};
