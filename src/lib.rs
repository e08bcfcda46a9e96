pub mod config;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod providers;
pub mod server;

pub use config::ServerConfig;
pub use error::{ApiError, FetchError, ModelError, StartupError};
pub use fetcher::{extract_visible_text, RequestFetcher};
pub use model::RecipeRequest;
pub use parser::{parse_reply, ParsedRecipe, RecipeReply, NO_RECIPE_FOUND};
pub use prompt::build_prompt;
pub use providers::{GoogleProvider, LlmProvider};
pub use server::{create_recipe, router, serve, AppState};
