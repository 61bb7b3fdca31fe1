// HTTP surface of the service: a small axum app over the generation
// pipeline and the publish/text-generation capabilities.

pub mod handlers;
pub mod routes;

use crate::generator::TemplateStore;
use crate::gitlab::GitLabClient;
use crate::llm::LlmClient;
use crate::{AppError, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

pub use routes::build_router;

/// Capabilities shared by every request handler, built once at startup and
/// injected through router state. Handlers never construct their own
/// clients, which keeps them swappable in tests.
pub struct AppState {
    pub llm: LlmClient,
    pub gitlab: GitLabClient,
    pub templates: TemplateStore,
}

impl AppState {
    pub fn new(llm: LlmClient, gitlab: GitLabClient, templates: TemplateStore) -> Self {
        AppState {
            llm,
            gitlab,
            templates,
        }
    }

    pub fn from_env() -> Self {
        AppState::new(
            LlmClient::from_env(),
            GitLabClient::from_env(),
            TemplateStore::from_env(),
        )
    }
}

/// Bind and run the backend until the process is stopped.
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    info!(
        llm_available = state.llm.is_available(),
        gitlab_available = state.gitlab.is_available(),
        templates = %state.templates.dir().display(),
        "starting testops-copilot backend"
    );

    let app = build_router(Arc::new(state));

    info!(%addr, "listening");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(|err| AppError::ServerError(err.to_string()))
}
