use crate::routes::{agents, ai, auth, health};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(info(
    title = "agora-server",
    description = "Agora agent management and chat API",
    version = "0.1.0"
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(health::HealthApi::openapi());
    root.merge(agents::AgentsApi::openapi());
    root.merge(ai::AiApi::openapi());
    root.merge(auth::AuthApi::openapi());
    root
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn docs_cover_every_route_group() {
        let docs = get_docs();
        for path in ["/health", "/agents", "/agents/{id}/chat", "/ai/chat", "/auth/login"] {
            assert!(docs.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
