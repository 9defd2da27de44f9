use axum::{Extension, Json};
use quill_core::{AuthScheme, ClientId, RequestContext, UserId};
use serde::{Deserialize, Serialize};

/// The identity the request was authenticated as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    pub request_id: String,
    pub user_id: UserId,
    pub scheme: AuthScheme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<ClientId>,
}

pub async fn whoami_handler(Extension(context): Extension<RequestContext>) -> Json<WhoAmIResponse> {
    let identity = context.identity();
    Json(WhoAmIResponse {
        request_id: context.request_id().to_string(),
        user_id: identity.principal().user_id,
        scheme: identity.scheme(),
        client_id: identity.client_id(),
    })
}
