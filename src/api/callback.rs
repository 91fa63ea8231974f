use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, http::StatusCode};
use tokio::sync::{Mutex, oneshot};

use crate::warning;

/// Sender half of the one-shot channel the callback hands the code to.
///
/// Wrapped in an `Option` so only the first successful redirect is forwarded.
pub type CodeSender = Arc<Mutex<Option<oneshot::Sender<String>>>>;

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(sender): Extension<CodeSender>,
) -> (StatusCode, &'static str) {
    if let Some(error) = params.get("error") {
        warning!("Authorization was denied: {}", error);
        return (StatusCode::BAD_REQUEST, "Auth. failed");
    }

    let Some(code) = params.get("code").filter(|c| !c.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Missing authorization code");
    };

    if let Some(tx) = sender.lock().await.take() {
        // the receiver only goes away once the authorizer gave up waiting
        let _ = tx.send(code.clone());
    }

    (StatusCode::OK, "Auth. OK")
}
