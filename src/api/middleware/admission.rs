use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::state::GatewayState;
use crate::application::GatewayError;

/// Caps the number of `/ask` requests in flight. Beyond the cap a request
/// waits up to `admission_wait` for a slot and is otherwise rejected.
pub async fn admission_control(
    State(state): State<GatewayState>,
    request: Request,
    next: Next,
) -> Response {
    let semaphore = state.admission.clone();

    let permit = if state.admission_wait.is_zero() {
        semaphore.try_acquire_owned().ok()
    } else {
        tokio::time::timeout(state.admission_wait, semaphore.acquire_owned())
            .await
            .ok()
            .and_then(Result::ok)
    };

    match permit {
        Some(_permit) => next.run(request).await,
        None => {
            tracing::warn!(
                available = state.admission.available_permits(),
                "request rejected by admission control"
            );
            GatewayError::Overloaded.into_response()
        }
    }
}
