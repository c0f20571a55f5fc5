//! Gateway route configuration.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use super::handlers;
use super::state::Gateway;
use crate::config::Config;
use crate::db::Database;

/// Register handlers that are generic over the Database trait.
macro_rules! routes {
    ($D:ty => {
        $($method:ident $path:expr => $($handler:ident)::+),* $(,)?
    }) => {{
        let router = Router::new();
        $(
            let router = router.route($path, $method($($handler)::+::<$D>));
        )*
        router
    }};
}

/// Build the gateway router: the SSE endpoint and the message endpoint.
pub fn create_router<D: Database + 'static>(gateway: Arc<Gateway<D>>, config: &Config) -> Router {
    routes!(D => {
        get config.sse_path.as_str() => handlers::connect,
        post config.messages_path.as_str() => handlers::post_message,
    })
    .fallback(handlers::not_found)
    .method_not_allowed_fallback(handlers::not_found)
    .with_state(gateway)
}
