use std::future::Future;

use axum::Router;
use axum::response::IntoResponse;
use tracing::debug;

use crate::Controller;
use crate::error::AppError;
use crate::route::Route;

/// A router that is associated to a controller.
///
/// Every request is resolved into the controller's route type and handed to the controller:
/// the route type is the only place where paths are registered.
#[derive(Debug, Clone, Default)]
pub struct ControllerRouter(Router);

impl ControllerRouter {
    /// Create a new controller router from a controller.
    pub fn new<C>(controller: C) -> Self
    where
        C: Controller + 'static,
    {
        let router = Router::new()
            .fallback(
                |axum::extract::State(controller): axum::extract::State<C>,
                 route: C::Route| async move {
                    debug!("Handling {} {route}.", route.method());

                    forward_errors(controller.handle_request(route)).await
                },
            )
            .with_state(controller);

        Self(router)
    }
}

/// Await a handler and turn its failure, if any, into the error page.
pub async fn forward_errors<F>(handler: F) -> axum::response::Response
where
    F: Future<Output = Result<axum::response::Response, AppError>>,
{
    match handler.await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

impl From<ControllerRouter> for Router {
    fn from(controller_router: ControllerRouter) -> Self {
        controller_router.0
    }
}
