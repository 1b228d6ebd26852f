use std::{future::Future, pin::Pin};

mod controller_router;
mod options;

use axum::Router;
pub use controller_router::{ControllerRouter, forward_errors};
pub use options::{ServerOptions, ServerOptionsFromEnvError};

/// A server builder.
pub struct ServerBuilder {
    /// The TCP listener that the server is using.
    listener: tokio::net::TcpListener,

    /// The graceful shutdown signal.
    graceful_shutdown: Option<Pin<Box<dyn Future<Output = ()> + Send>>>,
}

/// A running book catalogue server.
pub struct Server {
    /// The TCP listener that the server is using.
    listener: tokio::net::TcpListener,

    /// The graceful shutdown signal.
    graceful_shutdown: Option<Pin<Box<dyn Future<Output = ()> + Send>>>,
}

/// An error that can occur when trying to serve the application.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    /// An error occurred while trying to serve the application.
    #[error("failed to serve the application: {0}")]
    Io(#[from] std::io::Error),

    /// An error occurred while trying to get the local address of the listener.
    #[error("failed to get the local address of the listener: {0}")]
    LocalAddr(std::io::Error),
}

impl ServerBuilder {
    /// Set the graceful shutdown signal.
    pub fn with_graceful_shutdown(
        mut self,
        signal: impl Future<Output = ()> + Send + 'static,
    ) -> Self {
        self.graceful_shutdown = Some(Box::pin(signal));
        self
    }

    /// Set the graceful shutdown signal to `ctrl-c`.
    pub fn with_ctrl_c_graceful_shutdown(self) -> Self {
        self.with_graceful_shutdown(async move {
            tracing::info!("Listening for `ctrl-c` signal for graceful shutdown...");

            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to register for `ctrl-c` signal: {err}");
            }

            tracing::info!("Received `ctrl-c` signal, shutting down gracefully.");
        })
    }

    /// Build the server.
    pub fn build(self) -> Server {
        Server {
            listener: self.listener,
            graceful_shutdown: self.graceful_shutdown,
        }
    }
}

impl Server {
    /// Get a builder for the server.
    pub fn builder(listener: tokio::net::TcpListener) -> ServerBuilder {
        ServerBuilder {
            listener,
            graceful_shutdown: None,
        }
    }

    /// Bind a TCP listener on the given address and get a builder for the server.
    pub async fn bind(addr: impl tokio::net::ToSocketAddrs) -> Result<ServerBuilder, ServeError> {
        let listener = tokio::net::TcpListener::bind(addr).await?;

        Ok(Self::builder(listener))
    }

    /// Serve the specified controller.
    pub async fn serve<C>(self, controller: C) -> Result<(), ServeError>
    where
        C: super::Controller + 'static,
    {
        self.serve_with_router(ControllerRouter::new(controller))
            .await
    }

    /// Serve the specified controller router.
    pub async fn serve_with_router(self, router: ControllerRouter) -> Result<(), ServeError> {
        let local_addr = self.listener.local_addr().map_err(ServeError::LocalAddr)?;

        tracing::info!("Book catalogue now serving at `http://{local_addr}`...");

        let router: Router = router.into();
        let serve = axum::serve(self.listener, router);

        match self.graceful_shutdown {
            Some(signal) => serve.with_graceful_shutdown(signal).await,
            None => serve.await,
        }
        .map_err(Into::into)
    }
}
