//! gRPC server implementation.

use std::net::SocketAddr;
use std::sync::Arc;
use tonic::transport::Server;
use tracing::{error, info};

use super::proto::doorman::v1::doorman_service_server::DoormanServiceServer;
use super::service::DoormanServiceImpl;
use crate::error::{DoormanError, Result};
use crate::throttle::{AttemptLimiter, ThrottleBackend, ThrottlePolicy};

/// gRPC server for the throttle service.
pub struct GrpcServer<B: ThrottleBackend + 'static> {
    /// Address to bind to
    addr: SocketAddr,
    /// The throttle backend
    backend: Arc<B>,
    /// Policy applied to every check
    policy: ThrottlePolicy,
}

impl GrpcServer<AttemptLimiter> {
    /// Create a new gRPC server backed by the in-memory limiter.
    pub fn new(addr: SocketAddr, limiter: Arc<AttemptLimiter>, policy: ThrottlePolicy) -> Self {
        Self {
            addr,
            backend: limiter,
            policy,
        }
    }
}

impl<B: ThrottleBackend + 'static> GrpcServer<B> {
    /// Create a gRPC server over any throttle backend.
    pub fn with_backend(addr: SocketAddr, backend: Arc<B>, policy: ThrottlePolicy) -> Self {
        Self {
            addr,
            backend,
            policy,
        }
    }

    /// Start the gRPC server.
    ///
    /// This method will block until the server is shut down.
    pub async fn serve(self) -> Result<()> {
        let service = DoormanServiceImpl::new(self.backend, self.policy);

        info!(
            addr = %self.addr,
            "Starting gRPC server for DoormanService"
        );

        Server::builder()
            .add_service(DoormanServiceServer::new(service))
            .serve(self.addr)
            .await
            .map_err(|e| {
                error!(error = %e, "gRPC server failed");
                DoormanError::Grpc(e)
            })
    }

    /// Start the gRPC server with graceful shutdown.
    ///
    /// The server will shut down when the provided signal resolves.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send,
    {
        let service = DoormanServiceImpl::new(self.backend, self.policy);

        info!(
            addr = %self.addr,
            "Starting gRPC server for DoormanService with graceful shutdown"
        );

        Server::builder()
            .add_service(DoormanServiceServer::new(service))
            .serve_with_shutdown(self.addr, signal)
            .await
            .map_err(|e| {
                error!(error = %e, "gRPC server failed");
                DoormanError::Grpc(e)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_creation() {
        let addr: SocketAddr = "127.0.0.1:8081".parse().unwrap();
        let limiter = Arc::new(AttemptLimiter::new());
        let _server = GrpcServer::new(addr, limiter, ThrottlePolicy::default());
    }
}
