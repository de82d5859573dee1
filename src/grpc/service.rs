//! Throttle service implementation.

use std::sync::Arc;
use tonic::{Request, Response, Status};
use tracing::{debug, info, instrument, warn};

use super::proto::doorman::v1::{
    doorman_service_server::DoormanService, CheckRequest, CheckResponse, InfoRequest, InfoResponse,
    ResetRequest, ResetResponse,
};

use crate::throttle::{Decision, ThrottleBackend, ThrottlePolicy};

/// Implementation of the DoormanService gRPC interface.
pub struct DoormanServiceImpl<B: ThrottleBackend> {
    /// The throttle backend
    backend: Arc<B>,
    /// Policy applied to every check
    policy: ThrottlePolicy,
}

impl<B: ThrottleBackend> DoormanServiceImpl<B> {
    /// Create a new DoormanServiceImpl with the given backend and policy.
    pub fn new(backend: Arc<B>, policy: ThrottlePolicy) -> Self {
        Self { backend, policy }
    }
}

#[tonic::async_trait]
impl<B: ThrottleBackend + 'static> DoormanService for DoormanServiceImpl<B> {
    /// Decide whether a new attempt is currently permitted.
    ///
    /// A not-allowed outcome is a normal business result, not an error; the
    /// caller must treat it as terminal for the current request and surface
    /// `retry_after_seconds` to the end user.
    #[instrument(skip(self, request), fields(identifier = %request.get_ref().identifier))]
    async fn check(
        &self,
        request: Request<CheckRequest>,
    ) -> Result<Response<CheckResponse>, Status> {
        let req = request.into_inner();

        if req.identifier.is_empty() {
            warn!("Received check request with empty identifier");
            return Err(Status::invalid_argument("identifier is required"));
        }

        let decision = self.backend.check(&req.identifier, &self.policy).await;

        let response = match decision {
            Decision::Allowed => CheckResponse {
                allowed: true,
                retry_after_seconds: 0,
            },
            Decision::Blocked { retry_after_secs } => {
                info!(
                    identifier = %req.identifier,
                    retry_after_seconds = retry_after_secs,
                    "Attempt rejected"
                );
                CheckResponse {
                    allowed: false,
                    retry_after_seconds: retry_after_secs,
                }
            }
        };

        Ok(Response::new(response))
    }

    /// Discard all throttle state for an identifier.
    #[instrument(skip(self, request), fields(identifier = %request.get_ref().identifier))]
    async fn reset(
        &self,
        request: Request<ResetRequest>,
    ) -> Result<Response<ResetResponse>, Status> {
        let req = request.into_inner();

        if req.identifier.is_empty() {
            warn!("Received reset request with empty identifier");
            return Err(Status::invalid_argument("identifier is required"));
        }

        self.backend.reset(&req.identifier).await;
        debug!(identifier = %req.identifier, "Throttle state reset via gRPC");

        Ok(Response::new(ResetResponse {}))
    }

    /// Read-only diagnostic view of an identifier's throttle state.
    #[instrument(skip(self, request), fields(identifier = %request.get_ref().identifier))]
    async fn info(&self, request: Request<InfoRequest>) -> Result<Response<InfoResponse>, Status> {
        let req = request.into_inner();

        if req.identifier.is_empty() {
            warn!("Received info request with empty identifier");
            return Err(Status::invalid_argument("identifier is required"));
        }

        let info = self.backend.info(&req.identifier).await;

        Ok(Response::new(InfoResponse {
            attempts: info.attempts as u64,
            blocked_until_ms: info.blocked_until_ms.unwrap_or(0),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::throttle::AttemptLimiter;
    use std::time::Duration;

    fn test_service() -> DoormanServiceImpl<AttemptLimiter> {
        let policy =
            ThrottlePolicy::new(2, Duration::from_secs(60), Duration::from_secs(60)).unwrap();
        DoormanServiceImpl::new(Arc::new(AttemptLimiter::new()), policy)
    }

    #[tokio::test]
    async fn test_empty_identifier_rejected() {
        let service = test_service();

        let request = Request::new(CheckRequest {
            identifier: String::new(),
        });

        let result = service.check(request).await;
        assert_eq!(result.unwrap_err().code(), tonic::Code::InvalidArgument);
    }

    #[tokio::test]
    async fn test_check_allows_then_blocks() {
        let service = test_service();

        for _ in 0..2 {
            let request = Request::new(CheckRequest {
                identifier: "1.2.3.4".to_string(),
            });
            let response = service.check(request).await.unwrap().into_inner();
            assert!(response.allowed);
            assert_eq!(response.retry_after_seconds, 0);
        }

        let request = Request::new(CheckRequest {
            identifier: "1.2.3.4".to_string(),
        });
        let response = service.check(request).await.unwrap().into_inner();
        assert!(!response.allowed);
        assert_eq!(response.retry_after_seconds, 60);
    }

    #[tokio::test]
    async fn test_reset_unblocks() {
        let service = test_service();

        for _ in 0..3 {
            let request = Request::new(CheckRequest {
                identifier: "1.2.3.4".to_string(),
            });
            let _ = service.check(request).await.unwrap();
        }

        let request = Request::new(ResetRequest {
            identifier: "1.2.3.4".to_string(),
        });
        service.reset(request).await.unwrap();

        let request = Request::new(CheckRequest {
            identifier: "1.2.3.4".to_string(),
        });
        let response = service.check(request).await.unwrap().into_inner();
        assert!(response.allowed);
    }

    #[tokio::test]
    async fn test_info_reports_state() {
        let service = test_service();

        let request = Request::new(InfoRequest {
            identifier: "unseen".to_string(),
        });
        let response = service.info(request).await.unwrap().into_inner();
        assert_eq!(response.attempts, 0);
        assert_eq!(response.blocked_until_ms, 0);

        let request = Request::new(CheckRequest {
            identifier: "1.2.3.4".to_string(),
        });
        let _ = service.check(request).await.unwrap();

        let request = Request::new(InfoRequest {
            identifier: "1.2.3.4".to_string(),
        });
        let response = service.info(request).await.unwrap().into_inner();
        assert_eq!(response.attempts, 1);
        assert_eq!(response.blocked_until_ms, 0);
    }
}
