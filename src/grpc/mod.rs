//! gRPC server module for the Doorman throttle service.

mod server;
mod service;

pub use server::GrpcServer;
pub use service::DoormanServiceImpl;

// Include the generated protobuf code
pub mod proto {
    pub mod doorman {
        pub mod v1 {
            tonic::include_proto!("doorman.v1");
        }
    }
}

// Re-export commonly used types
pub use proto::doorman::v1::{
    doorman_service_server::DoormanServiceServer, CheckRequest, CheckResponse, InfoRequest,
    InfoResponse, ResetRequest, ResetResponse,
};
