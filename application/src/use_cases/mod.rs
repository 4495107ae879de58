//! Use cases - application workflows built on domain logic and ports.

pub mod verify_response;

pub use verify_response::{VerifyResponseError, VerifyResponseUseCase};
