//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use jsonrpsee::types::ErrorObjectOwned;
use mqueue_core::error::AppError;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const LIMIT_EXCEEDED: i32 = 4004;
    pub const DEADLINE_EXCEEDED: i32 = 4008;
    pub const CANCELLED: i32 = 4009;
    pub const INTERNAL_ERROR: i32 = 5000;
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    let code = match &err {
        AppError::Domain(_) => code::VALIDATION_ERROR,
        AppError::QueueNotFound(_) => code::NOT_FOUND,
        AppError::QueueLimitReached { .. } => code::LIMIT_EXCEEDED,
        AppError::DeadlineExceeded { .. } => code::DEADLINE_EXCEEDED,
        AppError::Cancelled(_) => code::CANCELLED,
        AppError::Config(_) | AppError::Internal(_) => code::INTERNAL_ERROR,
    };
    ErrorObjectOwned::owned(code, err.to_string(), None::<()>)
}
