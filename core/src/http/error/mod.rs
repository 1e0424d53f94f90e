mod permission_error;

pub use permission_error::PermissionError;
