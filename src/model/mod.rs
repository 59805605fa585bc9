pub mod attendance;
pub mod excuse_request;
pub mod leave_request;
pub mod student;
