pub mod response;
pub mod session;

pub use response::{ApiResponse, ApiResult, Deleted};
pub use session::{require_admin_api, require_admin_page};
