//! 核心层：错误、响应、内容协商、中间件

pub mod error;
pub mod format;
pub mod middleware;
pub mod response;
