//! 共通の抽象化レイヤー（HTTP型・クッキージャー・コンテキスト・トレイト）

pub mod context;
pub mod cookie;
pub mod http;
pub mod jar;
pub mod traits;
pub mod utils;

pub use context::RequestContext;
pub use cookie::{CookieEntry, CookieOptions, CookieValue, EntryState, EPOCH_EXPIRES};
pub use http::{Method, Request, Response};
pub use jar::CookieJar;
pub use traits::{Filter, FnHandler, Handler};
pub use utils::{parse_cookie_header, percent_decode, percent_encode};
