//! HTTP関連の基本型（メソッド・リクエスト・レスポンス）

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

use super::context::RequestContext;
use super::jar::CookieJar;
use super::utils::is_header_value_valid;

/// HTTPメソッド
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Method {
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    HEAD,
    OPTIONS,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::GET => write!(f, "GET"),
            Method::POST => write!(f, "POST"),
            Method::PUT => write!(f, "PUT"),
            Method::DELETE => write!(f, "DELETE"),
            Method::PATCH => write!(f, "PATCH"),
            Method::HEAD => write!(f, "HEAD"),
            Method::OPTIONS => write!(f, "OPTIONS"),
        }
    }
}

impl Method {
    /// 文字列からMethodに変換
    pub fn from_str(method: &str) -> Option<Self> {
        match method.to_uppercase().as_str() {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "PATCH" => Some(Method::PATCH),
            "HEAD" => Some(Method::HEAD),
            "OPTIONS" => Some(Method::OPTIONS),
            _ => None,
        }
    }
}

/// HTTPリクエスト
///
/// 構築時に`cookie`ヘッダーからクッキージャーが作られ、リクエストの間
/// ハンドラーとフィルタに共有される。
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTPメソッド
    pub method: Method,
    /// リクエストパス
    pub path: String,
    /// HTTPヘッダー（キーは小文字で保持）
    headers: HashMap<String, String>,
    /// リクエストボディ
    pub body: Option<Vec<u8>>,
    /// リクエストコンテキスト
    context: RequestContext,
    /// リクエストスコープのクッキージャー
    cookies: CookieJar,
}

impl Request {
    /// 新しいリクエストを作成
    pub fn new(method: Method, path: String) -> Self {
        Self {
            method,
            path,
            headers: HashMap::new(),
            body: None,
            context: RequestContext::new(),
            cookies: CookieJar::new(),
        }
    }

    /// ヘッダーを追加（キーは小文字化、CRLF等の不正値は拒否）
    ///
    /// `cookie`ヘッダーを設定するとクッキージャーが作り直される。
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into().to_lowercase();
        let value = value.into();
        if !is_header_value_valid(&value) {
            log::warn!("Rejected invalid header value for {:?}", key);
            return self;
        }
        if key == "cookie" {
            self.cookies = CookieJar::from_header(&value);
        }
        self.headers.insert(key, value);
        self
    }

    /// ヘッダー値を取得（キーは大文字小文字を区別しない）
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(&key.to_lowercase()).map(String::as_str)
    }

    /// ボディを追加
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// ボディをJSONとしてパース
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> Result<T, Error> {
        if let Some(body) = &self.body {
            serde_json::from_slice(body).map_err(|e| Error::InvalidRequestBody(e.to_string()))
        } else {
            Err(Error::InvalidRequestBody("No request body".to_string()))
        }
    }

    /// クッキージャーの不変参照を取得
    pub fn cookies(&self) -> &CookieJar {
        &self.cookies
    }

    /// クッキージャーの可変参照を取得
    pub fn cookies_mut(&mut self) -> &mut CookieJar {
        &mut self.cookies
    }

    /// リクエストコンテキストの不変参照を取得
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// リクエストコンテキストの可変参照を取得
    pub fn context_mut(&mut self) -> &mut RequestContext {
        &mut self.context
    }
}

/// HTTPレスポンス
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTPステータスコード
    pub status: u16,
    /// HTTPヘッダー
    pub headers: HashMap<String, String>,
    /// レスポンスボディ
    pub body: Option<Vec<u8>>,
}

impl Response {
    /// 新しいレスポンスを作成
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// 200 OKレスポンスを作成
    pub fn ok() -> Self {
        Self::new(200)
    }

    /// 204 No Contentレスポンスを作成
    pub fn no_content() -> Self {
        Self::new(204)
    }

    /// 400 Bad Requestレスポンスを作成
    pub fn bad_request() -> Self {
        Self::new(400)
    }

    /// 500 Internal Server Errorレスポンスを作成
    pub fn internal_server_error() -> Self {
        Self::new(500)
    }

    /// ヘッダーを追加（CRLF等の不正値は拒否）
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        if !is_header_value_valid(&value) {
            log::warn!("Rejected invalid header value for {:?}", key);
            return self;
        }
        self.headers.insert(key, value);
        self
    }

    /// ボディを追加
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// JSONをボディとして設定
    pub fn json<T: Serialize>(mut self, value: &T) -> Result<Self, Error> {
        let json = serde_json::to_vec(value)
            .map_err(|e| Error::ResponseSerializationError(e.to_string()))?;

        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        self.body = Some(json);
        Ok(self)
    }

    /// ジャーの正味の変更を`Set-Cookie`ヘッダーとして添付する
    ///
    /// 複数行は改行連結の単一ヘッダー値として保持される。変更がなければ
    /// ヘッダーは付与されない。
    pub fn with_cookies(mut self, jar: &CookieJar) -> Self {
        if let Some(value) = jar.to_header_value() {
            self.headers.insert("Set-Cookie".to_string(), value);
        }
        self
    }

    /// Error型から固定メッセージのレスポンスを生成
    pub fn from_error(error: &Error) -> Self {
        let status = error.status_code();
        let message = match status {
            400 => "Bad Request",
            500 => "Internal Server Error",
            _ => "Error",
        };
        Response::new(status)
            .with_header("Content-Type", "text/plain")
            .with_body(message.as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[test]
    fn test_method_from_str() {
        assert_eq!(Method::from_str("GET"), Some(Method::GET));
        assert_eq!(Method::from_str("get"), Some(Method::GET));
        assert_eq!(Method::from_str("POST"), Some(Method::POST));
        assert_eq!(Method::from_str("INVALID"), None);
    }

    #[test]
    fn test_request_builder() {
        let req = Request::new(Method::GET, "/test".to_string())
            .with_header("Content-Type", "application/json")
            .with_body(b"test body".to_vec());

        assert_eq!(req.method, Method::GET);
        assert_eq!(req.path, "/test");
        // Requestヘッダーは小文字キーで保持される
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert_eq!(req.body.as_ref().unwrap(), &b"test body".to_vec());
    }

    #[test]
    fn test_request_builds_cookie_jar_from_header() {
        let mut req = Request::new(Method::GET, "/".to_string())
            .with_header("Cookie", "session=abc123; user_id=456");

        assert_eq!(req.cookies_mut().get("session"), "abc123");
        assert_eq!(req.cookies_mut().get("user_id"), "456");
    }

    #[test]
    fn test_request_without_cookie_header_has_empty_jar() {
        let mut req = Request::new(Method::GET, "/".to_string());
        assert_eq!(req.cookies_mut().get("anything"), "");
    }

    #[test]
    fn test_header_value_validation_rejects_crlf() {
        let req = Request::new(Method::GET, "/".to_string())
            .with_header("X-Test", "ok-value")
            .with_header("X-Bad", "bad\r\ninjected: 1");
        assert_eq!(req.header("x-test"), Some("ok-value"));
        assert!(req.header("x-bad").is_none());

        let res = Response::ok()
            .with_header("X-Good", "value")
            .with_header("X-Evil", "evil\nvalue");
        assert_eq!(res.headers.get("X-Good"), Some(&"value".to_string()));
        assert!(res.headers.get("X-Evil").is_none());
    }

    #[test]
    fn test_with_cookies_attaches_header() {
        let mut jar = CookieJar::new();
        jar.set("flavor", "sugar").unwrap();

        let res = Response::ok().with_cookies(&jar);
        assert_eq!(res.headers.get("Set-Cookie"), Some(&"flavor=sugar".to_string()));
    }

    #[test]
    fn test_with_cookies_skips_header_when_no_changes() {
        let mut jar = CookieJar::from_header("only=read");
        let _ = jar.get("only");

        let res = Response::ok().with_cookies(&jar);
        assert!(res.headers.get("Set-Cookie").is_none());
    }

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[test]
    fn test_response_json() {
        let test_data = TestData {
            name: "test".to_string(),
            value: 42,
        };

        let res = Response::ok().json(&test_data).unwrap();

        assert_eq!(res.status, 200);
        assert_eq!(res.headers.get("Content-Type"), Some(&"application/json".to_string()));

        // ボディをJSONとしてデコード
        let body_str = String::from_utf8(res.body.unwrap()).unwrap();
        let decoded: TestData = serde_json::from_str(&body_str).unwrap();

        assert_eq!(decoded, test_data);
    }

    #[test]
    fn test_request_json() {
        let test_data = TestData {
            name: "test".to_string(),
            value: 42,
        };

        let json_bytes = serde_json::to_vec(&test_data).unwrap();
        let req = Request::new(Method::POST, "/test".to_string())
            .with_header("Content-Type", "application/json")
            .with_body(json_bytes);

        let parsed: TestData = req.json().unwrap();
        assert_eq!(parsed, test_data);
    }

    #[test]
    fn test_from_error() {
        let err = Error::InvalidRequestBody("broken".to_string());
        let res = Response::from_error(&err);
        assert_eq!(res.status, 400);
        let body = String::from_utf8(res.body.unwrap()).unwrap();
        assert_eq!(body, "Bad Request");

        let err = Error::InternalServerError("boom".to_string());
        let res = Response::from_error(&err);
        assert_eq!(res.status, 500);
    }
}
