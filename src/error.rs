//! エラー型の定義

use thiserror::Error;

/// アプリケーションのエラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 無効なCookie名（ハンドラー側の契約違反）
    #[error("Invalid cookie: {0}")]
    InvalidCookie(String),

    /// 無効なリクエストボディ
    #[error("Invalid request body: {0}")]
    InvalidRequestBody(String),

    /// レスポンスのシリアライズエラー
    #[error("Failed to serialize response: {0}")]
    ResponseSerializationError(String),

    /// フィルタエラー
    #[error("Filter error: {0}")]
    FilterError(String),

    /// 設定エラー
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// 内部サーバーエラー
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl Error {
    /// エラーからHTTPステータスコードを取得
    pub fn status_code(&self) -> u16 {
        match self {
            Error::InvalidCookie(_) => 500,
            Error::InvalidRequestBody(_) => 400,
            Error::ResponseSerializationError(_) => 500,
            Error::FilterError(_) => 500,
            Error::ConfigurationError(_) => 500,
            Error::InternalServerError(_) => 500,
        }
    }
}
