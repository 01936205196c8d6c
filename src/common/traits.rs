//! コアトレイト定義（Handler、Filter）

use async_trait::async_trait;

use crate::error::Error;

use super::http::{Request, Response};

/// ハンドラーの特性
#[async_trait]
pub trait Handler: Send + Sync {
    /// リクエストを処理
    async fn handle(&self, req: &mut Request) -> Result<Response, Error>;
}

/// リクエスト前後のフィルタの特性
///
/// 前後どちらの処理でもリクエストのクッキージャーとコンテキストを読み書きできる。
#[async_trait]
pub trait Filter: Send + Sync {
    /// リクエスト前の処理
    async fn before(&self, _req: &mut Request) -> Result<(), Error> {
        Ok(())
    }

    /// レスポンス後の処理
    async fn after(&self, _req: &mut Request, _res: &mut Response) -> Result<(), Error> {
        Ok(())
    }
}

/// 関数からハンドラーを作成するアダプタ
pub struct FnHandler<F>
where
    F: Fn(&mut Request) -> Result<Response, Error> + Send + Sync,
{
    handler_fn: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&mut Request) -> Result<Response, Error> + Send + Sync,
{
    /// 新しいFnHandlerを作成
    pub fn new(handler_fn: F) -> Self {
        Self { handler_fn }
    }
}

#[async_trait]
impl<F> Handler for FnHandler<F>
where
    F: Fn(&mut Request) -> Result<Response, Error> + Send + Sync,
{
    async fn handle(&self, req: &mut Request) -> Result<Response, Error> {
        (self.handler_fn)(req)
    }
}
