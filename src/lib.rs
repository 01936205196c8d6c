//! CookieBridge: リクエストスコープのクッキージャーとSet-Cookie差分出力
//!
//! 受信リクエストの`Cookie`ヘッダーを一度だけ解析し、ハンドラーとフィルタに
//! よる読み書きを追跡して、正味の変更（設定・更新・削除）だけを`Set-Cookie`
//! として出力するためのライブラリ。読んだだけのクッキーをブラウザに
//! 再送しないことを型と状態機械で保証する。

use log::error;

pub mod common;
pub mod error;

pub use common::*;
pub use error::*;

/// リクエスト処理パイプラインを構築するためのビルダー
pub struct PipelineBuilder {
    filters: Vec<Box<dyn common::Filter>>,
    handler: Option<Box<dyn common::Handler>>,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            handler: None,
        }
    }
}

impl PipelineBuilder {
    /// 新しいPipelineBuilderインスタンスを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// フィルタを追加（追加した順に適用される）
    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: common::Filter + 'static,
    {
        self.filters.push(Box::new(filter));
        self
    }

    /// ハンドラーを設定
    pub fn handler<H>(mut self, handler: H) -> Self
    where
        H: common::Handler + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    /// パイプラインをビルドして返却。ハンドラー未設定はエラー
    pub fn build(self) -> Result<Pipeline, Error> {
        let handler = self
            .handler
            .ok_or_else(|| Error::ConfigurationError("Pipeline requires a handler".to_string()))?;
        Ok(Pipeline {
            filters: self.filters,
            handler,
        })
    }
}

/// リクエストを処理するパイプライン
///
/// 前フィルタ → ハンドラー → 後フィルタの順に実行し、最後に一度だけ
/// クッキージャーの正味の変更をレスポンスに直列化する。
pub struct Pipeline {
    filters: Vec<Box<dyn common::Filter>>,
    handler: Box<dyn common::Handler>,
}

impl Pipeline {
    /// 新しいPipelineBuilderインスタンスを作成
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// リクエストを処理してレスポンスを返す
    ///
    /// エラーはエラーレスポンスに変換される。クッキーの直列化はエラー時も
    /// 含めて、リクエストにつき一度だけここで行われる。
    pub async fn dispatch(&self, mut req: Request) -> Response {
        let res = match self.run(&mut req).await {
            Ok(res) => res,
            Err(e) => {
                error!("Request failed: {}", e);
                Response::from_error(&e)
            }
        };
        res.with_cookies(req.cookies())
    }

    async fn run(&self, req: &mut Request) -> Result<Response, Error> {
        for filter in &self.filters {
            filter.before(req).await?;
        }
        let mut res = self.handler.handle(req).await?;
        for filter in &self.filters {
            filter.after(req, &mut res).await?;
        }
        Ok(res)
    }

    /// フィルタのリストを取得
    pub fn filters(&self) -> &[Box<dyn common::Filter>] {
        &self.filters
    }
}
