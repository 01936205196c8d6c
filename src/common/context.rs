//! リクエストコンテキストの実装
//!
//! ハンドラーとフィルタが1リクエストの間だけ共有する型付きの状態。
//! リクエスト開始時に空で構築され、リクエスト終了とともに破棄されるため、
//! リクエストをまたいで状態が残ることはない。

use std::any::Any;
use std::collections::HashMap;

/// リクエストごとの型付きメタデータストア
#[derive(Debug, Default)]
pub struct RequestContext {
    metadata: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl RequestContext {
    /// 新しい空のRequestContextを作成
    pub fn new() -> Self {
        Self {
            metadata: HashMap::new(),
        }
    }

    /// 値を設定
    pub fn set<T: Send + Sync + 'static>(&mut self, key: &str, value: T) {
        self.metadata.insert(key.to_string(), Box::new(value));
    }

    /// 値を取得
    pub fn get<T: 'static>(&self, key: &str) -> Option<&T> {
        self.metadata
            .get(key)
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }

    /// 値を削除して返却
    pub fn remove<T: 'static>(&mut self, key: &str) -> Option<T> {
        self.metadata
            .remove(key)
            .and_then(|boxed| boxed.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    /// 指定されたキーが存在するかチェック
    pub fn contains_key(&self, key: &str) -> bool {
        self.metadata.contains_key(key)
    }

    /// コンテキストをクリア
    pub fn clear(&mut self) {
        self.metadata.clear();
    }

    /// コンテキストが空かどうか
    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }
}

impl Clone for RequestContext {
    fn clone(&self) -> Self {
        // Anyトレイトはcloneをサポートしていないため、新しい空のコンテキストを作成
        // （リクエスト限りの状態なので、複製先に持ち越さない）
        Self::new()
    }
}
