//! HTTPクッキー関連の実装（属性・エントリ状態・ヘッダー行生成）

use chrono::{DateTime, Utc};

use super::utils::{is_header_value_valid, percent_encode};

/// 削除クッキーに付与する固定の失効日時（エポックゼロ）
pub const EPOCH_EXPIRES: &str = "Thu, 01-Jan-1970 00:00:00 GMT";

/// Set-Cookieの失効日時フォーマット（Netscape形式）
const EXPIRES_FORMAT: &str = "%a, %d-%b-%Y %H:%M:%S GMT";

/// クッキーの属性オプション
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CookieOptions {
    pub domain: Option<String>,
    pub path: Option<String>,
    pub secure: bool,
    pub expires: Option<DateTime<Utc>>,
}

impl CookieOptions {
    /// 新しいオプション（全属性なし）を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// ドメインを設定
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// パスを設定
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// セキュアフラグを設定
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// 有効期限を設定
    pub fn with_expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }
}

/// `CookieJar::set`に渡す値
///
/// スカラー値と属性付きの値をタグ付きで区別する。実行時の形状判定は行わない。
#[derive(Debug, Clone)]
pub enum CookieValue {
    /// 値のみ（属性はデフォルト）
    Scalar(String),
    /// 値と属性
    WithOptions(String, CookieOptions),
}

impl From<&str> for CookieValue {
    fn from(value: &str) -> Self {
        CookieValue::Scalar(value.to_string())
    }
}

impl From<String> for CookieValue {
    fn from(value: String) -> Self {
        CookieValue::Scalar(value)
    }
}

impl From<(&str, CookieOptions)> for CookieValue {
    fn from((value, options): (&str, CookieOptions)) -> Self {
        CookieValue::WithOptions(value.to_string(), options)
    }
}

impl From<(String, CookieOptions)> for CookieValue {
    fn from((value, options): (String, CookieOptions)) -> Self {
        CookieValue::WithOptions(value, options)
    }
}

/// エントリのライフサイクル状態
///
/// `Unread`は`entries`への不在として暗黙に表現されるため、ここには現れない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// 読み取りのみ（レスポンスには出力しない）
    ReadOnly,
    /// 値または属性が設定された
    Written,
    /// 明示的に削除された
    Deleted,
}

/// ジャーが把握している1つのクッキー名の状態
#[derive(Debug, Clone)]
pub struct CookieEntry {
    value: String,
    options: CookieOptions,
    state: EntryState,
}

impl CookieEntry {
    /// 受信値を読み取っただけのエントリを作成
    pub(crate) fn read_only(value: String) -> Self {
        Self {
            value,
            options: CookieOptions::default(),
            state: EntryState::ReadOnly,
        }
    }

    /// 書き込み済みエントリを作成
    pub(crate) fn written(value: String, options: CookieOptions) -> Self {
        Self {
            value,
            options,
            state: EntryState::Written,
        }
    }

    /// 削除済みエントリを作成
    pub(crate) fn deleted() -> Self {
        Self {
            value: String::new(),
            options: CookieOptions::default(),
            state: EntryState::Deleted,
        }
    }

    /// 値と属性を全置換して書き込み済みにする（削除済みからも復活する）
    pub(crate) fn write(&mut self, value: String, options: CookieOptions) {
        self.value = value;
        self.options = options;
        self.state = EntryState::Written;
    }

    /// 削除済みにする。値と属性はクリアされる
    pub(crate) fn mark_deleted(&mut self) {
        self.value.clear();
        self.options = CookieOptions::default();
        self.state = EntryState::Deleted;
    }

    /// 現在の値を取得
    pub fn value(&self) -> &str {
        &self.value
    }

    /// 現在の状態を取得
    pub fn state(&self) -> EntryState {
        self.state
    }

    /// Set-Cookieヘッダー1行を生成
    ///
    /// 読み取りのみのエントリは出力なし。削除済みはエポックゼロの失効行になる
    /// （呼び出し側が指定した属性は無視される）。
    pub(crate) fn to_header_line(&self, name: &str) -> Option<String> {
        match self.state {
            EntryState::ReadOnly => None,
            EntryState::Deleted => Some(format!("{}=deleted; expires={}", name, EPOCH_EXPIRES)),
            EntryState::Written => {
                let mut line = format!("{}={}", name, percent_encode(&self.value));

                if let Some(domain) = &self.options.domain {
                    if is_header_value_valid(domain) {
                        line.push_str(&format!("; domain={}", domain));
                    } else {
                        log::warn!("Skipped invalid domain attribute: {:?}", domain);
                    }
                }

                if let Some(path) = &self.options.path {
                    if is_header_value_valid(path) {
                        line.push_str(&format!("; path={}", path));
                    } else {
                        log::warn!("Skipped invalid path attribute: {:?}", path);
                    }
                }

                if self.options.secure {
                    line.push_str("; secure");
                }

                if let Some(expires) = &self.options.expires {
                    line.push_str(&format!("; expires={}", expires.format(EXPIRES_FORMAT)));
                }

                Some(line)
            }
        }
    }
}
