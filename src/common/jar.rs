//! リクエストスコープのクッキージャー実装
//!
//! 受信した`Cookie`ヘッダーを一度だけ解析し、1リクエスト中の読み書きを追跡して、
//! 正味の変更（設定・更新・削除）だけを`Set-Cookie`行として出力する。
//! ブラウザが送ってきた値を読んだだけのクッキーは決して再送しない。

use std::collections::HashMap;

use crate::error::Error;

use super::cookie::{CookieEntry, CookieOptions, CookieValue, EntryState};
use super::utils::{parse_cookie_header, validate_cookie_name};

/// リクエストごとのクッキー集合と保留中の変更
///
/// 1つの処理中リクエストが排他的に所有する。リクエスト開始時に構築され、
/// レスポンス確定時に一度だけ直列化されて破棄される。
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    /// 受信ヘッダーから解析した名前と値（解析後は不変）
    incoming: HashMap<String, String>,
    /// 受信ヘッダー内の出現順
    incoming_order: Vec<String>,
    /// 最初のアクセス以降に把握しているエントリ（不在 = Unread）
    entries: HashMap<String, CookieEntry>,
    /// エントリ生成順（出力順を安定させる）
    touch_order: Vec<String>,
}

impl CookieJar {
    /// 受信クッキーなしの空のジャーを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 受信した`Cookie`ヘッダーからジャーを構築
    ///
    /// 不正なセグメントはスキップされ、構築が失敗することはない。
    pub fn from_header(header: &str) -> Self {
        let mut incoming = HashMap::new();
        let mut incoming_order = Vec::new();
        for (name, value) in parse_cookie_header(header) {
            incoming_order.push(name.clone());
            incoming.insert(name, value);
        }
        Self {
            incoming,
            incoming_order,
            entries: HashMap::new(),
            touch_order: Vec::new(),
        }
    }

    /// 現在の値を取得
    ///
    /// 削除済みエントリと未知の名前は空文字列を返す。受信値の初回読み取りは
    /// `ReadOnly`エントリを作るが、未知の名前はエントリを作らない。
    pub fn get(&mut self, name: &str) -> String {
        if let Some(entry) = self.entries.get(name) {
            return match entry.state() {
                EntryState::Deleted => String::new(),
                _ => entry.value().to_string(),
            };
        }
        match self.incoming.get(name) {
            Some(value) => {
                let value = value.clone();
                self.insert_entry(name, CookieEntry::read_only(value.clone()));
                value
            }
            None => String::new(),
        }
    }

    /// 値を設定（スカラーまたは属性付き）
    ///
    /// 既存エントリは値と属性を全置換して`Written`になる。削除済みエントリも
    /// `Written`に復活する。無効なクッキー名はエラー。
    pub fn set(&mut self, name: &str, value: impl Into<CookieValue>) -> Result<(), Error> {
        validate_cookie_name(name)?;
        let (value, options) = match value.into() {
            CookieValue::Scalar(value) => (value, CookieOptions::default()),
            CookieValue::WithOptions(value, options) => (value, options),
        };
        match self.entries.get_mut(name) {
            Some(entry) => entry.write(value, options),
            None => self.insert_entry(name, CookieEntry::written(value, options)),
        }
        Ok(())
    }

    /// 名前を削除済みとして記録する
    ///
    /// 以降の`get`は同一リクエスト内では空文字列を返す。一度もアクセス
    /// していない名前でも削除行は出力される。
    pub fn delete(&mut self, name: &str) {
        match self.entries.get_mut(name) {
            Some(entry) => entry.mark_deleted(),
            None => self.insert_entry(name, CookieEntry::deleted()),
        }
    }

    /// 受信ヘッダーに含まれる全ての名前を現在の実効値とともに走査する
    ///
    /// 呼び出し時点のスナップショットを返すため、走査中に`set`や`delete`を
    /// 行っても安全（抜けも重複もない）。再呼び出しはその時点の変更を
    /// 反映した新しい列を返す。
    pub fn each(&self) -> std::vec::IntoIter<(String, String)> {
        self.incoming_order
            .iter()
            .map(|name| {
                let value = match self.entries.get(name) {
                    Some(entry) if entry.state() == EntryState::Deleted => String::new(),
                    Some(entry) => entry.value().to_string(),
                    None => self.incoming.get(name).cloned().unwrap_or_default(),
                };
                (name.clone(), value)
            })
            .collect::<Vec<_>>()
            .into_iter()
    }

    /// 正味の変更をSet-Cookieヘッダー行として出力する
    ///
    /// `Written`と`Deleted`のエントリだけが、最初にアクセスした順で出力される。
    pub fn render_headers(&self) -> Vec<String> {
        self.touch_order
            .iter()
            .filter_map(|name| {
                self.entries
                    .get(name)
                    .and_then(|entry| entry.to_header_line(name))
            })
            .collect()
    }

    /// 全ヘッダー行を改行で連結した単一のヘッダー値を返す
    ///
    /// 出力すべき変更がなければ`None`。
    pub fn to_header_value(&self) -> Option<String> {
        let lines = self.render_headers();
        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }

    fn insert_entry(&mut self, name: &str, entry: CookieEntry) {
        self.touch_order.push(name.to_string());
        self.entries.insert(name.to_string(), entry);
    }
}
