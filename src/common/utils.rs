//! 共通ユーティリティ関数群（URLエンコード/デコード、Cookieヘッダー解析 等）

use crate::error::Error;

/// URLエンコーディングのデコード関数
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(h), Some(l)) = (from_hex(bytes[i + 1]), from_hex(bytes[i + 2])) {
                result.push(h * 16 + l);
                i += 3;
                continue;
            }
        } else if bytes[i] == b'+' {
            result.push(b' ');
            i += 1;
            continue;
        }
        result.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&result).into_owned()
}

/// フォーム形式のURLエンコード関数（スペースは `+` に変換される）
pub fn percent_encode(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    for &byte in input.as_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'*' | b'~' => {
                result.push(byte as char)
            }
            b' ' => result.push('+'),
            _ => {
                result.push('%');
                result.push(to_hex(byte >> 4));
                result.push(to_hex(byte & 0x0F));
            }
        }
    }
    result
}

/// 16進数文字をバイト値に変換するヘルパー関数
fn from_hex(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// 下位4bitの値を16進数文字に変換するヘルパー関数
fn to_hex(nibble: u8) -> char {
    match nibble {
        0..=9 => (b'0' + nibble) as char,
        _ => (b'A' + nibble - 10) as char,
    }
}

/// Cookieリクエストヘッダーを名前と値のペア列にパースする
///
/// 値はURLデコードされる。不正なセグメント（`=`なし・空の名前）はスキップし、
/// エラーにはしない。同名のセグメントは最初の出現が優先される。
pub fn parse_cookie_header(header: &str) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();

    for segment in header.split(';') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let mut parts = segment.splitn(2, '=');
        let name = parts.next().unwrap_or("").trim();
        let value = match parts.next() {
            Some(value) => value,
            None => {
                log::debug!("Skipping cookie segment without '=': {:?}", segment);
                continue;
            }
        };
        if name.is_empty() {
            log::debug!("Skipping cookie segment with empty name: {:?}", segment);
            continue;
        }
        if pairs.iter().any(|(existing, _)| existing == name) {
            continue;
        }
        pairs.push((name.to_string(), percent_decode(value)));
    }

    pairs
}

/// ヘッダー値に使用可能な文字かを判定（CRLF・制御文字を拒否）
pub fn is_header_value_valid(value: &str) -> bool {
    // RFC的にはobs-text等もありうるが、ここでは保守的に
    // 制御文字(0x00-0x1F, 0x7F)およびCR/LFを拒否する
    if value.is_empty() {
        return true; // 空は許容（ヘッダー仕様上も可）
    }
    value.chars().all(|c| {
        let code = c as u32;
        code >= 0x20 && code != 0x7F && c != '\r' && c != '\n'
    })
}

/// Cookie名が安全なトークンか（RFC6265準拠の簡易版）
pub fn is_cookie_name_valid(name: &str) -> bool {
    if name.is_empty() { return false; }
    // tokenと同等: 制御/空白とセパレータを除外
    const FORBIDDEN: &[char] = &['(',')','<','>','@',',',';',':','\\','"','/','[',']','?','{','}',' ','\t','\r','\n'];
    name.chars().all(|c| c.is_ascii() && !c.is_ascii_control() && !FORBIDDEN.contains(&c))
}

/// ヘルパー: 無効なCookie名ならErrorを返す
pub fn validate_cookie_name(name: &str) -> Result<(), Error> {
    if is_cookie_name_valid(name) {
        Ok(())
    } else {
        Err(Error::InvalidCookie("cookie name contains invalid characters".into()))
    }
}
