//! authority の分解 (RFC 3986 Section 3.2)
//!
//! リクエストラインのパースが成功し authority (userinfo@host:port) が
//! 非空だった場合に、ホストとポートの部分文字列へ分解する。
//! 純粋関数であり、バッファや継続とは無関係。
//! 分解の失敗は呼び出し側で BAD_REQUEST として扱われる。

use core::fmt;

/// authority 分解エラー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostError {
    /// 不正なホスト
    InvalidHost,
    /// 不正なポート
    InvalidPort,
    /// 不正な userinfo
    InvalidUserinfo,
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::InvalidHost => write!(f, "invalid authority host"),
            HostError::InvalidPort => write!(f, "invalid authority port"),
            HostError::InvalidUserinfo => write!(f, "invalid authority userinfo"),
        }
    }
}

impl std::error::Error for HostError {}

/// 分解済み authority
///
/// 各フィールドは入力文字列の部分文字列を借用する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ServerParts<'a> {
    pub userinfo: Option<&'a str>,
    pub host: &'a str,
    pub port: Option<&'a str>,
}

/// authority をホストとポートへ分解する
///
/// `found_at` はスキャン中に `@` を検出したかどうか。true の場合は
/// 最後の `@` より前を userinfo として切り出す。
pub(crate) fn split_server(server: &str, found_at: bool) -> Result<ServerParts<'_>, HostError> {
    let (userinfo, rest) = if found_at {
        let (userinfo, rest) = server.rsplit_once('@').ok_or(HostError::InvalidUserinfo)?;
        if !is_valid_userinfo(userinfo) {
            return Err(HostError::InvalidUserinfo);
        }
        (Some(userinfo), rest)
    } else {
        (None, server)
    };

    let (host, port) = if rest.starts_with('[') {
        split_ipv6_host_port(rest)?
    } else {
        split_reg_name_port(rest)?
    };

    if let Some(port) = port {
        if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
            return Err(HostError::InvalidPort);
        }
    }

    Ok(ServerParts { userinfo, host, port })
}

/// IPv6 リテラル (角括弧付き) とポートへの分解
fn split_ipv6_host_port(input: &str) -> Result<(&str, Option<&str>), HostError> {
    let end = input.find(']').ok_or(HostError::InvalidHost)?;
    let host = &input[..end + 1];
    let inner = &input[1..end];
    if inner.is_empty() || !inner.bytes().all(|b| b.is_ascii_hexdigit() || b == b':' || b == b'.') {
        return Err(HostError::InvalidHost);
    }

    let rest = &input[end + 1..];
    if rest.is_empty() {
        return Ok((host, None));
    }
    let port = rest.strip_prefix(':').ok_or(HostError::InvalidHost)?;
    Ok((host, Some(port)))
}

/// reg-name / IPv4 とポートへの分解
fn split_reg_name_port(input: &str) -> Result<(&str, Option<&str>), HostError> {
    let (host, port) = match input.split_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (input, None),
    };
    if host.is_empty() || !is_valid_reg_name(host) {
        return Err(HostError::InvalidHost);
    }
    Ok((host, port))
}

fn is_valid_reg_name(input: &str) -> bool {
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if is_unreserved(b) || is_sub_delim(b) {
            i += 1;
            continue;
        }
        if b == b'%' {
            if i + 2 >= bytes.len() || !bytes[i + 1].is_ascii_hexdigit() || !bytes[i + 2].is_ascii_hexdigit() {
                return false;
            }
            i += 3;
            continue;
        }
        return false;
    }
    true
}

fn is_valid_userinfo(input: &str) -> bool {
    // userinfo = *( unreserved / pct-encoded / sub-delims / ":" )
    // "@" を含む多段 userinfo は rsplit で除外済み
    input
        .bytes()
        .all(|b| is_unreserved(b) || is_sub_delim(b) || b == b':' || b == b'%')
}

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'.' || b == b'_' || b == b'~'
}

fn is_sub_delim(b: u8) -> bool {
    matches!(
        b,
        b'!' | b'$' | b'&' | b'\'' | b'(' | b')' | b'*' | b'+' | b',' | b';' | b'='
    )
}
