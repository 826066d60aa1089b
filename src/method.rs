//! リクエストメソッド

/// HTTP リクエストメソッド
///
/// リクエストラインのメソッドトークンは既知のメソッドに解決される。
/// 未知のトークンは構文エラーとして扱われる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Delete,
    Get,
    Head,
    Post,
    Put,
    Connect,
    Options,
    Trace,
    // WebDAV
    Copy,
    Lock,
    MkCol,
    Move,
    PropFind,
    PropPatch,
    Search,
    Unlock,
    // Subversion
    Report,
    MkActivity,
    Checkout,
    Merge,
    // UPnP
    MSearch,
    Notify,
    Subscribe,
    Unsubscribe,
    // RFC 5789
    Patch,
    Purge,
}

impl Method {
    /// メソッドトークンを解決する
    ///
    /// 大文字小文字は区別する (RFC 9110 Section 9.1: メソッドは
    /// 大文字小文字を区別するトークン)。
    pub fn from_token(token: &[u8]) -> Option<Method> {
        match token {
            b"DELETE" => Some(Method::Delete),
            b"GET" => Some(Method::Get),
            b"HEAD" => Some(Method::Head),
            b"POST" => Some(Method::Post),
            b"PUT" => Some(Method::Put),
            b"CONNECT" => Some(Method::Connect),
            b"OPTIONS" => Some(Method::Options),
            b"TRACE" => Some(Method::Trace),
            b"COPY" => Some(Method::Copy),
            b"LOCK" => Some(Method::Lock),
            b"MKCOL" => Some(Method::MkCol),
            b"MOVE" => Some(Method::Move),
            b"PROPFIND" => Some(Method::PropFind),
            b"PROPPATCH" => Some(Method::PropPatch),
            b"SEARCH" => Some(Method::Search),
            b"UNLOCK" => Some(Method::Unlock),
            b"REPORT" => Some(Method::Report),
            b"MKACTIVITY" => Some(Method::MkActivity),
            b"CHECKOUT" => Some(Method::Checkout),
            b"MERGE" => Some(Method::Merge),
            b"M-SEARCH" => Some(Method::MSearch),
            b"NOTIFY" => Some(Method::Notify),
            b"SUBSCRIBE" => Some(Method::Subscribe),
            b"UNSUBSCRIBE" => Some(Method::Unsubscribe),
            b"PATCH" => Some(Method::Patch),
            b"PURGE" => Some(Method::Purge),
            _ => None,
        }
    }

    /// メソッド名
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Delete => "DELETE",
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Connect => "CONNECT",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
            Method::Copy => "COPY",
            Method::Lock => "LOCK",
            Method::MkCol => "MKCOL",
            Method::Move => "MOVE",
            Method::PropFind => "PROPFIND",
            Method::PropPatch => "PROPPATCH",
            Method::Search => "SEARCH",
            Method::Unlock => "UNLOCK",
            Method::Report => "REPORT",
            Method::MkActivity => "MKACTIVITY",
            Method::Checkout => "CHECKOUT",
            Method::Merge => "MERGE",
            Method::MSearch => "M-SEARCH",
            Method::Notify => "NOTIFY",
            Method::Subscribe => "SUBSCRIBE",
            Method::Unsubscribe => "UNSUBSCRIBE",
            Method::Patch => "PATCH",
            Method::Purge => "PURGE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// メソッドトークンに使える文字かどうか (RFC 9110 token)
pub(crate) fn is_method_char(b: u8) -> bool {
    b.is_ascii_uppercase() || b == b'-'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_common_methods() {
        assert_eq!(Method::from_token(b"GET"), Some(Method::Get));
        assert_eq!(Method::from_token(b"POST"), Some(Method::Post));
        assert_eq!(Method::from_token(b"M-SEARCH"), Some(Method::MSearch));
    }

    #[test]
    fn unknown_method() {
        assert_eq!(Method::from_token(b"BREW"), None);
        assert_eq!(Method::from_token(b""), None);
    }

    #[test]
    fn case_sensitive() {
        assert_eq!(Method::from_token(b"get"), None);
    }

    #[test]
    fn display_round_trip() {
        let methods = [Method::Get, Method::PropFind, Method::Unsubscribe];
        for method in methods {
            assert_eq!(Method::from_token(method.as_str().as_bytes()), Some(method));
        }
    }
}
