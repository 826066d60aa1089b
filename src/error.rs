use std::fmt;

/// パースエラー (終了状態)
///
/// 入力不足 (継続可能) はエラーではなく、各パース関数の戻り値の
/// `None` / `Again` として表現される。このエラーはいずれも現在の
/// メッセージに対して終了状態であり、同じ状態での再試行はできない。
/// ストリームの破棄またはクローズは呼び出し側の責務。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// 構文エラー
    Invalid,
    /// 不正なリクエスト (authority の分解失敗、先頭ヘッダーの容量超過など)
    BadRequest,
    /// リクエスト URI がバッファ容量を超過
    UriTooLarge,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Invalid => write!(f, "malformed input"),
            ParseError::BadRequest => write!(f, "bad request"),
            ParseError::UriTooLarge => write!(f, "request URI too large"),
        }
    }
}

impl std::error::Error for ParseError {}
