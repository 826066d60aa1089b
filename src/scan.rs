//! バイト単位の字句スキャナー
//!
//! ## 概要
//!
//! ステータスライン、リクエストライン、ヘッダーブロックそれぞれの
//! 文法を 1 バイトずつ進める状態機械。呼び出しをまたいで途中状態を保持し、
//! 永続化された再開位置から `[from, write_pos)` の範囲を検査する。
//! 完了の判定は終端 (CRLF / 空行) への到達のみで行い、内容から推測しない。
//!
//! スキャナーは範囲を使い切ると [`LineScan::Again`] を返す。入力の枯渇と
//! 構文エラーは厳密に区別され、構文エラーは [`ParseError`] で返る。
//! バッファ満杯時の扱い (コンパクション、容量超過エラー) は
//! [`Parser`](crate::Parser) 側の責務。

use crate::error::ParseError;
use crate::method::{is_method_char, Method};
use crate::span::Span;
use crate::url::UrlScanner;

/// 1 回のパース呼び出しで追跡できるヘッダースパン数の上限
///
/// ヘッダーの個数は非有界だが追跡配列は固定長のため、上限に達した時点で
/// バッチ境界を報告し、呼び出し側へフラッシュする。
pub(crate) const MAX_HEADERS_PER_PARSE: usize = 32;

/// 行スキャンの結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineScan {
    /// 行が完全に消費された。`resume` は終端 LF の次のオフセット
    Complete { resume: usize },
    /// 入力が尽きた。状態は保持されており、続きのバイトで再開できる
    Again,
}

/// ヘッダーブロックスキャンの結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HeaderScan {
    /// 終端の空行を確認した
    Done { resume: usize },
    /// スパン配列が満杯になった。未消費バイトが残っている
    Batch { resume: usize },
    /// 入力が尽きた
    Again,
}

const PROTO: &[u8; 5] = b"HTTP/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum StatusState {
    #[default]
    Start,
    Proto {
        idx: u8,
    },
    MajorFirst,
    Major,
    MinorFirst,
    Minor,
    Code {
        digits: u8,
    },
    Reason,
    AlmostDone,
}

/// ステータスラインのスキャナー
///
/// `HTTP/<major>.<minor> SP 3DIGIT [SP reason-phrase] CRLF`
///
/// バージョンとステータスコードは数値として状態に蓄積されるため、
/// スパンを持たずコンパクション時のリベース対象は再開位置のみ。
#[derive(Debug, Default)]
pub(crate) struct StatusLineScanner {
    state: StatusState,
    pub status_code: u16,
    pub http_major: u8,
    pub http_minor: u8,
}

impl StatusLineScanner {
    pub fn scan(&mut self, buf: &[u8], from: usize) -> Result<LineScan, ParseError> {
        for i in from..buf.len() {
            let b = buf[i];
            match self.state {
                StatusState::Start => {
                    if b != b'H' {
                        return Err(ParseError::Invalid);
                    }
                    self.state = StatusState::Proto { idx: 1 };
                }
                StatusState::Proto { idx } => {
                    if b != PROTO[idx as usize] {
                        return Err(ParseError::Invalid);
                    }
                    if idx as usize == PROTO.len() - 1 {
                        self.state = StatusState::MajorFirst;
                    } else {
                        self.state = StatusState::Proto { idx: idx + 1 };
                    }
                }
                StatusState::MajorFirst => {
                    self.http_major = digit(b)?;
                    self.state = StatusState::Major;
                }
                StatusState::Major => match b {
                    b'.' => self.state = StatusState::MinorFirst,
                    _ => self.http_major = push_digit(self.http_major, b)?,
                },
                StatusState::MinorFirst => {
                    self.http_minor = digit(b)?;
                    self.state = StatusState::Minor;
                }
                StatusState::Minor => match b {
                    b' ' => self.state = StatusState::Code { digits: 0 },
                    _ => self.http_minor = push_digit(self.http_minor, b)?,
                },
                StatusState::Code { digits } => match b {
                    b'0'..=b'9' => {
                        if digits == 3 {
                            return Err(ParseError::Invalid);
                        }
                        self.status_code = self.status_code * 10 + u16::from(b - b'0');
                        self.state = StatusState::Code { digits: digits + 1 };
                    }
                    b' ' if digits == 3 => self.state = StatusState::Reason,
                    b'\r' if digits == 3 => self.state = StatusState::AlmostDone,
                    _ => return Err(ParseError::Invalid),
                },
                StatusState::Reason => match b {
                    b'\r' => self.state = StatusState::AlmostDone,
                    b'\n' | 0 => return Err(ParseError::Invalid),
                    _ => {}
                },
                StatusState::AlmostDone => {
                    if b != b'\n' {
                        return Err(ParseError::Invalid);
                    }
                    return Ok(LineScan::Complete { resume: i + 1 });
                }
            }
        }
        Ok(LineScan::Again)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum RequestState {
    #[default]
    Start,
    Method,
    Url,
    Proto {
        idx: u8,
    },
    MajorFirst,
    Major,
    MinorFirst,
    Minor,
    AlmostDone,
}

/// リクエストラインのスキャナー
///
/// `method SP request-target SP HTTP/<major>.<minor> CRLF`
///
/// メソッドトークンは短い内部バッファに蓄積して終端の SP で解決する
/// (バッファ参照を持たないのでリベース不要)。request-target は
/// [`UrlScanner`] に委譲し、そのスパンがリベース対象になる。
#[derive(Debug, Default)]
pub(crate) struct RequestLineScanner {
    state: RequestState,
    method_buf: [u8; 16],
    method_len: u8,
    pub method: Option<Method>,
    pub url: UrlScanner,
    pub http_major: u8,
    pub http_minor: u8,
}

impl RequestLineScanner {
    pub fn scan(&mut self, buf: &[u8], from: usize) -> Result<LineScan, ParseError> {
        for i in from..buf.len() {
            let b = buf[i];
            match self.state {
                RequestState::Start => {
                    if !is_method_char(b) {
                        return Err(ParseError::Invalid);
                    }
                    self.push_method(b)?;
                    self.state = RequestState::Method;
                }
                RequestState::Method => match b {
                    b' ' => {
                        let token = &self.method_buf[..self.method_len as usize];
                        self.method = Some(Method::from_token(token).ok_or(ParseError::Invalid)?);
                        self.state = RequestState::Url;
                    }
                    _ => {
                        if !is_method_char(b) {
                            return Err(ParseError::Invalid);
                        }
                        self.push_method(b)?;
                    }
                },
                RequestState::Url => match b {
                    b' ' => {
                        self.url.finish(i)?;
                        self.state = RequestState::Proto { idx: 0 };
                    }
                    b'\r' | b'\n' => return Err(ParseError::Invalid),
                    _ => self.url.step(b, i)?,
                },
                RequestState::Proto { idx } => {
                    if b != PROTO[idx as usize] {
                        return Err(ParseError::Invalid);
                    }
                    if idx as usize == PROTO.len() - 1 {
                        self.state = RequestState::MajorFirst;
                    } else {
                        self.state = RequestState::Proto { idx: idx + 1 };
                    }
                }
                RequestState::MajorFirst => {
                    self.http_major = digit(b)?;
                    self.state = RequestState::Major;
                }
                RequestState::Major => match b {
                    b'.' => self.state = RequestState::MinorFirst,
                    _ => self.http_major = push_digit(self.http_major, b)?,
                },
                RequestState::MinorFirst => {
                    self.http_minor = digit(b)?;
                    self.state = RequestState::Minor;
                }
                RequestState::Minor => match b {
                    b'\r' => self.state = RequestState::AlmostDone,
                    _ => self.http_minor = push_digit(self.http_minor, b)?,
                },
                RequestState::AlmostDone => {
                    if b != b'\n' {
                        return Err(ParseError::Invalid);
                    }
                    return Ok(LineScan::Complete { resume: i + 1 });
                }
            }
        }
        Ok(LineScan::Again)
    }

    /// コンパクション後の位置補正 (URL スパン)
    pub fn rebase(&mut self, delta: usize) {
        self.url.spans.rebase(delta);
    }

    fn push_method(&mut self, b: u8) -> Result<(), ParseError> {
        let len = self.method_len as usize;
        if len == self.method_buf.len() {
            return Err(ParseError::Invalid);
        }
        self.method_buf[len] = b;
        self.method_len += 1;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum HeaderLineState {
    #[default]
    LineStart,
    Line,
    LineAlmostDone,
    FinalAlmostDone,
}

/// ヘッダーブロックのスキャナー
///
/// ヘッダー行は名前と値に分割せず、行全体をスパンとして追跡する。
/// `line_mark` はスキャン途中の行の先頭で、バッファ満杯時の
/// コンパクションアンカーになる。
#[derive(Debug, Default)]
pub(crate) struct HeaderScanner {
    state: HeaderLineState,
    pub spans: Vec<Span>,
    pub line_mark: Option<usize>,
}

impl HeaderScanner {
    pub fn scan(&mut self, buf: &[u8], from: usize) -> Result<HeaderScan, ParseError> {
        for i in from..buf.len() {
            let b = buf[i];
            match self.state {
                HeaderLineState::LineStart => match b {
                    b'\r' => self.state = HeaderLineState::FinalAlmostDone,
                    b'\n' | 0 => return Err(ParseError::Invalid),
                    _ => {
                        self.line_mark = Some(i);
                        self.state = HeaderLineState::Line;
                    }
                },
                HeaderLineState::Line => match b {
                    b'\r' => self.state = HeaderLineState::LineAlmostDone,
                    b'\n' | 0 => return Err(ParseError::Invalid),
                    _ => {}
                },
                HeaderLineState::LineAlmostDone => {
                    if b != b'\n' {
                        return Err(ParseError::Invalid);
                    }
                    let Some(mark) = self.line_mark.take() else {
                        return Err(ParseError::Invalid);
                    };
                    let mut span = Span::mark(mark);
                    span.close(i - 1);
                    self.spans.push(span);
                    self.state = HeaderLineState::LineStart;
                    if self.spans.len() == MAX_HEADERS_PER_PARSE {
                        return Ok(HeaderScan::Batch { resume: i + 1 });
                    }
                }
                HeaderLineState::FinalAlmostDone => {
                    if b != b'\n' {
                        return Err(ParseError::Invalid);
                    }
                    return Ok(HeaderScan::Done { resume: i + 1 });
                }
            }
        }
        Ok(HeaderScan::Again)
    }

    /// 完了済みスパンを実体化して追跡から外す
    ///
    /// フラッシュ後はスパンの参照先バイトが移動しても安全になる。
    pub fn flush(&mut self, bytes: &[u8]) -> Result<Vec<String>, ParseError> {
        let mut lines = Vec::with_capacity(self.spans.len());
        for span in self.spans.drain(..) {
            let raw = &bytes[span.pos..span.end()];
            match std::str::from_utf8(raw) {
                Ok(line) => lines.push(line.to_string()),
                Err(_) => return Err(ParseError::Invalid),
            }
        }
        Ok(lines)
    }

    /// コンパクション後の位置補正 (追跡中スパンとラインマーク)
    pub fn rebase(&mut self, delta: usize) {
        for span in &mut self.spans {
            span.rebase(delta);
        }
        if let Some(mark) = &mut self.line_mark {
            *mark -= delta;
        }
    }
}

fn digit(b: u8) -> Result<u8, ParseError> {
    if b.is_ascii_digit() {
        Ok(b - b'0')
    } else {
        Err(ParseError::Invalid)
    }
}

/// バージョン番号へ 1 桁追加する (2 桁まで)
fn push_digit(value: u8, b: u8) -> Result<u8, ParseError> {
    let d = digit(b)?;
    if value > 9 {
        return Err(ParseError::Invalid);
    }
    Ok(value * 10 + d)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // ステータスライン
    // ========================================

    #[test]
    fn status_line_complete() {
        let mut scanner = StatusLineScanner::default();
        let buf = b"HTTP/1.1 200 OK\r\nrest";
        let result = scanner.scan(buf, 0).unwrap();
        assert_eq!(result, LineScan::Complete { resume: 17 });
        assert_eq!(scanner.status_code, 200);
        assert_eq!(scanner.http_major, 1);
        assert_eq!(scanner.http_minor, 1);
    }

    #[test]
    fn status_line_without_reason() {
        let mut scanner = StatusLineScanner::default();
        let result = scanner.scan(b"HTTP/1.0 404\r\n", 0).unwrap();
        assert_eq!(result, LineScan::Complete { resume: 14 });
        assert_eq!(scanner.status_code, 404);
        assert_eq!(scanner.http_minor, 0);
    }

    #[test]
    fn status_line_resumes_across_calls() {
        let mut scanner = StatusLineScanner::default();
        let mut buf = b"HTTP/1.1 2".to_vec();
        assert_eq!(scanner.scan(&buf, 0).unwrap(), LineScan::Again);
        buf.extend_from_slice(b"00 OK\r\n");
        let result = scanner.scan(&buf, 10).unwrap();
        assert_eq!(result, LineScan::Complete { resume: 17 });
        assert_eq!(scanner.status_code, 200);
    }

    #[test]
    fn status_line_malformed() {
        assert!(StatusLineScanner::default().scan(b"HTPP/1.1 200 OK\r\n", 0).is_err());
        assert!(StatusLineScanner::default().scan(b"HTTP/1.1 20 OK\r\n", 0).is_err());
        assert!(StatusLineScanner::default().scan(b"HTTP/1.1 2000 OK\r\n", 0).is_err());
        assert!(StatusLineScanner::default().scan(b"HTTP/1.1 200 OK\n", 0).is_err());
        assert!(StatusLineScanner::default().scan(b"HTTP/x.1 200 OK\r\n", 0).is_err());
    }

    // ========================================
    // リクエストライン
    // ========================================

    #[test]
    fn request_line_complete() {
        let mut scanner = RequestLineScanner::default();
        let buf = b"GET /index.html HTTP/1.1\r\n";
        let result = scanner.scan(buf, 0).unwrap();
        assert_eq!(result, LineScan::Complete { resume: buf.len() });
        assert_eq!(scanner.method, Some(Method::Get));
        assert_eq!(scanner.http_major, 1);
        assert_eq!(scanner.http_minor, 1);
        let path = scanner.url.spans.path.unwrap();
        assert_eq!(&buf[path.pos..path.end()], b"/index.html");
    }

    #[test]
    fn request_line_unknown_method() {
        let mut scanner = RequestLineScanner::default();
        assert!(scanner.scan(b"BREW /pot HTTP/1.1\r\n", 0).is_err());
    }

    #[test]
    fn request_line_missing_version() {
        let mut scanner = RequestLineScanner::default();
        assert!(scanner.scan(b"GET /\r\n", 0).is_err());
    }

    #[test]
    fn request_line_fragmented() {
        let mut scanner = RequestLineScanner::default();
        let full = b"POST http://ex.com/a?b=1 HTTP/1.1\r\n";
        let mut fed = 0;
        for chunk in full.chunks(3) {
            let end = fed + chunk.len();
            let result = scanner.scan(&full[..end], fed).unwrap();
            fed = end;
            if fed == full.len() {
                assert_eq!(result, LineScan::Complete { resume: full.len() });
            } else {
                assert_eq!(result, LineScan::Again);
            }
        }
        assert_eq!(scanner.method, Some(Method::Post));
        let server = scanner.url.spans.server.unwrap();
        assert_eq!(&full[server.pos..server.end()], b"ex.com");
    }

    // ========================================
    // ヘッダーブロック
    // ========================================

    #[test]
    fn headers_done() {
        let mut scanner = HeaderScanner::default();
        let buf = b"Host: a\r\nAccept: b\r\n\r\n";
        let result = scanner.scan(buf, 0).unwrap();
        assert_eq!(result, HeaderScan::Done { resume: buf.len() });
        let lines = scanner.flush(buf).unwrap();
        assert_eq!(lines, vec!["Host: a".to_string(), "Accept: b".to_string()]);
    }

    #[test]
    fn headers_again_keeps_mark() {
        let mut scanner = HeaderScanner::default();
        let buf = b"Host: a\r\nX-Partial: v";
        assert_eq!(scanner.scan(buf, 0).unwrap(), HeaderScan::Again);
        assert_eq!(scanner.spans.len(), 1);
        assert_eq!(scanner.line_mark, Some(9));
    }

    #[test]
    fn headers_batch_at_capacity() {
        let mut scanner = HeaderScanner::default();
        let mut buf = Vec::new();
        for i in 0..MAX_HEADERS_PER_PARSE {
            buf.extend_from_slice(format!("X-{}: v\r\n", i).as_bytes());
        }
        buf.extend_from_slice(b"Y: w\r\n\r\n");
        let result = scanner.scan(&buf, 0).unwrap();
        let batch_end = buf.len() - 8;
        assert_eq!(result, HeaderScan::Batch { resume: batch_end });
        assert_eq!(scanner.flush(&buf).unwrap().len(), MAX_HEADERS_PER_PARSE);

        // フラッシュ後に続きを読める
        let result = scanner.scan(&buf, batch_end).unwrap();
        assert_eq!(result, HeaderScan::Done { resume: buf.len() });
        assert_eq!(scanner.flush(&buf).unwrap(), vec!["Y: w".to_string()]);
    }

    #[test]
    fn headers_reject_bare_lf_and_nul() {
        assert!(HeaderScanner::default().scan(b"Host: a\n", 0).is_err());
        assert!(HeaderScanner::default().scan(b"Host: \0a\r\n", 0).is_err());
        assert!(HeaderScanner::default().scan(b"\n", 0).is_err());
    }

    #[test]
    fn headers_rebase_shifts_mark() {
        let mut scanner = HeaderScanner::default();
        scanner.scan(b"ignored: x\r\nNext: ", 12).unwrap();
        assert_eq!(scanner.line_mark, Some(12));
        scanner.rebase(12);
        assert_eq!(scanner.line_mark, Some(0));
    }
}
