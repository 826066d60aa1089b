//! インクリメンタルなプリアンブルパーサー
//!
//! ## 概要
//!
//! 部分的なネットワーク書き込みで届くメッセージを、固定容量の
//! [`ReadBuffer`] 上で複数回の呼び出しにまたがってパースする。
//! 消費済みバイトのコピーは行わず、バッファが満杯に近づいたときだけ
//! 未消費末尾を先頭へ移動 (コンパクション) し、保持中のすべての
//! バッファ参照を同じ差分でリベースする。
//!
//! 各呼び出しは呼び出し側所有メモリ上の純粋な状態遷移であり、即座に
//! 返る。入力不足 (`None` / `Again`) が唯一の中断点で、制御は呼び出し側へ
//! 戻る。バイトの供給と再呼び出しは外部のイベントループが駆動する。
//! `Parser` と `ReadBuffer` の組は接続ごとに 1 つ、並行アクセス不可。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_httpline::{Parser, ReadBuffer, HeadersParse};
//!
//! let mut parser = Parser::new();
//! let mut buffer = ReadBuffer::new();
//!
//! buffer.feed(b"GET /p?q=1 HTTP/1.1\r\n");
//! let line = parser.parse_request_line(&mut buffer).unwrap().unwrap();
//! assert_eq!(line.method.as_str(), "GET");
//! assert_eq!(line.url.path.as_deref(), Some("/p"));
//!
//! buffer.feed(b"Host: example.com\r\n\r\n");
//! match parser.parse_headers(&mut buffer).unwrap() {
//!     HeadersParse::Complete(headers) => {
//!         assert_eq!(headers, vec!["Host: example.com".to_string()]);
//!     }
//!     _ => unreachable!(),
//! }
//! ```

use crate::buffer::ReadBuffer;
use crate::error::ParseError;
use crate::method::Method;
use crate::scan::{HeaderScan, HeaderScanner, LineScan, RequestLineScanner, StatusLineScanner};
use crate::url::{build_url, Url};

/// パース済みステータスライン
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub status_code: u16,
    pub http_major: u8,
    pub http_minor: u8,
}

/// パース済みリクエストライン
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: Method,
    pub http_major: u8,
    pub http_minor: u8,
    pub url: Url,
}

/// ヘッダーブロックパースの結果
///
/// ヘッダー行は名前と値に分割しない生の行として、複数回の呼び出しに
/// 分かれて届きうる。呼び出し側は各バッチを連結して最終的なリストを
/// 得る。バッチの境界は保証されない (スパン配列の容量とバッファの
/// 満杯タイミングに依存する)。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadersParse {
    /// 終端の空行を確認した。ヘッダーブロック完了
    Complete(Vec<String>),
    /// スパン配列が満杯になりフラッシュした。バッファに未消費バイトが
    /// 残っているため、入力を追加せずに再呼び出しすればよい
    Batch(Vec<String>),
    /// 追加の入力が必要。バッファ満杯でコンパクションした場合は、
    /// それまでに完了したヘッダーを伴う (この配送が唯一の永続記録)
    Again(Vec<String>),
}

/// メッセージパート 1 つ分のパース状態
///
/// 接続ごとに 1 つ作成し、メッセージ間では [`reset`](Parser::reset) で
/// 再初期化する。再開位置と各スキャナーの途中状態を呼び出しをまたいで
/// 保持する。
#[derive(Debug, Default)]
pub struct Parser {
    /// 次に検査するバイトのオフセット (継続)
    resume: Option<usize>,
    status: StatusLineScanner,
    request: RequestLineScanner,
    headers: HeaderScanner,
}

impl Parser {
    /// 新しいパーサーを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 次のメッセージに向けて状態を再初期化する
    ///
    /// バッファには触れない (再確保もカーソル操作もしない)。
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// ステータスラインをパースする
    ///
    /// - `Ok(Some(_))`: 1 行を消費し、`read_pos` を前進させた
    /// - `Ok(None)`: 入力不足。バイトを追加供給して再呼び出しする
    /// - `Err(_)`: 終了状態。行がバッファ容量を超えた場合も
    ///   [`ParseError::Invalid`]
    pub fn parse_status_line(
        &mut self,
        buffer: &mut ReadBuffer,
    ) -> Result<Option<StatusLine>, ParseError> {
        let from = self.resume.unwrap_or(buffer.read_pos());
        match self.status.scan(buffer.filled(), from)? {
            LineScan::Complete { resume } => {
                let line = StatusLine {
                    status_code: self.status.status_code,
                    http_major: self.status.http_major,
                    http_minor: self.status.http_minor,
                };
                self.status = StatusLineScanner::default();
                buffer.consume_to(resume);
                self.resume = None;
                Ok(Some(line))
            }
            LineScan::Again => {
                self.resume = Some(buffer.write_pos());
                if buffer.is_full() {
                    if buffer.read_pos() == 0 {
                        // 行が容量を超えた。コンパクションの余地がない
                        return Err(ParseError::Invalid);
                    }
                    // ステータスラインはスパンを持たないため、
                    // リベース対象は再開位置だけ
                    self.compact_line(buffer);
                }
                Ok(None)
            }
        }
    }

    /// リクエストラインをパースする
    ///
    /// パースが成功し authority が非空なら、ホストとポートへの分解を
    /// 行ってから返す。分解に失敗した場合、下位層の成功は
    /// [`ParseError::BadRequest`] へ変換される。
    pub fn parse_request_line(
        &mut self,
        buffer: &mut ReadBuffer,
    ) -> Result<Option<RequestLine>, ParseError> {
        let from = self.resume.unwrap_or(buffer.read_pos());
        match self.request.scan(buffer.filled(), from)? {
            LineScan::Complete { resume } => {
                // スパンの実体化はバッファに次に触れる前に行う
                let url = build_url(
                    &self.request.url.spans,
                    self.request.url.found_at,
                    buffer.filled(),
                )?;
                let method = self.request.method.ok_or(ParseError::Invalid)?;
                let line = RequestLine {
                    method,
                    http_major: self.request.http_major,
                    http_minor: self.request.http_minor,
                    url,
                };
                self.request = RequestLineScanner::default();
                buffer.consume_to(resume);
                self.resume = None;
                Ok(Some(line))
            }
            LineScan::Again => {
                self.resume = Some(buffer.write_pos());
                if buffer.is_full() {
                    if buffer.read_pos() == 0 {
                        return Err(ParseError::UriTooLarge);
                    }
                    let delta = self.compact_line(buffer);
                    self.request.rebase(delta);
                }
                Ok(None)
            }
        }
    }

    /// ヘッダーブロックをパースする
    ///
    /// バッファ満杯時の分岐が行パースと異なる:
    /// - 完了ヘッダーが 0 件で `read_pos` が先頭なら、先頭ヘッダーすら
    ///   容量に収まらないため [`ParseError::BadRequest`]
    /// - 完了ヘッダーが k 件あれば、コンパクションより先に k 件すべてを
    ///   呼び出し側へフラッシュする (コンパクション後は呼び出し側の
    ///   コピーだけが残るため)
    /// - コンパクションはスキャン途中のヘッダー行の先頭をアンカーにする。
    ///   行の境界がちょうどバッファ終端と一致した場合は単純にカーソルを
    ///   先頭へ戻す
    pub fn parse_headers(&mut self, buffer: &mut ReadBuffer) -> Result<HeadersParse, ParseError> {
        let from = self.resume.unwrap_or(buffer.read_pos());
        match self.headers.scan(buffer.filled(), from)? {
            HeaderScan::Done { resume } => {
                let lines = self.headers.flush(buffer.filled())?;
                self.headers = HeaderScanner::default();
                buffer.consume_to(resume);
                self.resume = None;
                Ok(HeadersParse::Complete(lines))
            }
            HeaderScan::Batch { resume } => {
                let lines = self.headers.flush(buffer.filled())?;
                buffer.consume_to(resume);
                self.resume = None;
                Ok(HeadersParse::Batch(lines))
            }
            HeaderScan::Again => {
                if !buffer.is_full() {
                    self.resume = Some(buffer.write_pos());
                    return Ok(HeadersParse::Again(Vec::new()));
                }
                if self.headers.spans.is_empty() && buffer.read_pos() == 0 {
                    return Err(ParseError::BadRequest);
                }
                let lines = self.headers.flush(buffer.filled())?;
                match self.headers.line_mark {
                    Some(anchor) => {
                        let delta = buffer.compact(anchor);
                        self.headers.rebase(delta);
                        self.resume = Some(buffer.write_pos());
                    }
                    None => {
                        buffer.reset();
                        self.resume = None;
                    }
                }
                Ok(HeadersParse::Again(lines))
            }
        }
    }

    /// 行パース共通のコンパクション
    ///
    /// 行の先頭 (`read_pos`) をアンカーに未消費バイトを移動し、
    /// 再開位置をリベースする。行種別ごとのスパンのリベースは
    /// 呼び出し元が続けて行う。
    fn compact_line(&mut self, buffer: &mut ReadBuffer) -> usize {
        let anchor = buffer.read_pos();
        let delta = buffer.compact(anchor);
        if let Some(pos) = &mut self.resume {
            *pos -= delta;
        }
        delta
    }
}
