//! 固定容量の読み込みバッファ
//!
//! ## 概要
//!
//! 接続ごとに 1 つ確保し、複数メッセージにわたって再利用する連続バイト領域。
//! カーソルはオフセットで保持する: 先頭 (常に 0)、`read_pos` (最初の未消費
//! バイト)、`write_pos` (最初の空きバイト)、容量 (上限)。
//! 不変条件: `0 <= read_pos <= write_pos <= capacity`。
//!
//! パーサーはカーソルの付け替えとコンパクション (未消費末尾の先頭への移動)
//! だけを行い、再確保は決して行わない。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_httpline::ReadBuffer;
//!
//! let mut buffer = ReadBuffer::with_capacity(64);
//! let accepted = buffer.feed(b"GET / HTTP/1.1\r\n");
//! assert_eq!(accepted, 16);
//! assert_eq!(buffer.unconsumed(), b"GET / HTTP/1.1\r\n");
//! ```

/// 固定容量の読み込みバッファ
#[derive(Debug)]
pub struct ReadBuffer {
    data: Box<[u8]>,
    read_pos: usize,
    write_pos: usize,
}

impl ReadBuffer {
    /// デフォルト容量 (最大行サイズ): 16 KiB
    pub const DEFAULT_CAPACITY: usize = 16 * 1024;

    /// デフォルト容量でバッファを作成
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// 指定容量でバッファを作成
    ///
    /// 容量は構築時に固定され、以後変化しない。
    pub fn with_capacity(capacity: usize) -> Self {
        ReadBuffer {
            data: vec![0; capacity].into_boxed_slice(),
            read_pos: 0,
            write_pos: 0,
        }
    }

    /// 容量 (バイト数)
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// 最初の未消費バイトのオフセット
    pub fn read_pos(&self) -> usize {
        self.read_pos
    }

    /// 最初の空きバイトのオフセット
    pub fn write_pos(&self) -> usize {
        self.write_pos
    }

    /// 空き容量
    pub fn remaining_capacity(&self) -> usize {
        self.capacity() - self.write_pos
    }

    /// 空きがないかどうか
    pub fn is_full(&self) -> bool {
        self.write_pos == self.capacity()
    }

    /// 未消費バイトがないかどうか
    pub fn is_empty(&self) -> bool {
        self.read_pos == self.write_pos
    }

    /// 空き領域の先頭に `data` をコピーし、受け入れたバイト数を返す
    ///
    /// 空きが足りない場合は先頭部分だけ受け入れる。呼び出し側は戻り値を
    /// 確認し、残りは後続の呼び出しで供給する。
    pub fn feed(&mut self, data: &[u8]) -> usize {
        let n = data.len().min(self.remaining_capacity());
        self.data[self.write_pos..self.write_pos + n].copy_from_slice(&data[..n]);
        self.write_pos += n;
        n
    }

    /// 未消費領域 `[read_pos, write_pos)`
    pub fn unconsumed(&self) -> &[u8] {
        &self.data[self.read_pos..self.write_pos]
    }

    /// 両カーソルを先頭に戻す (内容は論理的に破棄)
    pub fn reset(&mut self) {
        self.read_pos = 0;
        self.write_pos = 0;
    }

    /// 書き込み済み領域 `[0, write_pos)`
    ///
    /// スパンのオフセットはこのスライスに対する添字。
    pub(crate) fn filled(&self) -> &[u8] {
        &self.data[..self.write_pos]
    }

    /// `pos` までを消費済みにする
    ///
    /// 未消費バイトがなくなった場合は両カーソルを先頭へ戻し、
    /// 容量全体を回収する。
    pub(crate) fn consume_to(&mut self, pos: usize) {
        debug_assert!(pos >= self.read_pos && pos <= self.write_pos);
        if pos == self.write_pos {
            self.read_pos = 0;
            self.write_pos = 0;
        } else {
            self.read_pos = pos;
        }
    }

    /// `[anchor, write_pos)` を先頭へ移動し、リベース差分を返す
    ///
    /// 移動は内容を変えない (位置だけが変わる)。呼び出し側は戻り値の差分で
    /// 保持中のすべての参照をリベースしなければならない。
    pub(crate) fn compact(&mut self, anchor: usize) -> usize {
        debug_assert!(anchor <= self.write_pos);
        let rest = self.write_pos - anchor;
        self.data.copy_within(anchor..self.write_pos, 0);
        self.read_pos = 0;
        self.write_pos = rest;
        anchor
    }
}

impl Default for ReadBuffer {
    fn default() -> Self {
        Self::new()
    }
}
