//! バッファ内フィールド参照 (スパン)
//!
//! スパンは [`ReadBuffer`](crate::ReadBuffer) 内の位置をオフセットで保持する。
//! コンパクション (未消費バイトのバッファ先頭への移動) が行われると
//! 参照先のバイトが移動するため、保持中のすべてのスパンを同じ差分で
//! リベースする必要がある。リベース漏れは次回呼び出しで範囲外参照になる。

/// バッファ内のフィールド参照 (オフセットと長さ)
///
/// 次のコンパクションまたはリセットまでのみ有効。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    /// バッファ先頭からのオフセット
    pub pos: usize,
    /// バイト長
    pub len: usize,
}

impl Span {
    /// 開始位置のみ確定したスパン (長さはトークン終端で確定する)
    pub fn mark(pos: usize) -> Self {
        Span { pos, len: 0 }
    }

    /// 終了オフセット (排他)
    pub fn end(&self) -> usize {
        self.pos + self.len
    }

    /// 終了オフセットから長さを確定
    pub fn close(&mut self, end: usize) {
        debug_assert!(end >= self.pos);
        self.len = end - self.pos;
    }

    /// コンパクション後の位置補正
    pub fn rebase(&mut self, delta: usize) {
        debug_assert!(self.pos >= delta);
        self.pos -= delta;
    }
}

/// 保持中のスパンのみリベースする
pub(crate) fn rebase_opt(span: &mut Option<Span>, delta: usize) {
    if let Some(span) = span {
        span.rebase(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_and_end() {
        let mut span = Span::mark(7);
        span.close(12);
        assert_eq!(span, Span { pos: 7, len: 5 });
        assert_eq!(span.end(), 12);
    }

    #[test]
    fn rebase_shifts_pos_only() {
        let mut span = Span { pos: 10, len: 4 };
        span.rebase(10);
        assert_eq!(span, Span { pos: 0, len: 4 });
    }

    #[test]
    fn rebase_opt_skips_none() {
        let mut none: Option<Span> = None;
        rebase_opt(&mut none, 3);
        assert_eq!(none, None);

        let mut some = Some(Span { pos: 5, len: 1 });
        rebase_opt(&mut some, 3);
        assert_eq!(some, Some(Span { pos: 2, len: 1 }));
    }
}
