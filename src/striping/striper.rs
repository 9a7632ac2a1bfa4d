use crate::catalog::StripeLayout;

/// ストライプ情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripeInfo {
    /// ストライプインデックス
    pub index: u64,

    /// ファイル内のオフセット (バイト)
    pub offset: u64,

    /// ストライプサイズ (バイト)
    pub size: u64,
}

impl StripeInfo {
    /// 新しいストライプ情報を作成
    pub fn new(index: u64, offset: u64, size: u64) -> Self {
        Self {
            index,
            offset,
            size,
        }
    }

    /// ストライプの終端オフセット
    pub fn end_offset(&self) -> u64 {
        self.offset + self.size
    }
}

/// ストライプ分割エラー
#[derive(Debug, thiserror::Error)]
pub enum StripingError {
    #[error("Invalid stripe index: {0}")]
    InvalidStripeIndex(u64),
}

pub type StripingResult<T> = Result<T, StripingError>;

/// ストライパー
///
/// 単一レイアウトのもとでのストライプ境界計算を行う。
/// ストライプiのバイト範囲は [i*stripe_size, min((i+1)*stripe_size, total_size))。
pub struct Striper {
    /// ストライプサイズ (バイト)
    stripe_size: u64,
}

impl Striper {
    /// 指定されたレイアウトでストライパーを作成
    pub fn new(layout: StripeLayout) -> Self {
        Self {
            stripe_size: layout.stripe_size,
        }
    }

    /// ストライプサイズを取得
    pub fn stripe_size(&self) -> u64 {
        self.stripe_size
    }

    /// ファイルサイズからストライプ数を計算
    pub fn stripe_count_of(&self, total_size: u64) -> u64 {
        if total_size == 0 {
            0
        } else {
            (total_size + self.stripe_size - 1) / self.stripe_size
        }
    }

    /// 指定されたストライプのオフセットを計算
    pub fn stripe_offset(&self, stripe_index: u64) -> u64 {
        stripe_index * self.stripe_size
    }

    /// 指定されたストライプのサイズを計算 (最終ストライプは小さい可能性がある)
    pub fn stripe_size_at(&self, stripe_index: u64, total_size: u64) -> StripingResult<u64> {
        let offset = self.stripe_offset(stripe_index);
        if offset >= total_size {
            return Err(StripingError::InvalidStripeIndex(stripe_index));
        }

        let remaining = total_size - offset;
        Ok(remaining.min(self.stripe_size))
    }

    /// ファイル全体のストライプ情報リストを取得
    pub fn stripes(&self, total_size: u64) -> Vec<StripeInfo> {
        let count = self.stripe_count_of(total_size);
        (0..count)
            .map(|index| {
                let offset = self.stripe_offset(index);
                let size = self
                    .stripe_size_at(index, total_size)
                    .expect("Valid stripe index");
                StripeInfo::new(index, offset, size)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: u64 = 1024 * 1024;

    fn striper(stripe_size: u64) -> Striper {
        Striper::new(StripeLayout::new(1, stripe_size))
    }

    #[test]
    fn test_stripe_count_of() {
        let striper = striper(MB);

        assert_eq!(striper.stripe_count_of(0), 0);
        assert_eq!(striper.stripe_count_of(1), 1);
        assert_eq!(striper.stripe_count_of(MB), 1);
        assert_eq!(striper.stripe_count_of(MB + 1), 2);
        assert_eq!(striper.stripe_count_of(10 * MB), 10);
    }

    #[test]
    fn test_stripe_offset() {
        let striper = striper(MB);

        assert_eq!(striper.stripe_offset(0), 0);
        assert_eq!(striper.stripe_offset(1), MB);
        assert_eq!(striper.stripe_offset(2), 2 * MB);
    }

    #[test]
    fn test_stripe_size_at() {
        let striper = striper(MB);
        let total_size = 2 * MB + 512 * 1024; // 2.5MB

        // 先頭ストライプ
        assert_eq!(striper.stripe_size_at(0, total_size).unwrap(), MB);

        // 2番目のストライプ
        assert_eq!(striper.stripe_size_at(1, total_size).unwrap(), MB);

        // 最終ストライプ (0.5MB)
        assert_eq!(striper.stripe_size_at(2, total_size).unwrap(), 512 * 1024);

        // 範囲外
        assert!(striper.stripe_size_at(3, total_size).is_err());
    }

    #[test]
    fn test_stripes() {
        let striper = striper(MB);
        let total_size = 2 * MB + 512 * 1024;

        let stripes = striper.stripes(total_size);
        assert_eq!(stripes.len(), 3);

        // ストライプ境界は start = i*stripe_size, end = start+stripe_size
        assert_eq!(stripes[0], StripeInfo::new(0, 0, MB));
        assert_eq!(stripes[1], StripeInfo::new(1, MB, MB));
        assert_eq!(stripes[2], StripeInfo::new(2, 2 * MB, 512 * 1024));
        assert_eq!(stripes[2].end_offset(), total_size);
    }

    #[test]
    fn test_stripes_empty_file() {
        let striper = striper(MB);
        assert!(striper.stripes(0).is_empty());
    }

    #[test]
    fn test_stripes_exact_multiple() {
        let striper = striper(64 * 1024);
        let stripes = striper.stripes(128 * 1024);

        assert_eq!(stripes.len(), 2);
        assert_eq!(stripes[0].size, 64 * 1024);
        assert_eq!(stripes[1].size, 64 * 1024);
    }
}
