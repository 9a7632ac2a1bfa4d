use std::rc::Rc;

use tracing::instrument;

use super::placement::target_for_stripe;
use super::striper::Striper;
use crate::catalog::StripeLayout;
use crate::storage::{StorageResult, StripeStore};

/// ストライピングエンジン
///
/// バイト列をストライプに分割してターゲットに書き込み、読み出し時に
/// ストライプから元のバイト列を復元する。配置はストライプインデックスの
/// 静的ラウンドロビンのみで、書き込みと読み出しで同一の計算を使う。
pub struct StripingEngine {
    /// ストライプストア
    store: Rc<dyn StripeStore>,
}

impl StripingEngine {
    /// 新しいストライピングエンジンを作成
    pub fn new(store: Rc<dyn StripeStore>) -> Self {
        Self { store }
    }

    /// バイト列をストライプ分割して書き込み
    ///
    /// ストライプiのバイト範囲は [i*stripe_size, min((i+1)*stripe_size, len))、
    /// 配置先は i mod stripe_count。個々のストライプ書き込みの失敗は
    /// 操作全体を中断させる。書き込み済みストライプのロールバックは
    /// 行わない (トランザクション保証なし)。
    ///
    /// # Arguments
    /// * `object_id` - 所有ファイルのエントリID
    /// * `data` - 書き込むバイト列
    /// * `layout` - 適用するストライプレイアウト
    #[instrument(level = "debug", name = "write_striped", skip(self, data), fields(len = data.len()))]
    pub fn write_striped(
        &self,
        object_id: u64,
        data: &[u8],
        layout: StripeLayout,
    ) -> StorageResult<()> {
        let striper = Striper::new(layout);

        for stripe in striper.stripes(data.len() as u64) {
            let start = stripe.offset as usize;
            let end = stripe.end_offset() as usize;
            let target_index = target_for_stripe(stripe.index, layout.stripe_count);

            self.store
                .write_stripe(target_index, object_id, stripe.index, &data[start..end])?;

            tracing::trace!(
                "Placed stripe {} ({} bytes) on target {}",
                stripe.index,
                stripe.size,
                target_index
            );
        }

        tracing::debug!(
            "Wrote object {} ({} bytes, {} stripes, count={}, size={})",
            object_id,
            data.len(),
            striper.stripe_count_of(data.len() as u64),
            layout.stripe_count,
            layout.stripe_size
        );

        Ok(())
    }

    /// ストライプからバイト列を復元
    ///
    /// ストライプ数は書き込み時と同一の式で再計算し、インデックス昇順に
    /// ターゲット i mod stripe_count から読み出して連結する。いずれかの
    /// ストライプが欠けていれば読み出し全体が失敗する (部分結果なし)。
    ///
    /// # Arguments
    /// * `object_id` - 所有ファイルのエントリID
    /// * `total_size` - メタデータに記録された論理サイズ
    /// * `layout` - ファイルのストライプレイアウト
    #[instrument(level = "debug", name = "read_striped", skip(self))]
    pub fn read_striped(
        &self,
        object_id: u64,
        total_size: u64,
        layout: StripeLayout,
    ) -> StorageResult<Vec<u8>> {
        let striper = Striper::new(layout);
        let num_stripes = striper.stripe_count_of(total_size);

        let mut data = Vec::with_capacity(total_size as usize);

        for index in 0..num_stripes {
            let target_index = target_for_stripe(index, layout.stripe_count);
            let stripe = self.store.read_stripe(target_index, object_id, index)?;
            data.extend_from_slice(&stripe);
        }

        tracing::debug!(
            "Read object {} ({} bytes, {} stripes)",
            object_id,
            data.len(),
            num_stripes
        );

        Ok(data)
    }
}
