use super::striper::Striper;
use crate::catalog::StripeLayout;
use serde::{Deserialize, Serialize};

/// ストライプインデックスから配置先ターゲットを決定
///
/// 配置は stripe_index mod stripe_count の静的ラウンドロビンで、
/// ターゲットの負荷や内容には依存しない。本システム唯一の配置ポリシー。
///
/// # Arguments
/// * `stripe_index` - ストライプインデックス
/// * `stripe_count` - ストライプを循環させるターゲット数 (> 0)
pub fn target_for_stripe(stripe_index: u64, stripe_count: u32) -> usize {
    debug_assert!(stripe_count > 0, "stripe_count must be positive");
    (stripe_index % stripe_count as u64) as usize
}

/// ターゲットごとのストライプ配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetPlacement {
    /// ターゲット名
    pub target: String,

    /// このターゲットに配置されるストライプインデックス (昇順)
    pub stripes: Vec<u64>,
}

/// ファイルのストライプ配置マップを計算
///
/// (total_size, layout, targets) の純粋関数で、ストレージには一切
/// 触れない。ストライプを受け取らないターゲットも必ず列挙される
/// (空のリストとして)。
///
/// # Arguments
/// * `total_size` - ファイルの論理サイズ (バイト)
/// * `layout` - ファイルのストライプレイアウト
/// * `target_names` - 構成済みターゲット名の順序付きリスト
pub fn placement_of(
    total_size: u64,
    layout: StripeLayout,
    target_names: &[String],
) -> Vec<TargetPlacement> {
    let mut placements: Vec<TargetPlacement> = target_names
        .iter()
        .map(|name| TargetPlacement {
            target: name.clone(),
            stripes: Vec::new(),
        })
        .collect();

    let num_stripes = Striper::new(layout).stripe_count_of(total_size);

    debug_assert!(
        num_stripes == 0 || layout.stripe_count as usize <= target_names.len(),
        "stripe_count exceeds configured targets"
    );

    for index in 0..num_stripes {
        let target_index = target_for_stripe(index, layout.stripe_count);
        placements[target_index].stripes.push(index);
    }

    placements
}
