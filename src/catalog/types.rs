use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// 名前空間エントリID
pub type EntryId = u64;

/// ルートディレクトリのエントリID (固定)
pub const ROOT_ENTRY_ID: EntryId = 1;

/// エントリ種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    File,
    Directory,
}

/// ストライプレイアウト
///
/// ファイルをどう分割するかを決める (stripe_count, stripe_size) の組。
/// ディレクトリに設定された値は配下に作成されるエントリへの
/// 継承デフォルトとしてのみ使われる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StripeLayout {
    /// ストライプを循環させるターゲット数
    pub stripe_count: u32,

    /// ストライプサイズ (バイト)
    pub stripe_size: u64,
}

impl StripeLayout {
    /// 新しいストライプレイアウトを作成
    pub fn new(stripe_count: u32, stripe_size: u64) -> Self {
        Self {
            stripe_count,
            stripe_size,
        }
    }
}

impl Default for StripeLayout {
    fn default() -> Self {
        Self {
            stripe_count: crate::config::defaults::DEFAULT_STRIPE_COUNT,
            stripe_size: crate::config::defaults::DEFAULT_STRIPE_SIZE,
        }
    }
}

/// 名前空間エントリ
///
/// ディレクトリ/ファイルツリーの1ノード。親への参照はIDのみで持ち、
/// ツリーの走査はIDによるルックアップで行う。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceEntry {
    /// エントリID (作成時に割り当て、不変)
    pub id: EntryId,

    /// エントリ名 (同一親の中で一意)
    pub name: String,

    /// 親エントリID (ルートのみNone)
    pub parent: Option<EntryId>,

    /// エントリ種別 (作成後は不変)
    pub kind: EntryKind,

    /// 論理サイズ (バイト)。ディレクトリは常に0
    pub size: u64,

    /// ストライプレイアウト
    pub layout: StripeLayout,

    /// 作成時刻 (情報提供のみ)
    pub created_at: SystemTime,
}

impl NamespaceEntry {
    /// 新しいエントリを作成
    pub fn new(
        id: EntryId,
        name: String,
        parent: EntryId,
        kind: EntryKind,
        size: u64,
        layout: StripeLayout,
    ) -> Self {
        Self {
            id,
            name,
            parent: Some(parent),
            kind,
            size,
            layout,
            created_at: SystemTime::now(),
        }
    }

    /// ルートディレクトリのエントリを作成
    pub fn new_root(layout: StripeLayout) -> Self {
        Self {
            id: ROOT_ENTRY_ID,
            name: "/".to_string(),
            parent: None,
            kind: EntryKind::Directory,
            size: 0,
            layout,
            created_at: SystemTime::now(),
        }
    }

    /// ディレクトリかどうか
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// エントリ一覧用のサマリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySummary {
    pub id: EntryId,
    pub name: String,
    pub is_directory: bool,
    pub size: u64,
}

impl From<&NamespaceEntry> for EntrySummary {
    fn from(entry: &NamespaceEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name.clone(),
            is_directory: entry.is_directory(),
            size: entry.size,
        }
    }
}
