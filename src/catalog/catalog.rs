use super::types::{
    EntryId, EntryKind, EntrySummary, NamespaceEntry, StripeLayout, ROOT_ENTRY_ID,
};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use tracing::instrument;

/// カタログエラー
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Entry not found: {0}")]
    NotFound(String),

    #[error("Entry already exists: {0}")]
    AlreadyExists(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// カタログスナップショット (永続化用の表現)
#[derive(Debug, Serialize, Deserialize)]
struct CatalogSnapshot {
    entries: Vec<NamespaceEntry>,
    next_id: EntryId,
}

/// 名前空間カタログ
///
/// ディレクトリ/ファイルツリーのメタデータを管理する。エントリは
/// IDをキーとするアリーナとして保持し、親子関係はIDの参照のみで表す。
/// パス解決は (親ID, 名前) の索引によるキー付きルックアップの繰り返し。
///
/// Note: シングルスレッド設計のため、RefCellを使用
pub struct NamespaceCatalog {
    /// エントリアリーナ (id -> entry)
    entries: RefCell<HashMap<EntryId, NamespaceEntry>>,

    /// 子エントリ索引 ((親id, 名前) -> id)
    children: RefCell<HashMap<(EntryId, String), EntryId>>,

    /// 次に割り当てるエントリID
    next_id: RefCell<EntryId>,
}

impl NamespaceCatalog {
    /// 新しいカタログを作成
    ///
    /// ルートディレクトリ (id=1) を指定されたレイアウトで初期化する。
    ///
    /// # Arguments
    /// * `root_layout` - ルートディレクトリに設定する継承デフォルト
    pub fn new(root_layout: StripeLayout) -> Self {
        let mut entries = HashMap::new();
        entries.insert(ROOT_ENTRY_ID, NamespaceEntry::new_root(root_layout));

        Self {
            entries: RefCell::new(entries),
            children: RefCell::new(HashMap::new()),
            next_id: RefCell::new(ROOT_ENTRY_ID + 1),
        }
    }

    /// 新しいエントリIDを割り当て
    fn allocate_id(&self) -> EntryId {
        let mut next_id = self.next_id.borrow_mut();
        let id = *next_id;
        *next_id += 1;
        id
    }

    /// エントリを作成
    ///
    /// (親, 名前) の組が既に存在する場合は失敗する。挿入前の存在チェックと
    /// 挿入が同一呼び出し内で行われるため、シングルスレッド実行では
    /// 重複エントリは発生しない。
    ///
    /// # Arguments
    /// * `parent` - 親ディレクトリのエントリID
    /// * `name` - エントリ名
    /// * `kind` - エントリ種別
    /// * `size` - 論理サイズ (バイト)。ディレクトリは0
    /// * `layout` - エントリに記録するストライプレイアウト
    #[instrument(level = "debug", name = "catalog_create_entry", skip(self))]
    pub fn create_entry(
        &self,
        parent: EntryId,
        name: &str,
        kind: EntryKind,
        size: u64,
        layout: StripeLayout,
    ) -> CatalogResult<EntryId> {
        if name.is_empty() || name.contains('/') {
            return Err(CatalogError::InvalidPath(name.to_string()));
        }

        {
            let entries = self.entries.borrow();
            let parent_entry = entries
                .get(&parent)
                .ok_or_else(|| CatalogError::NotFound(format!("parent id {}", parent)))?;

            if !parent_entry.is_directory() {
                return Err(CatalogError::NotADirectory(parent_entry.name.clone()));
            }
        }

        let key = (parent, name.to_string());
        if self.children.borrow().contains_key(&key) {
            return Err(CatalogError::AlreadyExists(name.to_string()));
        }

        let id = self.allocate_id();
        let entry = NamespaceEntry::new(id, name.to_string(), parent, kind, size, layout);

        self.entries.borrow_mut().insert(id, entry);
        self.children.borrow_mut().insert(key, id);

        tracing::info!(
            "Created {:?} entry: {} (id={}, parent={}, size={})",
            kind,
            name,
            id,
            parent,
            size
        );

        Ok(id)
    }

    /// エントリを取得
    pub fn get_entry(&self, id: EntryId) -> CatalogResult<NamespaceEntry> {
        self.entries
            .borrow()
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("entry id {}", id)))
    }

    /// パスをエントリIDに解決
    ///
    /// "/" はルートIDに直接解決する。それ以外は '/' で分割し、
    /// 空セグメントを捨ててルートから子を辿る。セグメントに対応する
    /// 子が無ければNotFound。`.`/`..` や正規化はサポートしない。
    #[instrument(level = "trace", name = "catalog_resolve", skip(self))]
    pub fn resolve(&self, path: &str) -> CatalogResult<EntryId> {
        if path == "/" {
            return Ok(ROOT_ENTRY_ID);
        }

        let children = self.children.borrow();
        let mut current = ROOT_ENTRY_ID;

        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = children
                .get(&(current, segment.to_string()))
                .copied()
                .ok_or_else(|| CatalogError::NotFound(path.to_string()))?;
        }

        Ok(current)
    }

    /// 指定されたエントリの子一覧を取得
    ///
    /// 一覧は名前順。ファイルのIDを渡した場合は空の一覧を返す
    /// (子を持てるのはディレクトリのみ)。
    pub fn list_children(&self, parent: EntryId) -> CatalogResult<Vec<EntrySummary>> {
        let entries = self.entries.borrow();

        if !entries.contains_key(&parent) {
            return Err(CatalogError::NotFound(format!("entry id {}", parent)));
        }

        let mut summaries: Vec<EntrySummary> = entries
            .values()
            .filter(|e| e.parent == Some(parent))
            .map(EntrySummary::from)
            .collect();

        summaries.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(summaries)
    }

    /// エントリのストライプレイアウトを取得
    pub fn layout_of(&self, id: EntryId) -> CatalogResult<StripeLayout> {
        Ok(self.get_entry(id)?.layout)
    }

    /// エントリのストライプレイアウトを更新
    ///
    /// メタデータのみの更新で、書き込み済みのストライプデータには
    /// 一切触れない。
    #[instrument(level = "debug", name = "catalog_update_layout", skip(self))]
    pub fn update_layout(&self, id: EntryId, layout: StripeLayout) -> CatalogResult<()> {
        let mut entries = self.entries.borrow_mut();
        let entry = entries
            .get_mut(&id)
            .ok_or_else(|| CatalogError::NotFound(format!("entry id {}", id)))?;

        entry.layout = layout;
        tracing::debug!(
            "Updated layout for entry {} (count={}, size={})",
            id,
            layout.stripe_count,
            layout.stripe_size
        );

        Ok(())
    }

    /// カタログをスナップショットファイルに保存
    pub fn save_snapshot(&self, path: &Path) -> CatalogResult<()> {
        let snapshot = CatalogSnapshot {
            entries: self.entries.borrow().values().cloned().collect(),
            next_id: *self.next_id.borrow(),
        };

        let contents = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| CatalogError::Snapshot(format!("Failed to serialize catalog: {}", e)))?;

        std::fs::write(path, contents)
            .map_err(|e| CatalogError::Snapshot(format!("Failed to write snapshot: {}", e)))?;

        tracing::debug!("Saved catalog snapshot to {}", path.display());

        Ok(())
    }

    /// スナップショットファイルからカタログを復元
    ///
    /// アリーナと子索引を再構築し、IDカウンターを復元する。
    pub fn load_snapshot(path: &Path) -> CatalogResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Snapshot(format!("Failed to read snapshot: {}", e)))?;

        let snapshot: CatalogSnapshot = serde_json::from_str(&contents)
            .map_err(|e| CatalogError::Snapshot(format!("Failed to parse snapshot: {}", e)))?;

        let mut entries = HashMap::new();
        let mut children = HashMap::new();

        for entry in snapshot.entries {
            if let Some(parent) = entry.parent {
                children.insert((parent, entry.name.clone()), entry.id);
            }
            entries.insert(entry.id, entry);
        }

        if !entries.contains_key(&ROOT_ENTRY_ID) {
            return Err(CatalogError::Snapshot(
                "Snapshot has no root entry".to_string(),
            ));
        }

        tracing::info!(
            "Loaded catalog snapshot from {} ({} entries)",
            path.display(),
            entries.len()
        );

        Ok(Self {
            entries: RefCell::new(entries),
            children: RefCell::new(children),
            next_id: RefCell::new(snapshot.next_id),
        })
    }
}
