use std::path::PathBuf;

/// オブジェクトストレージターゲット (OST)
///
/// ストライプデータを格納する1つの論理ターゲット。
/// ディスク上ではデータディレクトリ配下の1ディレクトリに対応する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageTarget {
    /// ターゲット名 (例: "ost1")
    pub name: String,

    /// ターゲットのディレクトリパス
    pub path: PathBuf,
}

/// ターゲットセット
///
/// プロセス全体で固定された順序付きターゲットリスト。起動時に構成から
/// 注入され、以降は不変。stripe_countの上限はこのセットの要素数。
#[derive(Debug, Clone)]
pub struct TargetSet {
    targets: Vec<StorageTarget>,
}

impl TargetSet {
    /// 指定された名前リストでターゲットセットを作成
    ///
    /// 各ターゲットは `<data_dir>/<name>` のディレクトリに対応する。
    ///
    /// # Arguments
    /// * `data_dir` - データディレクトリ
    /// * `names` - 順序付きターゲット名リスト
    pub fn with_names(data_dir: PathBuf, names: Vec<String>) -> Self {
        let targets = names
            .into_iter()
            .map(|name| {
                let path = data_dir.join(&name);
                StorageTarget { name, path }
            })
            .collect();

        Self { targets }
    }

    /// ターゲット数を取得
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// ターゲットセットが空かどうか
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// 指定されたインデックスのターゲットを取得
    pub fn get(&self, index: usize) -> Option<&StorageTarget> {
        self.targets.get(index)
    }

    /// ターゲット名の順序付きリストを取得
    pub fn names(&self) -> Vec<String> {
        self.targets.iter().map(|t| t.name.clone()).collect()
    }

    /// 全ターゲットのイテレータ
    pub fn iter(&self) -> impl Iterator<Item = &StorageTarget> {
        self.targets.iter()
    }

    /// 全ターゲットのディレクトリを作成
    ///
    /// 起動時に一度呼ばれる。既存のディレクトリはそのまま。
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        for target in &self.targets {
            std::fs::create_dir_all(&target.path)?;
            tracing::debug!("Target directory ready: {}", target.path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_with_names() {
        let set = TargetSet::with_names(
            PathBuf::from("/data"),
            vec!["ost1".to_string(), "ost2".to_string()],
        );

        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0).unwrap().name, "ost1");
        assert_eq!(set.get(0).unwrap().path, PathBuf::from("/data/ost1"));
        assert_eq!(set.get(1).unwrap().path, PathBuf::from("/data/ost2"));
        assert!(set.get(2).is_none());
    }

    #[test]
    fn test_names_preserve_order() {
        let names = vec![
            "ost1".to_string(),
            "ost2".to_string(),
            "ost3".to_string(),
            "ost4".to_string(),
        ];
        let set = TargetSet::with_names(PathBuf::from("/data"), names.clone());
        assert_eq!(set.names(), names);
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let set = TargetSet::with_names(
            temp_dir.path().to_path_buf(),
            vec!["ost1".to_string(), "ost2".to_string()],
        );

        set.ensure_directories().unwrap();

        assert!(temp_dir.path().join("ost1").is_dir());
        assert!(temp_dir.path().join("ost2").is_dir());

        // 冪等
        set.ensure_directories().unwrap();
    }
}
