//! # File Selection Service
//!
//! アップロード対象ファイルの選別ルール

use crate::domain::entities::source_file::SourceFile;

/// 選別ルール
///
/// 拡張子（大文字小文字を区別）またはファイル名に含まれるパターン（区別しない）で判定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRules {
    /// 対象拡張子（ドットなし）
    pub extensions: Vec<String>,
    /// ファイル名パターン（大文字で保持）
    pub name_patterns: Vec<String>,
}

impl SelectionRules {
    /// 新しいルールを作成
    ///
    /// 拡張子の先頭ドットは取り除き、パターンは大文字に正規化する
    pub fn new<E, P>(extensions: E, name_patterns: P) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim().trim_start_matches('.').to_string())
                .filter(|e| !e.is_empty())
                .collect(),
            name_patterns: name_patterns
                .into_iter()
                .map(|p| p.as_ref().trim().to_uppercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }
}

impl Default for SelectionRules {
    fn default() -> Self {
        Self::new(["xml"], ["ORSTUP", "ORSTUL"])
    }
}

/// ファイル選別サービス
pub struct FileSelectionService;

impl FileSelectionService {
    /// ファイル名がアップロード対象かどうか
    pub fn is_eligible(name: &str, rules: &SelectionRules) -> bool {
        let by_extension = rules
            .extensions
            .iter()
            .any(|ext| name.ends_with(&format!(".{}", ext)));
        if by_extension {
            return true;
        }

        let upper = name.to_uppercase();
        rules
            .name_patterns
            .iter()
            .any(|pattern| upper.contains(pattern.as_str()))
    }

    /// 対象ファイルのみを残す（順序は維持）
    pub fn select(entries: Vec<SourceFile>, rules: &SelectionRules) -> Vec<SourceFile> {
        entries
            .into_iter()
            .filter(|entry| Self::is_eligible(&entry.name, rules))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_extension_is_eligible() {
        let rules = SelectionRules::default();
        assert!(FileSelectionService::is_eligible("driver_2024.xml", &rules));
    }

    #[test]
    fn test_extension_is_case_sensitive() {
        let rules = SelectionRules::default();
        assert!(!FileSelectionService::is_eligible("DRIVER.XML", &rules));
        assert!(!FileSelectionService::is_eligible("driver.xml.bak", &rules));
    }

    #[test]
    fn test_patterns_are_case_insensitive() {
        let rules = SelectionRules::default();
        assert!(FileSelectionService::is_eligible("report_orstup_01.txt", &rules));
        assert!(FileSelectionService::is_eligible("ORSTUL-2024.dat", &rules));
        assert!(FileSelectionService::is_eligible("x-OrStUp", &rules));
    }

    #[test]
    fn test_unrelated_file_is_not_eligible() {
        let rules = SelectionRules::default();
        assert!(!FileSelectionService::is_eligible("notes.txt", &rules));
        assert!(!FileSelectionService::is_eligible("ORSTU.txt", &rules));
    }

    #[test]
    fn test_rules_normalization() {
        let rules = SelectionRules::new([".csv", " ", "xml "], ["abc", ""]);
        assert_eq!(rules.extensions, vec!["csv".to_string(), "xml".to_string()]);
        assert_eq!(rules.name_patterns, vec!["ABC".to_string()]);
        assert!(FileSelectionService::is_eligible("data.csv", &rules));
        assert!(FileSelectionService::is_eligible("xAbCx", &rules));
    }

    #[test]
    fn test_empty_rules_select_nothing() {
        let rules = SelectionRules::new(Vec::<String>::new(), Vec::<String>::new());
        assert!(!FileSelectionService::is_eligible("driver.xml", &rules));
    }

    #[test]
    fn test_select_keeps_order() {
        let entries = vec![
            SourceFile::file("a.xml", "/d/a.xml", 1),
            SourceFile::file("b.txt", "/d/b.txt", 1),
            SourceFile::other("ORSTUP_dir", "/d/ORSTUP_dir"),
            SourceFile::file("c.xml", "/d/c.xml", 1),
        ];

        let selected = FileSelectionService::select(entries, &SelectionRules::default());
        let names: Vec<&str> = selected.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.xml", "ORSTUP_dir", "c.xml"]);
    }
}
