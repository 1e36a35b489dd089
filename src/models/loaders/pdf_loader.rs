use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// 列出文件夹中所有待处理的 PDF 博莱托，按文件名排序
///
/// 子目录和非 PDF 文件会被跳过
pub async fn list_boleto_files(folder_path: &str) -> Result<Vec<PathBuf>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut boletos = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_file = entry
            .file_type()
            .await
            .map(|t| t.is_file())
            .unwrap_or(false);

        if is_file && is_pdf(&path) {
            boletos.push(path);
        } else {
            tracing::debug!("跳过非 PDF 条目: {}", path.display());
        }
    }

    boletos.sort();
    tracing::info!("在 {} 中找到 {} 个 PDF 文件", folder_path, boletos.len());

    Ok(boletos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_only_pdf_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.pdf"), b"%PDF").unwrap();
        std::fs::write(dir.path().join("a.PDF"), b"%PDF").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("sub.pdf")).unwrap();

        let files = list_boleto_files(dir.path().to_str().unwrap()).await.unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["a.PDF", "b.pdf"]);
    }

    #[tokio::test]
    async fn missing_folder_is_an_error() {
        let err = list_boleto_files("/definitely/not/here").await.unwrap_err();
        assert!(err.to_string().contains("文件夹不存在"));
    }
}
