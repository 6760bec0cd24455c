//! Local .txt corpus preparation for knowledge-base ingestion

use std::path::Path;
use std::path::PathBuf;

use crate::errors::Result;
use crate::models::IngestDocument;

/// Collect the `.txt` files to ingest: the path itself when it is a file,
/// otherwise its direct `.txt` children, sorted for deterministic order.
pub fn collect_text_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let candidate = entry.path();
        if candidate.extension().is_some_and(|ext| ext == "txt") {
            files.push(candidate);
        }
    }
    files.sort();
    Ok(files)
}

/// Split file content into one document per non-empty paragraph, all
/// attributed to `source`. Blank-line runs between paragraphs are skipped.
pub fn chunk_paragraphs(source: &str, content: &str) -> Vec<IngestDocument> {
    content
        .split("\n\n")
        .map(str::trim)
        .filter(|body| !body.is_empty())
        .map(|body| IngestDocument {
            body: body.to_string(),
            source_document: source.to_string(),
            page_number: None,
        })
        .collect()
}

/// Read every collected file under `path` and chunk it into documents.
pub fn load_documents(path: &Path) -> Result<(Vec<PathBuf>, Vec<IngestDocument>)> {
    let files = collect_text_files(path)?;

    let mut documents = Vec::new();
    for file in &files {
        let source = file.file_name().map_or_else(
            || file.display().to_string(),
            |n| n.to_string_lossy().into_owned(),
        );
        let content = std::fs::read_to_string(file)?;
        documents.extend(chunk_paragraphs(&source, &content));
    }
    Ok((files, documents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_chunk_paragraphs_splits_on_blank_lines() {
        let docs = chunk_paragraphs(
            "bean_guide.txt",
            "Rust shows as orange pustules.\n\n\n\nRemove infected debris.\n",
        );
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].body, "Rust shows as orange pustules.");
        assert_eq!(docs[1].body, "Remove infected debris.");
        assert_eq!(docs[0].source_document, "bean_guide.txt");
        assert_eq!(docs[0].page_number, None);
    }

    #[test]
    fn test_chunk_paragraphs_on_blank_content_is_empty() {
        assert!(chunk_paragraphs("empty.txt", "\n\n  \n\n").is_empty());
    }

    #[test]
    fn test_collect_text_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "beans").unwrap();
        fs::write(dir.path().join("a.txt"), "apples").unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();

        let files = collect_text_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_collect_text_files_accepts_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("guide.txt");
        fs::write(&file, "soil").unwrap();

        assert_eq!(collect_text_files(&file).unwrap(), vec![file]);
    }

    #[test]
    fn test_load_documents_attributes_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("guide.txt"),
            "First passage.\n\nSecond passage.",
        )
        .unwrap();

        let (files, documents) = load_documents(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(documents.len(), 2);
        assert!(documents
            .iter()
            .all(|d| d.source_document == "guide.txt"));
    }
}
