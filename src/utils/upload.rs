use std::path::{Path, PathBuf};

use axum::extract::Multipart;
use chrono::NaiveDateTime;
use http::StatusCode;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub const HOMEWORK_FILES_DIR: &str = "homework_files";

/// A file part pulled out of a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Fields of the homework upload forms.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub comment: Option<String>,
}

fn clean_file_name(file_name: &str) -> String {
    let cleaned = sanitize_filename::sanitize(file_name.trim());
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// `{homework_id}_{student_id}_{YYYYMMDD_HHMMSS}_{original name}`
pub fn submission_file_name(
    homework_id: i32,
    student_id: i32,
    now: NaiveDateTime,
    original: &str,
) -> String {
    format!(
        "{}_{}_{}_{}",
        homework_id,
        student_id,
        now.format("%Y%m%d_%H%M%S"),
        clean_file_name(original)
    )
}

/// `attachment_{homework_id}_{YYYYMMDD_HHMMSS}_{original name}`
pub fn attachment_file_name(homework_id: i32, now: NaiveDateTime, original: &str) -> String {
    format!(
        "attachment_{}_{}_{}",
        homework_id,
        now.format("%Y%m%d_%H%M%S"),
        clean_file_name(original)
    )
}

pub fn homework_files_dir(upload_dir: &str) -> PathBuf {
    Path::new(upload_dir).join(HOMEWORK_FILES_DIR)
}

/// Writes `data` to `dir/file_name`, creating `dir` when missing.
pub async fn store_file(dir: &Path, file_name: &str, data: &[u8]) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir).await?;

    let path = dir.join(file_name);
    let mut file = fs::File::create(&path).await?;
    file.write_all(data).await?;
    file.flush().await?;

    Ok(path)
}

pub async fn read_upload_form(
    mut multipart: Multipart,
) -> Result<UploadForm, (StatusCode, String)> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Failed to read multipart field: {}", e),
        )
    })? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| {
                        (
                            StatusCode::BAD_REQUEST,
                            format!("Failed to read file data: {}", e),
                        )
                    })?
                    .to_vec();

                // Browsers send an empty part when no file was picked
                if !file_name.is_empty() {
                    form.file = Some(UploadedFile { file_name, data });
                }
            }
            "comment" => {
                let comment = field.text().await.map_err(|e| {
                    (
                        StatusCode::BAD_REQUEST,
                        format!("Failed to read comment field: {}", e),
                    )
                })?;
                let comment = comment.trim();
                if !comment.is_empty() {
                    form.comment = Some(comment.to_string());
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap()
    }

    #[test]
    fn submission_name_composes_ids_timestamp_and_name() {
        assert_eq!(
            submission_file_name(12, 7, now(), "essay.pdf"),
            "12_7_20261016_140509_essay.pdf"
        );
    }

    #[test]
    fn strips_path_separators_from_client_names() {
        let name = submission_file_name(1, 2, now(), "../../etc/passwd");
        assert!(!name.contains('/'));
        assert!(name.starts_with("1_2_20261016_140509_"));

        assert_eq!(
            attachment_file_name(3, now(), "   "),
            "attachment_3_20261016_140509_file"
        );
    }

    #[tokio::test]
    async fn stores_file_under_created_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path().join("nested").join(HOMEWORK_FILES_DIR);

        let path = store_file(&dir, "a.txt", b"hello").await.unwrap();

        assert_eq!(path, dir.join("a.txt"));
        assert_eq!(fs::read(&path).await.unwrap(), b"hello");
    }
}
