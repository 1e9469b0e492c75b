use pocket_jot::*;

#[test]
fn test_defaults() {
    let options = ExportOptions::default();
    assert!(options.show_fold_lines);
    assert!(!options.highlight_cover);
    assert_eq!(options.theme, Theme::Light);
    assert_eq!(options.pixel_ratio, 2.0);
    assert_eq!(options.jpeg_quality, 92);
    assert_eq!(options.file_name, "pocket-jot.pdf");
    assert!(options.validate().is_ok());
}

#[test]
fn test_validation_pixel_ratio() {
    for ratio in [0.0, -1.0, 8.5, f32::NAN] {
        let options = ExportOptions {
            pixel_ratio: ratio,
            ..ExportOptions::default()
        };
        match options.validate() {
            Err(BookletError::Config(msg)) => assert!(msg.contains("Pixel ratio")),
            _ => panic!("Expected Config error for ratio {}", ratio),
        }
    }

    let options = ExportOptions {
        pixel_ratio: 8.0,
        ..ExportOptions::default()
    };
    assert!(options.validate().is_ok());
}

#[test]
fn test_validation_quality_and_name() {
    let options = ExportOptions {
        jpeg_quality: 0,
        ..ExportOptions::default()
    };
    assert!(options.validate().is_err());

    let options = ExportOptions {
        jpeg_quality: 101,
        ..ExportOptions::default()
    };
    assert!(options.validate().is_err());

    let options = ExportOptions {
        file_name: "  ".to_string(),
        ..ExportOptions::default()
    };
    assert!(options.validate().is_err());
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_save_and_load_options() {
    use tempfile::NamedTempFile;

    let options = ExportOptions {
        show_fold_lines: false,
        highlight_cover: true,
        theme: Theme::Dark,
        pixel_ratio: 3.0,
        jpeg_quality: 80,
        file_name: "notes.pdf".to_string(),
    };

    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    // Save
    options.save(path).await.unwrap();

    // Load
    let loaded = ExportOptions::load(path).await.unwrap();
    assert_eq!(loaded, options);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_partial_config_uses_defaults() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    tokio::fs::write(temp_file.path(), r#"{ "theme": "dark", "highlight_cover": true }"#)
        .await
        .unwrap();

    let loaded = ExportOptions::load(temp_file.path()).await.unwrap();
    assert_eq!(loaded.theme, Theme::Dark);
    assert!(loaded.highlight_cover);
    assert!(loaded.show_fold_lines);
    assert_eq!(loaded.file_name, "pocket-jot.pdf");
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_invalid_config_file() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    tokio::fs::write(temp_file.path(), "not json").await.unwrap();

    match ExportOptions::load(temp_file.path()).await {
        Err(BookletError::Config(msg)) => assert!(msg.contains("Failed to parse config")),
        _ => panic!("Expected Config error"),
    }
}
