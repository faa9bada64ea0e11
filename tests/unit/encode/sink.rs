use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "texbake_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn file_path_appends_extension() {
    assert_eq!(
        encoded_file_path("out", "T_Rock", ImageFormat::Png),
        Path::new("out").join("T_Rock.png")
    );
    assert_eq!(
        encoded_file_path("out", "T_Rock", ImageFormat::Tiff),
        Path::new("out").join("T_Rock.tiff")
    );
}

#[test]
fn fs_sink_creates_parents_and_leaves_no_temp_file() {
    let tmp = temp_dir("sink_write");
    let path = tmp.join("a").join("b").join("T_Out.png");

    FsByteSink.write(&path, b"payload").unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"payload");
    let names: Vec<_> = std::fs::read_dir(path.parent().unwrap())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("T_Out.png")]);

    FsByteSink.write(&path, b"second").unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"second");

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn fs_sink_rejects_empty_content() {
    let tmp = temp_dir("sink_empty");
    let path = tmp.join("T_Empty.png");
    assert!(matches!(
        FsByteSink.write(&path, &[]),
        Err(BakeError::WriteFailed { .. })
    ));
    assert!(!path.exists());
}

#[test]
fn blocked_parent_is_a_directory_error() {
    let tmp = temp_dir("sink_blocked");
    std::fs::create_dir_all(&tmp).unwrap();
    let blocker = tmp.join("file");
    std::fs::write(&blocker, b"x").unwrap();

    let err = FsByteSink
        .write(&blocker.join("T_Out.png"), b"payload")
        .unwrap_err();
    assert!(matches!(err, BakeError::DirectoryCreateFailed { .. }));

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn memory_sink_captures_or_rejects() {
    let mut sink = InMemoryByteSink::new();
    sink.write(Path::new("x/T.png"), b"abc").unwrap();
    assert_eq!(sink.get(Path::new("x/T.png")), Some(&b"abc"[..]));
    assert_eq!(sink.files().len(), 1);

    let mut rejecting = InMemoryByteSink::rejecting();
    assert!(matches!(
        rejecting.write(Path::new("x/T.png"), b"abc"),
        Err(BakeError::WriteFailed { .. })
    ));
    assert!(rejecting.files().is_empty());
}
