use std::fs;
use tempfile::TempDir;
use work_splitter::{split_file, Catalog, ParserState, SegmenterOptions, SplitError, WorkStatus};

/// A miniature complete-works file: header, table of contents, then every
/// catalog work with a cast list ahead of its first act.
fn anthology(catalog: &Catalog) -> String {
    let mut text = String::from("The Project Gutenberg eBook\n\nContents\n\n");
    for entry in catalog.entries() {
        text.push_str(&format!("    {}\n", entry.title));
    }
    text.push('\n');
    for entry in catalog.entries() {
        text.push_str(&format!("{}\n\n", entry.title));
        if entry.retain {
            text.push_str("Dramatis Personae\n\nA LORD\nA LADY\n\n");
            text.push_str("ACT I.\n\nSCENE I. A room.\n\nEnter a Lord.\n");
        } else {
            text.push_str("From fairest creatures we desire increase,\n");
        }
        text.push('\n');
    }
    text.push_str("*** END OF THE PROJECT GUTENBERG EBOOK ***\n");
    text
}

#[test]
fn test_pg100_layout_splits_every_play() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("pg100.txt");
    let out = temp.path().join("plays");
    let catalog = Catalog::pg100();
    fs::write(&input, anthology(&catalog)).unwrap();

    let mut saved = Vec::new();
    let report = split_file(&input, &out, &catalog, SegmenterOptions::default(), |w| {
        saved.push(w.output_id.clone())
    })
    .unwrap();

    assert_eq!(report.final_state, ParserState::Extracting);
    assert_eq!(report.saved, 38);
    assert_eq!(saved.len(), 38);
    assert_eq!(report.unmatched().count(), 0);
    assert_eq!(fs::read_dir(&out).unwrap().count(), 38);
    assert!(!out.join("the_sonnets.txt").exists());
    assert!(!out.join("venus_and_adonis.txt").exists());

    let hamlet = fs::read_to_string(out.join("hamlet.txt")).unwrap();
    assert_eq!(
        hamlet,
        "THE TRAGEDY OF HAMLET, PRINCE OF DENMARK\nACT I.\n\nSCENE I. A room.\n\nEnter a Lord.\n\n"
    );

    // The final work runs to the end of the input.
    let tale = fs::read_to_string(out.join("the_winters_tale.txt")).unwrap();
    assert!(tale.starts_with("THE WINTER'S TALE\nACT I.\n"));
    assert!(!tale.contains("END OF THE PROJECT GUTENBERG"));
}

#[test]
fn test_rerun_is_byte_identical() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("pg100.txt");
    let catalog = Catalog::pg100();
    fs::write(&input, anthology(&catalog)).unwrap();

    let first = split_file(&input, &temp.path().join("one"), &catalog, SegmenterOptions::default(), |_| {}).unwrap();
    let second = split_file(&input, &temp.path().join("two"), &catalog, SegmenterOptions::default(), |_| {}).unwrap();

    for (a, b) in first.works.iter().zip(&second.works) {
        match (&a.status, &b.status) {
            (WorkStatus::Saved { sink: x, .. }, WorkStatus::Saved { sink: y, .. }) => {
                assert_eq!(x.sha256, y.sha256, "{}", a.output_id);
                assert_eq!(x.bytes, y.bytes);
            }
            (x, y) => assert_eq!(x, y),
        }
    }

    for entry in catalog.entries().iter().filter(|e| e.retain) {
        let name = format!("{}.txt", entry.output_id);
        assert_eq!(
            fs::read(temp.path().join("one").join(&name)).unwrap(),
            fs::read(temp.path().join("two").join(&name)).unwrap()
        );
    }
}

#[test]
fn test_custom_catalog_file() {
    let temp = TempDir::new().unwrap();
    let catalog_path = temp.path().join("catalog.toml");
    fs::write(
        &catalog_path,
        r#"
[[works]]
title = "ALPHA"
output = "a"

[[works]]
title = "BETA"
retain = false
output = "b"

[[works]]
title = "GAMMA"
output = "c"
"#,
    )
    .unwrap();
    let catalog = Catalog::load(&catalog_path).unwrap();

    let input = temp.path().join("input.txt");
    fs::write(
        &input,
        "Contents\nALPHA\nBETA\nGAMMA\nALPHA\nSome body text.\nBETA\nUnwanted.\nGAMMA\nKeep this.\n",
    )
    .unwrap();
    let out = temp.path().join("out");
    let report = split_file(&input, &out, &catalog, SegmenterOptions::default(), |_| {}).unwrap();

    assert_eq!(report.saved, 2);
    assert_eq!(fs::read_to_string(out.join("a.txt")).unwrap(), "ALPHA\nSome body text.\n");
    assert_eq!(fs::read_to_string(out.join("c.txt")).unwrap(), "GAMMA\nKeep this.\n");
    assert!(!out.join("b.txt").exists());
}

#[test]
fn test_long_preamble_without_marker_kept_whole() {
    let temp = TempDir::new().unwrap();
    let catalog = Catalog::from_toml_str(
        "[[works]]\ntitle = \"ALPHA\"\noutput = \"a\"\n",
    )
    .unwrap();

    let mut text = String::from("Contents\nALPHA\nALPHA\n");
    for i in 0..1000 {
        text.push_str(&format!("line {i}\n"));
    }
    // Too late: the preamble window has already been resolved.
    text.push_str("ACT I\nbody\n");
    let input = temp.path().join("input.txt");
    fs::write(&input, &text).unwrap();

    let out = temp.path().join("out");
    let report = split_file(&input, &out, &catalog, SegmenterOptions::default(), |_| {}).unwrap();

    let written = fs::read_to_string(out.join("a.txt")).unwrap();
    assert_eq!(written.lines().count(), 1003);
    assert!(written.starts_with("ALPHA\nline 0\n"));
    assert!(written.ends_with("line 999\nACT I\nbody\n"));
    assert!(matches!(
        report.works[0].status,
        WorkStatus::Saved {
            preamble_discarded: 0,
            lines_written: 1003,
            ..
        }
    ));
}

#[test]
fn test_read_failure_removes_work_in_progress() {
    let temp = TempDir::new().unwrap();
    let catalog = Catalog::from_toml_str(
        "[[works]]\ntitle = \"ALPHA\"\noutput = \"a\"\n\n[[works]]\ntitle = \"GAMMA\"\noutput = \"c\"\n",
    )
    .unwrap();

    let input = temp.path().join("input.txt");
    let mut bytes = b"Contents\nALPHA\nGAMMA\nALPHA\nbody a\nGAMMA\nbody c\n".to_vec();
    bytes.extend_from_slice(b"\xff\xfe broken\n");
    fs::write(&input, bytes).unwrap();

    let out = temp.path().join("out");
    let result = split_file(&input, &out, &catalog, SegmenterOptions::default(), |_| {});

    assert!(matches!(result, Err(SplitError::Io(_))));
    assert_eq!(fs::read_to_string(out.join("a.txt")).unwrap(), "ALPHA\nbody a\n");
    assert!(!out.join("c.txt").exists());
}
