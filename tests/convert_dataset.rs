//! Integration tests for the batch conversion pass.

use std::fs;

use oid2yolo::conversion::{convert_dataset, ConversionIssueCode, ConvertOptions};
use oid2yolo::ir::{ClassMap, ClassMapSource, DatasetLayout};

mod common;
use common::{class_dir, create_sample_dataset, read, write_image, write_label};

fn convert(root: &std::path::Path, opts: &ConvertOptions) -> oid2yolo::conversion::ConversionReport {
    let layout = DatasetLayout::discover(root).expect("discover layout");
    convert_dataset(&layout, &ClassMap::builtin(), opts).expect("convert dataset")
}

#[test]
fn converts_sample_dataset_in_place() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_sample_dataset(temp.path());

    let report = convert(temp.path(), &ConvertOptions::default());

    let hammer = class_dir(temp.path(), "train", "Hammer");
    assert_eq!(
        read(&hammer.join("Label/h1.txt")),
        "0 0.200000 0.250000 0.200000 0.300000\n0 0.500000 0.500000 1.000000 1.000000\n"
    );

    let pipes = class_dir(temp.path(), "train", "Pipes");
    assert_eq!(
        read(&pipes.join("Label/p1.txt")),
        "1 0.250000 0.500000 0.500000 1.000000\n"
    );

    let wrench = class_dir(temp.path(), "validation", "Wrench");
    assert_eq!(
        read(&wrench.join("Label/w1.txt")),
        "0 0.250000 0.250000 0.500000 0.500000\n"
    );

    assert_eq!(report.counts.splits, 3);
    assert_eq!(report.counts.class_dirs, 4);
    assert_eq!(report.counts.class_dirs_without_labels, 1);
    assert_eq!(report.counts.label_files, 4);
    assert_eq!(report.counts.files_converted, 4);
    assert_eq!(report.counts.lines_converted, 4);
    assert_eq!(report.counts.lines_dropped_malformed, 1);
    assert_eq!(report.counts.lines_dropped_missing_image, 1);
    assert!(!report.dry_run);
}

#[test]
fn missing_image_drops_lines_from_output() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_sample_dataset(temp.path());

    let report = convert(temp.path(), &ConvertOptions::default());

    let h2 = class_dir(temp.path(), "train", "Hammer").join("Label/h2.txt");
    assert_eq!(read(&h2), "\n");

    let missing: Vec<_> = report
        .issues_with_code(ConversionIssueCode::MissingImage)
        .collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].path, h2);
}

#[test]
fn unreadable_image_drops_lines_from_output() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let hammer = class_dir(temp.path(), "train", "Hammer");
    fs::create_dir_all(&hammer).expect("create class dir");
    fs::write(hammer.join("bad.jpg"), b"definitely not an image").expect("write junk image");
    write_label(&hammer.join("Label/bad.txt"), "Hammer 1 2 3 4\n");

    let report = convert(temp.path(), &ConvertOptions::default());

    assert_eq!(read(&hammer.join("Label/bad.txt")), "\n");
    assert_eq!(report.counts.lines_dropped_missing_image, 1);
    assert_eq!(
        report
            .issues_with_code(ConversionIssueCode::UnreadableImage)
            .count(),
        1
    );
}

#[test]
fn short_line_is_dropped_and_later_lines_survive() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let pipes = class_dir(temp.path(), "train", "Pipes");
    write_image(&pipes.join("p.jpg"), 100, 100);
    write_label(
        &pipes.join("Label/p.txt"),
        "Pipes 10 10 20 20\nPipes 1 2 3\nPipes 50 50 100 100\n",
    );

    let report = convert(temp.path(), &ConvertOptions::default());

    assert_eq!(
        read(&pipes.join("Label/p.txt")),
        "1 0.150000 0.150000 0.100000 0.100000\n1 0.750000 0.750000 0.500000 0.500000\n"
    );
    let malformed: Vec<_> = report
        .issues_with_code(ConversionIssueCode::MalformedLine)
        .collect();
    assert_eq!(malformed.len(), 1);
    assert_eq!(malformed[0].line, Some(2));
}

#[test]
fn class_dir_without_label_dir_is_skipped() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let empty = class_dir(temp.path(), "train", "Hammer");
    write_image(&empty.join("lonely.jpg"), 10, 10);

    let report = convert(temp.path(), &ConvertOptions::default());

    assert_eq!(report.counts.class_dirs_without_labels, 1);
    assert_eq!(report.counts.label_files, 0);
    assert!(!empty.join("Label").exists());
    let entries: Vec<_> = fs::read_dir(&empty).expect("read class dir").collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn dry_run_writes_nothing() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_sample_dataset(temp.path());
    let h1 = class_dir(temp.path(), "train", "Hammer").join("Label/h1.txt");
    let before = read(&h1);

    let report = convert(
        temp.path(),
        &ConvertOptions {
            dry_run: true,
            ..Default::default()
        },
    );

    assert!(report.dry_run);
    assert_eq!(report.counts.lines_converted, 4);
    assert_eq!(read(&h1), before);
    assert!(!h1.with_extension("txt.tmp").exists());
}

#[test]
fn backup_keeps_original_content() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_sample_dataset(temp.path());
    let h1 = class_dir(temp.path(), "train", "Hammer").join("Label/h1.txt");
    let original = read(&h1);

    let opts = ConvertOptions {
        backup: true,
        ..Default::default()
    };
    convert(temp.path(), &opts);

    let backup = h1.with_extension("txt.bak");
    assert_eq!(read(&backup), original);
    assert_ne!(read(&h1), original);

    // A forced second pass must not clobber the pristine backup.
    let report = convert(
        temp.path(),
        &ConvertOptions {
            backup: true,
            force: true,
            ..Default::default()
        },
    );
    assert_eq!(read(&backup), original);
    assert!(report
        .issues_with_code(ConversionIssueCode::BackupKept)
        .next()
        .is_some());
}

#[test]
fn second_run_skips_already_normalized_files() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_sample_dataset(temp.path());
    convert(temp.path(), &ConvertOptions::default());

    let h1 = class_dir(temp.path(), "train", "Hammer").join("Label/h1.txt");
    let converted = read(&h1);

    let report = convert(temp.path(), &ConvertOptions::default());

    assert_eq!(read(&h1), converted);
    // h1, p1 and w1 are normalized; h2 is empty and rewritten as-is.
    assert_eq!(report.counts.files_skipped_normalized, 3);
    assert_eq!(report.counts.files_converted, 1);
    assert_eq!(report.counts.lines_converted, 0);
    assert!(report.has_losses());
}

#[test]
fn force_reconverts_normalized_files() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let hammer = class_dir(temp.path(), "train", "Hammer");
    write_image(&hammer.join("a.jpg"), 10, 10);
    write_label(&hammer.join("Label/a.txt"), "0 0.5 0.5 1.0 1.0\n");

    let report = convert(
        temp.path(),
        &ConvertOptions {
            force: true,
            ..Default::default()
        },
    );

    assert_eq!(report.counts.files_skipped_normalized, 0);
    assert_eq!(report.counts.lines_converted, 1);
    // Treated as pixel corners (0.5,0.5)-(1,1) on a 10x10 image.
    assert_eq!(
        read(&hammer.join("Label/a.txt")),
        "0 0.075000 0.075000 0.050000 0.050000\n"
    );
}

#[test]
fn classes_txt_overrides_builtin_map() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_sample_dataset(temp.path());
    let classes = temp.path().join("classes.txt");
    fs::write(&classes, "Pipes\nWrench\nHammer\n").expect("write classes");

    let class_map = ClassMap::load(&classes).expect("load classes");
    assert_eq!(class_map.source(), &ClassMapSource::ClassesTxt);

    let layout = DatasetLayout::discover(temp.path()).expect("discover layout");
    let report =
        convert_dataset(&layout, &class_map, &ConvertOptions::default()).expect("convert");

    assert_eq!(report.class_map, "classes_txt");
    let w1 = class_dir(temp.path(), "validation", "Wrench").join("Label/w1.txt");
    assert!(read(&w1).starts_with("1 "));
    let h1 = class_dir(temp.path(), "train", "Hammer").join("Label/h1.txt");
    assert!(read(&h1).starts_with("2 "));
    assert_eq!(
        report
            .issues_with_code(ConversionIssueCode::UnknownClass)
            .count(),
        0
    );
}

#[test]
fn unknown_class_uses_default_id_with_note() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_sample_dataset(temp.path());

    let report = convert(temp.path(), &ConvertOptions::default());

    let unknown: Vec<_> = report
        .issues_with_code(ConversionIssueCode::UnknownClass)
        .collect();
    assert_eq!(unknown.len(), 1);
    assert!(unknown[0].message.contains("Wrench"));
}

#[test]
fn nan_and_infinite_coordinates_are_dropped_as_malformed() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let hammer = class_dir(temp.path(), "train", "Hammer");
    write_image(&hammer.join("n.jpg"), 100, 100);
    write_label(
        &hammer.join("Label/n.txt"),
        "Hammer nan 0 10 10\nHammer 0 0 inf 10\nHammer 10 10 20 20\n",
    );

    let report = convert(temp.path(), &ConvertOptions::default());

    assert_eq!(
        read(&hammer.join("Label/n.txt")),
        "0 0.150000 0.150000 0.100000 0.100000\n"
    );
    assert_eq!(report.counts.lines_dropped_malformed, 2);
    assert_eq!(report.counts.lines_converted, 1);
    let lines: Vec<_> = report
        .issues_with_code(ConversionIssueCode::MalformedLine)
        .map(|issue| issue.line)
        .collect();
    assert_eq!(lines, [Some(1), Some(2)]);
}

#[test]
fn box_past_image_edge_is_not_converted_twice() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let hammer = class_dir(temp.path(), "train", "Hammer");
    write_image(&hammer.join("edge.jpg"), 100, 100);
    let label = hammer.join("Label/edge.txt");
    write_label(&label, "Hammer 90 0 150 10\n");

    convert(temp.path(), &ConvertOptions::default());
    assert_eq!(read(&label), "0 1.200000 0.050000 0.600000 0.100000\n");

    let report = convert(temp.path(), &ConvertOptions::default());

    assert_eq!(read(&label), "0 1.200000 0.050000 0.600000 0.100000\n");
    assert_eq!(report.counts.files_skipped_normalized, 1);
    assert_eq!(report.counts.files_converted, 0);
    assert_eq!(
        report
            .issues_with_code(ConversionIssueCode::AlreadyNormalized)
            .count(),
        1
    );
}

#[test]
fn skipped_file_still_reports_malformed_lines() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let hammer = class_dir(temp.path(), "train", "Hammer");
    write_image(&hammer.join("s.jpg"), 100, 100);
    let label = hammer.join("Label/s.txt");
    write_label(&label, "0 0.5 0.5 0.1 0.1\n0 0.5\n");

    let report = convert(temp.path(), &ConvertOptions::default());

    assert_eq!(read(&label), "0 0.5 0.5 0.1 0.1\n0 0.5\n");
    assert_eq!(report.counts.files_skipped_normalized, 1);
    // The file is untouched, so nothing was dropped from it.
    assert_eq!(report.counts.lines_dropped_malformed, 0);
    let malformed: Vec<_> = report
        .issues_with_code(ConversionIssueCode::MalformedLine)
        .collect();
    assert_eq!(malformed.len(), 1);
    assert_eq!(malformed[0].path, label);
    assert_eq!(malformed[0].line, Some(2));
}
