#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
    let row_stride = (width * 3).div_ceil(4) * 4;
    let pixel_array_size = row_stride * height;
    let file_size = 54 + pixel_array_size;

    let mut bytes = Vec::with_capacity(file_size as usize);
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&file_size.to_le_bytes());
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(&54u32.to_le_bytes());

    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&(width as i32).to_le_bytes());
    bytes.extend_from_slice(&(height as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&pixel_array_size.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());

    bytes.resize(file_size as usize, 0);
    bytes
}

/// Write a BMP image. The extension does not matter: dimensions are read
/// from the header, so `.jpg` paths work too.
pub fn write_image(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, bmp_bytes(width, height)).expect("write image file");
}

pub fn write_label(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, content).expect("write label file");
}

/// `<root>/OID/Dataset/<split>/<class>`
pub fn class_dir(root: &Path, split: &str, class: &str) -> PathBuf {
    root.join("OID/Dataset").join(split).join(class)
}

/// Builds a small Open Images tree:
///
/// - train/Hammer: `h1` (100x200, two boxes), `h2` (no image)
/// - train/Pipes: `p1` (50x50, one box plus a short line)
/// - validation/Wrench: `w1` (10x10, unknown class)
/// - test/Empty: no Label/ directory
pub fn create_sample_dataset(root: &Path) {
    let hammer = class_dir(root, "train", "Hammer");
    write_image(&hammer.join("h1.jpg"), 100, 200);
    write_label(
        &hammer.join("Label/h1.txt"),
        "Hammer 10 20 30 80\nHammer 0 0 100 200\n",
    );
    write_label(&hammer.join("Label/h2.txt"), "Hammer 1 2 3 4\n");

    let pipes = class_dir(root, "train", "Pipes");
    write_image(&pipes.join("p1.jpg"), 50, 50);
    write_label(&pipes.join("Label/p1.txt"), "Pipes 10 10 20\nPipes 0 0 25 50\n");

    let wrench = class_dir(root, "validation", "Wrench");
    write_image(&wrench.join("w1.jpg"), 10, 10);
    write_label(&wrench.join("Label/w1.txt"), "Wrench 0 0 5 5\n");

    fs::create_dir_all(class_dir(root, "test", "Empty")).expect("create empty class dir");
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read file")
}
