//! Thumbnail cache: stores fixed-size thumbnail records and loads them back.
//!
//! Run with:
//!   cargo run --example thumbnail-cache

use std::fs;

use bytemuck::{Pod, Zeroable};
use recordio::{RecordReader, RecordWriter};

const THUMB_WIDTH: usize = 20;
const THUMB_HEIGHT: usize = 15;
const THUMB_PIXELS: usize = 3 * THUMB_WIDTH * THUMB_HEIGHT;

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct Thumbnail {
    filename: [u8; 256],
    pixels: [u8; THUMB_PIXELS],
}

impl Thumbnail {
    fn new(name: &str, shade: u8) -> Self {
        let mut filename = [0u8; 256];
        let len = name.len().min(filename.len() - 1);
        filename[..len].copy_from_slice(&name.as_bytes()[..len]);
        Self {
            filename,
            pixels: [shade; THUMB_PIXELS],
        }
    }

    fn name(&self) -> String {
        let end = self
            .filename
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.filename.len());
        String::from_utf8_lossy(&self.filename[..end]).into_owned()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cache_dir = std::env::temp_dir().join(format!("recordio-thumbs-{}", std::process::id()));
    fs::create_dir_all(&cache_dir)?;
    let cache_path = cache_dir.join("thumbnails.bin");

    let thumbnails: Vec<Thumbnail> = (0..16u8)
        .map(|i| Thumbnail::new(&format!("photos/img_{i:03}.jpg"), i * 16))
        .collect();

    let mut writer = RecordWriter::create(&cache_path)?;
    for thumbnail in &thumbnails {
        writer.write_pod(thumbnail)?;
    }
    writer.close()?;
    eprintln!("Wrote {} thumbnails to {}", thumbnails.len(), cache_path.display());

    let mut reader = RecordReader::open(&cache_path)?;
    let loaded: Vec<Thumbnail> = reader.read_all_pods();
    eprintln!(
        "Loaded {} thumbnails ({:?}).",
        loaded.len(),
        reader.stop_reason()
    );
    if let Some(last) = loaded.last() {
        eprintln!("Last: {} (shade {})", last.name(), last.pixels[0]);
    }

    let _ = fs::remove_dir_all(&cache_dir);
    Ok(())
}
