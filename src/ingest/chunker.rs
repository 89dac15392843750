//! Overlapping fixed-size text windows

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChunkError {
    #[error("Overlap ({overlap}) must be less than chunk size ({chunk_size})")]
    InvalidOverlap { chunk_size: usize, overlap: usize },
}

/// Split text into overlapping fixed-size character windows.
///
/// Starting at offset 0, each window covers `[start, start + chunk_size)`
/// clipped to the text length; `start` then advances by
/// `chunk_size - overlap`. The final window may be shorter than
/// `chunk_size` - down to a single character - when the text length is not
/// a clean multiple of the stride. Offsets are measured in characters, not
/// bytes.
///
/// An overlap of `chunk_size` or more would stop the window from advancing,
/// so it is rejected up front.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<String>, ChunkError> {
    if overlap >= chunk_size {
        return Err(ChunkError::InvalidOverlap {
            chunk_size,
            overlap,
        });
    }

    let chars: Vec<char> = text.chars().collect();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        start += chunk_size - overlap;
    }

    Ok(chunks)
}
