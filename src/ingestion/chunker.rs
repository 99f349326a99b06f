//! Text chunking with overlapping character windows
//!
//! Splitting is by character count rather than token or sentence boundary so
//! that offset math stays deterministic: the same `(text, chunk_size,
//! overlap)` always yields the same chunk sequence, which duplicate-ingestion
//! detection upstream relies on.

use crate::error::{Error, Result};

/// A chunk of text with its character offsets into the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSpan {
    /// The chunk text (a substring of the source)
    pub text: String,
    /// Start offset in characters
    pub char_start: usize,
    /// End offset in characters (exclusive)
    pub char_end: usize,
    /// Sequential chunk index
    pub index: u32,
}

/// Text chunker with configurable window size and overlap
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Window size in characters
    chunk_size: usize,
    /// Overlap between consecutive windows
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker. Requires `0 < overlap < chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 || overlap == 0 {
            return Err(Error::Config(
                "chunk_size and overlap must be positive".to_string(),
            ));
        }
        if overlap >= chunk_size {
            return Err(Error::Config(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Split text into overlapping windows.
    ///
    /// Windows advance by `chunk_size - overlap`; the final window is clamped
    /// to the remaining text and never padded. Empty or whitespace-only input
    /// yields no chunks.
    pub fn chunk(&self, text: &str) -> Vec<ChunkSpan> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        // Byte offset of every character boundary, so windows measured in
        // characters can be sliced without splitting a UTF-8 sequence.
        let mut boundaries: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        boundaries.push(text.len());
        let char_count = boundaries.len() - 1;

        let stride = self.chunk_size - self.overlap;
        let mut spans = Vec::new();
        let mut start = 0usize;
        let mut index = 0u32;

        loop {
            let end = (start + self.chunk_size).min(char_count);
            spans.push(ChunkSpan {
                text: text[boundaries[start]..boundaries[end]].to_string(),
                char_start: start,
                char_end: end,
                index,
            });

            if end == char_count {
                break;
            }
            start += stride;
            index += 1;
        }

        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_overlap_not_smaller_than_size() {
        assert!(matches!(TextChunker::new(100, 100), Err(Error::Config(_))));
        assert!(matches!(TextChunker::new(100, 150), Err(Error::Config(_))));
        assert!(matches!(TextChunker::new(0, 0), Err(Error::Config(_))));
        assert!(matches!(TextChunker::new(100, 0), Err(Error::Config(_))));
        assert!(TextChunker::new(100, 1).is_ok());
    }

    #[test]
    fn short_text_yields_exactly_one_chunk() {
        let chunker = TextChunker::new(100, 20).unwrap();
        let spans = chunker.chunk("hello world");

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "hello world");
        assert_eq!(spans[0].char_start, 0);
        assert_eq!(spans[0].char_end, 11);
    }

    #[test]
    fn empty_and_whitespace_yield_no_chunks() {
        let chunker = TextChunker::new(100, 20).unwrap();
        assert!(chunker.chunk("").is_empty());
        assert!(chunker.chunk("   \n\t  ").is_empty());
    }

    #[test]
    fn windows_advance_by_size_minus_overlap() {
        let chunker = TextChunker::new(10, 4).unwrap();
        let text = "abcdefghijklmnopqrstuvwxyz";
        let spans = chunker.chunk(text);

        assert_eq!(spans[0].text, "abcdefghij");
        assert_eq!(spans[1].char_start, 6);
        assert_eq!(spans[1].text, "ghijklmnop");
        assert_eq!(spans[2].char_start, 12);

        // Final window is clamped, never padded.
        let last = spans.last().unwrap();
        assert_eq!(last.char_end, 26);
        assert!(last.text.len() <= 10);
    }

    #[test]
    fn chunking_is_deterministic() {
        let chunker = TextChunker::new(13, 5).unwrap();
        let text = "The quick brown fox jumps over the lazy dog, again and again.";

        let a = chunker.chunk(text);
        let b = chunker.chunk(text);
        assert_eq!(a, b);
    }

    #[test]
    fn concatenated_spans_reconstruct_the_source() {
        let chunker = TextChunker::new(10, 3).unwrap();
        let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit.";
        let spans = chunker.chunk(text);

        // Take each span's portion past the previous span's end; the union
        // must cover the source with no gaps.
        let mut rebuilt = String::new();
        let mut covered = 0usize;
        for span in &spans {
            assert!(span.char_start <= covered, "gap at chunk {}", span.index);
            let skip = covered - span.char_start;
            rebuilt.extend(span.text.chars().skip(skip));
            covered = span.char_end;
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn multibyte_text_is_sliced_on_char_boundaries() {
        let chunker = TextChunker::new(4, 1).unwrap();
        let text = "héllo wörld ünïcode";
        let spans = chunker.chunk(text);

        let total_chars: usize = text.chars().count();
        assert_eq!(spans.last().unwrap().char_end, total_chars);
        for span in &spans {
            assert_eq!(span.text.chars().count(), span.char_end - span.char_start);
        }
    }

    #[test]
    fn text_exactly_chunk_size_yields_one_chunk() {
        let chunker = TextChunker::new(5, 2).unwrap();
        let spans = chunker.chunk("abcde");

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "abcde");
    }
}
