//! Overlapping text chunking for long documents
//!
//! Sizes and offsets are counted in chars, not bytes, so every slice falls on
//! a UTF-8 boundary.

use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;

/// One window of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// Zero-based position in the chunk sequence
    pub index: usize,
    /// Char offset of the first char (inclusive)
    pub start: usize,
    /// Char offset past the last char (exclusive)
    pub end: usize,
    /// The chunk text
    pub text: String,
}

impl TextChunk {
    /// Length in chars
    pub fn char_len(&self) -> usize {
        self.end - self.start
    }
}

/// Splits text into overlapping windows of bounded size
#[derive(Debug, Clone, Copy)]
pub struct TextChunker {
    max_chunk_size: usize,
    overlap: usize,
}

impl TextChunker {
    /// Create a new text chunker
    ///
    /// Fails unless `max_chunk_size > 0` and `overlap < max_chunk_size`.
    pub fn new(max_chunk_size: usize, overlap: usize) -> Result<Self, AnalysisError> {
        if max_chunk_size == 0 {
            return Err(AnalysisError::Configuration(
                "max_chunk_size must be greater than 0".to_string(),
            ));
        }
        if overlap >= max_chunk_size {
            return Err(AnalysisError::Configuration(format!(
                "overlap ({}) must be smaller than max_chunk_size ({})",
                overlap, max_chunk_size
            )));
        }
        Ok(Self {
            max_chunk_size,
            overlap,
        })
    }

    /// Create a chunker from analyzer settings
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self, AnalysisError> {
        Self::new(config.max_chunk_size, config.chunk_overlap)
    }

    /// Maximum chunk size in chars
    pub fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }

    /// Overlap between neighbouring chunks in chars
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Chunk the given text
    pub fn chunk(&self, text: &str) -> Vec<String> {
        self.chunk_spans(text).into_iter().map(|c| c.text).collect()
    }

    /// Chunk the given text, keeping each chunk's char offsets
    ///
    /// Empty text yields no chunks. Text that fits in one window yields exactly
    /// one chunk equal to the text. Otherwise chunk `k + 1` starts `overlap`
    /// chars before chunk `k` ends, so the chunks tile the text with no gaps.
    pub fn chunk_spans(&self, text: &str) -> Vec<TextChunk> {
        let chars: Vec<char> = text.chars().collect();
        let total = chars.len();

        if total == 0 {
            return Vec::new();
        }
        if total <= self.max_chunk_size {
            return vec![TextChunk {
                index: 0,
                start: 0,
                end: total,
                text: text.to_string(),
            }];
        }

        // Byte offset of every char, plus the end of the text
        let offsets: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();

        // Snapping shortens a stride, so it is only allowed while the count
        // stays within ceil(total / step) + 1
        let step = self.max_chunk_size - self.overlap;
        let budget = total.div_ceil(step) + 1;

        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let mut end = (start + self.max_chunk_size).min(total);
            if end < total {
                if let Some(boundary) = self.find_boundary(&chars, start, end) {
                    let after = self.windows_from(boundary - self.overlap, total);
                    if chunks.len() + 1 + after <= budget {
                        end = boundary;
                    }
                }
            }

            chunks.push(TextChunk {
                index: chunks.len(),
                start,
                end,
                text: text[offsets[start]..offsets[end]].to_string(),
            });

            if end == total {
                break;
            }

            // end > start + overlap always holds, so the window moves forward
            start = end - self.overlap;
        }

        chunks
    }

    /// Number of windows needed to cover `[start, total)` with hard cuts
    fn windows_from(&self, start: usize, total: usize) -> usize {
        let remaining = total - start;
        if remaining <= self.max_chunk_size {
            1
        } else {
            1 + (remaining - self.max_chunk_size).div_ceil(self.max_chunk_size - self.overlap)
        }
    }

    /// Find a break position near the end of the window `[start, end)`
    ///
    /// Only the last tenth of a step is searched. Paragraph breaks beat line
    /// breaks, which beat any other whitespace. The returned position sits just
    /// after the separator.
    fn find_boundary(&self, chars: &[char], start: usize, end: usize) -> Option<usize> {
        let lookback = (self.max_chunk_size - self.overlap) / 10;
        let floor = end.saturating_sub(lookback).max(start + self.overlap + 1);
        if floor > end {
            return None;
        }

        last_break(floor, end, |p| p >= 2 && chars[p - 1] == '\n' && chars[p - 2] == '\n')
            .or_else(move || last_break(floor, end, |p| chars[p - 1] == '\n'))
            .or_else(move || last_break(floor, end, |p| chars[p - 1].is_whitespace()))
    }
}

/// Highest position in `floor..=end` accepted by `is_break`
fn last_break(floor: usize, end: usize, is_break: impl Fn(usize) -> bool) -> Option<usize> {
    (floor..=end).rev().find(|&p| is_break(p))
}
