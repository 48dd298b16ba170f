//! Boundary-preferring text chunking with exact overlap

use unicode_segmentation::UnicodeSegmentation;
use uuid::Uuid;

use super::loader::Segment;
use crate::types::Passage;

/// Splits segment text into fixed-size passages with overlap
///
/// Each cut point prefers, in order, a paragraph break, a sentence
/// boundary, then a word boundary inside the window, falling back to a
/// hard cut when none fits. Consecutive passages from the same segment
/// share exactly `overlap` characters, so a sentence straddling a cut
/// survives intact in one of its neighbors.
pub struct TextChunker {
    /// Target passage size in characters
    chunk_size: usize,
    /// Characters shared between consecutive passages
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker
    ///
    /// `overlap` is clamped below `chunk_size` so the window always advances.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            overlap: overlap.min(chunk_size - 1),
        }
    }

    /// Chunk loaded segments into passages in document traversal order
    ///
    /// Segments are chunked independently, so a passage never spans a page
    /// boundary. Segments without visible text yield no passages; whitespace
    /// runs inside a text-bearing segment stay in place, so consecutive
    /// passages always share exactly the overlap region.
    pub fn chunk_segments(&self, document_id: Uuid, segments: &[Segment]) -> Vec<Passage> {
        let mut passages = Vec::new();

        for segment in segments {
            if segment.text.trim().is_empty() {
                continue;
            }

            let chars: Vec<char> = segment.text.chars().collect();
            for (start, end) in self.split_spans(&chars) {
                let text: String = chars[start..end].iter().collect();
                let index = passages.len() as u32;
                passages.push(Passage::new(
                    document_id,
                    text,
                    segment.page,
                    index,
                    start,
                    end,
                ));
            }
        }

        passages
    }

    /// Compute passage spans as character offsets into the segment
    fn split_spans(&self, chars: &[char]) -> Vec<(usize, usize)> {
        let total = chars.len();
        if total <= self.chunk_size {
            return vec![(0, total)];
        }

        let mut spans = Vec::new();
        let mut start = 0usize;

        loop {
            let hard_end = usize::min(start + self.chunk_size, total);
            if hard_end == total {
                spans.push((start, total));
                break;
            }

            let end = self.find_cut(chars, start, hard_end);
            spans.push((start, end));
            start = end - self.overlap;
        }

        spans
    }

    /// Pick the cut point for one window, preferring natural boundaries
    fn find_cut(&self, chars: &[char], start: usize, hard_end: usize) -> usize {
        // A cut inside the overlap zone would stop the window advancing
        let min_end = start + self.overlap + 1;

        if let Some(end) = Self::last_paragraph_break(chars, start, hard_end) {
            if end >= min_end {
                return end;
            }
        }

        let window: String = chars[start..hard_end].iter().collect();

        if let Some(offset) = Self::last_boundary(window.split_sentence_bounds()) {
            let end = start + offset;
            if end >= min_end {
                return end;
            }
        }

        if let Some(offset) = Self::last_boundary(window.split_word_bounds()) {
            let end = start + offset;
            if end >= min_end {
                return end;
            }
        }

        hard_end
    }

    /// Find the last blank line in the window and cut just after it
    fn last_paragraph_break(chars: &[char], start: usize, hard_end: usize) -> Option<usize> {
        (start..hard_end.saturating_sub(1))
            .rev()
            .find(|&i| chars[i] == '\n' && chars[i + 1] == '\n')
            .map(|i| i + 2)
    }

    /// Character offset of the last internal boundary a segmenter produces
    fn last_boundary<'a>(parts: impl Iterator<Item = &'a str>) -> Option<usize> {
        let mut last = None;
        let mut offset = 0usize;

        for part in parts {
            if offset > 0 {
                last = Some(offset);
            }
            offset += part.chars().count();
        }

        last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(page: Option<u32>, text: &str) -> Segment {
        Segment {
            page,
            text: text.to_string(),
        }
    }

    fn chunk(text: &str) -> Vec<Passage> {
        TextChunker::new(1000, 100).chunk_segments(Uuid::new_v4(), &[segment(None, text)])
    }

    #[test]
    fn test_short_text_single_passage() {
        let text = "a".repeat(1000);
        let passages = chunk(&text);

        assert_eq!(passages.len(), 1);
        assert_eq!(passages[0].text, text);
        assert_eq!(passages[0].char_start, 0);
        assert_eq!(passages[0].char_end, 1000);
    }

    #[test]
    fn test_text_one_over_limit_splits_in_two() {
        let passages = chunk(&"a".repeat(1001));

        assert_eq!(passages.len(), 2);
        assert_eq!((passages[0].char_start, passages[0].char_end), (0, 1000));
        assert_eq!((passages[1].char_start, passages[1].char_end), (900, 1001));
    }

    #[test]
    fn test_cut_prefers_paragraph_break() {
        let text = format!("{}\n\n{}", "a".repeat(300), "b".repeat(900));
        let passages = chunk(&text);

        assert_eq!(passages.len(), 2);
        // Break at offset 300 wins over later sentence and word candidates
        assert_eq!(passages[0].char_end, 302);
        assert!(passages[0].text.ends_with("\n\n"));
        assert_eq!(passages[1].char_start, 202);
        assert_eq!(passages[1].char_end, 1202);
    }

    #[test]
    fn test_cut_prefers_sentence_boundary() {
        // 70 characters per sentence, 15 sentences, no blank lines
        let sentence = "The quick brown fox jumps over the lazy dog near the riverbank today. ";
        assert_eq!(sentence.chars().count(), 70);
        let text = sentence.repeat(15).trim_end().to_string();

        let passages = chunk(&text);
        assert!(passages.len() >= 2);
        assert!(passages[0].text.ends_with("today. "));
        assert_eq!(passages[0].char_end, 980);
    }

    #[test]
    fn test_cut_falls_back_to_word_boundary() {
        // No sentence terminators anywhere, so word boundaries decide
        let text = "alpha ".repeat(300);
        let passages = chunk(&text);

        assert_eq!(passages.len(), 2);
        assert_eq!(passages[0].char_end, 996);
        assert!(passages[0].text.ends_with("alpha "));
        assert_eq!(passages[1].char_start, 896);
    }

    #[test]
    fn test_hard_cut_without_any_boundary() {
        let passages = chunk(&"x".repeat(2500));

        let spans: Vec<_> = passages
            .iter()
            .map(|p| (p.char_start, p.char_end))
            .collect();
        assert_eq!(spans, vec![(0, 1000), (900, 1900), (1800, 2500)]);
    }

    #[test]
    fn test_cut_ignores_boundaries_inside_overlap_zone() {
        // The only break sits at offset 2, too early to make progress
        let text = format!("\n\n{}", "x".repeat(2000));
        let passages = chunk(&text);

        assert_eq!(passages[0].char_end, 1000);
    }

    #[test]
    fn test_multibyte_text_counts_characters() {
        let passages = chunk(&"é".repeat(1500));

        assert_eq!(passages.len(), 2);
        assert_eq!(passages[0].text.chars().count(), 1000);
        assert_eq!(passages[0].char_len(), 1000);
        assert_eq!(passages[1].text.chars().count(), 600);
        assert_eq!(passages[1].char_start, 900);
    }

    #[test]
    fn test_adjacent_passages_share_exact_overlap() {
        let sentence = "The quick brown fox jumps over the lazy dog near the riverbank today. ";
        let text = sentence.repeat(30);
        let passages = chunk(&text);
        assert!(passages.len() >= 3);

        for pair in passages.windows(2) {
            let prev_len = pair[0].text.chars().count();
            let tail: String = pair[0].text.chars().skip(prev_len - 100).collect();
            let head: String = pair[1].text.chars().take(100).collect();
            assert_eq!(tail, head);
        }
    }

    #[test]
    fn test_chunking_is_deterministic() {
        let text = "The quick brown fox jumps over the lazy dog near the riverbank today. ".repeat(40);
        let first = chunk(&text);
        let second = chunk(&text);

        let shape = |ps: &[Passage]| {
            ps.iter()
                .map(|p| (p.char_start, p.char_end, p.text.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(shape(&first), shape(&second));
    }

    #[test]
    fn test_segments_are_chunked_independently() {
        let segments = vec![
            segment(Some(1), &"x".repeat(1200)),
            segment(Some(2), "   \n\n  "),
            segment(Some(3), "A short closing page."),
        ];
        let passages = TextChunker::new(1000, 100).chunk_segments(Uuid::new_v4(), &segments);

        let pages: Vec<_> = passages.iter().map(|p| p.page).collect();
        assert_eq!(pages, vec![Some(1), Some(1), Some(3)]);

        let indices: Vec<_> = passages.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);

        // Offsets are relative to each segment, not the whole document
        assert_eq!(passages[2].char_start, 0);
    }

    #[test]
    fn test_whitespace_only_segment_yields_nothing() {
        assert!(chunk("   \n\t  \n").is_empty());
    }

    #[test]
    fn test_whitespace_run_keeps_interior_spans() {
        // A run longer than the window forms whole spans of its own
        let text = format!("{}{}{}", "a".repeat(10), " ".repeat(20), "z".repeat(10));
        let passages =
            TextChunker::new(10, 2).chunk_segments(Uuid::new_v4(), &[segment(None, &text)]);

        assert!(passages.iter().any(|p| p.text.trim().is_empty()));
        assert_eq!(passages[0].char_start, 0);
        assert_eq!(passages.last().unwrap().char_end, 40);
        for pair in passages.windows(2) {
            assert_eq!(pair[1].char_start, pair[0].char_end - 2);
            let prev_len = pair[0].text.chars().count();
            let tail: String = pair[0].text.chars().skip(prev_len - 2).collect();
            let head: String = pair[1].text.chars().take(2).collect();
            assert_eq!(tail, head);
        }
    }

    #[test]
    fn test_overlap_clamped_below_chunk_size() {
        let text = "x".repeat(201);

        let passages =
            TextChunker::new(100, 100).chunk_segments(Uuid::new_v4(), &[segment(None, &text)]);
        assert!(!passages.is_empty());
        assert_eq!(passages.last().unwrap().char_end, 201);

        let passages =
            TextChunker::new(100, 150).chunk_segments(Uuid::new_v4(), &[segment(None, &text)]);
        assert_eq!(passages.last().unwrap().char_end, 201);
    }

    #[test]
    fn test_zero_chunk_size_still_covers_the_text() {
        let passages =
            TextChunker::new(0, 0).chunk_segments(Uuid::new_v4(), &[segment(None, "abc")]);

        assert_eq!(passages.len(), 3);
        assert_eq!(passages.last().unwrap().char_end, 3);
    }
}
