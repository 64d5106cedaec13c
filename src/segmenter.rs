use crate::errors::AnalyzerError;

/// Split text into overlapping chunks of at most `size` characters.
///
/// Consecutive chunks share up to `overlap` characters: each chunk after the
/// first starts `overlap` characters before the previous chunk's end, so that
/// context isn't lost at a cut. Cuts prefer a natural boundary — the last
/// period or newline inside the overlap window — and fall back to a hard cut
/// at `size` when the window has neither.
///
/// Text no longer than `size` (the empty string included) comes back as a
/// single chunk. Lengths are measured in characters, not bytes.
pub fn segment(text: &str, size: usize, overlap: usize) -> Result<Vec<String>, AnalyzerError> {
    if size == 0 {
        return Err(AnalyzerError::ZeroChunkSize);
    }
    if overlap >= size {
        return Err(AnalyzerError::OverlapTooLarge { size, overlap });
    }

    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= size {
        return Ok(vec![text.to_string()]);
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let mut end = start + size;

        if end < chars.len() {
            // Look for the last period or newline in the overlap region.
            let window_start = end - overlap;
            if let Some(pos) = chars[window_start..end]
                .iter()
                .rposition(|&c| c == '.' || c == '\n')
            {
                let break_point = window_start + pos;
                // Accept the boundary only if the next start still moves
                // forward; otherwise keep the hard cut so the loop terminates.
                if break_point + 1 > start + overlap {
                    end = break_point + 1;
                }
            }
        } else {
            end = chars.len();
        }

        chunks.push(chars[start..end].iter().collect());
        start = if end < chars.len() { end - overlap } else { end };
    }

    Ok(chunks)
}
