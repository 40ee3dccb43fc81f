//! Sentence segmentation.

/// Split text into sentences on `.`, trimming whitespace and dropping
/// empty pieces.
///
/// This is a deliberately simple heuristic: abbreviations and decimal
/// numbers split too. It only feeds the chunk-size estimator, which cares
/// about average sentence length rather than linguistic precision.
///
/// Text without any `.` yields a single sentence (the trimmed whole), or
/// nothing if the text is blank.
pub fn sentences(text: &str) -> Vec<&str> {
    text.split('.').map(str::trim).filter(|s| !s.is_empty()).collect()
}
