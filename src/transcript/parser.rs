//! Transcript parsing for multi-voice narration.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::{Mode, Segment};
use crate::error::ParseError;

/// A line starting a new speaker turn: `[Name] remaining text`.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\]]+)\]\s*(.*)$").expect("speaker tag regex"));

/// Parse a transcript into ordered segments.
///
/// # Errors
/// Returns `ParseError::EmptyTranscript` on empty or whitespace-only input,
/// and in annotated mode `ParseError::NoSpeakerTags` when no `[Name]` tag is
/// present or `ParseError::MissingLeadingTag` when text precedes the first
/// tag.
pub fn parse(text: &str, mode: Mode) -> Result<Vec<Segment>, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::EmptyTranscript);
    }

    debug!("Parsing transcript in {:?} mode ({} chars)", mode, text.len());

    let segments = match mode {
        Mode::Single | Mode::Manual => parse_sentences(text),
        Mode::Annotated => parse_annotated(text)?,
    };

    debug!("Parsed {} segments", segments.len());
    Ok(segments)
}

/// Distinct speaker labels in first-appearance order.
pub fn detect_speakers(segments: &[Segment]) -> Vec<String> {
    let mut speakers: Vec<String> = Vec::new();
    for seg in segments {
        if let Some(speaker) = &seg.speaker
            && !speakers.iter().any(|s| s == speaker)
        {
            speakers.push(speaker.clone());
        }
    }
    speakers
}

/// Split on sentence-terminal punctuation followed by whitespace. Each
/// sentence becomes one unassigned segment.
fn parse_sentences(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = String::new();

    let push = |buf: &mut String, segments: &mut Vec<Segment>| {
        let trimmed = buf.trim();
        if !trimmed.is_empty() {
            segments.push(Segment::new(segments.len(), trimmed, None));
        }
        buf.clear();
    };

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        current.push(c);

        // A terminal mark only ends a sentence when whitespace (or the end
        // of input) follows, so "3.14" and "?!" runs stay intact.
        if matches!(c, '.' | '!' | '?') && chars.peek().is_none_or(|next| next.is_whitespace()) {
            push(&mut current, &mut segments);
        }
    }
    push(&mut current, &mut segments);

    segments
}

/// Line-oriented annotated grammar. A `[Name]` line starts a new turn; an
/// untagged line inherits the most recent speaker but always forms its own
/// segment, even when consecutive lines share a speaker.
fn parse_annotated(text: &str) -> Result<Vec<Segment>, ParseError> {
    if !text.lines().any(|line| TAG_RE.is_match(line.trim())) {
        return Err(ParseError::NoSpeakerTags);
    }

    let mut segments: Vec<Segment> = Vec::new();
    let mut current_speaker: Option<String> = None;

    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = TAG_RE.captures(line) {
            let speaker = caps[1].trim().to_string();
            let rest = caps[2].trim();
            if !speaker.is_empty() {
                current_speaker = Some(speaker);
                // A bare [Name] line switches speaker without emitting a
                // segment; the following lines carry the text.
                if !rest.is_empty() {
                    segments.push(Segment::new(
                        segments.len(),
                        rest,
                        current_speaker.clone(),
                    ));
                }
                continue;
            }
        }

        match &current_speaker {
            Some(_) => segments.push(Segment::new(segments.len(), line, current_speaker.clone())),
            None => return Err(ParseError::MissingLeadingTag { line: line_no + 1 }),
        }
    }

    Ok(segments)
}

/// Transcript size statistics, for display alongside a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscriptStats {
    pub characters: usize,
    pub words: usize,
    pub sentences: usize,
    pub lines: usize,
}

pub fn stats(text: &str) -> TranscriptStats {
    TranscriptStats {
        characters: text.chars().count(),
        words: text.split_whitespace().count(),
        sentences: parse_sentences(text).len(),
        lines: text.lines().filter(|l| !l.trim().is_empty()).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentences_split_on_terminal_punctuation() {
        let segs = parse("First one. Second two! Third three? Tail", Mode::Single).unwrap();
        let texts: Vec<&str> = segs.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["First one.", "Second two!", "Third three?", "Tail"]);
        let indices: Vec<usize> = segs.iter().map(|s| s.index).collect();
        assert_eq!(indices, [0, 1, 2, 3]);
    }

    #[test]
    fn sentences_keep_decimal_points_and_punctuation_runs() {
        let segs = parse("Pi is 3.14 exactly. Really?! Yes.", Mode::Manual).unwrap();
        let texts: Vec<&str> = segs.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["Pi is 3.14 exactly.", "Really?!", "Yes."]);
    }

    #[test]
    fn empty_input_is_a_parse_error() {
        assert_eq!(parse("", Mode::Single), Err(ParseError::EmptyTranscript));
        assert_eq!(parse("  \n\t", Mode::Annotated), Err(ParseError::EmptyTranscript));
    }

    #[test]
    fn annotated_lines_become_segments_in_source_order() {
        let segs = parse("[A] hi\n[B] yo\n[A] bye", Mode::Annotated).unwrap();
        assert_eq!(segs.len(), 3);
        let speakers: Vec<&str> = segs.iter().map(|s| s.speaker.as_deref().unwrap()).collect();
        assert_eq!(speakers, ["A", "B", "A"]);
        assert_eq!(detect_speakers(&segs), ["A", "B"]);
    }

    #[test]
    fn untagged_lines_inherit_but_are_not_merged() {
        let segs = parse("[Ryan] First line.\nSecond line.\nThird line.", Mode::Annotated).unwrap();
        assert_eq!(segs.len(), 3);
        assert!(segs.iter().all(|s| s.speaker.as_deref() == Some("Ryan")));
        assert_eq!(segs[1].text, "Second line.");
    }

    #[test]
    fn annotated_without_tags_is_a_parse_error() {
        assert_eq!(
            parse("no tags here\njust prose", Mode::Annotated),
            Err(ParseError::NoSpeakerTags)
        );
    }

    #[test]
    fn text_before_first_tag_is_a_parse_error() {
        assert_eq!(
            parse("orphan line\n[A] hi", Mode::Annotated),
            Err(ParseError::MissingLeadingTag { line: 1 })
        );
    }

    #[test]
    fn bare_tag_line_switches_speaker_without_empty_segment() {
        let segs = parse("[Vivian]\nHello there.\n[Sohee] Hi.", Mode::Annotated).unwrap();
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].speaker.as_deref(), Some("Vivian"));
        assert_eq!(segs[0].text, "Hello there.");
        assert_eq!(segs[1].speaker.as_deref(), Some("Sohee"));
    }

    #[test]
    fn stats_counts() {
        let s = stats("One two. Three!\n\nFour?");
        assert_eq!(s.words, 4);
        assert_eq!(s.sentences, 3);
        assert_eq!(s.lines, 2);
    }
}
