//! Locating the raw text span of a section within a larger text.

/// How a section kind finds its span.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Extractor {
    /// Everything before the first occurrence of `until`, or the whole text if it never occurs.
    Preamble { until: &'static str },

    /// Delimited by a `begin` marker and, optionally, an `end` marker.
    ///
    /// Every non-overlapping match is a span of its own. With `keep_begin` the begin marker is
    /// part of the span, which is how documents carry their type on the begin line. Without an
    /// end marker a span runs up to the next begin marker or the end of the text.
    Anchored {
        begin: &'static str,
        end: Option<&'static str>,
        keep_begin: bool,
    },

    /// No markers of its own, the section is parsed against its owner's span.
    CoLocated,
}

impl Extractor {
    /// All spans of this section kind in source order. An empty result means the section is absent.
    pub fn extract<'a>(&self, text: &'a str) -> Vec<&'a str> {
        match *self {
            Extractor::Preamble { until } => {
                let stop = text.find(until).unwrap_or(text.len());
                vec![&text[..stop]]
            }
            Extractor::Anchored {
                begin,
                end,
                keep_begin,
            } => extract_anchored(text, begin, end, keep_begin),
            Extractor::CoLocated => vec![text],
        }
    }

    /// The first span, if any.
    pub fn extract_one<'a>(&self, text: &'a str) -> Option<&'a str> {
        let spans = self.extract(text);
        if spans.len() > 1 {
            warn!(
                "Found {} spans where a single one was expected, using the first one",
                spans.len()
            );
        }
        spans.into_iter().next()
    }

    /// Wrap rendered interior lines in the markers `extract` strips off.
    pub fn enclose(&self, mut lines: Vec<String>) -> Vec<String> {
        if let Extractor::Anchored {
            begin,
            end,
            keep_begin,
        } = *self
        {
            if !keep_begin {
                lines.insert(0, begin.to_string());
            }
            if let Some(end) = end {
                lines.push(end.to_string());
            }
        }
        lines
    }
}

fn extract_anchored<'a>(
    text: &'a str,
    begin: &str,
    end: Option<&str>,
    keep_begin: bool,
) -> Vec<&'a str> {
    let mut spans = vec![];
    let mut pos = 0;
    while let Some(found) = text[pos..].find(begin) {
        let begin_at = pos + found;
        let content_at = begin_at + begin.len();
        let start = if keep_begin { begin_at } else { content_at };
        match end {
            Some(end) => match text[content_at..].find(end) {
                Some(found_end) => {
                    let end_at = content_at + found_end;
                    spans.push(&text[start..end_at]);
                    pos = end_at + end.len();
                }
                None => {
                    warn!("Section '{}' is never closed by '{}', ignoring it", begin, end);
                    break;
                }
            },
            None => {
                let next = text[content_at..]
                    .find(begin)
                    .map_or(text.len(), |found_next| content_at + found_next);
                spans.push(&text[start..next]);
                pos = next;
            }
        }
    }
    debug!("Extracted {} '{}' sections", spans.len(), begin);
    spans
}
