use serde::Serialize;

/// A byte range within a stylesheet's source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    pub start: u32,
    pub length: u32,
}

impl Span {
    #[must_use]
    pub fn new(start: u32, length: u32) -> Self {
        Self { start, length }
    }

    /// Build a span from `start..end` byte bounds, clamping at `u32::MAX`.
    #[must_use]
    pub fn saturating_from_bounds_usize(start: usize, end: usize) -> Self {
        let start_u32 = u32::try_from(start).unwrap_or(u32::MAX);
        let end_u32 = u32::try_from(end).unwrap_or(u32::MAX);
        Self::new(start_u32, end_u32.saturating_sub(start_u32))
    }

    #[must_use]
    pub fn start(self) -> u32 {
        self.start
    }

    #[must_use]
    pub fn end(self) -> u32 {
        self.start.saturating_add(self.length)
    }

    #[must_use]
    pub fn start_usize(self) -> usize {
        self.start as usize
    }

    #[must_use]
    pub fn end_usize(self) -> usize {
        self.end() as usize
    }

    /// The slice of `source` covered by this span, if it lies on char boundaries.
    #[must_use]
    pub fn text(self, source: &str) -> Option<&str> {
        source.get(self.start_usize()..self.end_usize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_roundtrip() {
        let span = Span::saturating_from_bounds_usize(4, 10);
        assert_eq!(span, Span::new(4, 6));
        assert_eq!(span.end(), 10);
    }

    #[test]
    fn inverted_bounds_are_empty() {
        let span = Span::saturating_from_bounds_usize(10, 4);
        assert_eq!(span, Span::new(10, 0));
    }

    #[test]
    fn text_slices_source() {
        let source = "color: $primary;";
        let span = Span::new(7, 8);
        assert_eq!(span.text(source), Some("$primary"));
        assert_eq!(Span::new(10, 100).text(source), None);
    }
}
