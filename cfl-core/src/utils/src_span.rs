use std::fmt::Display;

/// Byte range into the source text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SrcSpan {
    pub start: u32,
    pub end: u32,
}

impl SrcSpan {
	pub fn from(start: u32, end: u32) -> Self {
		Self { start, end }
	}

	pub fn range(&self) -> std::ops::Range<usize> {
		(self.start as usize)..(self.end as usize)
	}
}

impl Display for SrcSpan {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}..{}", self.start, self.end)
	}
}
