/// One logical request to the generation service: a main message followed by zero or more
/// follow-up segments. The segments are accounted and retried as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationUnit {
	segments: Vec<String>,
}
impl InvocationUnit {
	pub fn new(main: impl Into<String>) -> Self {
		Self { segments: vec![main.into()] }
	}

	pub fn follow_up(mut self, segment: impl Into<String>) -> Self {
		self.segments.push(segment.into());

		self
	}

	pub fn follow_ups<I, S>(mut self, segments: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.segments.extend(segments.into_iter().map(Into::into));

		self
	}

	pub fn segments(&self) -> &[String] {
		&self.segments
	}

	pub fn main(&self) -> &str {
		&self.segments[0]
	}

	pub fn non_empty_segments(&self) -> impl Iterator<Item = &str> {
		self.segments.iter().map(String::as_str).filter(|segment| !segment.is_empty())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keeps_segment_order() {
		let unit = InvocationUnit::new("instruction").follow_up("").follow_ups(["a", "b"]);

		assert_eq!(unit.main(), "instruction");
		assert_eq!(unit.segments(), ["instruction", "", "a", "b"]);
		assert_eq!(unit.non_empty_segments().collect::<Vec<_>>(), ["instruction", "a", "b"]);
	}
}
