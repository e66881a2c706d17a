use clap::builder::{
	Styles,
	styling::{AnsiColor, Effects},
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log line printed before the report on stdout.
pub const REPORT_BEGIN_MARKER: &str = "----- BEGIN SDH REPORT -----";
/// Log line printed after the report on stdout.
pub const REPORT_END_MARKER: &str = "----- END SDH REPORT -----";

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Yellow.on_default() | Effects::BOLD)
		.usage(AnsiColor::Yellow.on_default() | Effects::BOLD)
		.literal(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Green.on_default())
		.error(AnsiColor::Red.on_default() | Effects::BOLD)
}

/// Wraps the report between the begin and end markers.
pub fn framed_report(report: &str) -> String {
	format!("{REPORT_BEGIN_MARKER}\n{}\n{REPORT_END_MARKER}", report.trim_end())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn frames_report_without_trailing_blank_lines() {
		assert_eq!(
			framed_report("**A. Summary**\n\n"),
			"----- BEGIN SDH REPORT -----\n**A. Summary**\n----- END SDH REPORT -----"
		);
	}
}
