pub const TIDY_SYSTEM: &str = include_str!("../data/prompts/tidy_system.txt");

/// Returned by `/tidy` when the completion comes back empty.
pub const TIDY_FALLBACK: &str = "Replace only windows with specified style and color.";

/// File name attached to every image sent to the edit endpoint.
pub const UPLOAD_FILE_NAME: &str = "photo.jpg";

/// The system instruction without the trailing newline of the source file.
pub fn tidy_system() -> &'static str {
    TIDY_SYSTEM.trim_end()
}
