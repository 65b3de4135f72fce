//! Error handling for the bamraster CLI

use std::path::PathBuf;
use thiserror::Error;

/// Failures reported to the user before or while rendering
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid region '{region}': {message}")]
    Region { region: String, message: String },

    #[error("Rendering error: {message}")]
    Rendering { message: String },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn region<S: Into<String>>(region: S, message: S) -> Self {
        Self::Region {
            region: region.into(),
            message: message.into(),
        }
    }

    pub fn rendering<S: Into<String>>(message: S) -> Self {
        Self::Rendering { message: message.into() }
    }
}

impl From<bamraster_render::RenderError> for CliError {
    fn from(err: bamraster_render::RenderError) -> Self {
        Self::rendering(err.to_string())
    }
}

/// Error message followed by hints for the common mistakes
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    match error {
        CliError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the file path is correct: {}\n\
                 • A BAM is only queried by index when its .bai sits next to it",
                path.display()
            ));
        }

        CliError::Region { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Use 'contig:start-end', 'contig:pos+flank' or a bare contig name\n\
                 • The contig must appear in the alignment header",
            );
        }

        CliError::Config { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your bamraster.toml configuration file\n\
                 • Use 'bamraster --print-config' to generate a sample configuration",
            );
        }

        _ => {}
    }

    message
}
