use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EqualizeError {
    #[error("Failed to load image '{path}': {message}")]
    ImageLoadError { path: PathBuf, message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid pixel buffer: {message}")]
    InvalidBuffer { message: String },

    #[error("Failed to allocate {bytes} bytes for {what}")]
    AllocationFailed { what: &'static str, bytes: usize },

    #[error("Invalid worker count {count}: at least one worker is required")]
    InvalidWorkerCount { count: usize },

    #[error("Thread pool error: {message}")]
    ThreadPoolError { message: String },

    #[error("Export error for '{path}': {message}")]
    ExportError { path: PathBuf, message: String },

    #[error("Settings error: {message}")]
    SettingsError { message: String },

    #[error("Sequential and parallel runs diverged: {message}")]
    RunMismatch { message: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV error: {source}")]
    CsvError {
        #[from]
        source: csv::Error,
    },

    #[error("JSON parsing error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, EqualizeError>;

impl EqualizeError {
    /// Returns true if the pipeline could not obtain the memory or threads it needed.
    /// These abort a run without producing any output.
    pub fn is_resource_failure(&self) -> bool {
        matches!(
            self,
            EqualizeError::AllocationFailed { .. } | EqualizeError::ThreadPoolError { .. }
        )
    }

    /// Returns a user-friendly error message with recovery suggestions
    pub fn user_message(&self) -> String {
        let base_message = self.to_string();
        let suggestion = match self {
            EqualizeError::FileNotFound { .. } => "Check if the file exists and you have permission to access it.",
            EqualizeError::ImageLoadError { .. } => "The image file may be corrupted or in an unsupported format.",
            EqualizeError::InvalidBuffer { .. } => "The decoded image has an unexpected shape.",
            EqualizeError::AllocationFailed { .. } => "Not enough memory for this image. Close other programs or use a smaller image.",
            EqualizeError::InvalidWorkerCount { .. } => "Pass a thread count of 1 or more.",
            EqualizeError::ThreadPoolError { .. } => "Could not start worker threads. Try a lower thread count.",
            EqualizeError::ExportError { .. } | EqualizeError::IoError { .. } | EqualizeError::CsvError { .. } => {
                "Check if you have write permissions in the output directory."
            }
            EqualizeError::SettingsError { .. } | EqualizeError::JsonError { .. } => "Check the configuration file and command line flags.",
            EqualizeError::RunMismatch { .. } => "This indicates a bug in the parallel reduction. Please report it.",
        };

        format!("{}\n\n{}", base_message, suggestion)
    }

    /// Returns an error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            EqualizeError::ImageLoadError { .. } => "IMAGE_LOAD_ERROR",
            EqualizeError::FileNotFound { .. } => "FILE_NOT_FOUND",
            EqualizeError::InvalidBuffer { .. } => "INVALID_BUFFER",
            EqualizeError::AllocationFailed { .. } => "ALLOCATION_FAILED",
            EqualizeError::InvalidWorkerCount { .. } => "INVALID_WORKER_COUNT",
            EqualizeError::ThreadPoolError { .. } => "THREAD_POOL_ERROR",
            EqualizeError::ExportError { .. } => "EXPORT_ERROR",
            EqualizeError::SettingsError { .. } => "SETTINGS_ERROR",
            EqualizeError::RunMismatch { .. } => "RUN_MISMATCH",
            EqualizeError::IoError { .. } => "IO_ERROR",
            EqualizeError::CsvError { .. } => "CSV_ERROR",
            EqualizeError::JsonError { .. } => "JSON_ERROR",
        }
    }
}
