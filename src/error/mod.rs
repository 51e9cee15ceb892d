/// Errors in netverify
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Fail to decode payload: {0}")]
    Decode(String),
    #[error("Configure: {0}")]
    Config(String),
    #[error("Filter: {0}")]
    Filter(String),
    #[error("Check: {0}")]
    Check(String),
    #[error("Alias: {0}")]
    Alias(String),
    #[error("Filesys I/O: {0}")]
    Io(#[from] std::io::Error),
    /// Unexpected or invalid data encountered in a server response.
    #[error("encountered unexpected or invalid data: {0}")]
    Protocol(String),
}
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Format an error message as a `Protocol` error
#[macro_export]
macro_rules! err_protocol {
    ($($fmt_args:tt)*) => {
        $crate::error::Error::Protocol(
            format!(
                "{} ({}:{})",
                // Note: the format string needs to be unmodified (e.g. by `concat!()`)
                // for implicit formatting arguments to work
                format_args!($($fmt_args)*),
                module_path!(),
                line!(),
            )
        )
    };
}
