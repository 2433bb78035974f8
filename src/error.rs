use thiserror::Error;

use crate::config::ConfigError;
use crate::generation::GenerationError;
use crate::rendering::ExportError;

/// crate 级错误
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Export(#[from] ExportError),
}
