pub mod canvas;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::generation::sink::RecordingSink;

pub use canvas::{CanvasSink, Palette};

/// 预览图与事件日志的导出错误
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("保存 PNG 失败: {0}")]
    Image(#[from] image::ImageError),

    #[error("创建图像缓冲区失败 ({width}x{height})")]
    Buffer { width: u32, height: u32 },

    #[error("写入文件失败 {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("序列化事件日志失败: {0}")]
    Json(#[from] serde_json::Error),
}

/// 将记录下来的全部放置事件写成 JSON 数组
pub fn write_event_log(sink: &RecordingSink, path: &Path) -> Result<(), ExportError> {
    let json = sink.to_json()?;
    std::fs::write(path, json).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
