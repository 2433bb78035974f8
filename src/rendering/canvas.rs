use std::collections::BTreeMap;
use std::path::Path;

use image::RgbaImage;
use rayon::prelude::*;

use crate::config::palette::PaletteConfig;
use crate::core::cell::MapCell;
use crate::core::color::ColorRgba;
use crate::core::grid::Grid;
use crate::core::prop::SubCellOffset;
use crate::generation::sink::TileSink;

use super::ExportError;

/// 预览调色板：地形类别 / 装饰物 id → 颜色
#[derive(Debug, Clone)]
pub struct Palette {
    terrain: BTreeMap<String, ColorRgba>,
    props: BTreeMap<String, ColorRgba>,
    fallback: ColorRgba,
}

impl Palette {
    pub fn from_config(config: &PaletteConfig) -> Self {
        let convert = |m: &BTreeMap<String, [u8; 4]>| {
            m.iter()
                .map(|(k, &c)| (k.clone(), ColorRgba::from(c)))
                .collect::<BTreeMap<_, _>>()
        };
        Self {
            terrain: convert(&config.terrain),
            props: convert(&config.props),
            fallback: config.fallback.into(),
        }
    }

    /// 未配置的类别使用 fallback 色（品红）
    pub fn terrain_color(&self, cell: MapCell) -> ColorRgba {
        self.terrain.get(cell.key()).copied().unwrap_or(self.fallback)
    }

    pub fn prop_color(&self, prop_id: &str) -> ColorRgba {
        self.props.get(prop_id).copied().unwrap_or(self.fallback)
    }
}

/// 已放置装饰物的标记（格单位坐标，含格内偏移）
#[derive(Debug, Clone, Copy, PartialEq)]
struct PropMarker {
    x: f32,
    y: f32,
    color: ColorRgba,
}

/// 把接收到的地块/装饰物事件栅格化为 RGBA 预览图
#[derive(Debug, Clone)]
pub struct CanvasSink {
    palette: Palette,
    tiles: Grid<ColorRgba>,
    markers: Vec<PropMarker>,
}

impl CanvasSink {
    pub fn new(width: u32, height: u32, palette: Palette) -> Self {
        Self {
            palette,
            tiles: Grid::new_filled(width, height, ColorRgba::TRANSPARENT),
            markers: Vec::new(),
        }
    }

    pub fn prop_count(&self) -> usize {
        self.markers.len()
    }

    /// 每格 `scale × scale` 像素，装饰物画成边长约 `scale / 3` 的方块
    pub fn render(&self, scale: u32) -> Result<RgbaImage, ExportError> {
        let scale = scale.max(1);
        let too_large = || ExportError::Buffer {
            width: self.tiles.width(),
            height: self.tiles.height(),
        };
        let w = self.tiles.width().checked_mul(scale).ok_or_else(too_large)?;
        let h = self.tiles.height().checked_mul(scale).ok_or_else(too_large)?;
        let row_bytes = (w as usize).checked_mul(4).ok_or_else(too_large)?;
        let len = row_bytes.checked_mul(h as usize).ok_or_else(too_large)?;

        let mut buf = vec![0u8; len];

        // 按行并行：每行像素只依赖所在格的颜色
        buf.par_chunks_mut(row_bytes)
            .enumerate()
            .for_each(|(py, row)| {
                let cy = py as u32 / scale;
                for (px, pixel) in row.chunks_exact_mut(4).enumerate() {
                    let cx = px as u32 / scale;
                    let color = self.tiles.get(cx, cy).unwrap_or(ColorRgba::TRANSPARENT);
                    pixel.copy_from_slice(&color.as_array());
                }
            });

        let mut img = RgbaImage::from_raw(w, h, buf).ok_or(ExportError::Buffer {
            width: w,
            height: h,
        })?;

        let half = (scale / 6) as i64;
        for marker in &self.markers {
            let cx = (marker.x * scale as f32) as i64;
            let cy = (marker.y * scale as f32) as i64;
            for y in cy - half..=cy + half {
                for x in cx - half..=cx + half {
                    if x >= 0 && y >= 0 && (x as u32) < w && (y as u32) < h {
                        img.put_pixel(x as u32, y as u32, image::Rgba(marker.color.as_array()));
                    }
                }
            }
        }

        Ok(img)
    }

    /// 将预览图导出为 PNG 文件
    pub fn save_png(&self, path: &Path, scale: u32) -> Result<(), ExportError> {
        let img = self.render(scale)?;
        img.save(path)?;
        Ok(())
    }
}

impl TileSink for CanvasSink {
    fn set_terrain_tile(&mut self, x: u32, y: u32, category: MapCell) {
        let color = self.palette.terrain_color(category);
        self.tiles.set(x, y, color);
    }

    fn place_prop(&mut self, x: u32, y: u32, prop_id: &str, offset: SubCellOffset) {
        self.markers.push(PropMarker {
            x: x as f32 + offset.x,
            y: y as f32 + offset.y,
            color: self.palette.prop_color(prop_id),
        });
    }
}
