//! # 放置事件接收端
//!
//! 生成核心只通过 [`TileSink`] 对外报告结果，实际的绘制/实例化由接收端负责。

use serde::Serialize;

use crate::core::cell::MapCell;
use crate::core::prop::SubCellOffset;

/// 生成结果的接收端
pub trait TileSink {
    /// 合成完成后每格调用一次，报告该格最终的地形类别
    fn set_terrain_tile(&mut self, x: u32, y: u32, category: MapCell);

    /// 每次成功放置装饰物（含伴生装饰物）调用一次
    fn place_prop(&mut self, x: u32, y: u32, prop_id: &str, offset: SubCellOffset);
}

/// 丢弃所有事件
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TileSink for NullSink {
    fn set_terrain_tile(&mut self, _x: u32, _y: u32, _category: MapCell) {}

    fn place_prop(&mut self, _x: u32, _y: u32, _prop_id: &str, _offset: SubCellOffset) {}
}

/// 单条事件（JSON 事件日志的元素）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SinkEvent {
    Terrain {
        x: u32,
        y: u32,
        category: MapCell,
    },
    Prop {
        x: u32,
        y: u32,
        prop: String,
        offset: SubCellOffset,
    },
}

/// 按调用顺序记录全部事件
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub events: Vec<SinkEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn terrain_events(&self) -> impl Iterator<Item = (u32, u32, MapCell)> + '_ {
        self.events.iter().filter_map(|e| match *e {
            SinkEvent::Terrain { x, y, category } => Some((x, y, category)),
            SinkEvent::Prop { .. } => None,
        })
    }

    pub fn prop_events(&self) -> impl Iterator<Item = (u32, u32, &str)> + '_ {
        self.events.iter().filter_map(|e| match e {
            SinkEvent::Prop { x, y, prop, .. } => Some((*x, *y, prop.as_str())),
            SinkEvent::Terrain { .. } => None,
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.events)
    }
}

impl TileSink for RecordingSink {
    fn set_terrain_tile(&mut self, x: u32, y: u32, category: MapCell) {
        self.events.push(SinkEvent::Terrain { x, y, category });
    }

    fn place_prop(&mut self, x: u32, y: u32, prop_id: &str, offset: SubCellOffset) {
        self.events.push(SinkEvent::Prop {
            x,
            y,
            prop: prop_id.to_string(),
            offset,
        });
    }
}

/// 把同一事件依次转发给多个接收端
pub struct TeeSink<'a> {
    sinks: Vec<&'a mut dyn TileSink>,
}

impl<'a> TeeSink<'a> {
    pub fn new(sinks: Vec<&'a mut dyn TileSink>) -> Self {
        Self { sinks }
    }
}

impl TileSink for TeeSink<'_> {
    fn set_terrain_tile(&mut self, x: u32, y: u32, category: MapCell) {
        for sink in self.sinks.iter_mut() {
            sink.set_terrain_tile(x, y, category);
        }
    }

    fn place_prop(&mut self, x: u32, y: u32, prop_id: &str, offset: SubCellOffset) {
        for sink in self.sinks.iter_mut() {
            sink.place_prop(x, y, prop_id, offset);
        }
    }
}
