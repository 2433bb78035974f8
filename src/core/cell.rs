//! # 各阶段的格子标签
//!
//! 每个生成阶段使用自己的封闭枚举，阶段之间只通过显式转换函数过渡，
//! 不在同一块整数存储上"重新解释"数值：
//!
//! ```text
//! LandCell (元胞自动机) ──From──▶ MapCell (图层合成) ──From──▶ Plot (装饰物放置)
//! ```

use serde::{Deserialize, Serialize};

// ── 阶段 1：元胞自动机 ─────────────────────────────────────

/// 二值陆地/水格子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandCell {
    Land,
    Water,
}

impl LandCell {
    pub fn is_water(self) -> bool {
        self == LandCell::Water
    }
}

// ── 阶段 2：图层合成 ───────────────────────────────────────

/// 陆地格子的语义地貌
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ground {
    /// 未被任何覆盖层认领的空地
    Clear,
    /// 林地（变体 A）
    Grove,
    /// 花甸（变体 B）
    Meadow,
}

impl Ground {
    pub fn key(self) -> &'static str {
        match self {
            Ground::Clear => "clear",
            Ground::Grove => "grove",
            Ground::Meadow => "meadow",
        }
    }
}

/// 合成后的地形分类，也是上报给渲染端的地块类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapCell {
    Water,
    Land(Ground),
}

impl MapCell {
    /// 调色板键名（"water" / "clear" / "grove" / "meadow"）
    pub fn key(self) -> &'static str {
        match self {
            MapCell::Water => "water",
            MapCell::Land(ground) => ground.key(),
        }
    }
}

impl From<LandCell> for MapCell {
    fn from(cell: LandCell) -> Self {
        match cell {
            LandCell::Land => MapCell::Land(Ground::Clear),
            LandCell::Water => MapCell::Water,
        }
    }
}

// ── 阶段 3：装饰物放置 ─────────────────────────────────────

/// 放置阶段的占用状态。`Claimed` 保留原地貌，供渲染和统计使用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plot {
    Water,
    Open(Ground),
    Claimed(Ground),
}

impl Plot {
    /// 仍可放置装饰物的陆地
    pub fn is_open(self) -> bool {
        matches!(self, Plot::Open(_))
    }

    /// 邻居计数用：水、已占用都算"被占"
    pub fn is_blocked(self) -> bool {
        !self.is_open()
    }

    /// 认领该格。水格不可认领，原样返回。
    pub fn claim(self) -> Self {
        match self {
            Plot::Open(ground) | Plot::Claimed(ground) => Plot::Claimed(ground),
            Plot::Water => Plot::Water,
        }
    }

    /// 该格的地貌（不论是否已占用）
    pub fn terrain(self) -> MapCell {
        match self {
            Plot::Water => MapCell::Water,
            Plot::Open(ground) | Plot::Claimed(ground) => MapCell::Land(ground),
        }
    }
}

impl From<MapCell> for Plot {
    fn from(cell: MapCell) -> Self {
        match cell {
            MapCell::Water => Plot::Water,
            MapCell::Land(ground) => Plot::Open(ground),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_conversions_preserve_land_and_water() {
        assert_eq!(MapCell::from(LandCell::Land), MapCell::Land(Ground::Clear));
        assert_eq!(MapCell::from(LandCell::Water), MapCell::Water);
        assert_eq!(Plot::from(MapCell::Land(Ground::Grove)), Plot::Open(Ground::Grove));
        assert_eq!(Plot::from(MapCell::Water), Plot::Water);
    }

    #[test]
    fn claim_keeps_ground_and_never_reopens() {
        let claimed = Plot::Open(Ground::Meadow).claim();
        assert_eq!(claimed, Plot::Claimed(Ground::Meadow));
        assert_eq!(claimed.claim(), claimed);
        assert!(claimed.is_blocked());
        assert_eq!(claimed.terrain(), MapCell::Land(Ground::Meadow));
        assert_eq!(Plot::Water.claim(), Plot::Water);
    }
}
