//! # 二维网格
//!
//! 所有生成阶段共用的定长 W×H 存储。行优先：`data[y * width + x]`。
//! 尺寸在创建后不可改变；越界读取一律返回 `None`，越界的含义由调用方决定
//! （邻居计数时越界视为"背景/已占用"）。

/// 定长二维网格
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: u32,
    height: u32,
    /// 行优先存储: data[y * width + x]
    data: Vec<T>,
}

impl<T: Copy> Grid<T> {
    /// 创建一个全部填充为 `value` 的网格
    pub fn new_filled(width: u32, height: u32, value: T) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            data: vec![value; len],
        }
    }

    /// 按行优先顺序逐格调用 `f` 构建网格。
    ///
    /// 调用顺序固定（y 外层、x 内层），依赖 RNG 的构建因此是确定性的。
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> T) -> Self {
        let mut data = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 有符号坐标是否落在网格内
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }

    /// 获取 (x, y) 处的值，越界返回 `None`
    pub fn get(&self, x: u32, y: u32) -> Option<T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[self.index(x, y)])
    }

    /// 有符号坐标版本的 [`Grid::get`]，供邻域遍历使用
    pub fn get_signed(&self, x: i64, y: i64) -> Option<T> {
        if !self.contains(x, y) {
            return None;
        }
        Some(self.data[(y as usize) * (self.width as usize) + x as usize])
    }

    /// 设置 (x, y) 处的值，越界时不写入并返回 `false`
    pub fn set(&mut self, x: u32, y: u32, value: T) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let idx = self.index(x, y);
        self.data[idx] = value;
        true
    }

    /// 逐格转换为另一阶段的网格，尺寸保持不变
    pub fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// 行优先遍历 `(x, y, value)`
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, T)> + '_ {
        let w = self.width.max(1);
        self.data
            .iter()
            .enumerate()
            .map(move |(i, &v)| ((i as u32) % w, (i as u32) / w, v))
    }

    /// 统计满足条件的格子数
    pub fn count(&self, pred: impl Fn(T) -> bool) -> usize {
        self.data.iter().filter(|&&v| pred(v)).count()
    }

    /// 返回底层数据的只读引用（用于渲染）
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// 底层数据的可变引用（按行并行写入时使用，长度不可变）
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// 以 (cx, cy) 为中心、半径 `radius` 的方形窗口，已裁剪到网格内
    pub fn window(&self, cx: u32, cy: u32, radius: u32) -> Window {
        Window::clamped(cx, cy, radius, self.width, self.height)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + x as usize
    }
}

// ── 邻域窗口 ───────────────────────────────────────────────

/// 轴对齐方形窗口（半开区间 `[x0, x1) × [y0, y1)`），始终位于网格内部。
///
/// 两个轴各自按自己的边界裁剪和遍历。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
    /// 未裁剪时窗口应有的格子数 `(2r+1)²`
    pub full_area: u64,
}

impl Window {
    pub fn clamped(cx: u32, cy: u32, radius: u32, width: u32, height: u32) -> Self {
        let side = 2 * radius as u64 + 1;
        // 半径 ≥ 2^31 时 side² 超出 u64
        Self {
            x0: cx.saturating_sub(radius).min(width),
            y0: cy.saturating_sub(radius).min(height),
            x1: cx.saturating_add(radius).saturating_add(1).min(width),
            y1: cy.saturating_add(radius).saturating_add(1).min(height),
            full_area: side.saturating_mul(side),
        }
    }

    /// 裁剪后实际落在网格内的格子数
    pub fn area(&self) -> u64 {
        (self.x1.saturating_sub(self.x0) as u64) * (self.y1.saturating_sub(self.y0) as u64)
    }

    /// 被网格边界裁掉的格子数
    pub fn clipped(&self) -> u64 {
        self.full_area - self.area()
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    /// 行优先遍历窗口内的坐标
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> {
        let (x0, x1) = (self.x0, self.x1);
        (self.y0..self.y1).flat_map(move |y| (x0..x1).map(move |x| (x, y)))
    }
}
