// 该文件是 Renhai （人海） 项目的一部分。
// src/frame.rs - 归一化帧定义
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

const RGB_CHANNELS: usize = 3;

/// 正方形画布四周的填充宽度（像素）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding {
  pub top: u32,
  pub bottom: u32,
  pub left: u32,
  pub right: u32,
}

/// 信箱归一化后的帧：边长为 `size` 的正方形画布，
/// 平面 CHW 布局，RGB 通道顺序，像素值在 [0, 1] 区间。
/// 同时记录缩放因子与填充几何，用于把检测框映射回原图坐标。
#[derive(Debug, Clone)]
pub struct LetterboxFrame {
  data: Box<[f32]>,
  size: u32,
  scale: f32,
  padding: Padding,
  orig_width: u32,
  orig_height: u32,
}

impl LetterboxFrame {
  pub fn new(
    data: Vec<f32>,
    size: u32,
    scale: f32,
    padding: Padding,
    orig_width: u32,
    orig_height: u32,
  ) -> Self {
    let expected = RGB_CHANNELS * (size as usize) * (size as usize);
    if data.len() != expected {
      panic!("数据长度不匹配: 期望长度 {}, 实际长度 {}", expected, data.len());
    }

    Self {
      data: data.into_boxed_slice(),
      size,
      scale,
      padding,
      orig_width,
      orig_height,
    }
  }

  pub fn as_chw(&self) -> &[f32] {
    &self.data
  }

  pub fn size(&self) -> u32 {
    self.size
  }

  pub fn scale(&self) -> f32 {
    self.scale
  }

  pub fn padding(&self) -> Padding {
    self.padding
  }

  pub fn orig_width(&self) -> u32 {
    self.orig_width
  }

  pub fn orig_height(&self) -> u32 {
    self.orig_height
  }

  pub fn channels(&self) -> usize {
    RGB_CHANNELS
  }

  pub fn content_width(&self) -> u32 {
    self.size - self.padding.left - self.padding.right
  }

  pub fn content_height(&self) -> u32 {
    self.size - self.padding.top - self.padding.bottom
  }

  /// 画布上图像内容所占的区域: (left, top, width, height)
  pub fn content_region(&self) -> (u32, u32, u32, u32) {
    (
      self.padding.left,
      self.padding.top,
      self.content_width(),
      self.content_height(),
    )
  }

  /// 把画布坐标系下的中心点框 (cx, cy, w, h) 映射回原图像素坐标系，
  /// 返回 [x_min, y_min, x_max, y_max]，并裁剪到原图边界内。
  pub fn to_original_box(&self, cx: f32, cy: f32, w: f32, h: f32) -> [f32; 4] {
    let left = self.padding.left as f32;
    let top = self.padding.top as f32;

    let x_min = (cx - w / 2.0 - left) / self.scale;
    let y_min = (cy - h / 2.0 - top) / self.scale;
    let x_max = (cx + w / 2.0 - left) / self.scale;
    let y_max = (cy + h / 2.0 - top) / self.scale;

    [
      x_min.clamp(0.0, self.orig_width as f32),
      y_min.clamp(0.0, self.orig_height as f32),
      x_max.clamp(0.0, self.orig_width as f32),
      y_max.clamp(0.0, self.orig_height as f32),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn frame_4x4(scale: f32, padding: Padding, orig_w: u32, orig_h: u32) -> LetterboxFrame {
    LetterboxFrame::new(vec![0.0; 3 * 4 * 4], 4, scale, padding, orig_w, orig_h)
  }

  #[test]
  #[should_panic(expected = "数据长度不匹配")]
  fn new_rejects_wrong_data_length() {
    let padding = Padding {
      top: 0,
      bottom: 0,
      left: 0,
      right: 0,
    };
    LetterboxFrame::new(vec![0.0; 7], 4, 1.0, padding, 4, 4);
  }

  #[test]
  fn content_region_excludes_padding() {
    let padding = Padding {
      top: 1,
      bottom: 1,
      left: 0,
      right: 0,
    };
    let frame = frame_4x4(1.0, padding, 4, 2);
    assert_eq!(frame.content_region(), (0, 1, 4, 2));
    assert_eq!(frame.content_width(), 4);
    assert_eq!(frame.content_height(), 2);
  }

  #[test]
  fn to_original_box_is_identity_without_letterbox() {
    let padding = Padding {
      top: 0,
      bottom: 0,
      left: 0,
      right: 0,
    };
    let frame = frame_4x4(1.0, padding, 4, 4);
    let bbox = frame.to_original_box(2.0, 2.0, 2.0, 2.0);
    assert_eq!(bbox, [1.0, 1.0, 3.0, 3.0]);
  }

  #[test]
  fn to_original_box_undoes_scale_and_padding() {
    // 原图 8x4，缩放 0.5 后为 4x2，上下各填充 1 行
    let padding = Padding {
      top: 1,
      bottom: 1,
      left: 0,
      right: 0,
    };
    let frame = frame_4x4(0.5, padding, 8, 4);
    let bbox = frame.to_original_box(2.0, 2.0, 2.0, 2.0);
    assert_eq!(bbox, [2.0, 0.0, 6.0, 4.0]);
  }

  #[test]
  fn to_original_box_clamps_to_image_bounds() {
    let padding = Padding {
      top: 0,
      bottom: 0,
      left: 0,
      right: 0,
    };
    let frame = frame_4x4(1.0, padding, 4, 4);
    let bbox = frame.to_original_box(0.0, 0.0, 10.0, 10.0);
    assert_eq!(bbox, [0.0, 0.0, 4.0, 4.0]);
  }
}
