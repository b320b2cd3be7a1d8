// 该文件是 Renhai （人海） 项目的一部分。
// src/preprocess.rs - 图像信箱归一化
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

use image::RgbImage;
use tracing::debug;

use crate::frame::{LetterboxFrame, Padding};

/// 默认归一化目标边长（像素）
pub const DEFAULT_TARGET_SIZE: u32 = 640;
/// 填充区域的颜色（中灰）
pub const LETTERBOX_FILL: [u8; 3] = [114, 114, 114];

#[derive(Debug, Clone)]
pub struct LetterboxConfig {
  pub target_size: u32,
  pub fill: [u8; 3],
}

impl Default for LetterboxConfig {
  fn default() -> Self {
    Self {
      target_size: DEFAULT_TARGET_SIZE,
      fill: LETTERBOX_FILL,
    }
  }
}

/// 把任意尺寸的 RGB 图像归一化为 `target_size` 边长的正方形帧。
///
/// 长边缩放到目标边长（单一缩放因子，保持纵横比），短边按同一因子缩放后
/// 上下或左右对称填充 `fill` 颜色。缩放使用双线性插值（`Triangle`），
/// 输出为平面 CHW、RGB 顺序、[0, 1] 区间的 f32 像素。
pub fn letterbox(image: &RgbImage, config: &LetterboxConfig) -> LetterboxFrame {
  let target = config.target_size;
  let (orig_w, orig_h) = image.dimensions();

  let scale = target as f32 / orig_w.max(orig_h) as f32;
  let new_w = ((orig_w as f32 * scale).round() as u32).clamp(1, target);
  let new_h = ((orig_h as f32 * scale).round() as u32).clamp(1, target);

  debug!(
    "归一化: {}x{} -> {}x{} (缩放 {:.4}), 画布 {}x{}",
    orig_w, orig_h, new_w, new_h, scale, target, target
  );

  let resized = image::imageops::resize(image, new_w, new_h, image::imageops::FilterType::Triangle);

  let dw = target - new_w;
  let dh = target - new_h;
  let padding = Padding {
    top: dh / 2,
    bottom: dh - dh / 2,
    left: dw / 2,
    right: dw - dw / 2,
  };

  let plane = (target as usize) * (target as usize);
  let mut data = vec![0.0f32; 3 * plane];
  for (c, plane_data) in data.chunks_exact_mut(plane).enumerate() {
    plane_data.fill(config.fill[c] as f32 / 255.0);
  }

  let stride = target as usize;
  for y in 0..new_h {
    for x in 0..new_w {
      let pixel = resized.get_pixel(x, y);
      let row = (padding.top + y) as usize;
      let col = (padding.left + x) as usize;
      for c in 0..3 {
        data[c * plane + row * stride + col] = pixel[c] as f32 / 255.0;
      }
    }
  }

  LetterboxFrame::new(data, target, scale, padding, orig_w, orig_h)
}
