// 该文件是 Renhai （人海） 项目的一部分。
// src/output/draw.rs - 检测结果标注
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

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::model::Detection;

/// 边界框描边颜色（绿色）
pub const STROKE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// 在输入图像的副本上为每个检测结果绘制 2 像素宽的绿色边界框。
/// 输入图像保持不变；检测列表为空时返回逐像素相同的副本。
pub fn annotate(image: &RgbImage, detections: &[Detection]) -> RgbImage {
  let mut annotated = image.clone();
  for detection in detections {
    draw_box(&mut annotated, &detection.bbox);
  }
  annotated
}

fn draw_box(image: &mut RgbImage, bbox: &[f32; 4]) {
  if image.width() == 0 || image.height() == 0 {
    return;
  }

  let max_x = image.width() as i32 - 1;
  let max_y = image.height() as i32 - 1;

  let x_min = (bbox[0].floor() as i32).clamp(0, max_x);
  let y_min = (bbox[1].floor() as i32).clamp(0, max_y);
  let x_max = (bbox[2].ceil() as i32).clamp(0, max_x);
  let y_max = (bbox[3].ceil() as i32).clamp(0, max_y);

  if x_min >= x_max || y_min >= y_max {
    return;
  }

  let width = (x_max - x_min + 1) as u32;
  let height = (y_max - y_min + 1) as u32;

  let rect = Rect::at(x_min, y_min).of_size(width, height);
  draw_hollow_rect_mut(image, rect, STROKE_COLOR);

  // 绘制第二个边框以加粗为 2 像素
  if width > 2 && height > 2 {
    let inner =
      Rect::at(x_min + 1, y_min + 1).of_size(width.saturating_sub(2), height.saturating_sub(2));
    draw_hollow_rect_mut(image, inner, STROKE_COLOR);
  }
}
