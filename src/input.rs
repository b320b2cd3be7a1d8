// 该文件是 Renhai （人海） 项目的一部分。
// src/input.rs - 图像输入
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

use std::path::Path;

use image::RgbImage;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ImageLoadError {
  #[error("I/O 错误: {0}")]
  Io(#[from] std::io::Error),
  #[error("图像解码错误: {0}")]
  Decode(#[from] image::ImageError),
  #[error("图像尺寸为零: {0}x{1}")]
  ZeroSize(u32, u32),
}

/// 读取并解码一个静态图像文件。文件内容先完整读入内存再解码，
/// 解码结果统一为 RGB 三通道。
pub fn load_image(path: impl AsRef<Path>) -> Result<RgbImage, ImageLoadError> {
  let path = path.as_ref();
  info!("读取图像文件: {}", path.display());

  let bytes = std::fs::read(path)?;
  debug!("图像文件大小: {:.2} MB", bytes.len() as f64 / (1024.0 * 1024.0));

  let image = image::load_from_memory(&bytes)?.to_rgb8();
  if image.width() == 0 || image.height() == 0 {
    return Err(ImageLoadError::ZeroSize(image.width(), image.height()));
  }

  debug!("图像尺寸: {}x{}", image.width(), image.height());
  Ok(image)
}
