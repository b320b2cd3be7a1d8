// 该文件是 Renhai （人海） 项目的一部分。
// src/output/save_image_file.rs - 保存图像文件
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
use tracing::warn;

#[derive(Error, Debug)]
pub enum SaveImageFileError {
  #[error("I/O 错误: {0}")]
  IoError(std::io::Error),
  #[error("图像错误: {0}")]
  ImageError(image::ImageError),
}

/// 将标注后的图像保存到文件，必要时创建父目录。
/// 图像格式由文件扩展名决定。
pub fn save_annotated_image(
  image: &RgbImage,
  path: impl AsRef<Path>,
) -> Result<(), SaveImageFileError> {
  let path = path.as_ref();

  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent).map_err(SaveImageFileError::IoError)?;
  }

  image.save(path).map_err(SaveImageFileError::ImageError)?;

  warn!("保存图像到文件: {}", path.display());

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::Rgb;

  #[test]
  fn nested_path_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("out.png");

    let image = RgbImage::from_pixel(16, 8, Rgb([10, 20, 30]));
    save_annotated_image(&image, &path).unwrap();

    let reloaded = image::open(&path).unwrap().to_rgb8();
    assert_eq!(reloaded.dimensions(), (16, 8));
    assert_eq!(*reloaded.get_pixel(0, 0), Rgb([10, 20, 30]));
  }

  #[test]
  fn unknown_extension_is_image_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.unknown");

    let image = RgbImage::new(4, 4);
    let result = save_annotated_image(&image, &path);
    assert!(matches!(result, Err(SaveImageFileError::ImageError(_))));
  }
}
