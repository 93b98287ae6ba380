/*!
Screenshot helper: dump the frame buffer to a PNG on disk.

Debug tooling only; the game never reads the file back. The image format is
inferred from the path extension by the image crate.
*/

use std::path::Path;

use crate::frame_buffer::{BYTES_PER_PIXEL, FrameBuffer, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Save the frame buffer as an RGBA image.
pub fn save<P: AsRef<Path>>(fb: &FrameBuffer, path: P) -> Result<(), String> {
    let mut bytes = vec![0u8; SCREEN_WIDTH * SCREEN_HEIGHT * BYTES_PER_PIXEL];
    fb.write_rgba(&mut bytes);

    let image = image::RgbaImage::from_raw(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32, bytes)
        .ok_or_else(|| "frame buffer size does not match image dimensions".to_string())?;
    image
        .save(path.as_ref())
        .map_err(|e| format!("failed to save screenshot: {e}"))
}
