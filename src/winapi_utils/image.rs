//! PNG decoding through the Windows Imaging Component.

use crate::error::AssetLoadError;
use std::path::Path;
use windows::core::HSTRING;
use windows::Win32::Foundation::GENERIC_READ;
use windows::Win32::Graphics::Imaging::{
    CLSID_WICImagingFactory, GUID_WICPixelFormat32bppPBGRA, IWICImagingFactory, IWICPalette,
    WICBitmapDitherTypeNone, WICBitmapPaletteTypeCustom, WICDecodeMetadataCacheOnDemand,
};
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CLSCTX_INPROC_SERVER, COINIT_APARTMENTTHREADED,
};

/// A decoded image as top-down, premultiplied 32-bit BGRA rows.
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Initializes COM for the calling thread. Call once on the UI thread.
pub fn init_com() -> windows::core::Result<()> {
    unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) }.ok()
}

/// Decodes the image file at `path`.
pub fn decode_image(path: &Path) -> Result<DecodedImage, AssetLoadError> {
    let fail = |e: windows::core::Error| AssetLoadError::new(path, e.to_string());

    unsafe {
        let factory: IWICImagingFactory =
            CoCreateInstance(&CLSID_WICImagingFactory, None, CLSCTX_INPROC_SERVER).map_err(fail)?;
        let decoder = factory
            .CreateDecoderFromFilename(
                &HSTRING::from(path),
                None,
                GENERIC_READ,
                WICDecodeMetadataCacheOnDemand,
            )
            .map_err(fail)?;
        let frame = decoder.GetFrame(0).map_err(fail)?;

        let converter = factory.CreateFormatConverter().map_err(fail)?;
        converter
            .Initialize(
                &frame,
                &GUID_WICPixelFormat32bppPBGRA,
                WICBitmapDitherTypeNone,
                None::<&IWICPalette>,
                0.0,
                WICBitmapPaletteTypeCustom,
            )
            .map_err(fail)?;

        let (mut width, mut height) = (0u32, 0u32);
        converter.GetSize(&mut width, &mut height).map_err(fail)?;
        if width == 0 || height == 0 {
            return Err(AssetLoadError::new(path, "image has no pixels"));
        }

        let stride = width * 4;
        let mut pixels = vec![0u8; stride as usize * height as usize];
        converter
            .CopyPixels(std::ptr::null(), stride, &mut pixels)
            .map_err(fail)?;

        tracing::debug!(width, height, path = %path.display(), "Decoded map image");
        Ok(DecodedImage { width, height, pixels })
    }
}
