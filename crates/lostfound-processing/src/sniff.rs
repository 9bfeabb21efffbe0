//! Content sniffing: determine an upload's real image format from its leading bytes.
//!
//! The filename plays no part here. Sniffers only look at a byte prefix, so callers
//! never need to hand over more than [`lostfound_core::constants::SNIFF_PREFIX_LEN`] bytes.

use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Image formats a sniffer can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
    Gif,
    Bmp,
}

impl ImageFormat {
    /// Extensions conventionally used for this format
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ImageFormat::Jpeg => &["jpg", "jpeg"],
            ImageFormat::Png => &["png"],
            ImageFormat::Webp => &["webp"],
            ImageFormat::Gif => &["gif"],
            ImageFormat::Bmp => &["bmp"],
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Webp => "image/webp",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Bmp => "image/bmp",
        }
    }

    /// Whether any of this format's extensions is on `allowed`
    pub fn is_allowed_by(&self, allowed: &[String]) -> bool {
        self.extensions()
            .iter()
            .any(|ext| allowed.iter().any(|a| a == ext))
    }
}

impl Display for ImageFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.extensions()[0])
    }
}

/// Determines the true format of a file from its first bytes.
pub trait ContentSniffer: Send + Sync {
    /// `None` when the prefix matches no known image format
    fn sniff(&self, prefix: &[u8]) -> Option<ImageFormat>;
}

/// A magic-number signature: every `(offset, bytes)` part must match.
#[derive(Debug, Clone, Copy)]
pub struct Signature {
    pub format: ImageFormat,
    pub parts: &'static [(usize, &'static [u8])],
}

impl Signature {
    pub const fn new(format: ImageFormat, parts: &'static [(usize, &'static [u8])]) -> Self {
        Self { format, parts }
    }

    pub fn matches(&self, prefix: &[u8]) -> bool {
        !self.parts.is_empty()
            && self.parts.iter().all(|(offset, bytes)| {
                prefix
                    .get(*offset..offset + bytes.len())
                    .is_some_and(|window| window == *bytes)
            })
    }
}

/// JPEG: FF D8 FF
pub const JPEG_SIGNATURE: Signature = Signature::new(ImageFormat::Jpeg, &[(0, &[0xFF, 0xD8, 0xFF])]);

/// PNG: 89 50 4E 47 0D 0A 1A 0A
pub const PNG_SIGNATURE: Signature = Signature::new(
    ImageFormat::Png,
    &[(0, &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A])],
);

/// WebP: "RIFF" <4-byte length> "WEBP"
pub const WEBP_SIGNATURE: Signature =
    Signature::new(ImageFormat::Webp, &[(0, b"RIFF"), (8, b"WEBP")]);

/// GIF: "GIF87a" or "GIF89a"; not in the default table
pub const GIF_SIGNATURE: Signature = Signature::new(ImageFormat::Gif, &[(0, b"GIF8")]);

/// Table-driven sniffer. The default table covers JPEG, PNG and WebP.
#[derive(Debug, Clone)]
pub struct SignatureSniffer {
    signatures: Vec<Signature>,
}

impl Default for SignatureSniffer {
    fn default() -> Self {
        Self {
            signatures: vec![JPEG_SIGNATURE, PNG_SIGNATURE, WEBP_SIGNATURE],
        }
    }
}

impl SignatureSniffer {
    pub fn new(signatures: Vec<Signature>) -> Self {
        Self { signatures }
    }

    /// Add a signature to the table. Earlier signatures win on overlap.
    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.signatures.push(signature);
        self
    }
}

impl ContentSniffer for SignatureSniffer {
    fn sniff(&self, prefix: &[u8]) -> Option<ImageFormat> {
        self.signatures
            .iter()
            .find(|sig| sig.matches(prefix))
            .map(|sig| sig.format)
    }
}

/// Sniffer backed by `image::guess_format`.
#[cfg(feature = "image")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateSniffer;

#[cfg(feature = "image")]
impl ContentSniffer for ImageCrateSniffer {
    fn sniff(&self, prefix: &[u8]) -> Option<ImageFormat> {
        match image::guess_format(prefix).ok()? {
            image::ImageFormat::Jpeg => Some(ImageFormat::Jpeg),
            image::ImageFormat::Png => Some(ImageFormat::Png),
            image::ImageFormat::WebP => Some(ImageFormat::Webp),
            image::ImageFormat::Gif => Some(ImageFormat::Gif),
            image::ImageFormat::Bmp => Some(ImageFormat::Bmp),
            _ => None,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    pub const JPEG_MAGIC: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];
    pub const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    pub const WEBP_MAGIC: [u8; 12] = [
        0x52, 0x49, 0x46, 0x46, 0x24, 0x00, 0x00, 0x00, 0x57, 0x45, 0x42, 0x50,
    ];
    pub const GIF_MAGIC: [u8; 6] = *b"GIF89a";
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_signature_sniffer_default_formats() {
        let sniffer = SignatureSniffer::default();
        assert_eq!(sniffer.sniff(&JPEG_MAGIC), Some(ImageFormat::Jpeg));
        assert_eq!(sniffer.sniff(&PNG_MAGIC), Some(ImageFormat::Png));
        assert_eq!(sniffer.sniff(&WEBP_MAGIC), Some(ImageFormat::Webp));
        assert_eq!(sniffer.sniff(&GIF_MAGIC), None);
    }

    #[test]
    fn test_signature_sniffer_rejects_text_and_short_input() {
        let sniffer = SignatureSniffer::default();
        assert_eq!(sniffer.sniff(b"hello, this is plain text"), None);
        assert_eq!(sniffer.sniff(&[]), None);
        assert_eq!(sniffer.sniff(&[0xFF, 0xD8]), None);
        // RIFF container that is not WebP (e.g. WAV)
        assert_eq!(sniffer.sniff(b"RIFF\x24\x00\x00\x00WAVEfmt "), None);
    }

    #[test]
    fn test_signature_sniffer_can_be_extended() {
        let sniffer = SignatureSniffer::default().with_signature(GIF_SIGNATURE);
        assert_eq!(sniffer.sniff(&GIF_MAGIC), Some(ImageFormat::Gif));
    }

    #[test]
    fn test_empty_signature_never_matches() {
        let sig = Signature::new(ImageFormat::Png, &[]);
        assert!(!sig.matches(&PNG_MAGIC));
    }

    #[test]
    fn test_format_allowed_by_extension_list() {
        let allowed = vec!["jpg".to_string(), "png".to_string()];
        assert!(ImageFormat::Jpeg.is_allowed_by(&allowed));
        assert!(ImageFormat::Png.is_allowed_by(&allowed));
        assert!(!ImageFormat::Webp.is_allowed_by(&allowed));
        assert_eq!(ImageFormat::Jpeg.to_string(), "jpg");
        assert_eq!(ImageFormat::Webp.mime_type(), "image/webp");
    }

    #[cfg(feature = "image")]
    #[test]
    fn test_image_crate_sniffer_agrees_on_default_formats() {
        let sniffer = ImageCrateSniffer;
        assert_eq!(sniffer.sniff(&JPEG_MAGIC), Some(ImageFormat::Jpeg));
        assert_eq!(sniffer.sniff(&PNG_MAGIC), Some(ImageFormat::Png));
        assert_eq!(sniffer.sniff(&WEBP_MAGIC), Some(ImageFormat::Webp));
        assert_eq!(sniffer.sniff(&GIF_MAGIC), Some(ImageFormat::Gif));
        assert_eq!(sniffer.sniff(b"plain text"), None);
    }
}
