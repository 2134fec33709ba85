//! Transformation operations requested against an uploaded image

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest accepted thumbnail edge, in pixels
pub const MAX_THUMBNAIL_SIZE: u32 = 1000;

/// Largest accepted resize dimension, in pixels
pub const MAX_RESIZE_DIMENSION: u32 = 4096;

/// A single named transformation
///
/// Serialized as `{"type": "...", "parameters": {...}}`, which is the element
/// shape of the operations descriptor sent with an upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "parameters", rename_all = "snake_case")]
pub enum Operation {
    Thumbnail {
        size: u32,
        #[serde(default)]
        crop_to_fit: bool,
    },
    Resize {
        width: u32,
        height: u32,
        #[serde(default = "default_keep_aspect")]
        keep_aspect: bool,
    },
    Watermark {
        text: String,
        opacity: f32,
        #[serde(default)]
        position: WatermarkPosition,
    },
}

fn default_keep_aspect() -> bool {
    true
}

/// Error returned when operation parameters are out of range
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidOperation {
    #[error("thumbnail size must be between 1 and 1000, got {0}")]
    ThumbnailSize(u32),

    #[error("resize dimensions must be between 1 and 4096, got {width}x{height}")]
    ResizeDimensions { width: u32, height: u32 },

    #[error("watermark opacity must be between 0 and 1, got {0}")]
    WatermarkOpacity(f32),

    #[error("watermark text cannot be empty")]
    EmptyWatermarkText,
}

impl Operation {
    /// Thumbnail without cropping
    pub fn thumbnail(size: u32) -> Self {
        Operation::Thumbnail {
            size,
            crop_to_fit: false,
        }
    }

    pub fn resize(width: u32, height: u32, keep_aspect: bool) -> Self {
        Operation::Resize {
            width,
            height,
            keep_aspect,
        }
    }

    pub fn watermark(text: impl Into<String>, opacity: f32, position: WatermarkPosition) -> Self {
        Operation::Watermark {
            text: text.into(),
            opacity,
            position,
        }
    }

    /// The stored variant this operation produces
    pub fn variant(&self) -> ResourceVariant {
        match self {
            Operation::Thumbnail { .. } => ResourceVariant::Thumbnail,
            Operation::Resize { .. } => ResourceVariant::Resize,
            Operation::Watermark { .. } => ResourceVariant::Watermark,
        }
    }

    /// Checks parameter ranges the service would otherwise reject
    pub fn validate(&self) -> Result<(), InvalidOperation> {
        match self {
            Operation::Thumbnail { size, .. } => {
                if *size == 0 || *size > MAX_THUMBNAIL_SIZE {
                    return Err(InvalidOperation::ThumbnailSize(*size));
                }
            }
            Operation::Resize { width, height, .. } => {
                let in_range = |v: u32| (1..=MAX_RESIZE_DIMENSION).contains(&v);
                if !in_range(*width) || !in_range(*height) {
                    return Err(InvalidOperation::ResizeDimensions {
                        width: *width,
                        height: *height,
                    });
                }
            }
            Operation::Watermark { text, opacity, .. } => {
                if text.trim().is_empty() {
                    return Err(InvalidOperation::EmptyWatermarkText);
                }
                if !opacity.is_finite() || !(0.0..=1.0).contains(opacity) {
                    return Err(InvalidOperation::WatermarkOpacity(*opacity));
                }
            }
        }
        Ok(())
    }
}

/// Placement of a watermark on the image
///
/// Hyphenated on the wire (`bottom-right`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkPosition {
    TopLeft,
    TopCenter,
    TopRight,
    Center,
    BottomLeft,
    BottomCenter,
    #[default]
    BottomRight,
}

impl WatermarkPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            WatermarkPosition::TopLeft => "top-left",
            WatermarkPosition::TopCenter => "top-center",
            WatermarkPosition::TopRight => "top-right",
            WatermarkPosition::Center => "center",
            WatermarkPosition::BottomLeft => "bottom-left",
            WatermarkPosition::BottomCenter => "bottom-center",
            WatermarkPosition::BottomRight => "bottom-right",
        }
    }
}

impl std::str::FromStr for WatermarkPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "top-left" => Ok(WatermarkPosition::TopLeft),
            "top-center" => Ok(WatermarkPosition::TopCenter),
            "top-right" => Ok(WatermarkPosition::TopRight),
            "center" => Ok(WatermarkPosition::Center),
            "bottom-left" => Ok(WatermarkPosition::BottomLeft),
            "bottom-center" => Ok(WatermarkPosition::BottomCenter),
            "bottom-right" => Ok(WatermarkPosition::BottomRight),
            other => Err(format!("unknown watermark position '{}'", other)),
        }
    }
}

/// A stored rendition of an image: the upload itself or one operation's output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceVariant {
    #[default]
    Original,
    Thumbnail,
    Resize,
    Watermark,
}

impl ResourceVariant {
    /// Name used in the `operation` query parameter
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceVariant::Original => "original",
            ResourceVariant::Thumbnail => "thumbnail",
            ResourceVariant::Resize => "resize",
            ResourceVariant::Watermark => "watermark",
        }
    }
}

impl std::fmt::Display for ResourceVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResourceVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "original" => Ok(ResourceVariant::Original),
            "thumbnail" => Ok(ResourceVariant::Thumbnail),
            "resize" => Ok(ResourceVariant::Resize),
            "watermark" => Ok(ResourceVariant::Watermark),
            other => Err(format!("unknown operation '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_shape() {
        let ops = vec![
            Operation::thumbnail(128),
            Operation::resize(800, 600, true),
            Operation::watermark("(c) imgflow", 0.5, WatermarkPosition::BottomRight),
        ];

        let value = serde_json::to_value(&ops).unwrap();
        assert_eq!(
            value,
            json!([
                {"type": "thumbnail", "parameters": {"size": 128, "crop_to_fit": false}},
                {"type": "resize", "parameters": {"width": 800, "height": 600, "keep_aspect": true}},
                {"type": "watermark", "parameters": {"text": "(c) imgflow", "opacity": 0.5, "position": "bottom-right"}}
            ])
        );
    }

    #[test]
    fn test_descriptor_defaults() {
        let op: Operation =
            serde_json::from_value(json!({"type": "resize", "parameters": {"width": 10, "height": 20}}))
                .unwrap();
        assert_eq!(op, Operation::resize(10, 20, true));
    }

    #[test]
    fn test_validate_ranges() {
        assert!(Operation::thumbnail(128).validate().is_ok());
        assert_eq!(
            Operation::thumbnail(0).validate(),
            Err(InvalidOperation::ThumbnailSize(0))
        );
        assert!(Operation::resize(4096, 1, false).validate().is_ok());
        assert!(Operation::resize(4097, 600, true).validate().is_err());
        assert!(
            Operation::watermark("x", 1.5, WatermarkPosition::Center)
                .validate()
                .is_err()
        );
        assert!(
            Operation::watermark("  ", 0.5, WatermarkPosition::Center)
                .validate()
                .is_err()
        );
        assert!(
            Operation::watermark("x", f32::NAN, WatermarkPosition::Center)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_variant_names() {
        assert_eq!(Operation::thumbnail(64).variant(), ResourceVariant::Thumbnail);
        assert_eq!("Original".parse::<ResourceVariant>().unwrap(), ResourceVariant::Original);
        assert_eq!(
            "bottom-left".parse::<WatermarkPosition>().unwrap(),
            WatermarkPosition::BottomLeft
        );
        assert_eq!(
            "TOP_CENTER".parse::<WatermarkPosition>().unwrap(),
            WatermarkPosition::TopCenter
        );
    }

    #[test]
    fn test_watermark_positions_are_hyphenated() {
        let positions = [
            WatermarkPosition::TopLeft,
            WatermarkPosition::TopCenter,
            WatermarkPosition::TopRight,
            WatermarkPosition::Center,
            WatermarkPosition::BottomLeft,
            WatermarkPosition::BottomCenter,
            WatermarkPosition::BottomRight,
        ];
        for position in positions {
            let value = serde_json::to_value(position).unwrap();
            assert_eq!(value, json!(position.as_str()));
            assert!(!position.as_str().contains('_'));
            assert_eq!(position.as_str().parse::<WatermarkPosition>().unwrap(), position);
        }

        let op: Operation = serde_json::from_value(json!({
            "type": "watermark",
            "parameters": {"text": "x", "opacity": 0.3, "position": "top-right"}
        }))
        .unwrap();
        assert_eq!(op, Operation::watermark("x", 0.3, WatermarkPosition::TopRight));
    }
}
