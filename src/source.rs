//! Asynchronous image-size resolution.
//!
//! Decoding the underlying image is the host's business; the controller only
//! needs its dimensions, delivered once, asynchronously. [`ImageSource`]
//! abstracts whatever resolves them (a decoder task, a network fetch, a
//! cache lookup), and [`LoadState`] is the observable the render boundary
//! watches to decide between a loading placeholder, a failure placeholder,
//! and the live overlay.

use serde::{Deserialize, Serialize};

use crate::error::ImageLoadError;
use crate::geometry::Size;

/// Something that can resolve the original image's dimensions, once.
///
/// `resolve` consumes the source: resolution happens a single time per
/// source value, matching the load-once contract.
#[allow(async_fn_in_trait)]
pub trait ImageSource {
    async fn resolve(self) -> Result<Size, ImageLoadError>;
}

/// A size known up front resolves immediately. Useful for tests and for
/// hosts that already decoded the image before constructing the controller.
impl ImageSource for Size {
    async fn resolve(self) -> Result<Size, ImageLoadError> {
        if !self.has_area() {
            return Err(ImageLoadError::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }
}

/// State of the original-image-size resolution.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum LoadState {
    /// No load has been requested yet.
    #[default]
    NotLoaded,
    /// A load is in flight.
    Loading,
    /// The original image size is known; drawing operations are meaningful.
    Ready(Size),
    /// Resolution failed. Distinct from `Loading`: the boundary should show
    /// a failure placeholder, not spin forever.
    Failed,
}

impl LoadState {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready(_))
    }

    /// The resolved original image size, if ready.
    pub fn size(&self) -> Option<Size> {
        match self {
            LoadState::Ready(size) => Some(*size),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_resolves_immediately() {
        let size = pollster::block_on(Size::new(640.0, 480.0).resolve()).unwrap();
        assert_eq!(size, Size::new(640.0, 480.0));
    }

    #[test]
    fn test_empty_size_fails() {
        let result = pollster::block_on(Size::new(0.0, 480.0).resolve());
        assert_eq!(
            result,
            Err(ImageLoadError::EmptyImage {
                width: 0.0,
                height: 480.0
            })
        );
    }

    #[test]
    fn test_load_state_accessors() {
        assert!(!LoadState::NotLoaded.is_ready());
        assert!(!LoadState::Loading.is_ready());
        assert!(!LoadState::Failed.is_ready());

        let ready = LoadState::Ready(Size::new(10.0, 20.0));
        assert!(ready.is_ready());
        assert_eq!(ready.size(), Some(Size::new(10.0, 20.0)));
        assert_eq!(LoadState::Failed.size(), None);
    }
}
