//! Page renderer seam.
//!
//! Rasterization is external; the session only ever asks for the
//! rendered dimensions of a page (to project normalized positions) and
//! the document's true page count (drawings are created with a
//! placeholder count of 1 and corrected once the renderer has opened
//! the file).

use async_trait::async_trait;

use planmark_core::error::CoreError;
use planmark_core::geometry::SurfaceSize;

/// Reports raster geometry for drawing sources.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Raster dimensions of one page at the given zoom factor.
    async fn surface_size(
        &self,
        source_ref: &str,
        page_number: i32,
        zoom: f64,
    ) -> Result<SurfaceSize, CoreError>;

    /// Total number of pages in the document.
    async fn page_count(&self, source_ref: &str) -> Result<i32, CoreError>;
}

/// Renderer with a fixed base page size and page count.
///
/// Stands in for a real PDF rasterizer in the demo binary and tests.
#[derive(Debug, Clone)]
pub struct StaticRenderer {
    base_width: f64,
    base_height: f64,
    pages: i32,
}

impl StaticRenderer {
    pub fn new(base_width: f64, base_height: f64, pages: i32) -> Self {
        Self {
            base_width,
            base_height,
            pages,
        }
    }
}

#[async_trait]
impl PageRenderer for StaticRenderer {
    async fn surface_size(
        &self,
        _source_ref: &str,
        page_number: i32,
        zoom: f64,
    ) -> Result<SurfaceSize, CoreError> {
        if page_number < 1 || page_number > self.pages {
            return Err(CoreError::Validation(format!(
                "page {page_number} out of range (document has {} pages)",
                self.pages
            )));
        }
        SurfaceSize::new(self.base_width * zoom, self.base_height * zoom)
    }

    async fn page_count(&self, _source_ref: &str) -> Result<i32, CoreError> {
        Ok(self.pages)
    }
}
