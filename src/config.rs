use serde::{Deserialize, Serialize};

/// Wire field names expected by the grid service.
pub const FIELD_IMAGE_SIZE: &str = "individualImageSize";
pub const FIELD_RANDOMIZED_ORDER: &str = "randomizedOrder";
pub const FIELD_PAPER_FORMAT: &str = "printerPaperFormat";

/// Allowed range for the individual image size slider.
///
/// Bounds are configuration, not constants: deployments have shipped both
/// `100..=2000` step 100 and `100..=3000` step 50. The default is the newer
/// profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeBounds {
    pub min: u32,
    pub max: u32,
    pub step: u32,
}

impl Default for SizeBounds {
    fn default() -> Self {
        Self {
            min: 100,
            max: 3000,
            step: 50,
        }
    }
}

impl SizeBounds {
    /// The legacy slider profile.
    pub fn legacy() -> Self {
        Self {
            min: 100,
            max: 2000,
            step: 100,
        }
    }

    /// Bring a value into bounds: clamp into `[min, max]`, then snap down to
    /// the nearest step from `min`. Out-of-range writes are clamped rather
    /// than rejected, so a stored size is always valid.
    pub fn clamp(&self, px: u32) -> u32 {
        let clamped = px.clamp(self.min, self.max);
        if self.step == 0 {
            return clamped;
        }
        self.min + ((clamped - self.min) / self.step) * self.step
    }
}

/// Generation options sent alongside the files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridOptions {
    /// Side length of each cell in the composite, in pixels.
    pub image_size: u32,
    /// Shuffle the images instead of keeping selection order.
    pub randomized_order: bool,
    /// Lay the grid out for printer paper proportions.
    pub printer_paper_format: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            image_size: 1000,
            randomized_order: true,
            printer_paper_format: false,
        }
    }
}

impl GridOptions {
    /// The three option fields as wire strings, in contract order.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        vec![
            (FIELD_IMAGE_SIZE.to_string(), self.image_size.to_string()),
            (
                FIELD_RANDOMIZED_ORDER.to_string(),
                self.randomized_order.to_string(),
            ),
            (
                FIELD_PAPER_FORMAT.to_string(),
                self.printer_paper_format.to_string(),
            ),
        ]
    }
}
