//! Application-wide constants and default values
//!
//! This module centralizes the column names, control domains and numeric
//! parameters used by the recomputation pipeline.

/// Column names of the measurement table
pub mod columns {
    /// Elapsed time
    pub const ZEIT: &str = "Zeit";

    /// Discharge current
    pub const CURRENT: &str = "Current";

    /// State of charge (percent)
    pub const SOC: &str = "SOC";

    /// Silicon content of the cell composition (percent)
    pub const SIO: &str = "SiO";

    /// Run index
    pub const D: &str = "D";

    /// Measurement regime
    pub const TYP: &str = "Typ";

    /// Derived display label
    pub const BEZEICHNUNG: &str = "Bezeichnung";

    /// Columns every dataset must provide
    pub const REQUIRED: [&str; 6] = [ZEIT, CURRENT, SOC, SIO, D, TYP];
}

/// Regime codes as they appear in the raw exports
pub mod typ {
    /// Numeric code of the VH regime
    pub const VH_CODE: f64 = 1.0;

    /// Numeric code of the VD regime
    pub const VD_CODE: f64 = 2.0;
}

/// Control domains and startup selections
pub mod controls {
    /// Selectable state-of-charge values
    pub const SOC_OPTIONS: [f64; 5] = [10.0, 30.0, 50.0, 70.0, 90.0];

    /// Selectable silicon-content values
    pub const SIO_OPTIONS: [f64; 3] = [0.0, 10.0, 15.0];

    /// Lowest run index
    pub const RUN_MIN: i64 = 1;

    /// Highest run index
    pub const RUN_MAX: i64 = 5;

    /// Startup SOC selection
    pub const DEFAULT_SOC: [f64; 1] = [50.0];

    /// Startup SiO selection
    pub const DEFAULT_SIO: [f64; 1] = [15.0];

    /// Startup chart title
    pub const DEFAULT_TITLE: &str = "Auswertung";

    /// Startup color column
    pub const DEFAULT_COLOR_COLUMN: &str = super::columns::BEZEICHNUNG;

    /// Startup symbol column
    pub const DEFAULT_SYMBOL_COLUMN: &str = super::columns::SIO;
}

/// Value-range slider parameters
pub mod axis {
    /// Spacing between tick marks and rounding unit of the bounds
    pub const TICK_STEP: f64 = 10.0;

    /// Slider drag step
    pub const SLIDER_STEP: f64 = 0.05;

    /// Decimal places of tick labels
    pub const LABEL_DECIMALS: i32 = 2;

    /// Upper bound on tick marks; wider ranges skip whole steps
    pub const MAX_MARKS: usize = 101;
}

/// Savitzky-Golay smoothing parameters
pub mod smoothing {
    /// Window length in samples (odd)
    pub const WINDOW: usize = 17;

    /// Polynomial order
    pub const ORDER: usize = 9;
}

/// Chart layout defaults
pub mod layout {
    /// Chart width in pixels
    pub const CHART_WIDTH: u32 = 2000;

    /// Chart height in pixels
    pub const CHART_HEIGHT: u32 = 800;
}

/// Numeric precision constants
pub mod numeric {
    /// Matrix singularity check tolerance
    pub const SINGULARITY_TOLERANCE: f64 = 1e-10;
}

/// Configuration file paths
pub mod config {
    /// Control-state file name
    pub const STATE_FILE: &str = "discharge-explorer.json";
}
