//! Soil reference data and the colour heuristic used when no classifier is available.

use serde::Serialize;

pub const ALLUVIAL: &str = "Alluvial soil";
pub const BLACK: &str = "Black Soil";
pub const CLAY: &str = "Clay soil";
pub const RED: &str = "Red soil";
pub const MIXED: &str = "Mixed Soil";
pub const ANALYSIS_ERROR: &str = "Analysis Error";

/// Labels the soil classifiers are trained on, in class-index order.
pub const SOIL_LABELS: [&str; 4] = [ALLUVIAL, BLACK, CLAY, RED];

/// Agronomic notes attached to a soil label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoilProfile {
    pub notes: &'static str,
    pub crops: &'static [&'static str],
    pub care: &'static [&'static str],
}

const ALLUVIAL_PROFILE: SoilProfile = SoilProfile {
    notes: "Fertile soil formed by river deposits, excellent for agriculture.",
    crops: &["Rice", "Wheat", "Corn", "Sugarcane", "Cotton"],
    care: &[
        "Ensure proper drainage",
        "Regular organic matter addition",
        "Monitor pH levels",
    ],
};

const BLACK_PROFILE: SoilProfile = SoilProfile {
    notes: "Rich in clay and organic matter, retains moisture well.",
    crops: &["Cotton", "Wheat", "Jowar", "Linseed", "Tobacco"],
    care: &[
        "Improve drainage",
        "Add organic compost",
        "Deep plowing recommended",
    ],
};

const CLAY_PROFILE: SoilProfile = SoilProfile {
    notes: "Dense soil with high water retention, can be challenging for some crops.",
    crops: &["Rice", "Wheat", "Barley", "Oats"],
    care: &[
        "Improve drainage",
        "Add organic matter",
        "Avoid working when wet",
    ],
};

const RED_PROFILE: SoilProfile = SoilProfile {
    notes: "Iron-rich soil, generally well-drained but may need nutrient supplementation.",
    crops: &["Millet", "Groundnut", "Potato", "Tobacco", "Pulses"],
    care: &[
        "Add lime if acidic",
        "Regular fertilization",
        "Organic matter addition",
    ],
};

/// Profile for a label the classifier knows but the reference table does not.
pub const UNKNOWN_PROFILE: SoilProfile = SoilProfile {
    notes: "No additional info available for this soil type.",
    crops: &[],
    care: &["Test soil pH regularly", "Add organic matter when needed"],
};

/// Returned when the uploaded image cannot be decoded at all.
pub const MIXED_PROFILE: SoilProfile = SoilProfile {
    notes: "Unable to perform detailed analysis at this time. Please try again later or consider professional soil testing.",
    crops: &["Rice", "Wheat", "Vegetables", "Legumes"],
    care: &[
        "Test soil pH regularly (ideal range: 6.0-7.0)",
        "Add organic matter like compost",
        "Ensure proper drainage",
        "Consider professional soil testing",
    ],
};

/// Returned when the request carried no usable image.
pub const ANALYSIS_ERROR_PROFILE: SoilProfile = SoilProfile {
    notes: "Unable to process the image. Please try again with a clearer image.",
    crops: &[],
    care: &[
        "Ensure soil has good drainage",
        "Test soil pH regularly",
        "Add organic matter when needed",
    ],
};

pub fn profile_for(label: &str) -> SoilProfile {
    match label {
        ALLUVIAL => ALLUVIAL_PROFILE,
        BLACK => BLACK_PROFILE,
        CLAY => CLAY_PROFILE,
        RED => RED_PROFILE,
        _ => UNKNOWN_PROFILE,
    }
}

/// Mean channel values of an image on the 0-255 scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStats {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

/// Picks a soil label from the average colour of the sample.
///
/// Rules are checked in order; the first match wins.
pub fn classify_by_color(stats: ColorStats) -> &'static str {
    let ColorStats { red, green, blue } = stats;

    if red > 120.0 && green > 100.0 && blue < 90.0 {
        RED
    } else if red < 80.0 && green < 80.0 && blue < 80.0 {
        BLACK
    } else if red > 100.0 && green > 100.0 && blue > 100.0 {
        ALLUVIAL
    } else {
        CLAY
    }
}

/// Representative mean colour (0-255) for each soil label, used to seed the
/// prototype classifier. Each colour falls inside its own heuristic rule.
pub fn reference_color(label: &str) -> Option<ColorStats> {
    let (red, green, blue) = match label {
        ALLUVIAL => (170.0, 150.0, 125.0),
        BLACK => (50.0, 45.0, 40.0),
        CLAY => (125.0, 90.0, 95.0),
        RED => (165.0, 105.0, 70.0),
        _ => return None,
    };
    Some(ColorStats { red, green, blue })
}
