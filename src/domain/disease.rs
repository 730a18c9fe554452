use serde::Serialize;
use std::fmt;

/// PlantDoc labels in class-index order, used when the label file is missing.
pub const FALLBACK_CLASS_NAMES: &[&str] = &[
    "Apple leaf",
    "Apple rust leaf",
    "Apple Scab Leaf",
    "Bell_pepper leaf",
    "Bell_pepper leaf spot",
    "Blueberry leaf",
    "Cherry leaf",
    "Corn Gray leaf spot",
    "Corn leaf blight",
    "Corn rust leaf",
    "grape leaf",
    "grape leaf black rot",
    "Peach leaf",
    "Potato leaf early blight",
    "Potato leaf late blight",
    "Raspberry leaf",
    "Soyabean leaf",
    "Squash Powdery mildew leaf",
    "Strawberry leaf",
    "Tomato Early blight leaf",
    "Tomato leaf",
    "Tomato leaf bacterial spot",
    "Tomato leaf late blight",
    "Tomato leaf mosaic virus",
    "Tomato leaf yellow virus",
    "Tomato mold leaf",
    "Tomato Septoria leaf spot",
];

/// Labels that denote a leaf without visible disease.
pub const HEALTHY_CLASSES: &[&str] = &[
    "Apple leaf",
    "Bell_pepper leaf",
    "Blueberry leaf",
    "Cherry leaf",
    "grape leaf",
    "Peach leaf",
    "Raspberry leaf",
    "Soyabean leaf",
    "Strawberry leaf",
    "Tomato leaf",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Healthy,
    Diseased,
}

impl HealthStatus {
    pub fn for_label(label: &str) -> Self {
        if HEALTHY_CLASSES.contains(&label) {
            HealthStatus::Healthy
        } else {
            HealthStatus::Diseased
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "HEALTHY"),
            HealthStatus::Diseased => write!(f, "DISEASED"),
        }
    }
}
