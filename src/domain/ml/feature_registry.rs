/// Ordered list of price model feature names.
/// This order MUST match exactly with the column order the regressors were trained on.
/// Any change here is a breaking change for ML models.
pub const PRICE_FEATURE_NAMES: &[&str] = &[
    "Days",
    "Month",
    "Arrivals (Tonnes)",
    "Min Price (Rs./Quintal)",
    "Max Price (Rs./Quintal)",
    "Price Range",
    "Demand Indicator",
    "Rolling_Modal_Price",
    "Lag_1_Month",
    "Lag_2_Months",
    "Price_Change_Rate",
];

/// Ordered list of weather model feature names.
pub const WEATHER_FEATURE_NAMES: &[&str] = &[
    "Days",
    "Temperature (°C)",
    "Humidity (%)",
    "Wind Speed (m/s)",
    "Pressure (hPa)",
];

/// One synthetic future row for a crop price regressor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceFeatures {
    pub days: f64,
    pub month: f64,
    pub arrivals: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub price_range: f64,
    pub demand_indicator: f64,
    pub rolling_modal_price: f64,
    pub lag_1_month: f64,
    pub lag_2_months: f64,
    pub price_change_rate: f64,
}

/// One synthetic future row for the temperature regressor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherFeatures {
    pub days: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub pressure: f64,
}

pub fn price_features_to_vector(fs: &PriceFeatures) -> Vec<f64> {
    vec![
        fs.days,
        fs.month,
        fs.arrivals,
        fs.min_price,
        fs.max_price,
        fs.price_range,
        fs.demand_indicator,
        fs.rolling_modal_price,
        fs.lag_1_month,
        fs.lag_2_months,
        fs.price_change_rate,
    ]
}

pub fn weather_features_to_vector(fs: &WeatherFeatures) -> Vec<f64> {
    vec![
        fs.days,
        fs.temperature,
        fs.humidity,
        fs.wind_speed,
        fs.pressure,
    ]
}

/// `n` evenly spaced values over `[start, end]`, both ends included.
/// A single value collapses to `start`.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}
