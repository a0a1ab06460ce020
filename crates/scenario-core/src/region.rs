//! Regions, crops and the baseline rows supplied per region and date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::validate::ValidationError;

/// Numeric identity of a region. Ordering is used as the ranking tie-break.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub u32);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coarse altitude classification of a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AltitudeBand {
    Low,
    Medium,
    High,
}

impl AltitudeBand {
    pub fn as_str(self) -> &'static str {
        match self {
            AltitudeBand::Low => "low",
            AltitudeBand::Medium => "medium",
            AltitudeBand::High => "high",
        }
    }
}

impl FromStr for AltitudeBand {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(AltitudeBand::Low),
            "medium" => Ok(AltitudeBand::Medium),
            "high" => Ok(AltitudeBand::High),
            other => Err(ValidationError::UnknownAltitude(other.to_string())),
        }
    }
}

/// Read-only reference data for one geographic region.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    /// Display name.
    pub name: String,
    /// Name in the local language of the dashboard audience.
    pub localized_name: String,
    pub altitude_band: AltitudeBand,
}

/// Crops modelled by the agriculture kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropType {
    Coffee,
    SugarCane,
    Corn,
    Beans,
}

impl CropType {
    /// Every crop, in reporting order.
    pub const ALL: [CropType; 4] = [
        CropType::Coffee,
        CropType::SugarCane,
        CropType::Corn,
        CropType::Beans,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CropType::Coffee => "coffee",
            CropType::SugarCane => "sugar_cane",
            CropType::Corn => "corn",
            CropType::Beans => "beans",
        }
    }
}

impl fmt::Display for CropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CropType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coffee" => Ok(CropType::Coffee),
            "sugar_cane" | "sugarcane" => Ok(CropType::SugarCane),
            "corn" => Ok(CropType::Corn),
            "beans" => Ok(CropType::Beans),
            other => Err(ValidationError::UnknownCrop(other.to_string())),
        }
    }
}

/// Either a single crop or the wildcard `"all"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CropFilter {
    #[default]
    All,
    Only(CropType),
}

impl CropFilter {
    /// Crops selected by this filter, in reporting order.
    pub fn crops(self) -> Vec<CropType> {
        match self {
            CropFilter::All => CropType::ALL.to_vec(),
            CropFilter::Only(c) => vec![c],
        }
    }

    pub fn matches(self, crop: CropType) -> bool {
        match self {
            CropFilter::All => true,
            CropFilter::Only(c) => c == crop,
        }
    }
}

impl FromStr for CropFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CropFilter::All);
        }
        s.parse::<CropType>().map(CropFilter::Only)
    }
}

impl TryFrom<String> for CropFilter {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CropFilter> for String {
    fn from(value: CropFilter) -> Self {
        match value {
            CropFilter::All => "all".to_string(),
            CropFilter::Only(c) => c.as_str().to_string(),
        }
    }
}

/// One baseline row for a region and date, optionally for a single crop.
///
/// Rows without a crop carry the regional climate, energy and water baseline;
/// crop rows repeat the climate values and add the crop's baseline yield.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaselineRecord {
    pub region_id: RegionId,
    pub date: NaiveDate,
    pub rainfall_mm: f64,
    pub temperature_c: f64,
    /// Soil moisture percentage observed on the baseline day.
    pub soil_moisture_pct: f64,
    pub energy_demand_kwh: f64,
    /// Share of demand met by the current solar fleet, in [0,1].
    pub solar_capacity_factor: f64,
    pub water_demand_m3: f64,
    pub water_supply_m3: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_type: Option<CropType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_yield_kg: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_filter_parses_wildcard_and_crops() {
        assert_eq!("all".parse::<CropFilter>().unwrap(), CropFilter::All);
        assert_eq!(
            "Sugar_Cane".parse::<CropFilter>().unwrap(),
            CropFilter::Only(CropType::SugarCane)
        );
        assert!(matches!(
            "rice".parse::<CropFilter>(),
            Err(ValidationError::UnknownCrop(_))
        ));
    }

    #[test]
    fn crop_filter_serde_is_a_plain_string() {
        let s = serde_json::to_string(&CropFilter::Only(CropType::Coffee)).unwrap();
        assert_eq!(s, "\"coffee\"");
        let back: CropFilter = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(back, CropFilter::All);
        assert!(serde_json::from_str::<CropFilter>("\"tobacco\"").is_err());
    }

    #[test]
    fn all_filter_lists_crops_in_reporting_order() {
        assert_eq!(CropFilter::All.crops(), CropType::ALL.to_vec());
        assert_eq!(CropFilter::Only(CropType::Corn).crops(), vec![CropType::Corn]);
        assert!(CropFilter::Only(CropType::Corn).matches(CropType::Corn));
        assert!(!CropFilter::Only(CropType::Corn).matches(CropType::Beans));
    }

    #[test]
    fn baseline_record_omits_absent_crop_fields() {
        let r = BaselineRecord {
            region_id: RegionId(3),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            rainfall_mm: 80.0,
            temperature_c: 21.0,
            soil_moisture_pct: 45.0,
            energy_demand_kwh: 1_000_000.0,
            solar_capacity_factor: 0.2,
            water_demand_m3: 50_000.0,
            water_supply_m3: 60_000.0,
            crop_type: None,
            baseline_yield_kg: None,
        };
        let s = serde_json::to_string(&r).unwrap();
        assert!(!s.contains("crop_type"));
        let back: BaselineRecord = serde_json::from_str(&s).unwrap();
        assert_eq!(back, r);
    }
}
