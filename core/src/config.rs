use crate::{error::MetricsResult, filter::TimePeriod};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "dashboard_config.json";

/// Header aliases applied before schema validation.
/// Keys are matched case-insensitively after trimming.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMappings {
    #[serde(default)]
    pub business: HashMap<String, String>,
    #[serde(default)]
    pub marketing: HashMap<String, String>,
}

/// Thresholds for the narrative insight layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// Size of top/bottom campaign lists.
    pub top_n: usize,
    /// A day is "high AOV" when its AOV exceeds `avg_aov * high_aov_multiplier`.
    pub high_aov_multiplier: f64,
    /// Coefficient of variation of daily gross margin above which margins are flagged.
    pub margin_volatility_threshold: f64,
    /// Percent rise in spend per new customer (earlier half → later half) that gets flagged.
    pub cac_rise_threshold_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub business_file: String,
    /// Channel name → CSV file name. Every row of a file is tagged with its channel.
    pub marketing_files: BTreeMap<String, String>,
    pub column_mappings: ColumnMappings,
    pub default_period: TimePeriod,
    pub insights: InsightConfig,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            high_aov_multiplier: 1.2,
            margin_volatility_threshold: 0.10,
            cac_rise_threshold_pct: 5.0,
        }
    }
}

impl Default for ColumnMappings {
    fn default() -> Self {
        let business = [
            ("# of orders", "order_count"),
            ("no_of_orders", "order_count"),
            ("new customers", "new_customers"),
            ("# of new orders", "new_order_count"),
            ("no_of_new_orders", "new_order_count"),
            ("total revenue", "total_revenue"),
            ("gross profit", "gross_profit"),
        ];
        let marketing = [
            ("attributed revenue", "attributed_revenue"),
            ("impression", "impressions"),
        ];
        Self {
            business: business
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            marketing: marketing
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            business_file: "business.csv".into(),
            marketing_files: [
                ("Facebook".to_string(), "Facebook.csv".to_string()),
                ("Google".to_string(), "Google.csv".to_string()),
                ("TikTok".to_string(), "TikTok.csv".to_string()),
            ]
            .into(),
            column_mappings: ColumnMappings::default(),
            default_period: TimePeriod::Last90Days,
            insights: InsightConfig::default(),
        }
    }
}

impl MetricsConfig {
    /// Load `dashboard_config.json` from the dataset directory.
    /// Falls back to the built-in defaults when the file does not exist.
    pub fn load(data_dir: &str) -> MetricsResult<Self> {
        let path = Path::new(data_dir).join(CONFIG_FILE_NAME);
        if !path.exists() {
            log::debug!("No {CONFIG_FILE_NAME} in {data_dir}; using built-in config");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        Ok(Self::from_json(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))?)
    }

    pub fn from_json(content: &str) -> MetricsResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        if config.marketing_files.is_empty() {
            return Err(anyhow::anyhow!("marketing_files must name at least one channel").into());
        }
        Ok(config)
    }
}
